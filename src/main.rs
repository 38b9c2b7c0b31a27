//! Program entrypoint and command dispatch.

use std::env;
use std::process::ExitCode;

use htmlmaker::error::Result;
use htmlmaker::process;
use htmlmaker::types::{Command, Config, USAGE_INIT, USAGE_TABLE};

fn main() -> ExitCode {
	env_logger::init();
	match run(env::args().skip(1)) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("[ERROR {}]: {}", err.code(), err);
			ExitCode::from(err.code())
		}
	}
}

/// Run
///
/// Parse and execute a single command. The output directory is always the default one; only
/// tests point it elsewhere.
fn run(args: impl Iterator<Item = String>) -> Result<()> {
	let config = Config::default();
	match Command::parse(args)? {
		Command::Help => print_help(),
		Command::Init { filename } => {
			process::init(&config, &filename)?;
			println!(
				"HTML file '{}' successfully created at {}!",
				filename,
				config.output_dir.display()
			);
		}
		Command::Table {
			filename,
			csv_path,
			table_name,
		} => {
			let insertion = process::insert_table(&config, &filename, &csv_path, &table_name)?;
			println!(
				"Table '{}' ({} rows) inserted into '{}'",
				table_name, insertion.rows, filename
			);
		}
	}
	Ok(())
}

fn print_help() {
	println!("List of available actions:\n");
	println!("Basic actions:");
	println!("\t- htmlmaker help");
	println!("\t- {}\n", USAGE_INIT);
	println!("Tables:");
	println!("\t- {}", USAGE_TABLE);
}
