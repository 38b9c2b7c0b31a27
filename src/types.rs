//! Global type definitions.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Closing tag the table is inserted in front of.
pub const CLOSING_TAG: &[u8; 7] = b"</body>";

/// Document written by `init`.
pub const SKELETON: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n\t<head>\n\t\t<meta charset=\"UTF-8\">\n\t\t<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\t\t<title>Title</title>\n\t</head>\n\t<body>\n\n\t</body>\n</html>";

pub static USAGE_INIT: &str = "htmlmaker init <filename>";
pub static USAGE_TABLE: &str = "htmlmaker table <filename> <csv_file_path> <table_name>";

/// A CSV row; one string per field.
pub type Row = Vec<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	/// Directory HTML documents are created in and looked up from.
	pub output_dir: PathBuf,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			output_dir: PathBuf::from("./output"),
		}
	}
}

#[derive(Debug, PartialEq)]
pub enum Command {
	Help,
	Init {
		filename: String,
	},
	Table {
		filename: String,
		csv_path: PathBuf,
		table_name: String,
	},
}

impl Command {
	/// Parse
	///
	/// Parse a command from program arguments, excluding the program name itself. Unknown
	/// commands and wrong argument counts are both rejected as invalid arguments.
	pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
		let args: Vec<String> = args.into_iter().collect();
		let (action, rest) = match args.split_first() {
			Some((action, rest)) => (action.as_str(), rest),
			None => return Err(Error::NoActions),
		};

		match (action, rest) {
			("help", []) => Ok(Command::Help),
			("help", _) => Err(Error::InvalidArguments(
				"Command 'help' takes no arguments".to_string(),
			)),
			("init", [filename]) => Ok(Command::Init {
				filename: filename.clone(),
			}),
			("init", _) => Err(wrong_arguments("init", USAGE_INIT)),
			("table", [filename, csv_path, table_name]) => Ok(Command::Table {
				filename: filename.clone(),
				csv_path: PathBuf::from(csv_path),
				table_name: table_name.clone(),
			}),
			("table", _) => Err(wrong_arguments("table", USAGE_TABLE)),
			(other, _) => Err(Error::InvalidArguments(format!(
				"Unknown command '{}': try 'htmlmaker help' for a list of commands.",
				other
			))),
		}
	}
}

fn wrong_arguments(command: &str, usage: &str) -> Error {
	Error::InvalidArguments(format!(
		"Wrong arguments used for command '{}': correct '{}' format -- {}",
		command, command, usage
	))
}

/// Identifier given to a generated table, used as its `id` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct TableName(String);

impl TableName {
	/// New
	///
	/// Validate a table name against the document it will be inserted into. The name must be a
	/// usable `id` value (non-empty, no whitespace, nothing that needs escaping inside an
	/// attribute) and must not already be used as an `id` in `document`.
	pub fn new(name: &str, document: &[u8]) -> Result<Self> {
		if name.is_empty() {
			return Err(Error::InvalidArguments(
				"Table name must not be empty".to_string(),
			));
		}
		if name
			.chars()
			.any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&'))
		{
			return Err(Error::InvalidArguments(format!(
				"Table name '{}' contains characters not allowed in an id",
				name
			)));
		}
		let double = format!("id=\"{}\"", name);
		let single = format!("id='{}'", name);
		if contains(document, double.as_bytes()) || contains(document, single.as_bytes()) {
			return Err(Error::InvalidArguments(format!(
				"An element with id '{}' already exists in the document",
				name
			)));
		}
		Ok(Self(name.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|window| window == needle)
}

/// Parsed CSV contents. The first record is the header; an empty CSV has neither header nor
/// rows.
#[derive(Debug, Default, PartialEq)]
pub struct Table {
	pub header: Option<Row>,
	pub rows: Vec<Row>,
}
