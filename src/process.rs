//! Initializing documents and inserting tables into them.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::locate::locate_closing_tag;
use crate::table::{read_table, render_table};
use crate::types::{Config, TableName, SKELETON};

/// Outcome of a successful table insertion.
#[derive(Debug, PartialEq)]
pub struct Insertion {
	/// Offset of the closing tag in the document before insertion.
	pub offset: u64,
	/// Number of body rows in the inserted table.
	pub rows: usize,
}

/// Init
///
/// Create `filename` in the configured output directory (creating the directory if needed) and
/// write the skeleton document to it. An existing file is never overwritten.
pub fn init(config: &Config, filename: &str) -> Result<PathBuf> {
	if filename.is_empty() {
		return Err(Error::InvalidArguments(
			"Filename for 'init' must not be empty".to_string(),
		));
	}
	fs::create_dir_all(&config.output_dir).map_err(Error::CantCreateFile)?;

	let path = config.output_dir.join(filename);
	let mut file = OpenOptions::new()
		.write(true)
		.create_new(true)
		.open(&path)
		.map_err(|err| match err.kind() {
			io::ErrorKind::AlreadyExists => Error::FileAlreadyExists(path.clone()),
			_ => Error::CantCreateFile(err),
		})?;
	file.write_all(SKELETON.as_bytes())
		.map_err(Error::CantCreateFile)?;
	log::info!("Initialized '{}'", path.display());
	Ok(path)
}

/// Insert Table
///
/// Read the CSV file at `csv_path` and insert it as a table named `table_name` directly before
/// the last `</body>` tag of `filename` in the configured output directory.
///
/// The document is rewritten through a temporary file that replaces it only once fully written,
/// so on any error the document is left exactly as it was.
pub fn insert_table(
	config: &Config,
	filename: &str,
	csv_path: &Path,
	table_name: &str,
) -> Result<Insertion> {
	let html_path = config.output_dir.join(filename);
	if !html_path.is_file() {
		return Err(Error::HtmlFileDoesntExist(html_path));
	}
	if !csv_path.is_file() {
		return Err(Error::CsvFileDoesntExist(csv_path.to_path_buf()));
	}

	let mut html = File::open(&html_path)?;
	let offset = match locate_closing_tag(&mut html)? {
		Some(offset) => offset,
		None => return Err(Error::EofTagNotFound(html_path)),
	};

	let mut document = Vec::new();
	html.seek(SeekFrom::Start(0))?;
	html.read_to_end(&mut document)?;
	let name = TableName::new(table_name, &document)?;

	let table = read_table(File::open(csv_path)?)?;
	let markup = render_table(&table, &name);

	// Offset came from a seek within this same document
	let (before, after) = document.split_at(offset as usize);
	let permissions = html.metadata()?.permissions();
	drop(html);
	// Replace the file a symlink points at, not the link itself
	let target = fs::canonicalize(&html_path)?;
	splice(&target, &[before, markup.as_bytes(), after], permissions)?;

	log::info!(
		"Inserted table '{}' with {} rows into '{}' at offset {}",
		name.as_str(),
		table.rows.len(),
		html_path.display(),
		offset
	);
	Ok(Insertion {
		offset,
		rows: table.rows.len(),
	})
}

/// Splice
///
/// Replace the file at `path` with the concatenation of `parts`. The new content is written to a
/// temporary file next to `path` which is then renamed over it.
fn splice(path: &Path, parts: &[&[u8]], permissions: fs::Permissions) -> Result<()> {
	let dir = match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir,
		_ => Path::new("."),
	};
	let mut tmp = NamedTempFile::new_in(dir)?;
	log::debug!("Writing spliced document to '{}'", tmp.path().display());
	for part in parts {
		tmp.write_all(part)?;
	}
	tmp.as_file().sync_all()?;
	tmp.as_file().set_permissions(permissions)?;
	tmp.persist(path).map_err(|err| Error::Io(err.error))?;
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use rstest::*;
	use tempfile::{tempdir, TempDir};

	#[fixture]
	fn workspace() -> (TempDir, Config) {
		let dir = tempdir().unwrap();
		let config = Config {
			output_dir: dir.path().join("output"),
		};
		(dir, config)
	}

	fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
		let path = dir.path().join("data.csv");
		fs::write(&path, content).unwrap();
		path
	}

	#[rstest]
	fn init_writes_skeleton(workspace: (TempDir, Config)) {
		let (_dir, config) = workspace;
		let path = init(&config, "index.html").unwrap();
		assert_eq!(path, config.output_dir.join("index.html"));
		assert_eq!(fs::read_to_string(&path).unwrap(), SKELETON);
		assert_eq!(fs::read_dir(&config.output_dir).unwrap().count(), 1);
	}

	#[rstest]
	fn init_refuses_existing_file(workspace: (TempDir, Config)) {
		let (_dir, config) = workspace;
		let path = init(&config, "index.html").unwrap();
		fs::write(&path, "edited").unwrap();

		let err = init(&config, "index.html").unwrap_err();
		assert_eq!(err.code(), 13);
		assert_eq!(fs::read_to_string(&path).unwrap(), "edited");
	}

	#[rstest]
	fn init_reports_cant_create_file(workspace: (TempDir, Config)) {
		let (dir, _) = workspace;
		let blocker = dir.path().join("not-a-dir");
		fs::write(&blocker, "").unwrap();
		let config = Config {
			output_dir: blocker.clone(),
		};

		let err = init(&config, "index.html").unwrap_err();
		assert!(matches!(err, Error::CantCreateFile(_)), "{:?}", err);
		assert_eq!(err.code(), 14);
		assert_eq!(fs::read_to_string(&blocker).unwrap(), "");
	}

	#[rstest]
	fn init_rejects_empty_filename(workspace: (TempDir, Config)) {
		let (_dir, config) = workspace;
		assert_eq!(init(&config, "").unwrap_err().code(), 2);
	}

	#[rstest]
	fn inserts_table_before_closing_tag(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		let path = init(&config, "index.html").unwrap();
		let csv = write_csv(&dir, "a,b\n1,2\n");

		let insertion = insert_table(&config, "index.html", &csv, "t1").unwrap();
		assert_eq!(insertion.rows, 1);
		assert_eq!(insertion.offset as usize, SKELETON.rfind("</body>").unwrap());

		let content = fs::read_to_string(&path).unwrap();
		let table_at = content.find("<table id=\"t1\">").unwrap();
		let tag_at = content.rfind("</body>").unwrap();
		assert!(table_at < tag_at);
		assert!(content.contains("<tr><th>a</th><th>b</th></tr>"));
		assert!(content.contains("<tr><td>1</td><td>2</td></tr>"));
		assert!(content.starts_with(&SKELETON[..insertion.offset as usize]));
		assert!(content.ends_with(&SKELETON[insertion.offset as usize..]));
	}

	#[rstest]
	fn closing_tag_survives_repeated_insertion(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		let path = init(&config, "index.html").unwrap();
		let csv = write_csv(&dir, "x\n<y>\n");

		insert_table(&config, "index.html", &csv, "first").unwrap();
		let second = insert_table(&config, "index.html", &csv, "second").unwrap();

		let content = fs::read_to_string(&path).unwrap();
		assert_eq!(content.matches("</body>").count(), 1);
		let mut file = File::open(&path).unwrap();
		let offset = locate_closing_tag(&mut file).unwrap().unwrap();
		assert_eq!(&content[offset as usize..offset as usize + 7], "</body>");
		assert!(offset > second.offset);
		assert!(content.find("id=\"first\"").unwrap() < content.find("id=\"second\"").unwrap());
	}

	#[cfg(unix)]
	#[rstest]
	fn symlinked_document_stays_a_link(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		let real = init(&config, "real.html").unwrap();
		let link = config.output_dir.join("link.html");
		std::os::unix::fs::symlink(&real, &link).unwrap();
		let csv = write_csv(&dir, "a\n1\n");

		insert_table(&config, "link.html", &csv, "t1").unwrap();
		assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
		assert!(fs::read_to_string(&real).unwrap().contains("<table id=\"t1\">"));
	}

	#[rstest]
	fn missing_html_leaves_files_untouched(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		let csv = write_csv(&dir, "a,b\n1,2\n");
		let err = insert_table(&config, "missing.html", &csv, "t1").unwrap_err();
		assert!(matches!(err, Error::HtmlFileDoesntExist(_)));
		assert_eq!(err.code(), 15);
		assert_eq!(fs::read_to_string(&csv).unwrap(), "a,b\n1,2\n");
	}

	#[rstest]
	fn missing_csv_leaves_document_untouched(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		let path = init(&config, "index.html").unwrap();
		let csv = dir.path().join("missing.csv");
		let err = insert_table(&config, "index.html", &csv, "t1").unwrap_err();
		assert!(matches!(err, Error::CsvFileDoesntExist(_)));
		assert_eq!(fs::read_to_string(&path).unwrap(), SKELETON);
	}

	#[rstest]
	fn missing_closing_tag_leaves_document_untouched(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		fs::create_dir_all(&config.output_dir).unwrap();
		let path = config.output_dir.join("broken.html");
		fs::write(&path, "<html><body></html>").unwrap();
		let csv = write_csv(&dir, "a\n1\n");

		let err = insert_table(&config, "broken.html", &csv, "t1").unwrap_err();
		assert_eq!(err.code(), 21);
		assert_eq!(fs::read_to_string(&path).unwrap(), "<html><body></html>");
	}

	#[rstest]
	fn duplicate_table_name_is_rejected(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		let path = init(&config, "index.html").unwrap();
		let csv = write_csv(&dir, "a\n1\n");
		insert_table(&config, "index.html", &csv, "t1").unwrap();
		let before = fs::read_to_string(&path).unwrap();

		let err = insert_table(&config, "index.html", &csv, "t1").unwrap_err();
		assert_eq!(err.code(), 2);
		assert_eq!(fs::read_to_string(&path).unwrap(), before);
	}

	#[rstest]
	fn no_temporary_files_left_behind(workspace: (TempDir, Config)) {
		let (dir, config) = workspace;
		init(&config, "index.html").unwrap();
		let csv = write_csv(&dir, "a\n1\n");
		insert_table(&config, "index.html", &csv, "t1").unwrap();
		assert_eq!(fs::read_dir(&config.output_dir).unwrap().count(), 1);
	}
}
