//! Error kinds and the exit codes they map to.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("No actions given: try 'htmlmaker help' for a list of commands.")]
	NoActions,
	#[error("{0}")]
	InvalidArguments(String),
	#[error(
		"Given filename already exists at '{}'. If you wish to override it please delete it first",
		.0.display()
	)]
	FileAlreadyExists(PathBuf),
	#[error("Couldn't create file: {0}")]
	CantCreateFile(#[source] io::Error),
	#[error(
		"Given HTML file doesn't exist at '{}'. You can create it using htmlmaker init.",
		.0.display()
	)]
	HtmlFileDoesntExist(PathBuf),
	#[error("Given CSV file '{}' doesn't exist.", .0.display())]
	CsvFileDoesntExist(PathBuf),
	#[error(
		"Couldn't find the end of the HTML file '{}': no '</body>' tag",
		.0.display()
	)]
	EofTagNotFound(PathBuf),
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
	#[error("Couldn't read CSV file: {0}")]
	Csv(#[from] csv::Error),
}

impl Error {
	/// Code
	///
	/// Process exit code for this error. Both missing-file variants share a code so scripts only
	/// need to branch on "input missing".
	pub fn code(&self) -> u8 {
		match self {
			Error::NoActions => 1,
			Error::InvalidArguments(_) => 2,
			Error::FileAlreadyExists(_) => 13,
			Error::CantCreateFile(_) => 14,
			Error::HtmlFileDoesntExist(_) | Error::CsvFileDoesntExist(_) => 15,
			Error::Io(_) | Error::Csv(_) => 16,
			Error::EofTagNotFound(_) => 21,
		}
	}
}
