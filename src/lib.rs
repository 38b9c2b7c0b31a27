//! Scaffold HTML documents and splice CSV files into them as tables.

pub mod error;
pub mod locate;
pub mod process;
pub mod table;
pub mod types;
