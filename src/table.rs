//! CSV reading and HTML table rendering.

use std::borrow::Cow;
use std::io::{BufReader, Read};

use crate::error::Result;
use crate::types::{Row, Table, TableName};

/// Read Table
///
/// Read every record from `input`. Fields are split on commas with no quoting or trimming, so
/// cell text is taken verbatim. Records may have differing lengths. Blank lines are skipped and
/// invalid UTF-8 is replaced rather than rejected.
pub fn read_table<R: Read>(input: R) -> Result<Table> {
	let buffered = BufReader::new(input);
	let mut rdr = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.quoting(false)
		.from_reader(buffered);

	let mut records = Vec::new();
	for result in rdr.byte_records() {
		let record = result?;
		let row: Row = record
			.iter()
			.map(|field| String::from_utf8_lossy(field).into_owned())
			.collect();
		records.push(row);
	}
	log::debug!("Read {} CSV records", records.len());

	let mut records = records.into_iter();
	Ok(Table {
		header: records.next(),
		rows: records.collect(),
	})
}

/// Render Table
///
/// Render `table` as a `<table>` element with `name` as its id. The header becomes the single
/// row of `<thead>`. Body rows shorter than the header are padded with empty cells; longer rows
/// keep their extra cells.
///
/// The markup is laid out to sit inside the skeleton's body: it starts after the indentation
/// preceding `</body>` and ends by re-indenting it.
pub fn render_table(table: &Table, name: &TableName) -> String {
	let width = table.header.as_ref().map_or(0, |header| header.len());
	let mut html = String::new();

	html.push_str(&format!("\t<table id=\"{}\">\n", name.as_str()));
	html.push_str("\t\t\t<thead>\n");
	if let Some(header) = &table.header {
		html.push_str(&render_row(header, "th", 0));
	}
	html.push_str("\t\t\t</thead>\n");
	html.push_str("\t\t\t<tbody>\n");
	for row in &table.rows {
		html.push_str(&render_row(row, "td", width));
	}
	html.push_str("\t\t\t</tbody>\n");
	html.push_str("\t\t</table>\n\t");
	html
}

fn render_row(cells: &[String], tag: &str, width: usize) -> String {
	let mut html = String::from("\t\t\t\t<tr>");
	for cell in cells {
		html.push_str(&format!("<{tag}>{}</{tag}>", escape_html(cell), tag = tag));
	}
	for _ in cells.len()..width {
		html.push_str(&format!("<{tag}></{tag}>", tag = tag));
	}
	html.push_str("</tr>\n");
	html
}

/// Escape `&`, `<` and `>` so cell text cannot introduce markup.
pub fn escape_html(text: &str) -> Cow<'_, str> {
	if !text.contains(['&', '<', '>']) {
		return Cow::Borrowed(text);
	}
	let mut escaped = String::with_capacity(text.len() + 8);
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}
