//! Backward scan for the closing body tag.

use std::io::{self, Read, Seek, SeekFrom};

use crate::types::CLOSING_TAG;

const TAG_LEN: i64 = CLOSING_TAG.len() as i64;

/// Locate Closing Tag
///
/// Scan `stream` backward from its end for the last `</body>` tag, one tag-sized window at a
/// time, without reading the whole stream. On success the cursor is left at the start of the
/// tag and its offset is returned; `None` means no tag was found (including streams shorter than
/// the tag itself).
///
/// After each mismatched window the cursor, which the read advanced past the window, is moved
/// back one byte more than the tag length. The next window therefore starts one byte before the
/// previous one.
pub fn locate_closing_tag<S: Read + Seek>(stream: &mut S) -> io::Result<Option<u64>> {
	let len = stream.seek(SeekFrom::End(0))?;
	if len < CLOSING_TAG.len() as u64 {
		log::debug!("Stream of {} bytes is too short to hold a closing tag", len);
		return Ok(None);
	}

	let mut position = stream.seek(SeekFrom::End(-TAG_LEN))?;
	let mut window = [0u8; CLOSING_TAG.len()];
	loop {
		stream.read_exact(&mut window)?;
		if &window == CLOSING_TAG {
			let offset = stream.seek(SeekFrom::Current(-TAG_LEN))?;
			log::debug!("Found closing tag at offset {}", offset);
			return Ok(Some(offset));
		}
		// Seeking back would land before the start of the stream
		if position == 0 {
			return Ok(None);
		}
		position = stream.seek(SeekFrom::Current(-(TAG_LEN + 1)))?;
	}
}
