use std::borrow::Cow;

use miniz_oxide::inflate::{TINFLStatus, decompress_to_vec_zlib_with_limit};

use crate::awd::{AwdHeader, ParseError, ParseErrorKind, Result};

/// Body compression scheme named by the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Body is stored raw.
	None,
	/// Body is a zlib (deflate) stream.
	Deflate,
	/// Body is an LZMA stream.
	Lzma,
}

impl Compression {
	/// Map the raw header byte to a scheme.
	pub fn from_byte(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::None),
			1 => Some(Self::Deflate),
			2 => Some(Self::Lzma),
			_ => None,
		}
	}

	/// Raw header byte for this scheme.
	pub fn as_byte(self) -> u8 {
		match self {
			Self::None => 0,
			Self::Deflate => 1,
			Self::Lzma => 2,
		}
	}

	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Deflate => "deflate",
			Self::Lzma => "lzma",
		}
	}
}

/// Return the block stream that follows `header`, inflating it when needed.
///
/// Block offsets inside the returned body are relative to its start; add
/// [`AwdHeader::SIZE`] to obtain stream offsets.
pub fn open_body<'a>(bytes: &'a [u8], header: &AwdHeader, max_body_bytes: usize) -> Result<Cow<'a, [u8]>> {
	let stored = bytes.get(AwdHeader::SIZE..).unwrap_or(&[]);
	let body_len = header.body_len as usize;
	if stored.len() > body_len {
		log::debug!("ignoring {} trailing bytes after body", stored.len() - body_len);
	}

	match header.compression {
		Compression::None => {
			if body_len > max_body_bytes {
				return Err(too_large(max_body_bytes));
			}
			// A short plain body is streamed as-is; the block that overruns it reports the shortfall.
			if stored.len() < body_len {
				log::debug!("body holds {} of {} declared bytes", stored.len(), body_len);
			}
			Ok(Cow::Borrowed(&stored[..stored.len().min(body_len)]))
		}
		Compression::Deflate => {
			if stored.len() < body_len {
				return Err(ParseError::new(
					ParseErrorKind::TruncatedBlock {
						need: body_len,
						rem: stored.len(),
					},
					AwdHeader::SIZE + stored.len(),
				));
			}
			let stored = &stored[..body_len];
			let out = decompress_to_vec_zlib_with_limit(stored, max_body_bytes).map_err(|err| match err.status {
				TINFLStatus::HasMoreOutput => too_large(max_body_bytes),
				status => ParseError::new(ParseErrorKind::Decompress { reason: format!("{status:?}") }, AwdHeader::SIZE),
			})?;
			log::debug!("inflated body {} -> {} bytes", stored.len(), out.len());
			Ok(Cow::Owned(out))
		}
		Compression::Lzma => Err(ParseError::new(
			ParseErrorKind::UnsupportedCompression {
				compression: Compression::Lzma.as_byte(),
			},
			7,
		)),
	}
}

fn too_large(limit: usize) -> ParseError {
	ParseError::new(
		ParseErrorKind::Decompress {
			reason: format!("body exceeds limit {limit} bytes"),
		},
		AwdHeader::SIZE,
	)
}

#[cfg(test)]
mod tests;
