use crate::awd::{Compression, ParseError, ParseErrorKind, Result};

/// Float widths selected by header and block precision flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Precision {
	/// Matrices are stored as `f64`.
	pub wide_matrices: bool,
	/// Geometry scalars are stored as `f64`.
	pub wide_geometry: bool,
	/// Property floats are stored as `f64`.
	pub wide_props: bool,
}

impl Precision {
	/// Combine with another precision set; a wide flag on either side wins.
	pub fn union(self, other: Self) -> Self {
		Self {
			wide_matrices: self.wide_matrices || other.wide_matrices,
			wide_geometry: self.wide_geometry || other.wide_geometry,
			wide_props: self.wide_props || other.wide_props,
		}
	}
}

/// Parsed fixed-size file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwdHeader {
	/// Format major version.
	pub version_major: u8,
	/// Format minor version.
	pub version_minor: u8,
	/// Raw header flag bits.
	pub flags: u16,
	/// Body compression scheme.
	pub compression: Compression,
	/// Stored body length in bytes (compressed length when compressed).
	pub body_len: u32,
}

impl AwdHeader {
	/// Exact header size in bytes.
	pub const SIZE: usize = 12;
	/// Leading file magic.
	pub const MAGIC: [u8; 3] = *b"AWD";
	/// Only supported major version.
	pub const VERSION_MAJOR: u8 = 2;
	/// Highest supported minor version.
	pub const MAX_VERSION_MINOR: u8 = 1;

	/// Body is laid out for streaming consumption.
	pub const FLAG_STREAMING: u16 = 0x0001;
	/// Matrices default to `f64`.
	pub const FLAG_WIDE_MATRICES: u16 = 0x0002;
	/// Geometry defaults to `f64`.
	pub const FLAG_WIDE_GEOMETRY: u16 = 0x0004;
	/// Property floats default to `f64`.
	pub const FLAG_WIDE_PROPS: u16 = 0x0008;

	/// Parse and validate the header at the start of `bytes`.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let header = bytes.get(0..Self::SIZE).ok_or_else(|| malformed("header shorter than 12 bytes", bytes.len()))?;
		if header[0..3] != Self::MAGIC {
			return Err(malformed("bad magic", 0));
		}

		let version_major = header[3];
		let version_minor = header[4];
		if version_major != Self::VERSION_MAJOR || version_minor > Self::MAX_VERSION_MINOR {
			return Err(malformed("unsupported version", 3));
		}

		let flags = u16::from_le_bytes([header[5], header[6]]);
		let compression = Compression::from_byte(header[7])
			.ok_or_else(|| ParseError::new(ParseErrorKind::UnsupportedCompression { compression: header[7] }, 7))?;
		let body_len = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

		Ok(Self {
			version_major,
			version_minor,
			flags,
			compression,
			body_len,
		})
	}

	/// Return `true` when the streaming flag is set.
	pub fn is_streaming(&self) -> bool {
		self.flags & Self::FLAG_STREAMING != 0
	}

	/// Return file-wide float precision.
	pub fn precision(&self) -> Precision {
		Precision {
			wide_matrices: self.flags & Self::FLAG_WIDE_MATRICES != 0,
			wide_geometry: self.flags & Self::FLAG_WIDE_GEOMETRY != 0,
			wide_props: self.flags & Self::FLAG_WIDE_PROPS != 0,
		}
	}
}

fn malformed(reason: &'static str, offset: usize) -> ParseError {
	ParseError::new(ParseErrorKind::MalformedHeader { reason }, offset)
}
