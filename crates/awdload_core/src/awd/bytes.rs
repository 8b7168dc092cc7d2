use crate::awd::{ParseError, ParseErrorKind, Result};

/// Bounded little-endian cursor over an immutable byte slice.
///
/// Offsets reported in errors are absolute: `base` is the stream offset of the
/// first byte in `bytes`, so sub-cursors created by [`Cursor::slice`] keep
/// pointing at the right place in the file.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	base: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0 with absolute base 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self::with_base(bytes, 0)
	}

	/// Create a cursor whose first byte lives at absolute offset `base`.
	pub fn with_base(bytes: &'a [u8], base: usize) -> Self {
		Self { bytes, pos: 0, base }
	}

	/// Return position relative to this cursor's start.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return absolute stream offset of the next unread byte.
	pub fn offset(&self) -> usize {
		self.base + self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return `true` when every byte has been consumed.
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(ParseError::new(
				ParseErrorKind::TruncatedBlock {
					need: n,
					rem: self.remaining(),
				},
				self.offset(),
			));
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Skip `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		self.read_exact(n).map(|_| ())
	}

	/// Read a fixed-width byte array.
	pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_fixed::<1>()?[0])
	}

	/// Read one byte as a boolean (non-zero is `true`).
	pub fn read_bool(&mut self) -> Result<bool> {
		Ok(self.read_u8()? != 0)
	}

	/// Read a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		self.read_fixed().map(u16::from_le_bytes)
	}

	/// Read a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		self.read_fixed().map(u32::from_le_bytes)
	}

	/// Read a little-endian `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		self.read_fixed().map(f32::from_le_bytes)
	}

	/// Read a little-endian `f64`.
	pub fn read_f64(&mut self) -> Result<f64> {
		self.read_fixed().map(f64::from_le_bytes)
	}

	/// Read a float stored as `f64` when `wide` is set, else as `f32`.
	pub fn read_float(&mut self, wide: bool) -> Result<f32> {
		if wide { Ok(self.read_f64()? as f32) } else { self.read_f32() }
	}

	/// Read a `u16`-length-prefixed UTF-8 string.
	pub fn read_string(&mut self) -> Result<String> {
		let len = usize::from(self.read_u16()?);
		let at = self.offset();
		let raw = self.read_exact(len)?;
		let text = std::str::from_utf8(raw).map_err(|_| ParseError::malformed("string is not valid UTF-8", at))?;
		Ok(text.to_owned())
	}

	/// Read a `u32`-length-prefixed byte blob.
	pub fn read_blob(&mut self) -> Result<&'a [u8]> {
		let len = self.read_u32()? as usize;
		self.read_exact(len)
	}

	/// Split off the next `len` bytes as an independently bounded cursor.
	pub fn slice(&mut self, len: usize) -> Result<Cursor<'a>> {
		let base = self.offset();
		let bytes = self.read_exact(len)?;
		Ok(Cursor::with_base(bytes, base))
	}

	/// Split off a `u32`-length-prefixed region as a bounded cursor.
	pub fn slice_prefixed(&mut self) -> Result<Cursor<'a>> {
		let len = self.read_u32()? as usize;
		self.slice(len)
	}
}
