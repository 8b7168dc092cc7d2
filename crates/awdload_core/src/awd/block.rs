use crate::awd::bytes::Cursor;
use crate::awd::{Precision, Result};

/// Parsed fixed-size block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
	/// Block address; the first block in a stream is `1`.
	pub id: u32,
	/// Namespace byte (`0` is the built-in namespace).
	pub namespace: u8,
	/// Block type within the namespace.
	pub type_id: u8,
	/// Raw block flag bits.
	pub flags: u8,
	/// Declared payload length.
	pub len: u32,
}

impl BlockHeader {
	/// Encoded header size in bytes.
	pub const SIZE: usize = 11;
	/// Matrices in this block are `f64`.
	pub const FLAG_WIDE_MATRICES: u8 = 0x01;
	/// Geometry in this block is `f64`.
	pub const FLAG_WIDE_GEOMETRY: u8 = 0x02;
	/// Property floats in this block are `f64`.
	pub const FLAG_WIDE_PROPS: u8 = 0x04;
	/// Loading must fail when this block cannot be decoded.
	pub const FLAG_REQUIRED: u8 = 0x80;

	/// Parse a block header from cursor position.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let id = cursor.read_u32()?;
		let namespace = cursor.read_u8()?;
		let type_id = cursor.read_u8()?;
		let flags = cursor.read_u8()?;
		let len = cursor.read_u32()?;

		Ok(Self {
			id,
			namespace,
			type_id,
			flags,
			len,
		})
	}

	/// Return `true` when the required flag is set.
	pub fn is_required(&self) -> bool {
		self.flags & Self::FLAG_REQUIRED != 0
	}

	/// Return block-level float precision flags.
	pub fn precision(&self) -> Precision {
		Precision {
			wide_matrices: self.flags & Self::FLAG_WIDE_MATRICES != 0,
			wide_geometry: self.flags & Self::FLAG_WIDE_GEOMETRY != 0,
			wide_props: self.flags & Self::FLAG_WIDE_PROPS != 0,
		}
	}
}

/// Borrowed view over one block read from the stream.
#[derive(Debug, Clone, Copy)]
pub struct RawBlock<'a> {
	/// Parsed block header.
	pub head: BlockHeader,
	/// Payload bytes, exactly `head.len` long.
	pub payload: &'a [u8],
	/// Absolute offset where this block header starts.
	pub offset: usize,
}

impl<'a> RawBlock<'a> {
	/// Absolute offset of the first payload byte.
	pub fn payload_offset(&self) -> usize {
		self.offset + BlockHeader::SIZE
	}

	/// Cursor bounded to this block's payload.
	pub fn cursor(&self) -> Cursor<'a> {
		Cursor::with_base(self.payload, self.payload_offset())
	}
}

/// Iterator over contiguous blocks in a body.
///
/// Stops after the first error; a block whose declared length overruns the body
/// yields a truncation error at its payload offset.
pub struct BlockIter<'a> {
	cursor: Cursor<'a>,
	done: bool,
}

impl<'a> BlockIter<'a> {
	/// Create a block iterator over `body`, whose first byte sits at absolute `base`.
	pub fn new(body: &'a [u8], base: usize) -> Self {
		Self {
			cursor: Cursor::with_base(body, base),
			done: false,
		}
	}

	/// Bytes consumed so far.
	pub fn consumed(&self) -> usize {
		self.cursor.pos()
	}
}

impl<'a> Iterator for BlockIter<'a> {
	type Item = Result<RawBlock<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		if self.cursor.is_empty() {
			self.done = true;
			return None;
		}

		let offset = self.cursor.offset();
		let head = match BlockHeader::parse(&mut self.cursor) {
			Ok(value) => value,
			Err(err) => {
				self.done = true;
				return Some(Err(err));
			}
		};

		let payload = match self.cursor.read_exact(head.len as usize) {
			Ok(value) => value,
			Err(err) => {
				self.done = true;
				return Some(Err(err));
			}
		};

		Some(Ok(RawBlock { head, payload, offset }))
	}
}
