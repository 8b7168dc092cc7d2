//! One pure decoder per supported block type.
//!
//! Decoders only see a cursor bounded to their block payload and the effective
//! float precision; they share no state and never coordinate with each other.

use crate::awd::bytes::Cursor;
use crate::awd::{BlockRef, Matrix3x4, Precision, Result};

/// Geometry block decoders.
pub mod geometry;
/// Material and texture block decoders.
pub mod material;
/// Metadata and namespace block decoders.
pub mod meta;
/// Scene node block decoders.
pub mod node;
/// Skeleton, pose, and animation block decoders.
pub mod skeleton;
/// Decoders for registered block types whose contents are not decoded.
pub mod unsupported;

/// Per-block inputs shared by all decoders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeContext {
	/// Header precision combined with the block's own precision flags.
	pub precision: Precision,
}

/// Read a 3x4 matrix.
pub(crate) fn read_matrix(cursor: &mut Cursor<'_>, wide: bool) -> Result<Matrix3x4> {
	let mut out = [0.0_f32; 12];
	for slot in &mut out {
		*slot = cursor.read_float(wide)?;
	}
	Ok(out)
}

/// Read a block address; `0` yields `None`.
pub(crate) fn read_ref(cursor: &mut Cursor<'_>) -> Result<Option<BlockRef>> {
	cursor.read_u32().map(BlockRef::from_address)
}
