use crate::awd::bytes::Cursor;
use crate::awd::decoders::{DecodeContext, read_matrix, read_ref};
use crate::awd::props::{PropertyList, skip_attributes};
use crate::awd::{BlockRecord, ParseError, Result, SceneNodeRecord};

/// Decode a transform-only scene node.
pub fn decode_container(cursor: &mut Cursor<'_>, ctx: &DecodeContext) -> Result<BlockRecord> {
	let parent = read_ref(cursor)?;
	let transform = read_matrix(cursor, ctx.precision.wide_matrices)?;
	let name = cursor.read_string()?;
	PropertyList::parse(cursor)?;
	skip_attributes(cursor)?;

	Ok(BlockRecord::SceneNode(SceneNodeRecord {
		name,
		parent,
		transform,
		mesh: None,
		materials: Vec::new(),
	}))
}

/// Decode a scene node that draws a geometry with a list of materials.
pub fn decode_mesh_instance(cursor: &mut Cursor<'_>, ctx: &DecodeContext) -> Result<BlockRecord> {
	let parent = read_ref(cursor)?;
	let transform = read_matrix(cursor, ctx.precision.wide_matrices)?;
	let name = cursor.read_string()?;

	let at = cursor.offset();
	let mesh = read_ref(cursor)?.ok_or_else(|| ParseError::malformed("mesh instance has no geometry", at))?;

	let count = cursor.read_u16()?;
	let mut materials = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let at = cursor.offset();
		materials.push(read_ref(cursor)?.ok_or_else(|| ParseError::malformed("mesh instance has a null material", at))?);
	}

	PropertyList::parse(cursor)?;
	skip_attributes(cursor)?;

	Ok(BlockRecord::SceneNode(SceneNodeRecord {
		name,
		parent,
		transform,
		mesh: Some(mesh),
		materials,
	}))
}
