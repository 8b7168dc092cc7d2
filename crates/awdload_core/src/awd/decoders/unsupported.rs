use crate::awd::bytes::Cursor;
use crate::awd::decoders::DecodeContext;
use crate::awd::{BlockRecord, ParseError, Result};

/// Parametric primitives are not tessellated by this loader.
pub fn decode_primitive_geometry(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	Err(ParseError::not_implemented("primitive geometry", cursor.offset()))
}

/// Scene roots are not decoded.
pub fn decode_scene(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	Err(ParseError::not_implemented("scene block", cursor.offset()))
}

/// Lights are not decoded.
pub fn decode_light(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	Err(ParseError::not_implemented("light", cursor.offset()))
}

/// Cameras are not decoded.
pub fn decode_camera(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	Err(ParseError::not_implemented("camera", cursor.offset()))
}

/// Cube textures are not decoded.
pub fn decode_cube_texture(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	Err(ParseError::not_implemented("cube texture", cursor.offset()))
}
