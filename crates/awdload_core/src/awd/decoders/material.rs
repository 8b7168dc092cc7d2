use crate::awd::bytes::Cursor;
use crate::awd::decoders::DecodeContext;
use crate::awd::props::{PropertyList, skip_attributes};
use crate::awd::{BlockRecord, BlockRef, MaterialKind, MaterialRecord, ParseError, Result, TextureRecord, TextureSource};

const PROP_COLOR: u16 = 1;
const PROP_TEXTURE: u16 = 2;
const PROP_ALPHA: u16 = 10;
const PROP_REPEAT: u16 = 13;

const DEFAULT_COLOR: u32 = 0x00FF_FFFF;

/// Decode a color or bitmap material.
///
/// Shading method chains are valid data but are reported as not implemented.
pub fn decode_simple_material(cursor: &mut Cursor<'_>, ctx: &DecodeContext) -> Result<BlockRecord> {
	let name = cursor.read_string()?;

	let at = cursor.offset();
	let kind = match cursor.read_u8()? {
		1 => MaterialKind::Color,
		2 => MaterialKind::Bitmap,
		other => return Err(ParseError::malformed(format!("unknown material type {other}"), at)),
	};

	let at = cursor.offset();
	if cursor.read_u8()? != 0 {
		return Err(ParseError::not_implemented("material shading methods", at));
	}

	let props_at = cursor.offset();
	let props = PropertyList::parse(cursor)?;
	let color = props.u32(PROP_COLOR)?.unwrap_or(DEFAULT_COLOR);
	let alpha = props.float(PROP_ALPHA, ctx.precision.wide_props)?.unwrap_or(1.0);
	let repeat = props.bool(PROP_REPEAT)?.unwrap_or(false);
	let texture = match kind {
		MaterialKind::Color => None,
		MaterialKind::Bitmap => {
			let texture = props.u32(PROP_TEXTURE)?.and_then(BlockRef::from_address);
			Some(texture.ok_or_else(|| ParseError::malformed("bitmap material has no texture", props_at))?)
		}
	};
	skip_attributes(cursor)?;

	Ok(BlockRecord::Material(MaterialRecord {
		name,
		kind,
		color,
		texture,
		alpha,
		repeat,
	}))
}

/// Decode a bitmap texture stored externally or embedded.
pub fn decode_bitmap_texture(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	let name = cursor.read_string()?;

	let at = cursor.offset();
	let storage = cursor.read_u8()?;
	let data_at = cursor.offset() + 4;
	let data = cursor.read_blob()?;
	let source = match storage {
		0 => {
			let path = std::str::from_utf8(data).map_err(|_| ParseError::malformed("texture path is not valid UTF-8", data_at))?;
			TextureSource::External(path.to_owned())
		}
		1 => TextureSource::Embedded(data.to_vec()),
		other => return Err(ParseError::malformed(format!("unknown texture storage {other}"), at)),
	};

	PropertyList::parse(cursor)?;
	skip_attributes(cursor)?;

	Ok(BlockRecord::Texture(TextureRecord { name, source }))
}
