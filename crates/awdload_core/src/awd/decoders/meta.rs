use crate::awd::bytes::Cursor;
use crate::awd::decoders::DecodeContext;
use crate::awd::props::PropertyList;
use crate::awd::{BlockRecord, MetadataRecord, NamespaceRecord, ParseError, Result};

/// Decode exporter metadata.
pub fn decode_metadata(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	let props = PropertyList::parse(cursor)?;
	Ok(BlockRecord::Metadata(MetadataRecord {
		timestamp: props.u32(1)?,
		encoder_name: props.string(2)?,
		encoder_version: props.string(3)?,
		generator_name: props.string(4)?,
		generator_version: props.string(5)?,
	}))
}

/// Decode a namespace declaration.
pub fn decode_namespace(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	let at = cursor.offset();
	let id = cursor.read_u8()?;
	if id == 0 {
		return Err(ParseError::malformed("namespace id 0 is reserved", at));
	}
	let uri = cursor.read_string()?;
	Ok(BlockRecord::Namespace(NamespaceRecord { id, uri }))
}
