use crate::awd::bytes::Cursor;
use crate::awd::decoders::DecodeContext;
use crate::awd::props::{PropertyList, skip_attributes};
use crate::awd::{BlockRecord, MeshRecord, ParseError, Result, SubMesh};

const STREAM_VERTICES: u8 = 1;
const STREAM_INDICES: u8 = 2;
const STREAM_UVS: u8 = 3;
const STREAM_NORMALS: u8 = 4;

const DATA_U16: u8 = 5;
const DATA_U32: u8 = 6;
/// Float whose width follows the effective geometry precision.
const DATA_FLOAT: u8 = 7;
const DATA_F64: u8 = 8;

/// Decode an indexed triangle geometry with one or more sub-meshes.
pub fn decode_triangle_geometry(cursor: &mut Cursor<'_>, ctx: &DecodeContext) -> Result<BlockRecord> {
	let name = cursor.read_string()?;
	let count = cursor.read_u16()?;
	PropertyList::parse(cursor)?;

	let mut sub_meshes = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let mut sub = cursor.slice_prefixed()?;
		sub_meshes.push(decode_sub_mesh(&mut sub, ctx.precision.wide_geometry)?);
	}

	skip_attributes(cursor)?;
	Ok(BlockRecord::Mesh(MeshRecord { name, sub_meshes }))
}

fn decode_sub_mesh(cursor: &mut Cursor<'_>, wide: bool) -> Result<SubMesh> {
	let start = cursor.offset();
	PropertyList::parse(cursor)?;

	let mut mesh = SubMesh::default();
	while !cursor.is_empty() {
		let stream_type = cursor.read_u8()?;
		let data_type = cursor.read_u8()?;
		let mut data = cursor.slice_prefixed()?;
		match stream_type {
			STREAM_VERTICES => mesh.vertices = read_scalars(&mut data, data_type, 3, wide)?,
			STREAM_INDICES => mesh.indices = read_indices(&mut data, data_type)?,
			STREAM_UVS => mesh.uvs = read_scalars(&mut data, data_type, 2, wide)?,
			STREAM_NORMALS => mesh.normals = read_scalars(&mut data, data_type, 3, wide)?,
			other => log::trace!("skipping geometry stream type {other} at offset {}", data.offset()),
		}
	}

	validate_sub_mesh(&mesh, start)?;
	Ok(mesh)
}

fn read_scalars(data: &mut Cursor<'_>, data_type: u8, arity: usize, wide: bool) -> Result<Vec<f32>> {
	let wide = match data_type {
		DATA_FLOAT => wide,
		DATA_F64 => true,
		other => return Err(ParseError::malformed(format!("float stream has data type {other}"), data.offset())),
	};
	let count = element_count(data, if wide { 8 } else { 4 })?;
	if count % arity != 0 {
		return Err(ParseError::malformed(
			format!("stream of {count} scalars is not a multiple of {arity}"),
			data.offset(),
		));
	}

	let mut out = Vec::with_capacity(count);
	for _ in 0..count {
		out.push(data.read_float(wide)?);
	}
	Ok(out)
}

fn read_indices(data: &mut Cursor<'_>, data_type: u8) -> Result<Vec<u32>> {
	let width = match data_type {
		DATA_U16 => 2,
		DATA_U32 => 4,
		other => return Err(ParseError::malformed(format!("index stream has data type {other}"), data.offset())),
	};
	let count = element_count(data, width)?;

	let mut out = Vec::with_capacity(count);
	for _ in 0..count {
		let index = if data_type == DATA_U16 {
			u32::from(data.read_u16()?)
		} else {
			data.read_u32()?
		};
		out.push(index);
	}
	Ok(out)
}

fn element_count(data: &Cursor<'_>, width: usize) -> Result<usize> {
	let len = data.remaining();
	if len % width != 0 {
		return Err(ParseError::malformed(
			format!("stream length {len} is not a multiple of element size {width}"),
			data.offset(),
		));
	}
	Ok(len / width)
}

fn validate_sub_mesh(mesh: &SubMesh, offset: usize) -> Result<()> {
	let vertex_count = mesh.vertices.len() / 3;
	if mesh.indices.len() % 3 != 0 {
		return Err(ParseError::malformed(
			format!("{} indices do not form whole triangles", mesh.indices.len()),
			offset,
		));
	}
	if let Some(bad) = mesh.indices.iter().find(|index| **index as usize >= vertex_count) {
		return Err(ParseError::malformed(
			format!("index {bad} out of range for {vertex_count} vertices"),
			offset,
		));
	}
	if !mesh.uvs.is_empty() && mesh.uvs.len() / 2 != vertex_count {
		return Err(ParseError::malformed("uv count does not match vertex count", offset));
	}
	if !mesh.normals.is_empty() && mesh.normals.len() / 3 != vertex_count {
		return Err(ParseError::malformed("normal count does not match vertex count", offset));
	}
	Ok(())
}
