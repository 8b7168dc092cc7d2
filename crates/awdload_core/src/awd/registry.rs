use std::fmt;

use crate::awd::bytes::Cursor;
use crate::awd::decoders::{self, DecodeContext};
use crate::awd::{BlockRecord, Result};

/// Decoder entry point: consumes a block-bounded cursor and produces a record.
pub type DecodeFn = fn(&mut Cursor<'_>, &DecodeContext) -> Result<BlockRecord>;

/// One registry row mapping a block type to its decoder.
#[derive(Clone, Copy)]
pub struct BlockDecoder {
	/// Namespace byte.
	pub namespace: u8,
	/// Type byte within the namespace.
	pub type_id: u8,
	/// Stable block type name.
	pub name: &'static str,
	/// Decoder function.
	pub decode: DecodeFn,
}

impl fmt::Debug for BlockDecoder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BlockDecoder")
			.field("namespace", &self.namespace)
			.field("type_id", &self.type_id)
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

const fn entry(type_id: u8, name: &'static str, decode: DecodeFn) -> BlockDecoder {
	BlockDecoder {
		namespace: 0,
		type_id,
		name,
		decode,
	}
}

const STANDARD_DECODERS: &[BlockDecoder] = &[
	entry(1, "TriangleGeometry", decoders::geometry::decode_triangle_geometry),
	entry(11, "PrimitiveGeometry", decoders::unsupported::decode_primitive_geometry),
	entry(21, "Scene", decoders::unsupported::decode_scene),
	entry(22, "Container", decoders::node::decode_container),
	entry(23, "MeshInstance", decoders::node::decode_mesh_instance),
	entry(41, "Light", decoders::unsupported::decode_light),
	entry(42, "Camera", decoders::unsupported::decode_camera),
	entry(81, "SimpleMaterial", decoders::material::decode_simple_material),
	entry(82, "BitmapTexture", decoders::material::decode_bitmap_texture),
	entry(83, "CubeTexture", decoders::unsupported::decode_cube_texture),
	entry(101, "Skeleton", decoders::skeleton::decode_skeleton),
	entry(102, "SkeletonPose", decoders::skeleton::decode_skeleton_pose),
	entry(103, "SkeletonAnimation", decoders::skeleton::decode_skeleton_animation),
	entry(254, "Namespace", decoders::meta::decode_namespace),
	entry(255, "Metadata", decoders::meta::decode_metadata),
];

static STANDARD: BlockRegistry = BlockRegistry::from_static(STANDARD_DECODERS);

/// Closed, immutable mapping from `(namespace, type)` to a decoder.
#[derive(Debug)]
pub struct BlockRegistry {
	entries: &'static [BlockDecoder],
}

impl BlockRegistry {
	/// Registry of every block type this crate understands.
	pub fn standard() -> &'static Self {
		&STANDARD
	}

	/// Wrap a fixed decoder table.
	pub const fn from_static(entries: &'static [BlockDecoder]) -> Self {
		Self { entries }
	}

	/// Find the decoder for a block type; absence is not an error.
	pub fn lookup(&self, namespace: u8, type_id: u8) -> Option<&BlockDecoder> {
		self.entries.iter().find(|item| item.namespace == namespace && item.type_id == type_id)
	}

	/// Return every registered decoder.
	pub fn entries(&self) -> &[BlockDecoder] {
		self.entries
	}
}
