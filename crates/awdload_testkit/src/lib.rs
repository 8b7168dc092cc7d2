//! Shared test helpers for workspace crates.
//!
//! [`AwdWriter`] and [`Payload`] build synthetic scene buffers byte by byte so
//! tests never depend on binary fixtures checked into the repository.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Write `bytes` to a scratch file under the target directory and return its path.
pub fn write_scratch(name: &str, bytes: &[u8]) -> PathBuf {
	let dir = target_dir().join("awdload-scratch");
	std::fs::create_dir_all(&dir).expect("scratch dir is creatable");
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("scratch file is writable");
	path
}

/// Block type ids in the default namespace.
pub mod types {
	/// Indexed triangle geometry.
	pub const TRIANGLE_GEOMETRY: u8 = 1;
	/// Parametric primitive geometry.
	pub const PRIMITIVE_GEOMETRY: u8 = 11;
	/// Scene root.
	pub const SCENE: u8 = 21;
	/// Transform-only scene node.
	pub const CONTAINER: u8 = 22;
	/// Scene node drawing a geometry.
	pub const MESH_INSTANCE: u8 = 23;
	/// Light source.
	pub const LIGHT: u8 = 41;
	/// Camera.
	pub const CAMERA: u8 = 42;
	/// Color or bitmap material.
	pub const SIMPLE_MATERIAL: u8 = 81;
	/// Bitmap texture.
	pub const BITMAP_TEXTURE: u8 = 82;
	/// Cube texture.
	pub const CUBE_TEXTURE: u8 = 83;
	/// Joint hierarchy.
	pub const SKELETON: u8 = 101;
	/// Per-joint pose.
	pub const SKELETON_POSE: u8 = 102;
	/// Frame sequence of poses.
	pub const SKELETON_ANIMATION: u8 = 103;
	/// Namespace declaration.
	pub const NAMESPACE: u8 = 254;
	/// File metadata.
	pub const METADATA: u8 = 255;
}

/// Block flag marking a block the loader must understand.
pub const FLAG_REQUIRED: u8 = 0x80;

/// Identity 3x4 matrix in storage order.
pub const IDENTITY: [f32; 12] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

/// Builder for a complete scene buffer.
#[derive(Debug, Clone)]
pub struct AwdWriter {
	version_minor: u8,
	flags: u16,
	compression: u8,
	body: Vec<u8>,
	next_id: u32,
}

impl Default for AwdWriter {
	fn default() -> Self {
		Self::new()
	}
}

impl AwdWriter {
	/// Start an uncompressed 2.1 buffer with no flags.
	pub fn new() -> Self {
		Self {
			version_minor: 1,
			flags: 0,
			compression: 0,
			body: Vec::new(),
			next_id: 1,
		}
	}

	/// Set header flag bits.
	pub fn flags(mut self, flags: u16) -> Self {
		self.flags = flags;
		self
	}

	/// Set the raw compression byte.
	pub fn compression(mut self, compression: u8) -> Self {
		self.compression = compression;
		self
	}

	/// Zlib-compress the body on [`AwdWriter::finish`].
	pub fn deflate(self) -> Self {
		self.compression(1)
	}

	/// Absolute offset the next block header will be written at.
	pub fn next_offset(&self) -> usize {
		12 + self.body.len()
	}

	/// Append a block in the default namespace and return its address.
	pub fn block(&mut self, type_id: u8, flags: u8, payload: &[u8]) -> u32 {
		self.block_in(0, type_id, flags, payload)
	}

	/// Append a block in `namespace` and return its address.
	pub fn block_in(&mut self, namespace: u8, type_id: u8, flags: u8, payload: &[u8]) -> u32 {
		let id = self.next_id;
		let len = u32::try_from(payload.len()).expect("payload fits u32");
		self.raw_block(id, namespace, type_id, flags, len, payload);
		id
	}

	/// Append a block header with arbitrary fields followed by `payload`.
	///
	/// The id counter still advances, so later calls to [`AwdWriter::block`]
	/// keep their usual addresses.
	pub fn raw_block(&mut self, id: u32, namespace: u8, type_id: u8, flags: u8, declared_len: u32, payload: &[u8]) {
		self.body.extend_from_slice(&id.to_le_bytes());
		self.body.push(namespace);
		self.body.push(type_id);
		self.body.push(flags);
		self.body.extend_from_slice(&declared_len.to_le_bytes());
		self.body.extend_from_slice(payload);
		self.next_id += 1;
	}

	/// Append raw bytes to the body.
	pub fn raw(&mut self, bytes: &[u8]) {
		self.body.extend_from_slice(bytes);
	}

	/// Produce header plus (optionally compressed) body.
	pub fn finish(&self) -> Vec<u8> {
		let body = if self.compression == 1 {
			miniz_oxide::deflate::compress_to_vec_zlib(&self.body, 6)
		} else {
			self.body.clone()
		};

		let mut out = b"AWD".to_vec();
		out.push(2);
		out.push(self.version_minor);
		out.extend_from_slice(&self.flags.to_le_bytes());
		out.push(self.compression);
		out.extend_from_slice(&u32::try_from(body.len()).expect("body fits u32").to_le_bytes());
		out.extend_from_slice(&body);
		out
	}
}

/// Little-endian payload builder.
#[derive(Debug, Clone, Default)]
pub struct Payload {
	bytes: Vec<u8>,
}

impl Payload {
	/// Start an empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append one byte.
	pub fn u8(mut self, value: u8) -> Self {
		self.bytes.push(value);
		self
	}

	/// Append a `u16`.
	pub fn u16(mut self, value: u16) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a `u32`.
	pub fn u32(mut self, value: u32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append an `f32`.
	pub fn f32(mut self, value: f32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append an `f64`.
	pub fn f64(mut self, value: f64) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a `u16`-length-prefixed string.
	pub fn string(self, value: &str) -> Self {
		let len = u16::try_from(value.len()).expect("string fits u16");
		self.u16(len).bytes(value.as_bytes())
	}

	/// Append a `u32`-length-prefixed blob.
	pub fn blob(self, value: &[u8]) -> Self {
		let len = u32::try_from(value.len()).expect("blob fits u32");
		self.u32(len).bytes(value)
	}

	/// Append raw bytes.
	pub fn bytes(mut self, value: &[u8]) -> Self {
		self.bytes.extend_from_slice(value);
		self
	}

	/// Append a matrix of twelve `f32` values.
	pub fn matrix(self, values: &[f32; 12]) -> Self {
		values.iter().fold(self, |acc, value| acc.f32(*value))
	}

	/// Append a matrix of twelve `f64` values.
	pub fn matrix_wide(self, values: &[f32; 12]) -> Self {
		values.iter().fold(self, |acc, value| acc.f64(f64::from(*value)))
	}

	/// Append a property list with `(key, raw value)` entries.
	pub fn props(self, entries: &[(u16, &[u8])]) -> Self {
		let mut list = Vec::new();
		for (key, value) in entries {
			list.extend_from_slice(&key.to_le_bytes());
			list.extend_from_slice(&u32::try_from(value.len()).expect("value fits u32").to_le_bytes());
			list.extend_from_slice(value);
		}
		self.blob(&list)
	}

	/// Append an empty property list.
	pub fn no_props(self) -> Self {
		self.u32(0)
	}

	/// Append an empty user-attribute list.
	pub fn no_attrs(self) -> Self {
		self.u32(0)
	}

	/// Finish the payload.
	pub fn build(self) -> Vec<u8> {
		self.bytes
	}
}

/// Ready-made payloads for common block types.
pub mod blocks {
	use super::{IDENTITY, Payload};

	/// Triangle geometry with one sub-mesh of `f32` vertices and `u16` indices.
	pub fn triangle_geometry(name: &str, vertices: &[f32], indices: &[u16]) -> Vec<u8> {
		let vertex_bytes: Vec<u8> = vertices.iter().flat_map(|value| value.to_le_bytes()).collect();
		let index_bytes: Vec<u8> = indices.iter().flat_map(|value| value.to_le_bytes()).collect();
		let sub = Payload::new()
			.no_props()
			.u8(1)
			.u8(7)
			.blob(&vertex_bytes)
			.u8(2)
			.u8(5)
			.blob(&index_bytes)
			.build();

		Payload::new().string(name).u16(1).no_props().blob(&sub).no_attrs().build()
	}

	/// Triangle geometry whose float vertex stream is written as `f64`, for
	/// files or blocks that set the wide geometry flag.
	pub fn triangle_geometry_wide(name: &str, vertices: &[f64], indices: &[u16]) -> Vec<u8> {
		let vertex_bytes: Vec<u8> = vertices.iter().flat_map(|value| value.to_le_bytes()).collect();
		let index_bytes: Vec<u8> = indices.iter().flat_map(|value| value.to_le_bytes()).collect();
		let sub = Payload::new()
			.no_props()
			.u8(1)
			.u8(7)
			.blob(&vertex_bytes)
			.u8(2)
			.u8(5)
			.blob(&index_bytes)
			.build();

		Payload::new().string(name).u16(1).no_props().blob(&sub).no_attrs().build()
	}

	/// Unit triangle geometry.
	pub fn unit_triangle(name: &str) -> Vec<u8> {
		triangle_geometry(name, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2])
	}

	/// Container node with an identity transform.
	pub fn container(parent: u32, name: &str) -> Vec<u8> {
		Payload::new().u32(parent).matrix(&IDENTITY).string(name).no_props().no_attrs().build()
	}

	/// Mesh instance node with an identity transform.
	pub fn mesh_instance(parent: u32, name: &str, geometry: u32, materials: &[u32]) -> Vec<u8> {
		let count = u16::try_from(materials.len()).expect("material count fits u16");
		let payload = Payload::new().u32(parent).matrix(&IDENTITY).string(name).u32(geometry).u16(count);
		materials
			.iter()
			.fold(payload, |acc, material| acc.u32(*material))
			.no_props()
			.no_attrs()
			.build()
	}

	/// Solid color material.
	pub fn color_material(name: &str, color: u32) -> Vec<u8> {
		Payload::new()
			.string(name)
			.u8(1)
			.u8(0)
			.props(&[(1, &color.to_le_bytes()[..])])
			.no_attrs()
			.build()
	}

	/// Bitmap material sampling `texture`.
	pub fn bitmap_material(name: &str, texture: u32) -> Vec<u8> {
		Payload::new()
			.string(name)
			.u8(2)
			.u8(0)
			.props(&[(2, &texture.to_le_bytes()[..])])
			.no_attrs()
			.build()
	}

	/// Bitmap texture pointing at an external file.
	pub fn external_texture(name: &str, path: &str) -> Vec<u8> {
		Payload::new().string(name).u8(0).blob(path.as_bytes()).no_props().no_attrs().build()
	}

	/// Metadata block naming the generator.
	pub fn metadata(generator: &str, version: &str) -> Vec<u8> {
		Payload::new()
			.props(&[(4, generator.as_bytes()), (5, version.as_bytes())])
			.build()
	}
}
