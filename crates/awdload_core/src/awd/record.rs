use std::fmt;

/// 3x4 transform in storage order: three rotation/scale columns, then translation.
pub type Matrix3x4 = [f32; 12];

/// Fieldless tag for [`BlockRecord`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
	/// [`MeshRecord`].
	Mesh,
	/// [`MaterialRecord`].
	Material,
	/// [`TextureRecord`].
	Texture,
	/// [`SceneNodeRecord`].
	SceneNode,
	/// [`SkeletonRecord`].
	Skeleton,
	/// [`PoseRecord`].
	SkeletonPose,
	/// [`AnimationRecord`].
	Animation,
	/// [`MetadataRecord`].
	Metadata,
	/// [`NamespaceRecord`].
	Namespace,
	/// Placeholder for a skipped block.
	Unknown,
}

impl RecordKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Mesh => "mesh",
			Self::Material => "material",
			Self::Texture => "texture",
			Self::SceneNode => "scene_node",
			Self::Skeleton => "skeleton",
			Self::SkeletonPose => "skeleton_pose",
			Self::Animation => "animation",
			Self::Metadata => "metadata",
			Self::Namespace => "namespace",
			Self::Unknown => "unknown",
		}
	}
}

impl fmt::Display for RecordKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Backward reference from one record to an earlier one.
///
/// Stored as a zero-based record index; the wire address `n` maps to index `n - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
	/// Zero-based index into the record table.
	pub index: usize,
}

impl BlockRef {
	/// Convert a wire block address; `0` is the null address.
	pub fn from_address(address: u32) -> Option<Self> {
		let index = (address as usize).checked_sub(1)?;
		Some(Self { index })
	}
}

/// Decoded block contents.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockRecord {
	/// Triangle geometry.
	Mesh(MeshRecord),
	/// Surface material.
	Material(MaterialRecord),
	/// Bitmap texture.
	Texture(TextureRecord),
	/// Container or mesh instance node.
	SceneNode(SceneNodeRecord),
	/// Joint hierarchy.
	Skeleton(SkeletonRecord),
	/// Per-joint transforms.
	SkeletonPose(PoseRecord),
	/// Timed pose sequence.
	Animation(AnimationRecord),
	/// Exporter metadata.
	Metadata(MetadataRecord),
	/// Namespace declaration.
	Namespace(NamespaceRecord),
	/// Skipped block kept to preserve address numbering.
	Unknown {
		/// Block namespace byte.
		namespace: u8,
		/// Block type byte.
		type_id: u8,
	},
}

impl BlockRecord {
	/// Return the variant tag.
	pub fn kind(&self) -> RecordKind {
		match self {
			Self::Mesh(_) => RecordKind::Mesh,
			Self::Material(_) => RecordKind::Material,
			Self::Texture(_) => RecordKind::Texture,
			Self::SceneNode(_) => RecordKind::SceneNode,
			Self::Skeleton(_) => RecordKind::Skeleton,
			Self::SkeletonPose(_) => RecordKind::SkeletonPose,
			Self::Animation(_) => RecordKind::Animation,
			Self::Metadata(_) => RecordKind::Metadata,
			Self::Namespace(_) => RecordKind::Namespace,
			Self::Unknown { .. } => RecordKind::Unknown,
		}
	}

	/// List outgoing references together with the kind each one must resolve to.
	pub fn references(&self) -> Vec<(BlockRef, RecordKind)> {
		match self {
			Self::SceneNode(node) => {
				let mut out = Vec::new();
				out.extend(node.parent.map(|item| (item, RecordKind::SceneNode)));
				out.extend(node.mesh.map(|item| (item, RecordKind::Mesh)));
				out.extend(node.materials.iter().map(|item| (*item, RecordKind::Material)));
				out
			}
			Self::Material(material) => material.texture.map(|item| (item, RecordKind::Texture)).into_iter().collect(),
			Self::Animation(animation) => animation.frames.iter().map(|frame| (frame.pose, RecordKind::SkeletonPose)).collect(),
			_ => Vec::new(),
		}
	}
}

/// One sub-mesh of a triangle geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubMesh {
	/// Positions, three scalars per vertex.
	pub vertices: Vec<f32>,
	/// Triangle indices, three per face.
	pub indices: Vec<u32>,
	/// Texture coordinates, two scalars per vertex.
	pub uvs: Vec<f32>,
	/// Normals, three scalars per vertex.
	pub normals: Vec<f32>,
}

/// Triangle geometry block.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
	/// Geometry name.
	pub name: String,
	/// Sub-meshes in stream order.
	pub sub_meshes: Vec<SubMesh>,
}

/// How a material colors its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
	/// Flat `0xRRGGBB` color.
	Color,
	/// Sampled bitmap texture.
	Bitmap,
}

/// Simple material block.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
	/// Material name.
	pub name: String,
	/// Shading source.
	pub kind: MaterialKind,
	/// Diffuse color as `0xRRGGBB`.
	pub color: u32,
	/// Texture reference for bitmap materials.
	pub texture: Option<BlockRef>,
	/// Opacity in `0..=1`.
	pub alpha: f32,
	/// Texture wraps instead of clamping.
	pub repeat: bool,
}

/// Where texture image data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
	/// Path or URL relative to the scene file.
	External(String),
	/// Encoded image bytes stored in the block.
	Embedded(Vec<u8>),
}

/// Bitmap texture block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRecord {
	/// Texture name.
	pub name: String,
	/// Image data location.
	pub source: TextureSource,
}

/// Container or mesh instance block.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNodeRecord {
	/// Node name.
	pub name: String,
	/// Parent node, `None` for roots.
	pub parent: Option<BlockRef>,
	/// Local transform.
	pub transform: Matrix3x4,
	/// Drawn geometry for mesh instances.
	pub mesh: Option<BlockRef>,
	/// Materials, one per sub-mesh.
	pub materials: Vec<BlockRef>,
}

/// One skeleton joint.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
	/// Joint name.
	pub name: String,
	/// Zero-based parent joint index, `None` for the root joint.
	pub parent: Option<usize>,
	/// Inverse bind-pose matrix.
	pub inverse_bind: Matrix3x4,
}

/// Skeleton block.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonRecord {
	/// Skeleton name.
	pub name: String,
	/// Joints in parent-before-child order.
	pub joints: Vec<Joint>,
}

/// Skeleton pose block.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
	/// Pose name.
	pub name: String,
	/// Per-joint local transform; `None` keeps the bind pose.
	pub transforms: Vec<Option<Matrix3x4>>,
}

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
	/// Pose shown during this frame.
	pub pose: BlockRef,
	/// Frame duration in milliseconds.
	pub duration_ms: u16,
}

/// Skeleton animation block.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecord {
	/// Animation name.
	pub name: String,
	/// Frames in playback order.
	pub frames: Vec<AnimationFrame>,
}

/// Metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
	/// Export timestamp in seconds since the Unix epoch.
	pub timestamp: Option<u32>,
	/// Encoder library name.
	pub encoder_name: Option<String>,
	/// Encoder library version.
	pub encoder_version: Option<String>,
	/// Authoring tool name.
	pub generator_name: Option<String>,
	/// Authoring tool version.
	pub generator_version: Option<String>,
}

/// Namespace declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRecord {
	/// Namespace byte used by later block headers.
	pub id: u8,
	/// Namespace URI.
	pub uri: String,
}
