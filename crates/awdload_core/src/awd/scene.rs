use crate::awd::{LoadWarning, MaterialKind, Matrix3x4, MeshRecord, MetadataRecord, NamespaceRecord, PoseRecord, SkeletonRecord, TextureRecord};

/// Index into [`SceneGraph::meshes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// Index into [`SceneGraph::materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Index into [`SceneGraph::textures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Index into [`SceneGraph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Index into [`SceneGraph::poses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoseId(pub usize);

/// Scene node with links resolved into table ids.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
	/// Node name.
	pub name: String,
	/// Local transform.
	pub transform: Matrix3x4,
	/// Parent node, `None` for roots.
	pub parent: Option<NodeId>,
	/// Child nodes in stream order.
	pub children: Vec<NodeId>,
	/// Drawn mesh, if this node is a mesh instance.
	pub mesh: Option<MeshId>,
	/// Materials, one per sub-mesh.
	pub materials: Vec<MaterialId>,
}

/// Material with its texture link resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
	/// Material name.
	pub name: String,
	/// Shading source.
	pub kind: MaterialKind,
	/// Diffuse color as `0xRRGGBB`.
	pub color: u32,
	/// Sampled texture for bitmap materials.
	pub texture: Option<TextureId>,
	/// Opacity in `0..=1`.
	pub alpha: f32,
	/// Texture wraps instead of clamping.
	pub repeat: bool,
}

/// Animation frame with its pose link resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
	/// Pose shown during this frame.
	pub pose: PoseId,
	/// Frame duration in milliseconds.
	pub duration_ms: u16,
}

/// Skeleton animation with resolved frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
	/// Animation name.
	pub name: String,
	/// Frames in playback order.
	pub frames: Vec<Frame>,
}

impl Animation {
	/// Total playback length in milliseconds.
	pub fn duration_ms(&self) -> u64 {
		self.frames.iter().map(|frame| u64::from(frame.duration_ms)).sum()
	}
}

/// Completed scene handed to the rendering side by value.
///
/// Every id stored in the graph indexes a table of this same graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
	/// Geometry table.
	pub meshes: Vec<MeshRecord>,
	/// Material table.
	pub materials: Vec<Material>,
	/// Texture table.
	pub textures: Vec<TextureRecord>,
	/// Node table; parents always precede their children.
	pub nodes: Vec<SceneNode>,
	/// Nodes without a parent, in stream order.
	pub roots: Vec<NodeId>,
	/// Skeleton table.
	pub skeletons: Vec<SkeletonRecord>,
	/// Pose table.
	pub poses: Vec<PoseRecord>,
	/// Animation table.
	pub animations: Vec<Animation>,
	/// Declared namespaces.
	pub namespaces: Vec<NamespaceRecord>,
	/// First metadata block, if any.
	pub metadata: Option<MetadataRecord>,
	/// Recoverable conditions met while loading.
	pub warnings: Vec<LoadWarning>,
}

impl SceneGraph {
	/// Look up a node.
	pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
		self.nodes.get(id.0)
	}

	/// Look up a mesh.
	pub fn mesh(&self, id: MeshId) -> Option<&MeshRecord> {
		self.meshes.get(id.0)
	}

	/// Look up a material.
	pub fn material(&self, id: MaterialId) -> Option<&Material> {
		self.materials.get(id.0)
	}

	/// Find the first node with `name`.
	pub fn find_node(&self, name: &str) -> Option<NodeId> {
		self.nodes.iter().position(|node| node.name == name).map(NodeId)
	}

	/// Visit every node depth-first from the roots, with its depth.
	pub fn walk(&self) -> Vec<(NodeId, usize)> {
		let mut out = Vec::with_capacity(self.nodes.len());
		let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
		while let Some((id, depth)) = stack.pop() {
			out.push((id, depth));
			if let Some(node) = self.node(id) {
				stack.extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
			}
		}
		out
	}

	/// Return `true` when no block produced a record.
	pub fn is_empty(&self) -> bool {
		self.meshes.is_empty()
			&& self.materials.is_empty()
			&& self.textures.is_empty()
			&& self.nodes.is_empty()
			&& self.skeletons.is_empty()
			&& self.poses.is_empty()
			&& self.animations.is_empty()
			&& self.namespaces.is_empty()
			&& self.metadata.is_none()
	}
}
