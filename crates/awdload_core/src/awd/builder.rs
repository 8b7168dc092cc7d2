use std::collections::HashMap;

use crate::awd::{
	Animation, BlockRecord, Frame, LoadWarning, Material, MaterialId, MeshId, NodeId, ParseError, ParseErrorKind, PoseId, RecordKind, Result,
	SceneGraph, SceneNode, TextureId,
};

#[derive(Debug)]
struct Entry {
	record: BlockRecord,
	offset: usize,
}

/// Ordered record table that resolves backward references into a [`SceneGraph`].
///
/// Records are keyed by parse order. A reference made by the record at position
/// `p` only resolves to a record at a position below `p`; targets that appear
/// later are never patched in.
#[derive(Debug, Default)]
pub struct SceneBuilder {
	entries: Vec<Entry>,
	warnings: Vec<LoadWarning>,
}

impl SceneBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of records added so far.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when no record has been added.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Append a record decoded from the block at `offset`; returns its index.
	pub fn add_record(&mut self, record: BlockRecord, offset: usize) -> usize {
		self.entries.push(Entry { record, offset });
		self.entries.len() - 1
	}

	/// Record a recoverable condition to hand back with the graph.
	pub fn add_warning(&mut self, warning: LoadWarning) {
		self.warnings.push(warning);
	}

	/// Warnings recorded so far.
	pub fn warnings(&self) -> &[LoadWarning] {
		&self.warnings
	}

	/// Resolve `index` against the records seen so far.
	///
	/// `offset` is reported in the error when the index is out of range or names
	/// a record of another kind.
	pub fn resolve_reference(&self, index: usize, expected: RecordKind, offset: usize) -> Result<&BlockRecord> {
		resolve_before(&self.entries, self.entries.len(), index, expected).map_err(|kind| ParseError::new(kind, offset))
	}

	/// Validate every reference and assemble the scene graph.
	///
	/// `offset` is the stream position at finish time and is reported for any
	/// unresolved reference.
	pub fn finish(self, offset: usize) -> Result<SceneGraph> {
		let Self { entries, warnings } = self;

		for (position, entry) in entries.iter().enumerate() {
			for (reference, expected) in entry.record.references() {
				resolve_before(&entries, position, reference.index, expected).map_err(|kind| {
					log::debug!("record {position} (block at offset {}) has an unresolved reference", entry.offset);
					ParseError::new(kind, offset)
				})?;
			}
		}

		let mut counts: HashMap<RecordKind, usize> = HashMap::new();
		let slots: Vec<usize> = entries
			.iter()
			.map(|entry| {
				let count = counts.entry(entry.record.kind()).or_insert(0);
				*count += 1;
				*count - 1
			})
			.collect();

		let mut graph = SceneGraph {
			warnings,
			..SceneGraph::default()
		};

		for entry in entries {
			match entry.record {
				BlockRecord::Mesh(mesh) => graph.meshes.push(mesh),
				BlockRecord::Material(material) => graph.materials.push(Material {
					name: material.name,
					kind: material.kind,
					color: material.color,
					texture: material.texture.map(|item| TextureId(slots[item.index])),
					alpha: material.alpha,
					repeat: material.repeat,
				}),
				BlockRecord::Texture(texture) => graph.textures.push(texture),
				BlockRecord::SceneNode(node) => {
					let id = NodeId(graph.nodes.len());
					let parent = node.parent.map(|item| NodeId(slots[item.index]));
					match parent {
						Some(parent) => graph.nodes[parent.0].children.push(id),
						None => graph.roots.push(id),
					}
					graph.nodes.push(SceneNode {
						name: node.name,
						transform: node.transform,
						parent,
						children: Vec::new(),
						mesh: node.mesh.map(|item| MeshId(slots[item.index])),
						materials: node.materials.iter().map(|item| MaterialId(slots[item.index])).collect(),
					});
				}
				BlockRecord::Skeleton(skeleton) => graph.skeletons.push(skeleton),
				BlockRecord::SkeletonPose(pose) => graph.poses.push(pose),
				BlockRecord::Animation(animation) => graph.animations.push(Animation {
					name: animation.name,
					frames: animation
						.frames
						.iter()
						.map(|frame| Frame {
							pose: PoseId(slots[frame.pose.index]),
							duration_ms: frame.duration_ms,
						})
						.collect(),
				}),
				BlockRecord::Namespace(namespace) => graph.namespaces.push(namespace),
				BlockRecord::Metadata(metadata) => {
					if graph.metadata.is_none() {
						graph.metadata = Some(metadata);
					} else {
						log::debug!("ignoring repeated metadata block at offset {}", entry.offset);
					}
				}
				BlockRecord::Unknown { .. } => {}
			}
		}

		Ok(graph)
	}
}

fn resolve_before(entries: &[Entry], limit: usize, index: usize, expected: RecordKind) -> std::result::Result<&BlockRecord, ParseErrorKind> {
	let found = entries.get(index).filter(|_| index < limit).map(|entry| &entry.record);
	match found {
		Some(record) if record.kind() == expected => Ok(record),
		_ => Err(ParseErrorKind::UnresolvedReference {
			index,
			expected,
			found: found.map(BlockRecord::kind),
		}),
	}
}
