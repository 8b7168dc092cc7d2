use std::path::PathBuf;

use awdload::awd::{BlockRegistry, LoadOptions, Loader, MaterialKind, SceneGraph, SceneNode};

use crate::cmd::util::{color_hex, emit_json, read_input};
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Skip blocks whose payload is cut short instead of failing.
	#[arg(long)]
	pub skip_truncated: bool,
	/// Reject blocks whose decoder leaves payload bytes unread.
	#[arg(long)]
	pub strict: bool,
}

#[derive(serde::Serialize)]
struct SceneJson {
	path: String,
	version: String,
	generator: Option<String>,
	meshes: usize,
	materials: Vec<MaterialJson>,
	textures: usize,
	skeletons: usize,
	poses: usize,
	animations: usize,
	roots: Vec<usize>,
	nodes: Vec<NodeJson>,
	warnings: Vec<String>,
}

#[derive(serde::Serialize)]
struct MaterialJson {
	name: String,
	kind: &'static str,
	color: String,
	texture: Option<usize>,
}

#[derive(serde::Serialize)]
struct NodeJson {
	id: usize,
	name: String,
	depth: usize,
	parent: Option<usize>,
	children: Vec<usize>,
	mesh: Option<String>,
	materials: Vec<String>,
}

/// Load the file into a scene graph and print its node tree.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		skip_truncated,
		strict,
	} = args;

	let options = if skip_truncated { LoadOptions::lenient() } else { LoadOptions::default() };
	let options = LoadOptions {
		strict_layout: strict || options.strict_layout,
		..options
	};

	let bytes = read_input(&path)?;
	let mut loader = Loader::new(&bytes, options, BlockRegistry::standard());
	let header = loader.validate_header()?;
	let graph = loader.finish()?;

	let version = format!("{}.{}", header.version_major, header.version_minor);
	let generator = graph
		.metadata
		.as_ref()
		.and_then(|meta| meta.generator_name.as_deref())
		.map(ToOwned::to_owned);

	if json {
		let payload = SceneJson {
			path: path.display().to_string(),
			version,
			generator,
			meshes: graph.meshes.len(),
			materials: graph
				.materials
				.iter()
				.map(|material| MaterialJson {
					name: material.name.clone(),
					kind: material_kind_label(material.kind),
					color: color_hex(material.color),
					texture: material.texture.map(|id| id.0),
				})
				.collect(),
			textures: graph.textures.len(),
			skeletons: graph.skeletons.len(),
			poses: graph.poses.len(),
			animations: graph.animations.len(),
			roots: graph.roots.iter().map(|id| id.0).collect(),
			nodes: graph
				.walk()
				.into_iter()
				.filter_map(|(id, depth)| graph.node(id).map(|node| node_json(&graph, id.0, depth, node)))
				.collect(),
			warnings: graph.warnings.iter().map(ToString::to_string).collect(),
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("version: {version}");
	if let Some(generator) = &generator {
		println!("generator: {generator}");
	}
	println!(
		"tables: meshes={} materials={} textures={} nodes={} skeletons={} poses={} animations={}",
		graph.meshes.len(),
		graph.materials.len(),
		graph.textures.len(),
		graph.nodes.len(),
		graph.skeletons.len(),
		graph.poses.len(),
		graph.animations.len()
	);
	println!("tree:");
	for (id, depth) in graph.walk() {
		let Some(node) = graph.node(id) else {
			continue;
		};
		let indent = "  ".repeat(depth + 1);
		match mesh_name(&graph, node) {
			Some(mesh) => println!("{indent}{} [mesh={mesh} materials={}]", node.name, material_names(&graph, node).join(",")),
			None => println!("{indent}{}", node.name),
		}
	}
	for animation in &graph.animations {
		println!("animation: {} frames={} duration_ms={}", animation.name, animation.frames.len(), animation.duration_ms());
	}
	for warning in &graph.warnings {
		println!("warning: {warning}");
	}

	Ok(())
}

fn node_json(graph: &SceneGraph, id: usize, depth: usize, node: &SceneNode) -> NodeJson {
	NodeJson {
		id,
		name: node.name.clone(),
		depth,
		parent: node.parent.map(|parent| parent.0),
		children: node.children.iter().map(|child| child.0).collect(),
		mesh: mesh_name(graph, node),
		materials: material_names(graph, node),
	}
}

fn mesh_name(graph: &SceneGraph, node: &SceneNode) -> Option<String> {
	node.mesh.and_then(|id| graph.mesh(id)).map(|mesh| mesh.name.clone())
}

fn material_names(graph: &SceneGraph, node: &SceneNode) -> Vec<String> {
	node.materials
		.iter()
		.filter_map(|id| graph.material(*id))
		.map(|material| material.name.clone())
		.collect()
}

fn material_kind_label(kind: MaterialKind) -> &'static str {
	match kind {
		MaterialKind::Color => "color",
		MaterialKind::Bitmap => "bitmap",
	}
}
