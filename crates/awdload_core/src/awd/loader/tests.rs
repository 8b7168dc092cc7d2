use awdload_testkit::{AwdWriter, FLAG_REQUIRED, IDENTITY, Payload, blocks, types};

use crate::awd::{
	AwdHeader, BlockDecoder, BlockHeader, BlockRecord, BlockRegistry, Cursor, DecodeContext, LoadOptions, LoadState, Loader, MaterialId, MeshId, NodeId, ParseError,
	ParseErrorKind, RecordKind, TextureId, TextureSource, WarningKind, load, load_with,
};

fn scene_bytes() -> AwdWriter {
	let mut writer = AwdWriter::new();
	writer.block(types::METADATA, 0, &blocks::metadata("test-exporter", "1.0"));
	let texture = writer.block(types::BITMAP_TEXTURE, 0, &blocks::external_texture("diffuse", "diffuse.png"));
	let red = writer.block(types::SIMPLE_MATERIAL, 0, &blocks::color_material("red", 0xFF0000));
	let skin = writer.block(types::SIMPLE_MATERIAL, 0, &blocks::bitmap_material("skin", texture));
	let geometry = writer.block(types::TRIANGLE_GEOMETRY, FLAG_REQUIRED, &blocks::unit_triangle("tri"));
	let root = writer.block(types::CONTAINER, 0, &blocks::container(0, "root"));
	writer.block(types::MESH_INSTANCE, 0, &blocks::mesh_instance(root, "a", geometry, &[red]));
	writer.block(types::MESH_INSTANCE, 0, &blocks::mesh_instance(root, "b", geometry, &[skin]));
	writer
}

#[test]
fn loads_complete_scene() {
	let graph = load(&scene_bytes().finish()).expect("scene loads");

	assert_eq!(graph.meshes.len(), 1);
	assert_eq!(graph.materials.len(), 2);
	assert_eq!(graph.textures.len(), 1);
	assert_eq!(graph.nodes.len(), 3);
	assert_eq!(graph.roots, vec![NodeId(0)]);
	assert_eq!(graph.nodes[0].children, vec![NodeId(1), NodeId(2)]);
	assert_eq!(graph.nodes[2].mesh, Some(MeshId(0)));
	assert_eq!(graph.nodes[2].materials, vec![MaterialId(1)]);
	assert_eq!(graph.materials[1].texture, Some(TextureId(0)));
	assert_eq!(graph.textures[0].source, TextureSource::External("diffuse.png".to_owned()));
	assert_eq!(
		graph.metadata.as_ref().and_then(|item| item.generator_name.as_deref()),
		Some("test-exporter")
	);
	assert!(graph.warnings.is_empty());
}

#[test]
fn header_validation_positions_past_header() {
	let bytes = scene_bytes().finish();
	let mut loader = Loader::new(&bytes, LoadOptions::default(), BlockRegistry::standard());
	assert_eq!(loader.state(), LoadState::Start);
	assert_eq!(loader.position(), 0);

	let header = loader.validate_header().expect("header validates");
	assert_eq!(header.version_major, 2);
	assert_eq!(loader.state(), LoadState::HeaderValidated);
	assert_eq!(loader.position(), AwdHeader::SIZE);

	assert_eq!(loader.step().expect("first block"), Some(0));
	assert_eq!(loader.state(), LoadState::Streaming);
	assert!(loader.position() > AwdHeader::SIZE);
}

#[test]
fn malformed_header_is_fatal_and_sticky() {
	let mut bytes = scene_bytes().finish();
	bytes[1] = b'X';
	let mut loader = Loader::new(&bytes, LoadOptions::default(), BlockRegistry::standard());

	let err = loader.validate_header().expect_err("bad magic");
	assert!(matches!(err.kind, ParseErrorKind::MalformedHeader { .. }));
	assert_eq!(loader.state(), LoadState::Failed);
	assert_eq!(loader.step().expect_err("failure repeats"), err);
}

#[test]
fn valid_header_with_no_blocks_yields_empty_graph() {
	let graph = load(&AwdWriter::new().finish()).expect("empty scene loads");
	assert!(graph.is_empty());
	assert!(graph.warnings.is_empty());
}

#[test]
fn optional_unknown_block_is_a_warning() {
	let mut writer = AwdWriter::new();
	let offset = writer.next_offset();
	writer.block(200, 0, &[1, 2, 3]);
	let graph = load(&writer.finish()).expect("unknown optional block is skipped");

	assert!(graph.is_empty());
	assert_eq!(graph.warnings.len(), 1);
	assert_eq!(graph.warnings[0].offset, offset);
	assert_eq!(
		graph.warnings[0].kind,
		WarningKind::UnknownBlock { namespace: 0, type_id: 200 }
	);
}

#[test]
fn required_unknown_block_fails_at_its_header() {
	let mut writer = AwdWriter::new();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let offset = writer.next_offset();
	writer.block_in(7, 1, FLAG_REQUIRED, &[0_u8; 4]);

	let err = load(&writer.finish()).expect_err("required unknown block");
	assert_eq!(
		err,
		ParseError::new(ParseErrorKind::UnsupportedRequiredBlock { namespace: 7, type_id: 1 }, offset)
	);
}

#[test]
fn not_implemented_block_respects_required_flag() {
	let mut writer = AwdWriter::new();
	writer.block(types::CAMERA, 0, &[0_u8; 16]);
	let graph = load(&writer.finish()).expect("optional camera is skipped");
	assert_eq!(
		graph.warnings[0].kind,
		WarningKind::NotImplemented {
			block: "Camera",
			feature: "camera",
		}
	);

	let mut writer = AwdWriter::new();
	let offset = writer.next_offset();
	writer.block(types::LIGHT, FLAG_REQUIRED, &[0_u8; 16]);
	let err = load(&writer.finish()).expect_err("required light fails");
	assert_eq!(err.offset, offset);
	assert_eq!(
		err.kind,
		ParseErrorKind::UnsupportedRequiredBlock {
			namespace: 0,
			type_id: types::LIGHT,
		}
	);
}

#[test]
fn skipped_block_still_consumes_an_address() {
	let mut writer = AwdWriter::new();
	writer.block(types::CAMERA, 0, &[]);
	let geometry = writer.block(types::TRIANGLE_GEOMETRY, 0, &blocks::unit_triangle("tri"));
	writer.block(types::MESH_INSTANCE, 0, &blocks::mesh_instance(0, "m", geometry, &[]));

	let graph = load(&writer.finish()).expect("addresses stay aligned");
	assert_eq!(graph.nodes[0].mesh, Some(MeshId(0)));
	assert_eq!(graph.warnings.len(), 1);
}

#[test]
fn material_index_beyond_parsed_materials_fails_at_finish() {
	let mut writer = AwdWriter::new();
	let a = writer.block(types::SIMPLE_MATERIAL, 0, &blocks::color_material("a", 1));
	writer.block(types::SIMPLE_MATERIAL, 0, &blocks::color_material("b", 2));
	writer.block(types::SIMPLE_MATERIAL, 0, &blocks::color_material("c", 3));
	let geometry = writer.block(types::TRIANGLE_GEOMETRY, 0, &blocks::unit_triangle("tri"));
	writer.block(types::MESH_INSTANCE, 0, &blocks::mesh_instance(0, "m", geometry, &[a, 6]));
	let bytes = writer.finish();

	let err = load(&bytes).expect_err("address 6 is record index 5");
	assert_eq!(err.offset, bytes.len());
	assert_eq!(
		err.kind,
		ParseErrorKind::UnresolvedReference {
			index: 5,
			expected: RecordKind::Material,
			found: None,
		}
	);
}

#[test]
fn declared_length_beyond_body_is_truncated_at_shortfall() {
	let mut writer = AwdWriter::new();
	let offset = writer.next_offset();
	let payload = blocks::unit_triangle("tri");
	writer.raw_block(1, 0, types::TRIANGLE_GEOMETRY, 0, payload.len() as u32 + 10, &payload);
	let bytes = writer.finish();

	let err = load(&bytes).expect_err("block overruns body");
	assert_eq!(err.offset, offset + BlockHeader::SIZE);
	assert_eq!(
		err.kind,
		ParseErrorKind::TruncatedBlock {
			need: payload.len() + 10,
			rem: payload.len(),
		}
	);
}

#[test]
fn truncated_optional_block_follows_policy() {
	let geometry = blocks::unit_triangle("tri");
	let short = &geometry[..geometry.len() - 6];
	let mut writer = AwdWriter::new();
	writer.block(types::TRIANGLE_GEOMETRY, 0, short);
	writer.block(types::CONTAINER, 0, &blocks::container(0, "root"));
	let bytes = writer.finish();

	let err = load(&bytes).expect_err("default policy aborts");
	assert!(err.is_truncated());

	let graph = load_with(&bytes, &LoadOptions::lenient(), BlockRegistry::standard()).expect("lenient policy skips");
	assert!(graph.meshes.is_empty());
	assert_eq!(graph.nodes.len(), 1);
	assert!(matches!(
		graph.warnings[0].kind,
		WarningKind::SkippedTruncated {
			block: "TriangleGeometry",
			..
		}
	));

	let mut writer = AwdWriter::new();
	writer.block(types::TRIANGLE_GEOMETRY, FLAG_REQUIRED, short);
	let err = load_with(&writer.finish(), &LoadOptions::lenient(), BlockRegistry::standard()).expect_err("required block never skipped");
	assert!(err.is_truncated());
}

#[test]
fn file_cut_inside_last_block_reports_its_payload_offset() {
	let mut writer = AwdWriter::new();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let geometry_at = writer.next_offset();
	let payload = blocks::unit_triangle("tri");
	writer.block(types::TRIANGLE_GEOMETRY, 0, &payload);
	let mut bytes = writer.finish();
	bytes.truncate(bytes.len() - 6);

	let err = load(&bytes).expect_err("file ends inside geometry");
	assert_eq!(err.offset, geometry_at + BlockHeader::SIZE);
	assert_eq!(
		err.kind,
		ParseErrorKind::TruncatedBlock {
			need: payload.len(),
			rem: payload.len() - 6,
		}
	);

	let graph = load_with(&bytes, &LoadOptions::lenient(), BlockRegistry::standard()).expect("lenient policy skips the cut block");
	assert!(graph.meshes.is_empty());
	assert!(graph.metadata.is_some());
	assert_eq!(graph.warnings.len(), 1);
	assert_eq!(graph.warnings[0].offset, geometry_at);
	assert!(matches!(
		graph.warnings[0].kind,
		WarningKind::SkippedTruncated {
			block: "TriangleGeometry",
			..
		}
	));
}

#[test]
fn cut_required_block_fails_even_when_lenient() {
	let mut writer = AwdWriter::new();
	let geometry_at = writer.next_offset();
	writer.block(types::TRIANGLE_GEOMETRY, FLAG_REQUIRED, &blocks::unit_triangle("tri"));
	let mut bytes = writer.finish();
	bytes.truncate(bytes.len() - 6);

	let err = load_with(&bytes, &LoadOptions::lenient(), BlockRegistry::standard()).expect_err("required block never skipped");
	assert_eq!(err.offset, geometry_at + BlockHeader::SIZE);
	assert!(err.is_truncated());
}

#[test]
fn cut_deflate_body_reports_end_of_input() {
	let mut writer = AwdWriter::new().deflate();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let mut bytes = writer.finish();
	bytes.truncate(bytes.len() - 3);

	let err = load(&bytes).expect_err("compressed body is short");
	assert_eq!(err.offset, bytes.len());
	assert!(err.is_truncated());
}

#[test]
fn out_of_sequence_block_id_is_malformed() {
	let mut writer = AwdWriter::new();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let offset = writer.next_offset();
	writer.raw_block(5, 0, types::METADATA, 0, 4, &0_u32.to_le_bytes());

	let err = load(&writer.finish()).expect_err("id 5 where 2 expected");
	assert_eq!(err.offset, offset);
	assert!(matches!(err.kind, ParseErrorKind::MalformedBlock { .. }));
}

#[test]
fn strict_layout_rejects_unread_bytes() {
	let mut payload = blocks::container(0, "root");
	payload.extend_from_slice(&[0xEE, 0xEE]);
	let mut writer = AwdWriter::new();
	writer.block(types::CONTAINER, 0, &payload);
	let bytes = writer.finish();

	load(&bytes).expect("lenient layout ignores trailing bytes");
	let err = load_with(&bytes, &LoadOptions::strict(), BlockRegistry::standard()).expect_err("strict layout");
	assert!(matches!(err.kind, ParseErrorKind::MalformedBlock { .. }));
	assert_eq!(err.offset, bytes.len() - 2);
}

#[test]
fn header_and_block_precision_flags_combine() {
	let wide_node = Payload::new().u32(0).matrix_wide(&IDENTITY).string("wide").no_props().no_attrs().build();

	let mut writer = AwdWriter::new().flags(AwdHeader::FLAG_WIDE_MATRICES);
	writer.block(types::CONTAINER, 0, &wide_node);
	let graph = load(&writer.finish()).expect("header precision applies");
	assert_eq!(graph.nodes[0].transform, IDENTITY);

	let mut writer = AwdWriter::new();
	writer.block(types::CONTAINER, BlockHeader::FLAG_WIDE_MATRICES, &wide_node);
	let graph = load(&writer.finish()).expect("block precision applies");
	assert_eq!(graph.nodes[0].name, "wide");
}

#[test]
fn wide_geometry_flag_widens_float_streams() {
	let vertices = [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.25, 0.0];
	let payload = blocks::triangle_geometry_wide("wide", &vertices, &[0, 1, 2]);

	let mut writer = AwdWriter::new().flags(AwdHeader::FLAG_WIDE_GEOMETRY);
	writer.block(types::TRIANGLE_GEOMETRY, 0, &payload);
	let graph = load(&writer.finish()).expect("header geometry precision applies");
	assert_eq!(graph.meshes[0].sub_meshes[0].vertices, vec![0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.25, 0.0]);

	let mut writer = AwdWriter::new();
	writer.block(types::TRIANGLE_GEOMETRY, BlockHeader::FLAG_WIDE_GEOMETRY, &payload);
	let graph = load(&writer.finish()).expect("block geometry precision applies");
	assert_eq!(graph.meshes[0].sub_meshes[0].vertices[7], 0.25);

	let mut writer = AwdWriter::new();
	writer.block(types::TRIANGLE_GEOMETRY, 0, &payload);
	let graph = load(&writer.finish()).expect("narrow read still decodes");
	assert_eq!(graph.meshes[0].sub_meshes[0].vertices.len(), 18);
}

#[test]
fn deflated_scene_matches_plain_scene() {
	let writer = scene_bytes();
	let plain = load(&writer.finish()).expect("plain scene loads");
	let packed = load(&writer.deflate().finish()).expect("deflated scene loads");
	assert_eq!(plain, packed);
}

#[test]
fn parsing_twice_is_structurally_identical() {
	let bytes = scene_bytes().finish();
	let first = load(&bytes).expect("first load");
	let second = load(&bytes).expect("second load");
	assert_eq!(first, second);
}

#[test]
fn skeletal_animation_resolves_poses() {
	let joint = Payload::new().u16(1).u16(0).string("hip").matrix(&IDENTITY).no_props().no_attrs().build();
	let skeleton = Payload::new().string("rig").u16(1).no_props().bytes(&joint).no_attrs().build();
	let pose = Payload::new().string("rest").u16(1).no_props().u8(0).no_attrs().build();

	let mut writer = AwdWriter::new();
	writer.block(types::SKELETON, 0, &skeleton);
	let rest = writer.block(types::SKELETON_POSE, 0, &pose);
	let animation = Payload::new().string("idle").u16(2).no_props().u32(rest).u16(100).u32(rest).u16(50).no_attrs().build();
	writer.block(types::SKELETON_ANIMATION, 0, &animation);

	let graph = load(&writer.finish()).expect("animation loads");
	assert_eq!(graph.skeletons[0].joints[0].name, "hip");
	assert_eq!(graph.animations[0].frames.len(), 2);
	assert_eq!(graph.animations[0].duration_ms(), 150);

	let mut writer = AwdWriter::new();
	let rig = writer.block(types::SKELETON, 0, &skeleton);
	let animation = Payload::new().string("bad").u16(1).no_props().u32(rig).u16(10).no_attrs().build();
	writer.block(types::SKELETON_ANIMATION, 0, &animation);
	let err = load(&writer.finish()).expect_err("frame points at a skeleton");
	assert!(matches!(
		err.kind,
		ParseErrorKind::UnresolvedReference {
			expected: RecordKind::SkeletonPose,
			found: Some(RecordKind::Skeleton),
			..
		}
	));
}

fn decode_everything_as_metadata(_cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> crate::awd::Result<BlockRecord> {
	Ok(BlockRecord::Metadata(Default::default()))
}

static CUSTOM: &[BlockDecoder] = &[BlockDecoder {
	namespace: 9,
	type_id: 1,
	name: "Custom",
	decode: decode_everything_as_metadata,
}];

#[test]
fn custom_registry_replaces_standard_table() {
	let registry = BlockRegistry::from_static(CUSTOM);
	let mut writer = AwdWriter::new();
	writer.block_in(9, 1, FLAG_REQUIRED, &[1, 2, 3]);
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));

	let graph = load_with(&writer.finish(), &LoadOptions::default(), &registry).expect("custom decoder used");
	assert!(graph.metadata.is_some());
	assert_eq!(graph.warnings.len(), 1, "standard metadata type is unknown to the custom table");
}
