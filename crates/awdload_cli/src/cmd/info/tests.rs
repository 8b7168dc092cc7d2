use awdload_testkit::{AwdWriter, blocks, types, write_scratch};

use crate::cmd::test_support::{run_awdload, run_awdload_json};

fn two_mesh_file() -> Vec<u8> {
	let mut writer = AwdWriter::new().deflate();
	let geometry = writer.block(types::TRIANGLE_GEOMETRY, 0, &blocks::unit_triangle("tri"));
	let material = writer.block(types::SIMPLE_MATERIAL, 0, &blocks::color_material("red", 0xFF0000));
	writer.block(types::MESH_INSTANCE, 0, &blocks::mesh_instance(0, "a", geometry, &[material]));
	writer.block(types::MESH_INSTANCE, 0, &blocks::mesh_instance(0, "b", geometry, &[material]));
	writer.block_in(9, 3, 0, &[1, 2, 3]);
	writer.finish()
}

#[test]
fn info_json_reports_header_and_type_counts() {
	let path = write_scratch("info_two_mesh.awd", &two_mesh_file());
	let path = path.to_string_lossy().into_owned();
	let json = run_awdload_json(&["info", &path, "--json"]);

	assert_eq!(json["version_major"], 2);
	assert_eq!(json["compression"], "deflate");
	assert_eq!(json["block_count"], 5);
	assert_eq!(json["required_blocks"], 0);

	let top = json["top_types"].as_array().expect("top_types should be an array");
	assert_eq!(top[0]["block_type"], "MeshInstance");
	assert_eq!(top[0]["count"], 2);
	assert!(top.iter().any(|item| item["block_type"] == "9:3"));
}

#[test]
fn info_fails_on_bad_magic() {
	let mut bytes = AwdWriter::new().finish();
	bytes[0] = b'X';
	let path = write_scratch("info_bad_magic.awd", &bytes);
	let path = path.to_string_lossy().into_owned();
	let output = run_awdload(&["info", &path]);

	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error:"), "unexpected stderr: {stderr}");
	assert!(stderr.contains("offset 0"), "unexpected stderr: {stderr}");
}
