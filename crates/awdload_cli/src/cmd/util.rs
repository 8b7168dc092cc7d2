use std::io::Write;
use std::path::Path;

use awdload::awd::BlockRegistry;

use crate::error::Result;

/// Read the whole input file; the loader core never touches the filesystem.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
	log::debug!("reading {}", path.display());
	Ok(std::fs::read(path)?)
}

/// Pretty-print `value` as JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) -> Result<()> {
	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	serde_json::to_writer_pretty(&mut out, value)?;
	writeln!(out)?;
	Ok(())
}

/// Render a block type as its registry name, or `ns:type` when unregistered.
pub(crate) fn type_label(namespace: u8, type_id: u8) -> String {
	match BlockRegistry::standard().lookup(namespace, type_id) {
		Some(decoder) => decoder.name.to_owned(),
		None => format!("{namespace}:{type_id}"),
	}
}

/// Render a `0xRRGGBB` color.
pub(crate) fn color_hex(color: u32) -> String {
	format!("#{:06x}", color & 0x00FF_FFFF)
}

#[cfg(test)]
mod tests {
	use super::{color_hex, type_label};

	#[test]
	fn labels_registered_and_unknown_types() {
		assert_eq!(type_label(0, 23), "MeshInstance");
		assert_eq!(type_label(4, 23), "4:23");
	}

	#[test]
	fn formats_colors_without_alpha_byte() {
		assert_eq!(color_hex(0xFF33_6699), "#336699");
		assert_eq!(color_hex(0x0F), "#00000f");
	}
}
