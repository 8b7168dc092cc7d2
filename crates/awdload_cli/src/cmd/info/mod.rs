use std::collections::BTreeMap;
use std::path::PathBuf;

use awdload::awd::{AwdHeader, BlockIter, LoadOptions, open_body};

use crate::cmd::util::{emit_json, read_input, type_label};
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	version_major: u8,
	version_minor: u8,
	flags: u16,
	streaming: bool,
	compression: String,
	body_len: u32,
	block_count: usize,
	required_blocks: usize,
	top_types: Vec<TypeCountJson>,
}

#[derive(serde::Serialize)]
struct TypeCountJson {
	block_type: String,
	count: usize,
}

/// Print header fields and per-type block counts without decoding payloads.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let bytes = read_input(&path)?;
	let header = AwdHeader::parse(&bytes)?;
	let body = open_body(&bytes, &header, LoadOptions::default().max_body_bytes)?;

	let mut block_count = 0_usize;
	let mut required_blocks = 0_usize;
	let mut counts: BTreeMap<(u8, u8), usize> = BTreeMap::new();
	for block in BlockIter::new(&body, AwdHeader::SIZE) {
		let block = block?;
		block_count += 1;
		if block.head.is_required() {
			required_blocks += 1;
		}
		*counts.entry((block.head.namespace, block.head.type_id)).or_default() += 1;
	}

	let mut entries: Vec<_> = counts.into_iter().collect();
	entries.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			version_major: header.version_major,
			version_minor: header.version_minor,
			flags: header.flags,
			streaming: header.is_streaming(),
			compression: header.compression.as_str().to_owned(),
			body_len: header.body_len,
			block_count,
			required_blocks,
			top_types: entries
				.iter()
				.map(|((namespace, type_id), count)| TypeCountJson {
					block_type: type_label(*namespace, *type_id),
					count: *count,
				})
				.collect(),
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("version: {}.{}", header.version_major, header.version_minor);
	println!("flags: 0x{:04x}", header.flags);
	println!("streaming: {}", header.is_streaming());
	println!("compression: {}", header.compression.as_str());
	println!("body_len: {}", header.body_len);
	println!("block_count: {block_count}");
	println!("required_blocks: {required_blocks}");
	println!("top_types:");
	for ((namespace, type_id), count) in entries {
		println!("  {}: {count}", type_label(namespace, type_id));
	}

	Ok(())
}

#[cfg(test)]
mod tests;
