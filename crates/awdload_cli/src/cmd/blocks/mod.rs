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
struct BlockJson {
	id: u32,
	offset: usize,
	namespace: u8,
	type_id: u8,
	name: String,
	flags: u8,
	required: bool,
	len: u32,
}

/// List raw blocks in stream order.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let bytes = read_input(&path)?;
	let header = AwdHeader::parse(&bytes)?;
	let body = open_body(&bytes, &header, LoadOptions::default().max_body_bytes)?;

	let mut rows = Vec::new();
	for block in BlockIter::new(&body, AwdHeader::SIZE) {
		let block = block?;
		rows.push(BlockJson {
			id: block.head.id,
			offset: block.offset,
			namespace: block.head.namespace,
			type_id: block.head.type_id,
			name: type_label(block.head.namespace, block.head.type_id),
			flags: block.head.flags,
			required: block.head.is_required(),
			len: block.head.len,
		});
	}

	if json {
		return emit_json(&rows);
	}

	for row in &rows {
		println!(
			"#{:<4} @{:<8} {:>3}:{:<3} {:<18} flags=0x{:02x}{} len={}",
			row.id,
			row.offset,
			row.namespace,
			row.type_id,
			row.name,
			row.flags,
			if row.required { " required" } else { "" },
			row.len
		);
	}
	println!("blocks: {}", rows.len());

	Ok(())
}
