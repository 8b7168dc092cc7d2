use std::borrow::Cow;

use crate::awd::compression::open_body;
use crate::awd::decoders::DecodeContext;
use crate::awd::{
	AwdHeader, BlockHeader, BlockIter, BlockRecord, BlockRegistry, Cursor, LoadWarning, ParseError, ParseErrorKind, Precision, RawBlock, Result, SceneBuilder,
	SceneGraph, WarningKind,
};

/// What to do when a non-required block runs out of bytes, either inside its own
/// bounds or because the body ends before its declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationPolicy {
	/// Fail the whole load.
	Abort,
	/// Record a warning and continue with the next block.
	SkipBlock,
}

/// Behavior switches and limits for one load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
	/// Handling of truncated non-required blocks.
	pub truncation: TruncationPolicy,
	/// Error when a decoder leaves bytes of its block unread.
	pub strict_layout: bool,
	/// Maximum (decompressed) body size in bytes.
	pub max_body_bytes: usize,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			truncation: TruncationPolicy::Abort,
			strict_layout: false,
			max_body_bytes: 256 * 1024 * 1024,
		}
	}
}

impl LoadOptions {
	/// Preset that skips damaged optional blocks instead of failing.
	pub fn lenient() -> Self {
		Self {
			truncation: TruncationPolicy::SkipBlock,
			..Self::default()
		}
	}

	/// Preset that also rejects blocks with unread trailing bytes.
	pub fn strict() -> Self {
		Self {
			strict_layout: true,
			..Self::default()
		}
	}
}

/// Loader driver progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
	/// Nothing consumed yet.
	Start,
	/// Header accepted and body opened; positioned on the first block.
	HeaderValidated,
	/// At least one block has been read.
	Streaming,
	/// Graph assembled; reached inside [`Loader::finish`].
	Finished,
	/// A fatal error occurred; every later call returns it again.
	Failed,
}

/// Single-pass driver from header validation to a finished [`SceneGraph`].
pub struct Loader<'a> {
	bytes: &'a [u8],
	options: LoadOptions,
	registry: &'a BlockRegistry,
	state: LoadState,
	header: Option<AwdHeader>,
	body: Cow<'a, [u8]>,
	consumed: usize,
	builder: SceneBuilder,
	failure: Option<ParseError>,
}

enum Dispatched {
	Decoded { record: BlockRecord, offset: usize },
	Skipped { record: BlockRecord, warning: LoadWarning },
}

impl<'a> Loader<'a> {
	/// Create a loader over a fully-read buffer.
	pub fn new(bytes: &'a [u8], options: LoadOptions, registry: &'a BlockRegistry) -> Self {
		Self {
			bytes,
			options,
			registry,
			state: LoadState::Start,
			header: None,
			body: Cow::Borrowed(&[]),
			consumed: 0,
			builder: SceneBuilder::new(),
			failure: None,
		}
	}

	/// Current driver state.
	pub fn state(&self) -> LoadState {
		self.state
	}

	/// Validated header, once available.
	pub fn header(&self) -> Option<&AwdHeader> {
		self.header.as_ref()
	}

	/// Absolute offset of the next unread byte.
	pub fn position(&self) -> usize {
		match self.state {
			LoadState::Start => 0,
			_ => AwdHeader::SIZE + self.consumed,
		}
	}

	/// Warnings recorded so far.
	pub fn warnings(&self) -> &[LoadWarning] {
		self.builder.warnings()
	}

	/// Check the file header and open the block stream.
	pub fn validate_header(&mut self) -> Result<AwdHeader> {
		if let Some(err) = &self.failure {
			return Err(err.clone());
		}
		if let Some(header) = self.header {
			return Ok(header);
		}

		let bytes = self.bytes;
		let opened = AwdHeader::parse(bytes).and_then(|header| Ok((header, open_body(bytes, &header, self.options.max_body_bytes)?)));
		match opened {
			Ok((header, body)) => {
				log::debug!(
					"header v{}.{} compression={} body={} bytes",
					header.version_major,
					header.version_minor,
					header.compression.as_str(),
					body.len()
				);
				self.header = Some(header);
				self.body = body;
				self.state = LoadState::HeaderValidated;
				Ok(header)
			}
			Err(err) => Err(self.fail(err)),
		}
	}

	/// Read and dispatch one block.
	///
	/// Returns the record index the block was stored under, or `None` once the
	/// stream is exhausted.
	pub fn step(&mut self) -> Result<Option<usize>> {
		let header = self.validate_header()?;

		let base = AwdHeader::SIZE + self.consumed;
		let expected_id = self.builder.len() + 1;
		let (outcome, used) = {
			let rest = &self.body[self.consumed..];
			let mut iter = BlockIter::new(rest, base);
			match iter.next() {
				None => (None, iter.consumed()),
				Some(Ok(raw)) => (
					Some(dispatch(&raw, expected_id, header.precision(), self.registry, &self.options)),
					iter.consumed(),
				),
				// The stream ends inside this block, so skipping it consumes the rest of the body.
				Some(Err(err)) => (Some(skip_overrun(rest, base, err, self.registry, &self.options)), rest.len()),
			}
		};

		let Some(outcome) = outcome else {
			return Ok(None);
		};
		self.consumed += used;
		self.state = LoadState::Streaming;

		match outcome {
			Ok(Dispatched::Decoded { record, offset }) => Ok(Some(self.builder.add_record(record, offset))),
			Ok(Dispatched::Skipped { record, warning }) => {
				log::warn!("{warning}");
				let offset = warning.offset;
				self.builder.add_warning(warning);
				Ok(Some(self.builder.add_record(record, offset)))
			}
			Err(err) => Err(self.fail(err)),
		}
	}

	/// Drain the remaining blocks and assemble the scene graph.
	pub fn finish(mut self) -> Result<SceneGraph> {
		while self.step()?.is_some() {}

		let offset = self.position();
		let builder = std::mem::take(&mut self.builder);
		match builder.finish(offset) {
			Ok(graph) => {
				self.state = LoadState::Finished;
				log::debug!(
					"loaded {} nodes, {} meshes, {} materials with {} warnings",
					graph.nodes.len(),
					graph.meshes.len(),
					graph.materials.len(),
					graph.warnings.len()
				);
				Ok(graph)
			}
			Err(err) => Err(self.fail(err)),
		}
	}

	fn fail(&mut self, err: ParseError) -> ParseError {
		log::debug!("load failed: {err}");
		self.state = LoadState::Failed;
		self.failure = Some(err.clone());
		err
	}
}

fn dispatch(raw: &RawBlock<'_>, expected_id: usize, file_precision: Precision, registry: &BlockRegistry, options: &LoadOptions) -> Result<Dispatched> {
	if raw.head.id as usize != expected_id {
		return Err(ParseError::malformed(
			format!("block id {} out of sequence (expected {expected_id})", raw.head.id),
			raw.offset,
		));
	}

	let Some(decoder) = registry.lookup(raw.head.namespace, raw.head.type_id) else {
		return skip_or_fail(
			raw,
			WarningKind::UnknownBlock {
				namespace: raw.head.namespace,
				type_id: raw.head.type_id,
			},
		);
	};

	let ctx = DecodeContext {
		precision: file_precision.union(raw.head.precision()),
	};
	let mut cursor = raw.cursor();
	match (decoder.decode)(&mut cursor, &ctx) {
		Ok(record) => {
			if options.strict_layout && !cursor.is_empty() {
				return Err(ParseError::malformed(
					format!("{} block left {} bytes unread", decoder.name, cursor.remaining()),
					cursor.offset(),
				));
			}
			log::debug!("block {} {} at offset {}", raw.head.id, decoder.name, raw.offset);
			Ok(Dispatched::Decoded { record, offset: raw.offset })
		}
		Err(ParseError {
			kind: ParseErrorKind::NotImplemented { feature },
			..
		}) => skip_or_fail(raw, WarningKind::NotImplemented { block: decoder.name, feature }),
		Err(ParseError {
			kind: ParseErrorKind::TruncatedBlock { need, rem },
			..
		}) if options.truncation == TruncationPolicy::SkipBlock && !raw.head.is_required() => Ok(skipped(
			raw,
			WarningKind::SkippedTruncated {
				block: decoder.name,
				need,
				rem,
			},
		)),
		Err(err) => Err(err),
	}
}

fn skip_overrun(rest: &[u8], base: usize, err: ParseError, registry: &BlockRegistry, options: &LoadOptions) -> Result<Dispatched> {
	let (need, rem) = match err.kind {
		ParseErrorKind::TruncatedBlock { need, rem } if options.truncation == TruncationPolicy::SkipBlock => (need, rem),
		_ => return Err(err),
	};
	let head = match BlockHeader::parse(&mut Cursor::with_base(rest, base)) {
		Ok(head) if !head.is_required() => head,
		_ => return Err(err),
	};

	let block = registry.lookup(head.namespace, head.type_id).map_or("unknown", |decoder| decoder.name);
	Ok(Dispatched::Skipped {
		record: BlockRecord::Unknown {
			namespace: head.namespace,
			type_id: head.type_id,
		},
		warning: LoadWarning {
			kind: WarningKind::SkippedTruncated { block, need, rem },
			offset: base,
		},
	})
}

fn skip_or_fail(raw: &RawBlock<'_>, kind: WarningKind) -> Result<Dispatched> {
	if raw.head.is_required() {
		return Err(ParseError::new(
			ParseErrorKind::UnsupportedRequiredBlock {
				namespace: raw.head.namespace,
				type_id: raw.head.type_id,
			},
			raw.offset,
		));
	}
	Ok(skipped(raw, kind))
}

fn skipped(raw: &RawBlock<'_>, kind: WarningKind) -> Dispatched {
	Dispatched::Skipped {
		record: BlockRecord::Unknown {
			namespace: raw.head.namespace,
			type_id: raw.head.type_id,
		},
		warning: LoadWarning { kind, offset: raw.offset },
	}
}

/// Load a scene with default options and the standard registry.
pub fn load(bytes: &[u8]) -> Result<SceneGraph> {
	load_with(bytes, &LoadOptions::default(), BlockRegistry::standard())
}

/// Load a scene with explicit options and registry.
pub fn load_with(bytes: &[u8], options: &LoadOptions, registry: &BlockRegistry) -> Result<SceneGraph> {
	let mut loader = Loader::new(bytes, options.clone(), registry);
	loader.validate_header()?;
	loader.finish()
}

#[cfg(test)]
mod tests;
