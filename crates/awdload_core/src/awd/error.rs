use thiserror::Error;

use crate::awd::RecordKind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Terminal load failure with the stream offset that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
	/// Failure category and details.
	pub kind: ParseErrorKind,
	/// Absolute byte offset in the (decompressed) stream.
	pub offset: usize,
}

impl ParseError {
	/// Create an error of `kind` at `offset`.
	pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
		Self { kind, offset }
	}

	/// Shorthand for [`ParseErrorKind::MalformedBlock`].
	pub fn malformed(reason: impl Into<String>, offset: usize) -> Self {
		Self::new(ParseErrorKind::MalformedBlock { reason: reason.into() }, offset)
	}

	/// Shorthand for [`ParseErrorKind::NotImplemented`].
	pub fn not_implemented(feature: &'static str, offset: usize) -> Self {
		Self::new(ParseErrorKind::NotImplemented { feature }, offset)
	}

	/// Return `true` for the valid-but-unsupported signal.
	pub fn is_not_implemented(&self) -> bool {
		matches!(self.kind, ParseErrorKind::NotImplemented { .. })
	}

	/// Return `true` when the error came from running out of bytes.
	pub fn is_truncated(&self) -> bool {
		matches!(self.kind, ParseErrorKind::TruncatedBlock { .. })
	}
}

/// Closed taxonomy of load failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
	/// File header magic, version, or length fields are invalid.
	#[error("malformed header: {reason}")]
	MalformedHeader {
		/// Which header check failed.
		reason: &'static str,
	},
	/// Not enough bytes remained for a requested read.
	#[error("truncated block: need {need} bytes, remaining {rem}")]
	TruncatedBlock {
		/// Requested bytes.
		need: usize,
		/// Bytes still available in the bounded region.
		rem: usize,
	},
	/// Block contents are structurally invalid.
	#[error("malformed block: {reason}")]
	MalformedBlock {
		/// Human-readable description of the violation.
		reason: String,
	},
	/// A reference does not name an earlier record of the expected kind.
	#[error("unresolved reference to record {index}: expected {expected}, found {}", .found.map_or("nothing", RecordKind::as_str))]
	UnresolvedReference {
		/// Zero-based record index the reference points at.
		index: usize,
		/// Record kind the referrer requires.
		expected: RecordKind,
		/// Kind actually stored at `index`, if any earlier record exists there.
		found: Option<RecordKind>,
	},
	/// A block flagged as required has no usable decoder.
	#[error("unsupported required block: namespace={namespace}, type={type_id}")]
	UnsupportedRequiredBlock {
		/// Block namespace byte.
		namespace: u8,
		/// Block type byte.
		type_id: u8,
	},
	/// Data is valid but uses a feature this loader does not decode.
	#[error("not implemented: {feature}")]
	NotImplemented {
		/// Unsupported feature label.
		feature: &'static str,
	},
	/// Header names a compression scheme this loader cannot inflate.
	#[error("unsupported compression {compression}")]
	UnsupportedCompression {
		/// Raw compression byte.
		compression: u8,
	},
	/// Compressed body could not be inflated.
	#[error("body decompression failed: {reason}")]
	Decompress {
		/// Inflater status.
		reason: String,
	},
}
