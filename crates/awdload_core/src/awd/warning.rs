use std::fmt;

/// Recoverable condition recorded while streaming blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
	/// Warning category and details.
	pub kind: WarningKind,
	/// Absolute offset of the affected block header.
	pub offset: usize,
}

/// Categories of recoverable load conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
	/// Optional block type has no registered decoder.
	UnknownBlock {
		/// Block namespace byte.
		namespace: u8,
		/// Block type byte.
		type_id: u8,
	},
	/// Optional block uses a feature the decoder does not support.
	NotImplemented {
		/// Registry name of the block type.
		block: &'static str,
		/// Unsupported feature label.
		feature: &'static str,
	},
	/// Optional block ran out of bytes and was skipped.
	SkippedTruncated {
		/// Registry name of the block type.
		block: &'static str,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
}

impl fmt::Display for LoadWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			WarningKind::UnknownBlock { namespace, type_id } => {
				write!(f, "skipped unknown block namespace={namespace} type={type_id}")?;
			}
			WarningKind::NotImplemented { block, feature } => write!(f, "skipped {block} block: {feature} not implemented")?,
			WarningKind::SkippedTruncated { block, need, rem } => {
				write!(f, "skipped truncated {block} block: need {need} bytes, remaining {rem}")?;
			}
		}
		write!(f, " at offset {}", self.offset)
	}
}
