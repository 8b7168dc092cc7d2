use awdload::awd::ParseError;
use thiserror::Error;

/// CLI result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Reading the input file failed.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// The loader rejected the input.
	#[error(transparent)]
	Parse(#[from] ParseError),
	/// Writing JSON output failed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}
