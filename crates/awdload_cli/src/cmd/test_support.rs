use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use awdload_testkit::{target_dir, workspace_root};

/// Run the `awdload` binary with `args` and capture its output.
pub(crate) fn run_awdload(args: &[&str]) -> Output {
	Command::new(binary())
		.args(args)
		.output()
		.unwrap_or_else(|err| panic!("failed to spawn awdload {args:?}: {err}"))
}

/// Run `awdload` with `args`, require success and parse stdout as JSON.
pub(crate) fn run_awdload_json(args: &[&str]) -> serde_json::Value {
	let output = run_awdload(args);
	if !output.status.success() {
		panic!("awdload {args:?} exited with {}: {}", output.status, String::from_utf8_lossy(&output.stderr));
	}
	serde_json::from_slice(&output.stdout).unwrap_or_else(|err| panic!("awdload {args:?} printed invalid json: {err}"))
}

// Unit tests of a bin crate get no CARGO_BIN_EXE_*, so the binary is built on first use.
fn binary() -> &'static Path {
	static BINARY: OnceLock<PathBuf> = OnceLock::new();
	BINARY.get_or_init(|| {
		if let Some(path) = option_env!("CARGO_BIN_EXE_awdload") {
			return PathBuf::from(path);
		}

		let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
		let status = Command::new(cargo)
			.current_dir(workspace_root())
			.args(["build", "--quiet", "--package", "awdload_cli", "--bin", "awdload"])
			.status()
			.unwrap_or_else(|err| panic!("failed to run cargo build: {err}"));
		assert!(status.success(), "cargo build of awdload failed with {status}");

		target_dir().join("debug").join(format!("awdload{}", std::env::consts::EXE_SUFFIX))
	})
}
