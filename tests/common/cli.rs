use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch project directory for running the `demands` binary.
pub struct DemandsWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl DemandsWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Workspace with `demands init` already run for `backend`.
    pub fn initialized(backend: &str) -> Self {
        let workspace = Self::new();
        workspace
            .cmd()
            .args(["--backend", backend, "init"])
            .assert()
            .success();
        workspace
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".demands")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// A `demands` command running in the workspace with a clean
    /// environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("demands").expect("demands binary");
        cmd.current_dir(&self.root)
            .env("HOME", &self.root)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("DEMANDS_DIR")
            .env_remove("DEMANDS_BACKEND")
            .env_remove("DEMANDS_DATA");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.cmd().arg("--json").args(args).output().expect("run demands");
        assert!(
            output.status.success(),
            "demands {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
    }
}
