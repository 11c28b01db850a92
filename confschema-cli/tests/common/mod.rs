//! Common test utilities for CLI integration tests.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Schema used by most CLI tests.
#[allow(dead_code)]
pub const REFINE_SCHEMA: &str = "\
%YAML 1.2
---
!!omap
- pdb model : [str, my_model.pdb, null]
- reset b-facs : [float, -1, \"New B factor (-1 for no reset)\", -1]
- cell dimensions : [<float>, [200, 200, 200], null]
- refinement : [[rigid, individual, group], individual, \"Kind of B factor refinement\", individual]
";

/// Test environment with an isolated directory holding a schema file.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the schema file
    pub schema: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Creates an environment whose schema is [`REFINE_SCHEMA`].
    pub fn new() -> Self {
        Self::with_schema(REFINE_SCHEMA)
    }

    /// Creates an environment with the given schema text.
    pub fn with_schema(schema_text: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let schema = temp_path.join("schema.yml");
        std::fs::write(&schema, schema_text).expect("Failed to write schema");

        Self {
            temp_dir,
            temp_path,
            schema,
        }
    }

    /// A bare command with no flags and no schema in the environment.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("confschema").expect("Failed to find confschema binary");
        cmd.env_remove("CONFSCHEMA_SCHEMA")
            .env_remove("CONFSCHEMA_LOG_MODE");
        cmd
    }

    /// A command with `--schema` pointing at this environment's schema.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--schema").arg(&self.schema);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Writes a file under the temp directory and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Runs `check` on `config_text` with extra arguments, returning stdout.
    ///
    /// # Panics
    /// Panics if the command fails.
    pub fn check_ok(&self, config_text: &str, extra: &[&str]) -> String {
        let config = self.write_file("settings.yml", config_text);
        let output = self
            .command()
            .arg("check")
            .arg("-c")
            .arg(&config)
            .args(extra)
            .output()
            .expect("Failed to run check command");

        assert!(
            output.status.success(),
            "check failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
