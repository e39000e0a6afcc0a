//! Shared test utilities for dracut-module tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use dracut_module::config::Config;

/// Test environment with a fake dracut that records its arguments.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Directory holding fake programs
    pub bin_dir: PathBuf,
    /// File the fake dracut appends its arguments to, one per line
    pub argv_log: PathBuf,
    /// Base directory for argument files and outputs
    pub base_dir: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with temporary directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        let bin_dir = base_dir.join("bin");
        let argv_log = base_dir.join("argv.log");

        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");

        Self {
            _temp_dir: temp_dir,
            bin_dir,
            argv_log,
            base_dir,
        }
    }

    /// Install a fake dracut that records its argv, then runs `body`.
    pub fn install_fake_dracut(&self, body: &str) -> PathBuf {
        let script = format!(
            "#!/bin/sh\nfor arg in \"$@\"; do printf '%s\\n' \"$arg\" >> '{}'; done\n{}\n",
            self.argv_log.display(),
            body
        );
        create_mock_binary(&self.bin_dir, "dracut", &script)
    }

    /// Config pointing at the fake dracut.
    pub fn config(&self) -> Config {
        Config {
            dracut_bin: self.bin_dir.join("dracut").to_string_lossy().into_owned(),
            ..Config::default()
        }
    }

    /// Arguments the fake dracut received, program name excluded.
    pub fn recorded_argv(&self) -> Vec<String> {
        match fs::read_to_string(&self.argv_log) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Write a JSON argument file and return its path.
    pub fn write_args(&self, value: &serde_json::Value) -> PathBuf {
        let path = self.base_dir.join("args.json");
        fs::write(&path, serde_json::to_vec(value).unwrap()).expect("Failed to write args");
        path
    }
}

/// Create an executable script.
pub fn create_mock_binary(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write mock binary");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
