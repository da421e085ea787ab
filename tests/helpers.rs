//! Shared test utilities for openclawd tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use openclawd::errors::ProbeError;
use openclawd::layout::{Layout, SHIM_GUEST_PATH};
use openclawd::process::Cmd;
use openclawd::provision::ArchiveTool;
use openclawd::runner::SandboxRunner;

/// Test environment with a temporary base directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Base directory of the target environment
    pub base_dir: PathBuf,
    /// Scratch area for archives, fixtures and stub tools
    pub work_dir: PathBuf,
}

impl TestEnv {
    /// Create a new test environment. Nothing exists under `base_dir` yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().join("files");
        let work_dir = temp_dir.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create work dir");

        Self {
            _temp_dir: temp_dir,
            base_dir,
            work_dir,
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.base_dir, "ubuntu")
    }

    /// Write a shell script and return an archive tool running it through `sh`.
    ///
    /// Running it via `sh` avoids exec'ing a file that was just written.
    pub fn stub_archive_tool(&self, name: &str, script: &str) -> ArchiveTool {
        let path = self.work_dir.join(name);
        fs::write(&path, script).expect("Failed to write stub tool");
        ArchiveTool::from_command_line(&format!("sh {}", path.display()))
            .expect("stub tool command line")
    }

    /// A placeholder archive file for stub tools.
    pub fn dummy_archive(&self) -> PathBuf {
        let path = self.work_dir.join("rootfs.tar.gz");
        fs::write(&path, b"not really a tarball").expect("Failed to write dummy archive");
        path
    }

    /// Build a real gzip tarball containing a minimal rootfs.
    pub fn rootfs_archive(&self) -> PathBuf {
        let fixture = self.work_dir.join("fixture");
        create_mock_rootfs(&fixture);

        let archive = self.work_dir.join("ubuntu-rootfs.tar.gz");
        let status = Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(&fixture)
            .arg(".")
            .status()
            .expect("Failed to run tar");
        assert!(status.success(), "tar failed to create fixture archive");
        archive
    }
}

/// Create a minimal rootfs tree: a shell, two profiles and os-release.
pub fn create_mock_rootfs(rootfs: &Path) {
    for dir in ["bin", "etc", "root", "usr/bin"] {
        fs::create_dir_all(rootfs.join(dir)).expect("Failed to create mock rootfs dir");
    }
    fs::write(rootfs.join("bin/bash"), "#!/bin/sh\necho mock\n").expect("Failed to create bash");
    fs::write(rootfs.join("root/.bashrc"), "# ~/.bashrc\nalias ll='ls -alF'\n")
        .expect("Failed to create .bashrc");
    fs::write(rootfs.join("root/.zshrc"), "# ~/.zshrc\n").expect("Failed to create .zshrc");
    fs::write(rootfs.join("etc/os-release"), "NAME=\"Ubuntu\"\nVERSION_ID=\"24.04\"\n")
        .expect("Failed to create os-release");
}

/// Runner answering probes from a table instead of running anything.
///
/// Unknown commands fail like a missing binary would. Every probe is recorded.
#[derive(Default)]
pub struct StubRunner {
    responses: HashMap<String, Result<String, i32>>,
    pub calls: RefCell<Vec<String>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `command` with `stdout` and exit code 0.
    pub fn ok(mut self, command: &str, stdout: &str) -> Self {
        self.responses
            .insert(command.to_string(), Ok(stdout.to_string()));
        self
    }

    /// Respond to `command` with a non-zero exit.
    pub fn fail(mut self, command: &str, exit_code: i32) -> Self {
        self.responses.insert(command.to_string(), Err(exit_code));
        self
    }

    /// Node and the gateway are both installed.
    pub fn with_everything() -> Self {
        Self::new()
            .ok("node --version", "v22.3.0\n")
            .ok("command -v openclaw", "/usr/local/bin/openclaw\n")
    }
}

impl SandboxRunner for StubRunner {
    fn command(&self, script: &str) -> Cmd {
        Cmd::new("sh").args(["-c", script])
    }

    fn shim_path(&self, _layout: &Layout) -> PathBuf {
        PathBuf::from(SHIM_GUEST_PATH)
    }

    fn run_sync(&self, script: &str) -> Result<String, ProbeError> {
        self.calls.borrow_mut().push(script.to_string());
        match self.responses.get(script) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(code)) => Err(ProbeError::Failed {
                command: script.to_string(),
                exit_code: *code,
                output: String::new(),
            }),
            None => Err(ProbeError::Failed {
                command: script.to_string(),
                exit_code: 127,
                output: format!("sh: {}: not found", script),
            }),
        }
    }
}

/// Number of activation blocks in a profile.
pub fn activation_blocks(path: &Path) -> usize {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    content.matches(openclawd::patch::profile::COMMENT_LINE).count()
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

/// Assert that a path does not exist.
pub fn assert_missing(path: &Path) {
    assert!(!path.exists(), "Expected {} to be absent", path.display());
}
