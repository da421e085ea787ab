//! Rootfs archive extraction.
//!
//! The archive is unpacked with the external `tar` into the rootfs directory,
//! member paths kept as they are. Once extraction succeeds the archive is
//! deleted; it is several hundred megabytes and no longer needed.

use log::{info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::ProvisionError;
use crate::process::{Cmd, CommandResult};
use crate::timing::Timer;

/// Program (plus leading arguments) used to read tar archives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTool {
    program: String,
    leading_args: Vec<String>,
}

impl ArchiveTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Parse a whitespace-separated command line such as `busybox tar`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self {
            program: program.to_string(),
            leading_args: words.map(str::to_string).collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn cmd(&self) -> Cmd {
        Cmd::new(&self.program).args(&self.leading_args)
    }
}

impl Default for ArchiveTool {
    fn default() -> Self {
        Self::new("tar")
    }
}

/// Unpacks a gzip-compressed tar archive into a rootfs directory.
pub struct ArchiveProvisioner {
    rootfs: PathBuf,
    tool: ArchiveTool,
    verify_paths: bool,
}

impl ArchiveProvisioner {
    pub fn new(rootfs: impl Into<PathBuf>, tool: ArchiveTool) -> Self {
        Self {
            rootfs: rootfs.into(),
            tool,
            verify_paths: true,
        }
    }

    /// Turn the pre-extraction member path check on or off.
    pub fn verify_paths(mut self, verify: bool) -> Self {
        self.verify_paths = verify;
        self
    }

    /// Extract `archive` into the rootfs, then delete it.
    ///
    /// Existing files are overwritten. On failure the archive is kept so the
    /// user can retry.
    pub fn extract_rootfs(&self, archive: &Path) -> Result<(), ProvisionError> {
        if !archive.is_file() {
            return Err(ProvisionError::ArchiveNotFound(archive.to_path_buf()));
        }

        fs::create_dir_all(&self.rootfs).map_err(|source| ProvisionError::Io {
            context: format!("failed to create {}", self.rootfs.display()),
            source,
        })?;

        if self.verify_paths {
            self.check_members(archive)?;
        }

        info!(
            "Extracting {} to {}...",
            archive.display(),
            self.rootfs.display()
        );
        let timer = Timer::start("rootfs extraction");
        let result = self.run(
            self.tool
                .cmd()
                .arg("-xzf")
                .arg_path(archive)
                .arg("-C")
                .arg_path(&self.rootfs),
        )?;
        if !result.success() {
            return Err(ProvisionError::ExtractionFailed {
                exit_code: result.code(),
                diagnostic_output: result.merged_output(),
            });
        }
        timer.finish();

        if let Err(e) = fs::remove_file(archive) {
            warn!(
                "Rootfs extracted, but could not delete {}: {}",
                archive.display(),
                e
            );
        }
        Ok(())
    }

    /// List the archive and reject members that would land outside the rootfs.
    fn check_members(&self, archive: &Path) -> Result<(), ProvisionError> {
        let result = self.run(self.tool.cmd().arg("-tzf").arg_path(archive))?;
        if !result.success() {
            return Err(ProvisionError::ArchiveUnreadable {
                exit_code: result.code(),
                diagnostic_output: result.merged_output(),
            });
        }

        match result.stdout.lines().find(|entry| !is_safe_member(entry)) {
            Some(entry) => Err(ProvisionError::UnsafeEntry {
                entry: entry.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn run(&self, cmd: Cmd) -> Result<CommandResult, ProvisionError> {
        cmd.output().map_err(|source| ProvisionError::Io {
            context: format!("failed to run '{}'", self.tool.program()),
            source,
        })
    }
}

/// A member path is safe when it is relative and never steps upwards.
pub fn is_safe_member(entry: &str) -> bool {
    Path::new(entry)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
