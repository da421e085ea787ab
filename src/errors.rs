//! Error types you might see while provisioning or starting the gateway.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A probe could not be evaluated. Never fatal: the checked capability is
/// reported as absent.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// the runner process could not be started
    #[error("could not start sandbox runner for {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// the probed command exited non-zero
    #[error("{command:?} exited with code {exit_code}: {output}")]
    Failed {
        command: String,
        exit_code: i32,
        output: String,
    },
}

/// Errors while unpacking the rootfs archive.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// archive to extract does not exist
    #[error("rootfs archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    /// listing the archive members failed
    #[error("could not read rootfs archive (code {exit_code}): {diagnostic_output}")]
    ArchiveUnreadable {
        exit_code: i32,
        diagnostic_output: String,
    },

    /// archive member would land outside the rootfs directory
    #[error("refusing to extract {entry:?}: path escapes the rootfs directory")]
    UnsafeEntry { entry: String },

    /// the archive tool exited non-zero
    #[error("rootfs extraction failed (code {exit_code}): {diagnostic_output}")]
    ExtractionFailed {
        exit_code: i32,
        diagnostic_output: String,
    },

    /// filesystem error around extraction
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// Errors while writing the compatibility shim or patching a shell profile.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A hard precondition for an operation is not met. Reported to the user
/// with remediation text, never retried.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error(
        "rootfs is not provisioned at {rootfs}.\n\
         Provide an archive: openclawd setup --archive <rootfs.tar.gz>"
    )]
    ArchiveRequired { rootfs: PathBuf },

    #[error(
        "'{name}' is not installed.\n\
         Install with: npm install -g {name} (or: openclawd setup --install-gateway)"
    )]
    GatewayNotFound { name: String },
}

/// Anything the orchestrator can fail with.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to prepare {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
