//! Configuration management for openclawd.
//!
//! Read from environment variables; `main` loads a `.env` file into the
//! environment first, so both sources work and real variables win.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::gateway::DEFAULT_GATEWAY;
use crate::layout::{Layout, DEFAULT_DISTRO};
use crate::provision::ArchiveTool;

/// Which runner executes commands inside the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerKind {
    /// Through proot, inside the rootfs (Android app).
    Proot,
    /// Directly on the host (Termux).
    Host,
}

impl RunnerKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "proot" => Some(Self::Proot),
            "host" => Some(Self::Host),
            _ => None,
        }
    }

    /// Value accepted in `OPENCLAWD_RUNNER`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proot => "proot",
            Self::Host => "host",
        }
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// openclawd configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory of the target environment (OPENCLAWD_HOME)
    pub base_dir: PathBuf,
    /// Distribution directory name under rootfs/ (OPENCLAWD_DISTRO)
    pub distro: String,
    /// Command runner (OPENCLAWD_RUNNER: proot | host)
    pub runner: RunnerKind,
    /// proot executable (OPENCLAWD_PROOT)
    pub proot: String,
    /// Archive tool command line (OPENCLAWD_TAR)
    pub archive_tool: ArchiveTool,
    /// Gateway executable name (OPENCLAWD_GATEWAY)
    pub gateway: String,
    /// Default rootfs archive for setup (OPENCLAWD_ROOTFS_ARCHIVE)
    pub rootfs_archive: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build configuration from an explicit set of variables.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let base_dir = get("OPENCLAWD_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(default_base_dir);

        let distro = get("OPENCLAWD_DISTRO").unwrap_or_else(|| DEFAULT_DISTRO.to_string());

        let runner = match get("OPENCLAWD_RUNNER") {
            Some(value) => RunnerKind::parse(&value).unwrap_or_else(|| {
                log::warn!("Unknown OPENCLAWD_RUNNER '{}', using proot", value);
                RunnerKind::Proot
            }),
            None => RunnerKind::Proot,
        };

        let proot = get("OPENCLAWD_PROOT").unwrap_or_else(|| "proot".to_string());

        let archive_tool = get("OPENCLAWD_TAR")
            .and_then(|line| ArchiveTool::from_command_line(&line))
            .unwrap_or_default();

        let gateway = get("OPENCLAWD_GATEWAY").unwrap_or_else(|| DEFAULT_GATEWAY.to_string());

        let rootfs_archive = get("OPENCLAWD_ROOTFS_ARCHIVE").map(PathBuf::from);

        Self {
            base_dir,
            distro,
            runner,
            proot,
            archive_tool,
            gateway,
            rootfs_archive,
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.base_dir, &self.distro)
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        let layout = self.layout();
        println!("Configuration:");
        println!("  OPENCLAWD_HOME: {}", self.base_dir.display());
        println!("  OPENCLAWD_DISTRO: {}", self.distro);
        println!("  OPENCLAWD_RUNNER: {}", self.runner);
        println!("  OPENCLAWD_PROOT: {}", self.proot);
        println!("  OPENCLAWD_TAR: {}", self.archive_tool.program());
        println!("  OPENCLAWD_GATEWAY: {}", self.gateway);
        match &self.rootfs_archive {
            Some(path) => println!("  OPENCLAWD_ROOTFS_ARCHIVE: {}", path.display()),
            None => println!("  OPENCLAWD_ROOTFS_ARCHIVE: (not set)"),
        }
        if layout.shell_binary().exists() {
            println!("  Rootfs: FOUND at {}", layout.rootfs_dir().display());
        } else {
            println!("  Rootfs: NOT FOUND (run 'openclawd setup --archive <file>')");
        }
    }
}

/// `~/.local/share/openclawd`, or `./.openclawd` when there is no data dir.
fn default_base_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("openclawd"))
        .unwrap_or_else(|| PathBuf::from(".openclawd"))
}
