//! OpenClawd - provisions a proot rootfs for the OpenClaw gateway on Android.
//!
//! The crate checks whether a target environment is ready, extracts the
//! rootfs archive when it is not, installs the Bionic Bypass shim, and
//! activates it in the user's shell profiles. Every step can be re-run.

pub mod bootstrap;
pub mod common;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod layout;
pub mod patch;
pub mod probe;
pub mod process;
pub mod provision;
pub mod runner;
pub mod status;
pub mod timing;

pub use bootstrap::{Bootstrap, BypassOutcome, SetupOptions, SetupOutcome};
pub use errors::{BootstrapError, PatchError, PreconditionError, ProbeError, ProvisionError};
pub use layout::Layout;
pub use runner::SandboxRunner;
pub use status::{ReadinessReport, StatusReport};
