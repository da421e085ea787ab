//! Shared utilities across openclawd modules.

pub mod files;

pub use files::{append_to_file, replace_file_atomic, write_file_mode, write_file_with_dirs};
