//! Shell profile activation block.

use std::path::Path;

/// Variable Node reads preload options from.
pub const PRELOAD_VAR: &str = "NODE_OPTIONS";

/// Token whose presence means a profile has already been activated.
pub const MARKER: &str = "bionic-bypass";

/// Comment line opening the block. Contains [`MARKER`].
pub const COMMENT_LINE: &str = "# OpenClawd bionic-bypass";

/// `NODE_OPTIONS` value that preloads the shim at `shim`.
pub fn preload_value(shim: &Path) -> String {
    format!("--require {}", shim.display())
}

/// Has this profile content already been activated?
pub fn is_activated(content: &str) -> bool {
    content.contains(MARKER)
}

/// Text appended to a profile: a leading newline, the comment, the export.
pub fn activation_block(shim: &Path) -> String {
    format!(
        "\n{}\nexport {}=\"{}\"\n",
        COMMENT_LINE,
        PRELOAD_VAR,
        preload_value(shim)
    )
}

/// Block to append to `content`, or `None` if it is already activated.
pub fn pending_block(content: &str, shim: &Path) -> Option<String> {
    if is_activated(content) {
        return None;
    }
    Some(activation_block(shim))
}
