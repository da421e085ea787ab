//! The bionic bypass shim.
//!
//! Android's bionic libc blocks the netlink query Node uses for
//! `os.networkInterfaces()`, which makes the gateway crash at startup. The
//! shim is preloaded with `--require` and wraps that call: it tries the real
//! one and, when it throws or comes back empty, answers with a single
//! loopback interface.

use serde::Serialize;
use std::collections::BTreeMap;

/// Name the fallback interface is keyed under.
pub const LOOPBACK_NAME: &str = "lo";

/// One entry of `os.networkInterfaces()`, as Node reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub address: String,
    pub netmask: String,
    pub family: String,
    pub mac: String,
    pub internal: bool,
    pub cidr: String,
}

impl InterfaceRecord {
    pub fn loopback() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            netmask: "255.0.0.0".to_string(),
            family: "IPv4".to_string(),
            mac: "00:00:00:00:00:00".to_string(),
            internal: true,
            cidr: "127.0.0.1/8".to_string(),
        }
    }
}

/// What the shim returns when the real query is unusable.
pub fn fallback_interfaces() -> BTreeMap<String, Vec<InterfaceRecord>> {
    let mut map = BTreeMap::new();
    map.insert(LOOPBACK_NAME.to_string(), vec![InterfaceRecord::loopback()]);
    map
}

const HEADER: &str = "// OpenClawd Bionic Bypass - Auto-generated\n";

const BODY: &str = r#"const os = require('os');
const originalNetworkInterfaces = os.networkInterfaces;

os.networkInterfaces = function() {
  try {
    const interfaces = originalNetworkInterfaces.call(os);
    if (interfaces && Object.keys(interfaces).length > 0) {
      return interfaces;
    }
  } catch (e) {
    // Bionic blocked the call, use fallback
  }

  return JSON.parse(JSON.stringify(FALLBACK));
};
"#;

/// Full shim file content. Deterministic: no inputs, same bytes every time.
pub fn render() -> String {
    // Serializing a fixed struct into a BTreeMap cannot fail.
    let fallback = serde_json::to_string_pretty(&fallback_interfaces())
        .unwrap_or_else(|_| "{}".to_string());
    format!("{HEADER}const FALLBACK = {fallback};\n{BODY}")
}
