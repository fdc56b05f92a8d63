//! Build metadata
//!
//! Values stamped in by `build.rs`, with fallbacks for builds that skip it.

use serde::Serialize;

pub const BUILD_NUMBER: u64 = match option_env!("CIBOZER_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// ISO 8601, UTC
pub const BUILD_TIMESTAMP: &str = match option_env!("CIBOZER_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Cargo profile ("debug" or "release")
pub const BUILD_PROFILE: &str = match option_env!("CIBOZER_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

// `str::parse` is not const
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (digit - b'0') as u64;
        i += 1;
    }
    Some(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            profile: BUILD_PROFILE,
        }
    }

    /// One-line summary, e.g. "cibozer-portions 0.1.0 (build 12, release, 2026-10-18T09:00:00Z)"
    pub fn summary(&self) -> String {
        format!(
            "{} {} (build {}, {}, {})",
            self.name, self.version, self.build_number, self.profile, self.build_timestamp
        )
    }
}

/// Print the startup banner to stderr, keeping stdout free for MCP or JSON output
pub fn print_startup_banner(component: &str) {
    let info = BuildInfo::current();
    eprintln!("-----------------------------------------------");
    eprintln!("  Cibozer Portions :: {}", component);
    eprintln!("  {}", info.summary());
    eprintln!("-----------------------------------------------");
}
