//! Build script for cibozer-portions
//!
//! Stamps each build with a running build number, a UTC timestamp and the
//! cargo profile so the startup banner can say exactly what is running.

use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let counter_path = PathBuf::from(manifest_dir).join("build_number.txt");

    let previous: u64 = fs::read_to_string(&counter_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build_number = previous + 1;

    // A read-only checkout still builds; the number just stops advancing
    if let Err(e) = fs::write(&counter_path, build_number.to_string()) {
        println!("cargo:warning=Could not update {}: {}", counter_path.display(), e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=CIBOZER_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=CIBOZER_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=CIBOZER_BUILD_PROFILE={}", profile);
}
