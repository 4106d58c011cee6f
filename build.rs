//! Build script for prdash - embeds version information.
//!
//! `BUILD_INFO_HUMAN` is composed of the crate version, the output of
//! `git describe --tags --always --dirty` (or a `v{version}-{timestamp}`
//! pseudo-version when git is unavailable) and the rustc version.

use std::{env, process::Command};

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

/// Runs a command and returns its trimmed stdout when it succeeded.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_version() -> String {
    capture("git", &["describe", "--tags", "--always", "--dirty"]).unwrap_or_else(|| {
        format!(
            "v{}-{}",
            env!("CARGO_PKG_VERSION"),
            Utc::now().format("%Y%m%d%H%M%S")
        )
    })
}

fn build_info() -> String {
    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        Some(format!("({})", git_version())),
        capture(&env::var("RUSTC").unwrap_or_else(|_| "rustc".into()), &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
