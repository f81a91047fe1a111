//! Embeds a human-readable build description for `--version`.
//!
//! Produces `BUILD_INFO_HUMAN`, e.g.
//! `0.1.0 (v0.1.0-3-g2adb30a27442-dirty) rustc 1.90.0 (...)`. When the
//! tree has no tags the git part becomes
//! `v{version}-{timestamp}-{commit}[+dirty]`; without git it is left out.

use std::process::Command;

use chrono::{DateTime, Utc};

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    let components = [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_version().map(|v| format!("({v})")),
        rustc_version(),
    ];
    let build_info = components.into_iter().flatten().collect::<Vec<_>>().join(" ");

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={build_info}");
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn rustc_version() -> Option<String> {
    run("rustc", &["--version"])
}

fn git_version() -> Option<String> {
    let describe = run("git", &["describe", "--tags", "--always", "--dirty"])?;
    if describe.contains('v') || describe.contains("-g") {
        return Some(describe);
    }

    // Untagged: build a pseudo-version from the head commit.
    let commit = run("git", &["rev-parse", "--short=12", "HEAD"])?;
    let dirty = run("git", &["status", "--porcelain"])
        .is_some_and(|status| status.lines().any(|line| !line.ends_with(".cargo-ok")));

    let timestamp = if dirty {
        Utc::now()
    } else {
        run("git", &["log", "-1", "--format=%ct"])
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(Utc::now)
    };

    Some(format!(
        "v{}-{}-{commit}{}",
        env!("CARGO_PKG_VERSION"),
        timestamp.format("%Y%m%d%H%M%S"),
        if dirty { "+dirty" } else { "" }
    ))
}
