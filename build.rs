// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=VIDEO_SWITCHER_VERSION");

    // Packagers can pin the version string (e.g. distro builds without .git)
    let version = std::env::var("VIDEO_SWITCHER_VERSION")
        .ok()
        .or_else(git_version)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

fn git_version() -> Option<String> {
    // "v0.1.0" at a tag, "v0.1.0-5-gabcdef1" after it, or a bare hash
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if described.is_empty() {
        return None;
    }

    let version = described.strip_prefix('v').unwrap_or(&described);
    Some(version.to_string())
}
