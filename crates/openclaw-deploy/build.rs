use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let build_date = Utc::now().format("%Y%m%d").to_string();
    let version_string = match git_short_hash() {
        Some(_) if is_release_commit(version) => version.to_owned(),
        Some(hash) => format!("{version}+{hash}.{build_date}"),
        None => format!("{version}+unknown.{build_date}"),
    };

    println!("cargo:rustc-env=OPENCLAW_DEPLOY_VERSION={version_string}");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_owned())
}

/// HEAD carries the `openclaw-deploy@v<version>` release tag.
fn is_release_commit(version: &str) -> bool {
    let expected_tag = format!("openclaw-deploy@v{version}");

    match Command::new("git").args(["tag", "--points-at", "HEAD"]).output() {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout)
            .lines()
            .any(|line| line.trim() == expected_tag),
        _ => false,
    }
}
