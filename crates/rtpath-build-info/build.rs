use std::{
    env, fs,
    path::{Path, PathBuf},
};

use vergen_gix::{Emitter, GixBuilder};

include!("../build_common.rs");

/// Layout variables with their fallbacks. The exec prefix falls back to the
/// prefix and is handled separately.
const LAYOUT_VARS: &[(&str, &str)] = &[
    ("RTPATH_PREFIX", "/usr/local"),
    ("RTPATH_DEFAULT_PATH", ""),
    ("RTPATH_VPATH", ""),
    ("RTPATH_RUNTIME_NAME", "py"),
    ("RTPATH_RUNTIME_VERSION", "3.9"),
    ("RTPATH_PLATLIBDIR", "lib"),
];

fn main() {
    // Always rerun when this build script changes.
    println!("cargo:rerun-if-changed=build.rs");

    // Process README for rustdoc
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    process_readme_for_rustdoc(&manifest_dir);

    emit_layout();

    // Allow CI or packagers to provide a SHA without any git probing.
    println!("cargo:rerun-if-env-changed=RTPATH_BUILD_SHA_SHORT");

    if let Some(override_sha) = env::var("RTPATH_BUILD_SHA_SHORT")
        .ok()
        .and_then(|s| normalize_sha_short(&s))
    {
        emit_vergen_fallbacks(Some(&override_sha));
        return;
    }

    // Best-effort git probing via vergen-gix, but NEVER fail the build.
    let Some(repo_root) = find_repo_root(Path::new(&manifest_dir)) else {
        emit_vergen_fallbacks(None);
        return;
    };

    let git = match GixBuilder::default()
        .repo_path(Some(repo_root))
        .sha(true) // short SHA
        .dirty(false)
        .build()
    {
        Ok(git) => git,
        Err(err) => {
            println!("cargo:warning=rtpath-build-info: vergen-gix config failed: {err}");
            emit_vergen_fallbacks(None);
            return;
        }
    };

    if let Err(err) = Emitter::default()
        .add_instructions(&git)
        .and_then(|e| e.emit())
    {
        println!("cargo:warning=rtpath-build-info: vergen-gix emit failed: {err}");
        emit_vergen_fallbacks(None);
    }
}

/// Emit every layout variable so `env!()` in the crate never fails.
fn emit_layout() {
    for (name, fallback) in LAYOUT_VARS {
        println!("cargo:rerun-if-env-changed={name}");
        let value = env::var(name).unwrap_or_else(|_| (*fallback).to_string());
        println!("cargo:rustc-env={name}={value}");
    }

    println!("cargo:rerun-if-env-changed=RTPATH_EXEC_PREFIX");
    let exec_prefix = env::var("RTPATH_EXEC_PREFIX")
        .or_else(|_| env::var("RTPATH_PREFIX"))
        .unwrap_or_else(|_| "/usr/local".to_string());
    println!("cargo:rustc-env=RTPATH_EXEC_PREFIX={exec_prefix}");
}

fn emit_vergen_fallbacks(sha_short: Option<&str>) {
    // These are the env vars the crate uses via `env!()`.
    // They MUST always be set, or compilation will fail.
    let sha = sha_short.unwrap_or("unknown");
    println!("cargo:rustc-env=VERGEN_GIT_SHA={sha}");
    println!("cargo:rustc-env=VERGEN_GIT_DIRTY=false");
}

fn normalize_sha_short(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.len() >= 7 {
        &trimmed[..7]
    } else {
        trimmed
    };

    if candidate.len() == 7 && candidate.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(candidate.to_string())
    } else {
        None
    }
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
