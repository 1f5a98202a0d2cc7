//! Test utilities for path tests that touch the environment or the disk.
//!
//! `PATH`, `PYHOME` and friends are process-wide, so every test that reads
//! or writes them must hold [`ENV_LOCK`], usually through [`lock_env`].
//! That includes every test that runs the engine, which reads `PATH`.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::layout::BuildConstants;

/// Shared lock to serialize tests that depend on environment variables.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take [`ENV_LOCK`], ignoring poisoning left by a failed test.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// RAII guard that restores an environment variable to its original value on drop.
///
/// # Example
///
/// ```ignore
/// let _guard = lock_env();
/// let _env = EnvVarGuard::set("PYPATH", "/tmp/extra");
/// // ... test code that reads PYPATH ...
/// // Original value restored when _env is dropped
/// ```
pub struct EnvVarGuard {
    key: String,
    previous: Option<OsString>,
}

impl EnvVarGuard {
    /// Set an environment variable and return a guard that will restore it.
    pub fn set(key: &str, value: &str) -> Self {
        Self::set_os(key, OsStr::new(value))
    }

    /// Like [`set`](Self::set), for values that need not be valid UTF-8.
    #[allow(unsafe_code)]
    pub fn set_os(key: &str, value: &OsStr) -> Self {
        let previous = env::var_os(key);
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Remove an environment variable until the guard drops.
    #[allow(unsafe_code)]
    pub fn unset(key: &str) -> Self {
        let previous = env::var_os(key);
        unsafe {
            env::remove_var(key);
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvVarGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        if let Some(ref value) = self.previous {
            unsafe {
                env::set_var(&self.key, value);
            }
        } else {
            unsafe {
                env::remove_var(&self.key);
            }
        }
    }
}

/// Build constants pointing at a prefix that does not exist on disk.
pub fn test_constants() -> BuildConstants {
    BuildConstants {
        prefix: "/nonexistent/prefix".to_string(),
        exec_prefix: "/nonexistent/exec".to_string(),
        default_search_path: String::new(),
        vpath: String::new(),
        runtime_name: "py".to_string(),
        runtime_version: "3.9".to_string(),
        platlibdir: "lib".to_string(),
    }
}

/// Lossy text form of a path, for passing tempdir paths to the engine.
pub fn text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Create an empty file, including parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Create an executable stub at `path`.
pub fn make_executable(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"#!/bin/sh\n").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// An installed layout under `root`: `bin/py`, `lib/py3.9/os.py` and
/// `lib/py3.9/lib-dynload/`. Returns the executable path.
pub fn installed_tree(root: &Path) -> PathBuf {
    let lib = root.join("lib").join("py3.9");
    touch(&lib.join("os.py"));
    fs::create_dir_all(lib.join("lib-dynload")).unwrap();

    let exe = root.join("bin").join("py");
    make_executable(&exe);
    exe
}

/// An uninstalled build tree under `root`: the executable sits at the top
/// next to `Modules/Setup.local`, `Lib/os.py` and `pybuilddir.txt`.
/// Returns the executable path.
pub fn build_tree(root: &Path) -> PathBuf {
    touch(&root.join("Modules").join("Setup.local"));
    touch(&root.join("Lib").join("os.py"));
    fs::create_dir_all(root.join("build").join("lib.test")).unwrap();
    fs::write(root.join("pybuilddir.txt"), b"build/lib.test\n").unwrap();

    let exe = root.join("py");
    make_executable(&exe);
    exe
}
