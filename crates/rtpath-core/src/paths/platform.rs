//! Operating-system implementation of the platform path policy.
//!
//! All queries go straight to `std::fs`. OS-specific facts are selected at
//! compile time and stay private to this module.

use std::env;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use super::error::{PathError, PathResult};
use crate::ports::PlatformPolicy;

#[cfg(windows)]
const SEP: char = '\\';
#[cfg(not(windows))]
const SEP: char = '/';

#[cfg(windows)]
const DELIM: char = ';';
#[cfg(not(windows))]
const DELIM: char = ':';

/// [`PlatformPolicy`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsPlatform;

impl OsPlatform {
    /// Create the OS platform policy.
    pub const fn new() -> Self {
        Self
    }
}

fn into_text(path: PathBuf, what: &str) -> PathResult<String> {
    path.into_os_string()
        .into_string()
        .map_err(|_| PathError::decode(what))
}

impl PlatformPolicy for OsPlatform {
    fn separator(&self) -> char {
        SEP
    }

    fn delimiter(&self) -> char {
        DELIM
    }

    fn is_absolute(&self, path: &str) -> bool {
        #[cfg(windows)]
        {
            Path::new(path).is_absolute() || path.starts_with(SEP)
        }

        #[cfg(not(windows))]
        {
            path.starts_with(SEP)
        }
    }

    fn read_link(&self, path: &str) -> PathResult<Option<String>> {
        if path.is_empty() {
            return Ok(None);
        }
        match fs::read_link(path) {
            Ok(target) => into_text(target, "symbolic link target").map(Some),
            Err(_) => Ok(None),
        }
    }

    fn is_file(&self, path: &str) -> bool {
        fs::metadata(path).is_ok_and(|meta| meta.is_file())
    }

    fn is_executable_file(&self, path: &str) -> bool {
        let Ok(meta) = fs::metadata(path) else {
            return false;
        };
        if !meta.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            meta.permissions().mode() & 0o111 != 0
        }

        #[cfg(not(unix))]
        {
            true
        }
    }

    fn is_dir(&self, path: &str) -> bool {
        fs::metadata(path).is_ok_and(|meta| meta.is_dir())
    }

    fn current_dir(&self) -> Option<String> {
        env::current_dir()
            .ok()
            .and_then(|cwd| cwd.into_os_string().into_string().ok())
    }

    fn native_executable_path(&self) -> Option<String> {
        #[cfg(target_os = "macos")]
        {
            // A relative answer is no better than argv[0]; let the caller fall back.
            env::current_exe()
                .ok()
                .filter(|exe| exe.is_absolute())
                .and_then(|exe| exe.into_os_string().into_string().ok())
        }

        #[cfg(not(target_os = "macos"))]
        {
            None
        }
    }

    fn executable_suffix(&self) -> Option<&'static str> {
        if cfg!(windows) { Some(".exe") } else { None }
    }

    fn read_file_bytes(&self, path: &str, limit: usize) -> Option<Vec<u8>> {
        let file = File::open(path).ok()?;
        let mut buf = Vec::new();
        file.take(limit as u64).read_to_end(&mut buf).ok()?;
        Some(buf)
    }

    fn open_lines(&self, path: &str) -> Option<Box<dyn BufRead>> {
        let file = File::open(path).ok()?;
        Some(Box::new(BufReader::new(file)))
    }

    fn real_path(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        fs::canonicalize(Path::new(path))
            .ok()
            .and_then(|real| real.into_os_string().into_string().ok())
    }

    #[cfg(windows)]
    fn script_directory(&self, path: &str) -> String {
        // Either separator may appear; keep the one after a drive letter.
        let Some(idx) = path.rfind(['\\', '/']) else {
            return String::new();
        };
        if idx == 0 || path[..idx].ends_with(':') {
            path[..=idx].to_string()
        } else {
            path[..idx].to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn text(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn file_and_dir_queries() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("marker.txt");
        fs::write(&file, b"x").unwrap();

        let platform = OsPlatform::new();
        assert!(platform.is_file(&text(&file)));
        assert!(!platform.is_dir(&text(&file)));
        assert!(platform.is_dir(&text(temp.path())));
        assert!(!platform.is_file(&text(&temp.path().join("missing"))));
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_required() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let exe = temp.path().join("prog");
        fs::write(&exe, b"#!/bin/sh\n").unwrap();

        let platform = OsPlatform::new();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!platform.is_executable_file(&text(&exe)));

        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(platform.is_executable_file(&text(&exe)));
    }

    #[cfg(unix)]
    #[test]
    fn read_link_returns_one_hop() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("target");
        fs::write(&target, b"x").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink("target", &link).unwrap();

        let platform = OsPlatform::new();
        assert_eq!(
            platform.read_link(&text(&link)).unwrap(),
            Some("target".to_string())
        );
        assert_eq!(platform.read_link(&text(&target)).unwrap(), None);
        assert_eq!(platform.read_link("").unwrap(), None);
    }

    #[test]
    fn read_file_bytes_honors_limit() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("data");
        fs::write(&file, b"0123456789").unwrap();

        let platform = OsPlatform::new();
        assert_eq!(
            platform.read_file_bytes(&text(&file), 4),
            Some(b"0123".to_vec())
        );
        assert_eq!(platform.read_file_bytes(&text(&temp.path().join("nope")), 4), None);
    }

    #[test]
    fn open_lines_streams_whole_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("lines");
        fs::write(&file, b"one\ntwo\n").unwrap();

        let platform = OsPlatform::new();
        let lines: Vec<String> = platform
            .open_lines(&text(&file))
            .unwrap()
            .lines()
            .map(Result::unwrap)
            .collect();
        assert_eq!(lines, ["one", "two"]);
        assert!(platform.open_lines(&text(&temp.path().join("nope"))).is_none());
    }
}
