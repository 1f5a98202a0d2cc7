//! Environment config file reader.
//!
//! A virtual environment is a directory holding an env config file
//! (`key = value` lines) next to, or one level above, its executable. The
//! only key the path search cares about is `home`: the directory of the
//! base installation's executable.

use std::io::{BufRead, Read};

use super::bounded::{MAX_PATH_LEN, join, reduce};
use super::error::PathResult;
use crate::ports::PlatformPolicy;

/// Longest line the reader accepts before giving up on the file.
const MAX_LINE_LEN: usize = MAX_PATH_LEN * 2;

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Value of a `key = value` line, if the line assigns `key`.
///
/// The key and `=` are separate blank-delimited tokens; the value runs to
/// the end of the line and is trimmed.
fn assigned_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line
        .trim_start_matches(|c: char| is_blank(c) || c == '\r' || c == '\n')
        .strip_prefix(key)?;
    let rest = rest.strip_prefix(is_blank)?.trim_start_matches(is_blank);
    let value = rest.strip_prefix('=')?.strip_prefix(is_blank)?.trim();
    (!value.is_empty()).then_some(value)
}

/// Look up `key` in env config text.
///
/// Lines starting with `#` are comments. Lines that are not UTF-8 are
/// skipped; a line longer than the limit ends the scan. The input is read
/// to the end, one bounded line at a time.
pub fn find_env_config_value<R: BufRead>(mut reader: R, key: &str) -> Option<String> {
    let mut line = Vec::new();
    loop {
        line.clear();
        let limit = (MAX_LINE_LEN + 1) as u64;
        match reader.by_ref().take(limit).read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }

        if line.len() > MAX_LINE_LEN {
            return None;
        }
        if line.first() == Some(&b'#') {
            continue;
        }
        let Ok(text) = std::str::from_utf8(&line) else {
            continue;
        };
        if let Some(value) = assigned_value(text, key) {
            return Some(value.to_string());
        }
    }
}

/// Find the env config file for `argv0_dir` and return its `home` value.
///
/// The executable's directory is tried first, then its parent. The first
/// file that exists is the only one consulted.
pub fn read_venv_home<P>(platform: &P, argv0_dir: &str) -> PathResult<Option<String>>
where
    P: PlatformPolicy + ?Sized,
{
    let file_name = platform.landmarks().env_config;
    let candidates = [
        join(platform, argv0_dir, file_name)?,
        join(platform, &reduce(platform, argv0_dir), file_name)?,
    ];

    for candidate in &candidates {
        if let Some(reader) = platform.open_lines(candidate) {
            tracing::debug!(file = %candidate, "reading env config");
            return Ok(find_env_config_value(reader, "home"));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::OsPlatform;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_home_and_ignores_comments() {
        let cfg = "# home = /commented\nversion = 3.9.1\nhome = /opt/base/bin\n";
        assert_eq!(
            find_env_config_value(cfg.as_bytes(), "home"),
            Some("/opt/base/bin".to_string())
        );
    }

    #[test]
    fn key_and_equals_must_be_separate_tokens() {
        assert_eq!(find_env_config_value("home=/x\n".as_bytes(), "home"), None);
        assert_eq!(find_env_config_value("home =/x\n".as_bytes(), "home"), None);
        assert_eq!(find_env_config_value("home= /x\n".as_bytes(), "home"), None);
        assert_eq!(
            find_env_config_value("  home\t=\t/x\r\n".as_bytes(), "home"),
            Some("/x".to_string())
        );
    }

    #[test]
    fn accepts_unterminated_last_line() {
        assert_eq!(
            find_env_config_value("home = /last".as_bytes(), "home"),
            Some("/last".to_string())
        );
    }

    #[test]
    fn empty_value_keeps_scanning() {
        let cfg = "home = \nhome = /second\n";
        assert_eq!(
            find_env_config_value(cfg.as_bytes(), "home"),
            Some("/second".to_string())
        );
    }

    #[test]
    fn key_must_match_exactly() {
        let cfg = "homedir = /nope\ninclude-system-site-packages = false\n";
        assert_eq!(find_env_config_value(cfg.as_bytes(), "home"), None);
    }

    #[test]
    fn undecodable_lines_are_skipped() {
        let mut cfg = vec![0xff, b'=', b'x', b'\n'];
        cfg.extend_from_slice(b"home = /ok\n");
        assert_eq!(
            find_env_config_value(cfg.as_slice(), "home"),
            Some("/ok".to_string())
        );
    }

    #[test]
    fn overlong_line_stops_the_scan() {
        let mut cfg = format!("junk = {}\n", "x".repeat(MAX_LINE_LEN));
        cfg.push_str("home = /late\n");
        assert_eq!(find_env_config_value(cfg.as_bytes(), "home"), None);
    }

    #[test]
    fn line_at_the_limit_is_accepted() {
        let value = format!("/{}", "v".repeat(MAX_LINE_LEN - "home = /\n".len()));
        let cfg = format!("home = {value}\n");
        assert_eq!(cfg.len(), MAX_LINE_LEN);
        assert_eq!(find_env_config_value(cfg.as_bytes(), "home"), Some(value));
    }

    #[test]
    fn home_after_large_preamble_is_read_in_full() {
        let temp = tempdir().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();

        let mut cfg = String::new();
        while cfg.len() < 64 * 1024 + 8 {
            cfg.push_str(&format!("# {}\n", "-".repeat(97)));
        }
        // Place the home line so it straddles the 64 KiB mark.
        cfg.truncate(64 * 1024 - 10);
        cfg.push('\n');
        cfg.push_str("home = /opt/base/installation/bin\n");
        assert!(cfg.len() > 64 * 1024);
        fs::write(bin.join("pyvenv.cfg"), &cfg).unwrap();

        let platform = OsPlatform::new();
        assert_eq!(
            read_venv_home(&platform, &bin.to_string_lossy()).unwrap(),
            Some("/opt/base/installation/bin".to_string())
        );
    }

    #[test]
    fn venv_home_prefers_executable_directory() {
        let temp = tempdir().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(temp.path().join("pyvenv.cfg"), "home = /from/parent\n").unwrap();

        let platform = OsPlatform::new();
        let bin_text = bin.to_string_lossy().into_owned();
        assert_eq!(
            read_venv_home(&platform, &bin_text).unwrap(),
            Some("/from/parent".to_string())
        );

        fs::write(bin.join("pyvenv.cfg"), "version = 3.9\n").unwrap();
        // The first file found wins even without a home key.
        assert_eq!(read_venv_home(&platform, &bin_text).unwrap(), None);
    }
}
