//! Length-checked path string arithmetic.
//!
//! Paths are built as owned strings using the platform separator. Each
//! operation checks the result against [`MAX_PATH_LEN`] and fails with
//! [`PathError::PathTooLong`] instead of truncating; buffer growth goes
//! through `try_reserve` so allocation failure is reported, not aborted on.

use super::error::{PathError, PathResult};
use crate::ports::PlatformPolicy;

/// Maximum length, in bytes, of any computed path.
pub const MAX_PATH_LEN: usize = 4096;

fn ensure_fits(len: usize) -> PathResult<()> {
    if len > MAX_PATH_LEN {
        return Err(PathError::PathTooLong {
            len,
            max: MAX_PATH_LEN,
        });
    }
    Ok(())
}

fn with_capacity(capacity: usize) -> PathResult<String> {
    let mut buf = String::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| PathError::OutOfMemory)?;
    Ok(buf)
}

/// Copy a path, checking it against the maximum length.
pub fn bounded_copy(path: &str) -> PathResult<String> {
    ensure_fits(path.len())?;
    let mut buf = with_capacity(path.len())?;
    buf.push_str(path);
    Ok(buf)
}

/// Append `rel` to `base`.
///
/// An absolute `rel` replaces `base` entirely. Otherwise a separator is
/// inserted unless `base` is empty or already ends with one; an empty `rel`
/// therefore just guarantees a trailing separator.
pub fn join<P>(platform: &P, base: &str, rel: &str) -> PathResult<String>
where
    P: PlatformPolicy + ?Sized,
{
    if platform.is_absolute(rel) {
        return bounded_copy(rel);
    }

    let sep = platform.separator();
    let needs_sep = !base.is_empty() && !base.ends_with(sep);
    let len = base.len() + usize::from(needs_sep) * sep.len_utf8() + rel.len();
    ensure_fits(len)?;

    let mut buf = with_capacity(len)?;
    buf.push_str(base);
    if needs_sep {
        buf.push(sep);
    }
    buf.push_str(rel);
    Ok(buf)
}

/// Drop the last separator and everything after it.
///
/// `/a/b` becomes `/a`, `/a` becomes the empty string, and a path with no
/// separator also becomes empty.
pub fn reduce<P>(platform: &P, path: &str) -> String
where
    P: PlatformPolicy + ?Sized,
{
    match path.rfind(platform.separator()) {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

/// Apply [`reduce`] `levels` times.
pub fn reduce_n<P>(platform: &P, path: &str, levels: usize) -> String
where
    P: PlatformPolicy + ?Sized,
{
    (0..levels).fold(path.to_string(), |acc, _| reduce(platform, &acc))
}

/// Make `path` absolute against the working directory.
///
/// A leading `./` is dropped before joining. If the working directory is
/// unavailable the path is returned unchanged.
pub fn absolutize<P>(platform: &P, path: &str) -> PathResult<String>
where
    P: PlatformPolicy + ?Sized,
{
    if platform.is_absolute(path) {
        return bounded_copy(path);
    }

    let Some(cwd) = platform.current_dir() else {
        return bounded_copy(path);
    };

    let mut dot_prefix = String::from(".");
    dot_prefix.push(platform.separator());
    let rel = path.strip_prefix(dot_prefix.as_str()).unwrap_or(path);
    join(platform, &cwd, rel)
}

/// Remove `.` segments, fold `..` into the previous segment and collapse
/// repeated separators.
///
/// `..` never climbs above the root of an absolute path; in a relative
/// path a leading `..` is kept.
pub fn normalize<P>(platform: &P, path: &str) -> PathResult<String>
where
    P: PlatformPolicy + ?Sized,
{
    ensure_fits(path.len())?;
    let sep = platform.separator();

    let (root, rest) = if path.starts_with(sep) {
        (&path[..sep.len_utf8()], path.trim_start_matches(sep))
    } else if platform.is_absolute(path) {
        // Drive-style root such as `C:\`.
        match path.find(sep) {
            Some(idx) => path.split_at(idx + sep.len_utf8()),
            None => (path, ""),
        }
    } else {
        ("", path)
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split(sep) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if root.is_empty() => parts.push(".."),
                _ => {}
            },
            other => parts.push(other),
        }
    }

    let sep_str = sep.to_string();
    let body = parts.join(&sep_str);
    let mut buf = with_capacity(root.len() + body.len())?;
    buf.push_str(root);
    buf.push_str(&body);
    if buf.is_empty() {
        buf.push('.');
    }
    Ok(buf)
}
