//! Landmark probes.
//!
//! Pure predicates over candidate directories. A missing landmark is an
//! ordinary answer, never an error; only path construction can fail.

use super::bounded::{MAX_PATH_LEN, join};
use super::error::{PathError, PathResult};
use crate::ports::PlatformPolicy;

/// Whether `dir` is a module library root.
///
/// True when the module landmark exists as a regular file, or failing that
/// its compiled-cache twin does.
pub fn is_module_root<P>(platform: &P, dir: &str) -> PathResult<bool>
where
    P: PlatformPolicy + ?Sized,
{
    let landmarks = platform.landmarks();
    let source = join(platform, dir, landmarks.module)?;
    if platform.is_file(&source) {
        return Ok(true);
    }

    let mut compiled = source;
    compiled.push_str(landmarks.compiled_suffix);
    Ok(platform.is_file(&compiled))
}

/// Whether `dir` holds the build-output marker of an uninstalled tree.
pub fn is_build_dir<P>(platform: &P, dir: &str) -> PathResult<bool>
where
    P: PlatformPolicy + ?Sized,
{
    let marker = join(platform, dir, platform.landmarks().build_marker)?;
    Ok(platform.is_file(&marker))
}

/// Most marker bytes read: a maximal path plus a `\r\n` terminator, plus
/// one byte to detect anything longer.
const MARKER_READ_LIMIT: usize = MAX_PATH_LEN + 3;

/// Read the relative shared-module path recorded beside a build executable.
///
/// Returns `Ok(None)` when the marker file is absent. Content that is not
/// UTF-8 is a decode error naming the file. Trailing line terminators are
/// dropped. A path longer than [`MAX_PATH_LEN`] is rejected, never cut.
pub fn read_build_dir_marker<P>(platform: &P, dir: &str) -> PathResult<Option<String>>
where
    P: PlatformPolicy + ?Sized,
{
    let file_name = platform.landmarks().build_dir_file;
    let marker = join(platform, dir, file_name)?;
    let Some(bytes) = platform.read_file_bytes(&marker, MARKER_READ_LIMIT) else {
        return Ok(None);
    };
    if bytes.len() >= MARKER_READ_LIMIT {
        return Err(PathError::PathTooLong {
            len: bytes.len(),
            max: MAX_PATH_LEN,
        });
    }

    let text = String::from_utf8(bytes).map_err(|_| PathError::decode(file_name))?;
    let rel = text.trim_end_matches(['\r', '\n']);
    if rel.len() > MAX_PATH_LEN {
        return Err(PathError::PathTooLong {
            len: rel.len(),
            max: MAX_PATH_LEN,
        });
    }
    Ok(Some(rel.to_string()))
}

/// Whether `dir` is a dynamic-module directory.
pub fn is_dynload_dir<P>(platform: &P, dir: &str) -> bool
where
    P: PlatformPolicy + ?Sized,
{
    platform.is_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::OsPlatform;
    use std::fs;
    use tempfile::tempdir;

    fn text(path: &std::path::Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn module_root_accepts_source_or_compiled() {
        let temp = tempdir().unwrap();
        let platform = OsPlatform::new();
        let dir = text(temp.path());

        assert!(!is_module_root(&platform, &dir).unwrap());

        fs::write(temp.path().join("os.pyc"), b"").unwrap();
        assert!(is_module_root(&platform, &dir).unwrap());

        fs::remove_file(temp.path().join("os.pyc")).unwrap();
        fs::write(temp.path().join("os.py"), b"").unwrap();
        assert!(is_module_root(&platform, &dir).unwrap());
    }

    #[test]
    fn module_root_rejects_directory_landmark() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("os.py")).unwrap();
        assert!(!is_module_root(&OsPlatform::new(), &text(temp.path())).unwrap());
    }

    #[test]
    fn build_dir_requires_marker_file() {
        let temp = tempdir().unwrap();
        let platform = OsPlatform::new();
        let dir = text(temp.path());
        assert!(!is_build_dir(&platform, &dir).unwrap());

        fs::create_dir_all(temp.path().join("Modules")).unwrap();
        fs::write(temp.path().join("Modules").join("Setup.local"), b"").unwrap();
        assert!(is_build_dir(&platform, &dir).unwrap());
    }

    #[test]
    fn build_dir_marker_is_read_and_trimmed() {
        let temp = tempdir().unwrap();
        let platform = OsPlatform::new();
        let dir = text(temp.path());
        assert_eq!(read_build_dir_marker(&platform, &dir).unwrap(), None);

        fs::write(temp.path().join("pybuilddir.txt"), b"build/lib.linux-x86_64-3.9\n").unwrap();
        assert_eq!(
            read_build_dir_marker(&platform, &dir).unwrap(),
            Some("build/lib.linux-x86_64-3.9".to_string())
        );
    }

    #[test]
    fn build_dir_marker_must_be_utf8() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("pybuilddir.txt"), [0xff, 0xfe, 0x00]).unwrap();
        let err = read_build_dir_marker(&OsPlatform::new(), &text(temp.path())).unwrap_err();
        assert_eq!(err, PathError::decode("pybuilddir.txt"));
    }

    #[test]
    fn overlong_build_dir_marker_is_rejected_not_cut() {
        let temp = tempdir().unwrap();
        let platform = OsPlatform::new();
        let dir = text(temp.path());
        let marker = temp.path().join("pybuilddir.txt");

        let longest = "b".repeat(MAX_PATH_LEN);
        fs::write(&marker, format!("{longest}\r\n")).unwrap();
        assert_eq!(read_build_dir_marker(&platform, &dir).unwrap(), Some(longest));

        fs::write(&marker, format!("{}\n", "b".repeat(MAX_PATH_LEN + 1))).unwrap();
        assert!(matches!(
            read_build_dir_marker(&platform, &dir),
            Err(PathError::PathTooLong { .. })
        ));

        fs::write(&marker, "b".repeat(MAX_PATH_LEN * 2)).unwrap();
        assert!(matches!(
            read_build_dir_marker(&platform, &dir),
            Err(PathError::PathTooLong { .. })
        ));
    }
}
