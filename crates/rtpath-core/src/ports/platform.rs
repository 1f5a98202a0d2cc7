//! Platform path policy port.
//!
//! Everything that differs between operating systems lives behind this
//! trait: separators, landmark file names, executable lookup and the
//! filesystem queries the search makes. The search algorithm itself is
//! written once against it.
//!
//! # Design Notes
//!
//! - Core owns the trait (pure)
//! - `paths::OsPlatform` is the `std::fs` implementation
//! - Tests may substitute their own implementation

use std::io::BufRead;

use crate::paths::PathResult;

/// Well-known names probed while locating the library roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmarks {
    /// File whose presence marks a module library root (e.g. `os.py`).
    pub module: &'static str,
    /// Suffix appended to `module` for its compiled-cache fallback.
    pub compiled_suffix: &'static str,
    /// File beside the executable marking an uninstalled build directory.
    pub build_marker: &'static str,
    /// Directory name of the source library inside a build tree.
    pub source_lib: &'static str,
    /// File beside the executable holding the relative path to the build's
    /// shared-module output.
    pub build_dir_file: &'static str,
    /// Directory holding dynamically loaded modules.
    pub dynload_dir: &'static str,
    /// Environment config file name, looked for beside or above the executable.
    pub env_config: &'static str,
}

impl Landmarks {
    /// Landmark names used by the standard layout.
    pub const STANDARD: Self = Self {
        module: "os.py",
        compiled_suffix: "c",
        build_marker: "Modules/Setup.local",
        source_lib: "Lib",
        build_dir_file: "pybuilddir.txt",
        dynload_dir: "lib-dynload",
        env_config: "pyvenv.cfg",
    };
}

impl Default for Landmarks {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Port for the filesystem and OS facts the path search depends on.
///
/// Paths are passed as strings using [`separator`](Self::separator); query
/// methods never fail, they answer `false`/`None` when the target is
/// missing or unreadable.
pub trait PlatformPolicy {
    /// Path component separator.
    fn separator(&self) -> char;

    /// Delimiter between entries of a path list (`PATH`, search lists).
    fn delimiter(&self) -> char;

    /// Whether `path` is absolute on this platform.
    fn is_absolute(&self, path: &str) -> bool;

    /// Read one level of symbolic link.
    ///
    /// Returns `Ok(None)` when `path` is not a link. A link target that is
    /// not valid text is a decode error.
    fn read_link(&self, path: &str) -> PathResult<Option<String>>;

    /// Whether `path` is a regular file.
    fn is_file(&self, path: &str) -> bool;

    /// Whether `path` is a regular file the current user may execute.
    fn is_executable_file(&self, path: &str) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &str) -> bool;

    /// The current working directory, if it can be determined.
    fn current_dir(&self) -> Option<String>;

    /// Native "path of the running executable" query.
    ///
    /// Only platforms where argv[0] is known to be unreliable answer this;
    /// others return `None` and the `PATH` search is used instead.
    fn native_executable_path(&self) -> Option<String> {
        None
    }

    /// Suffix executables carry on this platform, if any.
    fn executable_suffix(&self) -> Option<&'static str> {
        None
    }

    /// Read at most `limit` bytes of a file. `None` when it cannot be opened.
    fn read_file_bytes(&self, path: &str, limit: usize) -> Option<Vec<u8>>;

    /// Open a file for line-by-line reading. `None` when it cannot be opened.
    fn open_lines(&self, path: &str) -> Option<Box<dyn BufRead>>;

    /// Fully resolved form of `path`, if it exists.
    fn real_path(&self, path: &str) -> Option<String>;

    /// Landmark names for this platform's layout.
    fn landmarks(&self) -> &Landmarks {
        &Landmarks::STANDARD
    }

    /// Directory part of a script path, for the leading search-path entry.
    ///
    /// Drops the last component and its separator, except that the root
    /// keeps its separator. A path without a separator yields an empty
    /// string.
    fn script_directory(&self, path: &str) -> String {
        match path.rfind(self.separator()) {
            Some(0) => path[..1].to_string(),
            Some(idx) => path[..idx].to_string(),
            None => String::new(),
        }
    }
}
