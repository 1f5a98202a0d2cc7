//! Build/version metadata and compiled-in install layout for rtpath.
#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]

/// The `SemVer` version of the build (from Cargo).
pub const SEMVER: &str = env!("CARGO_PKG_VERSION");

/// Installation prefix the runtime was configured for.
pub const DEFAULT_PREFIX: &str = env!("RTPATH_PREFIX");

/// Installation prefix for platform-dependent files.
pub const DEFAULT_EXEC_PREFIX: &str = env!("RTPATH_EXEC_PREFIX");

/// Default module search list, delimiter-separated. Relative entries are
/// resolved against the located library directory.
pub const DEFAULT_SEARCH_PATH: &str = env!("RTPATH_DEFAULT_PATH");

/// Offset from a build directory to its source tree.
pub const VPATH: &str = env!("RTPATH_VPATH");

/// Short name of the runtime, used to build versioned library directory names.
pub const RUNTIME_NAME: &str = env!("RTPATH_RUNTIME_NAME");

/// `MAJOR.MINOR` version of the runtime.
pub const RUNTIME_VERSION: &str = env!("RTPATH_RUNTIME_VERSION");

/// Name of the platform library directory (`lib`, `lib64`, ...).
pub const PLATLIBDIR: &str = env!("RTPATH_PLATLIBDIR");

/// The git SHA emitted by the build script.
///
/// This is expected to be a 7-character hex string when available; otherwise it
/// is set to `"unknown"`.
pub const GIT_SHA_SHORT: &str = env!("VERGEN_GIT_SHA");

/// True if the git SHA looks like a short hex hash.
pub const HAS_GIT_SHA: bool = is_short_hex(GIT_SHA_SHORT);

/// Version string with the commit appended, e.g. `0.3.0 (a1b2c3d)`.
pub const LONG_VERSION_WITH_SHA: &str =
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

/// The version string used by CLI `--version` output.
pub const LONG_VERSION: &str = if HAS_GIT_SHA {
    LONG_VERSION_WITH_SHA
} else {
    SEMVER
};

const fn is_short_hex(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 {
        return false;
    }

    let mut i = 0;
    while i < 7 {
        let c = bytes[i];
        let is_digit = c >= b'0' && c <= b'9';
        let is_lower = c >= b'a' && c <= b'f';
        let is_upper = c >= b'A' && c <= b'F';
        if !(is_digit || is_lower || is_upper) {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_detection() {
        assert!(is_short_hex("a1b2c3d"));
        assert!(!is_short_hex("unknown"));
        assert!(!is_short_hex("a1b2c3"));
    }

    #[test]
    fn layout_constants_are_populated() {
        assert!(!RUNTIME_NAME.is_empty());
        assert!(!RUNTIME_VERSION.is_empty());
        assert!(!PLATLIBDIR.is_empty());
        assert!(!DEFAULT_PREFIX.is_empty());
    }
}
