//! Compiled-in install layout.
//!
//! The defaults a runtime was built with: where it expected to be
//! installed, its default search list, and the name/version pair that
//! versioned library directories are derived from.

use serde::{Deserialize, Serialize};

/// Immutable build-time layout consumed by the path search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConstants {
    /// Configured installation prefix.
    pub prefix: String,
    /// Configured prefix for platform-dependent files.
    pub exec_prefix: String,
    /// Default search list, delimiter-separated.
    pub default_search_path: String,
    /// Offset from the build directory to the source tree.
    pub vpath: String,
    /// Short runtime name (`py`).
    pub runtime_name: String,
    /// `MAJOR.MINOR` runtime version.
    pub runtime_version: String,
    /// Default platform library directory name.
    pub platlibdir: String,
}

impl BuildConstants {
    /// The layout compiled into this build.
    pub fn compiled() -> Self {
        use rtpath_build_info as info;

        Self {
            prefix: info::DEFAULT_PREFIX.to_string(),
            exec_prefix: info::DEFAULT_EXEC_PREFIX.to_string(),
            default_search_path: info::DEFAULT_SEARCH_PATH.to_string(),
            vpath: info::VPATH.to_string(),
            runtime_name: info::RUNTIME_NAME.to_string(),
            runtime_version: info::RUNTIME_VERSION.to_string(),
            platlibdir: info::PLATLIBDIR.to_string(),
        }
    }

    /// Versioned library directory name, e.g. `py3.9`.
    pub fn versioned_dir(&self) -> String {
        format!("{}{}", self.runtime_name, self.runtime_version)
    }

    /// Zip archive file name, e.g. `py39.zip`.
    pub fn zip_name(&self) -> String {
        let digits: String = self
            .runtime_version
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .concat();
        format!("{}{digits}.zip", self.runtime_name)
    }

    /// Program name used when neither an override nor the config sets one.
    pub fn default_program_name(&self) -> String {
        let major = self.runtime_version.split('.').next().unwrap_or_default();
        format!("{}{major}", self.runtime_name)
    }
}

impl Default for BuildConstants {
    fn default() -> Self {
        Self::compiled()
    }
}
