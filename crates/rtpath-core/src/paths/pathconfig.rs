//! The resolved path configuration and its override/query API.
//!
//! A [`PathConfiguration`] starts all-unset. Callers may preset fields
//! through the setters before initialization; [`PathConfiguration::initialize`]
//! then fills what is left from the process configuration and, if needed,
//! from the engine. Once initialized it is only read.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::engine;
use super::error::StepError;
use super::layout::BuildConstants;
use crate::config::RuntimeConfig;
use crate::ports::PlatformPolicy;

/// Where the runtime's support files live, as seen by this process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathConfiguration {
    pub(crate) program_full_path: Option<String>,
    pub(crate) program_name: Option<String>,
    pub(crate) home: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) exec_prefix: Option<String>,
    pub(crate) stdlib_dir: Option<String>,
    pub(crate) module_search_path: Option<Vec<String>>,
}

impl PathConfiguration {
    /// An all-unset configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field to unset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Set the module search path directly, bypassing computation.
    ///
    /// `Some(path)` stores the `delimiter`-split list, sets both prefixes
    /// to the empty string and the stdlib directory to the home override
    /// (or empty). `None` clears the whole configuration.
    pub fn set_module_search_path(&mut self, path: Option<&str>, delimiter: char) {
        let Some(path) = path else {
            self.clear();
            return;
        };

        self.module_search_path = Some(path.split(delimiter).map(str::to_string).collect());
        self.prefix = Some(String::new());
        self.exec_prefix = Some(String::new());
        self.stdlib_dir = Some(self.home.clone().unwrap_or_default());
    }

    /// Set the library root override. No-op on `None` or empty.
    pub fn set_home(&mut self, home: Option<&str>) {
        if let Some(home) = home.filter(|h| !h.is_empty()) {
            self.home = Some(home.to_string());
        }
    }

    /// Set the program name used to find the executable. No-op on `None` or empty.
    pub fn set_program_name(&mut self, name: Option<&str>) {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.program_name = Some(name.to_string());
        }
    }

    /// Set the executable's full path. No-op on `None` or empty.
    pub fn set_program_full_path(&mut self, path: Option<&str>) {
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            self.program_full_path = Some(path.to_string());
        }
    }

    /// Compute a fresh configuration.
    ///
    /// Resolution order for each field:
    /// 1. Value preset in `overrides` (highest priority)
    /// 2. The matching field of `config`
    /// 3. The engine's computed value
    ///
    /// The engine only runs when the search path, executable, prefix or
    /// exec prefix is still unset.
    pub fn initialize<P>(
        overrides: &Self,
        config: &RuntimeConfig,
        platform: &P,
        constants: &BuildConstants,
    ) -> Result<Self, StepError>
    where
        P: PlatformPolicy + ?Sized,
    {
        let mut paths = overrides.clone();
        paths.fill_from_config(config);

        if paths.needs_calculation() {
            paths = engine::calculate(platform, constants, config, &paths)?;
        } else {
            tracing::debug!("path configuration fully preset, skipping calculation");
        }

        if paths.program_name.is_none() {
            paths.program_name = Some(constants.default_program_name());
        }
        Ok(paths)
    }

    fn fill_from_config(&mut self, config: &RuntimeConfig) {
        fn fill<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
            if slot.is_none() {
                *slot = value.cloned();
            }
        }

        fill(&mut self.module_search_path, config.module_search_paths.as_ref());
        fill(&mut self.program_full_path, config.executable.as_ref());
        fill(&mut self.program_name, config.program_name.as_ref());
        fill(&mut self.home, config.home.as_ref());
        fill(&mut self.prefix, config.prefix.as_ref());
        fill(&mut self.exec_prefix, config.exec_prefix.as_ref());
        fill(&mut self.stdlib_dir, config.stdlib_dir.as_ref());
    }

    const fn needs_calculation(&self) -> bool {
        self.module_search_path.is_none()
            || self.program_full_path.is_none()
            || self.prefix.is_none()
            || self.exec_prefix.is_none()
    }

    /// Ordered module search path, if set.
    pub fn module_search_path(&self) -> Option<&[String]> {
        self.module_search_path.as_deref()
    }

    /// Module search path joined with `delimiter`.
    pub fn module_search_path_string(&self, delimiter: char) -> Option<String> {
        self.module_search_path
            .as_ref()
            .map(|entries| entries.join(&delimiter.to_string()))
    }

    /// Installation prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Platform-dependent installation prefix.
    pub fn exec_prefix(&self) -> Option<&str> {
        self.exec_prefix.as_deref()
    }

    /// Standard library directory; `None` when unset or empty.
    pub fn stdlib_dir(&self) -> Option<&str> {
        self.stdlib_dir.as_deref().filter(|dir| !dir.is_empty())
    }

    /// Absolute path of the executable, or empty when it could not be found.
    pub fn program_full_path(&self) -> Option<&str> {
        self.program_full_path.as_deref()
    }

    /// Library root override.
    pub fn home(&self) -> Option<&str> {
        self.home.as_deref()
    }

    /// Program name as given by the caller.
    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    /// Every field as a key/value map for diagnostics; `None` marks unset.
    pub fn to_map(&self, delimiter: char) -> BTreeMap<&'static str, Option<String>> {
        BTreeMap::from([
            ("program_full_path", self.program_full_path.clone()),
            ("program_name", self.program_name.clone()),
            ("home", self.home.clone()),
            ("prefix", self.prefix.clone()),
            ("exec_prefix", self.exec_prefix.clone()),
            ("stdlib_dir", self.stdlib_dir.clone()),
            (
                "module_search_path",
                self.module_search_path_string(delimiter),
            ),
        ])
    }
}

impl fmt::Display for PathConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(value: Option<&str>) -> &str {
            value.unwrap_or("<unset>")
        }

        writeln!(f, "program_name = {}", show(self.program_name()))?;
        writeln!(f, "program_full_path = {}", show(self.program_full_path()))?;
        writeln!(f, "home = {}", show(self.home()))?;
        writeln!(f, "prefix = {}", show(self.prefix()))?;
        writeln!(f, "exec_prefix = {}", show(self.exec_prefix()))?;
        writeln!(f, "stdlib_dir = {}", show(self.stdlib_dir()))?;
        match self.module_search_path() {
            Some(entries) => write!(f, "module_search_path = [{}]", entries.join(", ")),
            None => write!(f, "module_search_path = <unset>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::OsPlatform;
    use crate::paths::test_utils::test_constants;

    #[test]
    fn set_module_search_path_resets_prefixes() {
        let mut paths = PathConfiguration::new();
        paths.set_home(Some("/opt/home"));
        paths.set_module_search_path(Some("/a:/b::/c"), ':');

        assert_eq!(
            paths.module_search_path(),
            Some(&["/a", "/b", "", "/c"].map(String::from)[..])
        );
        assert_eq!(paths.prefix(), Some(""));
        assert_eq!(paths.exec_prefix(), Some(""));
        assert_eq!(paths.stdlib_dir(), Some("/opt/home"));
    }

    #[test]
    fn clearing_search_path_clears_everything() {
        let mut paths = PathConfiguration::new();
        paths.set_program_name(Some("py"));
        paths.set_module_search_path(Some("/a"), ':');
        paths.set_module_search_path(None, ':');
        assert_eq!(paths, PathConfiguration::new());
    }

    #[test]
    fn setters_ignore_missing_values() {
        let mut paths = PathConfiguration::new();
        paths.set_home(Some("/h"));
        paths.set_home(None);
        paths.set_program_name(Some(""));
        paths.set_program_full_path(None);

        assert_eq!(paths.home(), Some("/h"));
        assert_eq!(paths.program_name(), None);
        assert_eq!(paths.program_full_path(), None);
    }

    #[test]
    fn empty_stdlib_dir_reads_as_unset() {
        let mut paths = PathConfiguration::new();
        paths.set_module_search_path(Some("/a"), ':');
        assert_eq!(paths.stdlib_dir(), None);
    }

    #[test]
    fn fully_preset_configuration_skips_the_engine() {
        let mut overrides = PathConfiguration::new();
        overrides.set_module_search_path(Some("/only"), ':');
        overrides.set_program_full_path(Some("/bin/py"));

        let paths = PathConfiguration::initialize(
            &overrides,
            &RuntimeConfig::new(),
            &OsPlatform::new(),
            &test_constants(),
        )
        .unwrap();

        assert_eq!(paths.module_search_path_string(':').as_deref(), Some("/only"));
        assert_eq!(paths.program_full_path(), Some("/bin/py"));
        assert_eq!(paths.program_name(), Some("py3"));
    }

    #[test]
    fn overrides_beat_config_values() {
        let mut overrides = PathConfiguration::new();
        overrides.set_module_search_path(Some("/from-override"), ':');
        overrides.set_program_full_path(Some("/bin/py"));

        let config = RuntimeConfig {
            module_search_paths: Some(vec!["/from-config".to_string()]),
            program_name: Some("custom".to_string()),
            ..RuntimeConfig::new()
        };
        let paths =
            PathConfiguration::initialize(&overrides, &config, &OsPlatform::new(), &test_constants())
                .unwrap();

        assert_eq!(paths.module_search_path(), Some(&["/from-override".to_string()][..]));
        assert_eq!(paths.program_name(), Some("custom"));
    }

    #[test]
    fn display_and_map_cover_every_field() {
        let mut paths = PathConfiguration::new();
        paths.set_module_search_path(Some("/a:/b"), ':');

        let output = paths.to_string();
        assert!(output.contains("prefix = \n"));
        assert!(output.contains("home = <unset>"));
        assert!(output.ends_with("module_search_path = [/a, /b]"));

        let map = paths.to_map(':');
        assert_eq!(map.len(), 7);
        assert_eq!(map["module_search_path"].as_deref(), Some("/a:/b"));
        assert_eq!(map["home"], None);
    }

    #[test]
    fn serializes_unset_fields_as_null() {
        let mut paths = PathConfiguration::new();
        paths.set_home(Some("/h"));
        let json = serde_json::to_value(&paths).unwrap();
        assert_eq!(json["home"], "/h");
        assert!(json["prefix"].is_null());
    }
}
