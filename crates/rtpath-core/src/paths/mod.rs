//! Path configuration for the runtime: where its libraries live.
//!
//! This module provides the whole resolution pipeline:
//! - Bounded path arithmetic (never truncates)
//! - Landmark probes and the env config reader
//! - The resolution engine
//! - `PathConfiguration` with its override and query API
//!
//! # Design
//!
//! - Paths are `String`s using the platform separator; every construction
//!   is length-checked against `MAX_PATH_LEN`
//! - Filesystem and OS facts go through `ports::PlatformPolicy`
//! - OS-specific logic is kept private in `platform`

mod bounded;
mod engine;
mod error;
mod landmarks;
mod layout;
mod pathconfig;
mod platform;
mod venv;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export public API

// Errors
pub use error::{PathError, PathResult, StepError};

// Platform policy implementation
pub use platform::OsPlatform;

// Path arithmetic
pub use bounded::{MAX_PATH_LEN, absolutize, bounded_copy, join, normalize, reduce, reduce_n};

// Landmarks and marker files
pub use landmarks::{is_build_dir, is_dynload_dir, is_module_root, read_build_dir_marker};
pub use venv::{find_env_config_value, read_venv_home};

// Compiled-in layout
pub use layout::BuildConstants;

// Engine
pub use engine::{MAX_SYMLINK_HOPS, SearchOutcome, calculate};

// Resolved configuration
pub use pathconfig::PathConfiguration;
