//! Path-related error types.
//!
//! Every variant is fatal for startup: path configuration either completes
//! or the process stops before any user code runs. Missing landmark or
//! marker files are not errors; they only steer the search.

use thiserror::Error;

/// Errors that can occur while computing the path configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An allocation for a path string failed.
    #[error("out of memory")]
    OutOfMemory,

    /// A computed path would exceed the maximum path length.
    #[error("path too long ({len} > {max} bytes)")]
    PathTooLong { len: usize, max: usize },

    /// Environment or on-disk bytes could not be decoded.
    #[error("unable to decode the {source_name}")]
    Decode { source_name: String },

    /// Following the executable's symlinks exceeded the hop limit.
    #[error("maximum number of symbolic links reached while resolving {path} ({hops} hops)")]
    SymlinkLoop { path: String, hops: usize },
}

impl PathError {
    /// Build a decode error naming where the bytes came from.
    pub fn decode(source_name: impl Into<String>) -> Self {
        Self::Decode {
            source_name: source_name.into(),
        }
    }
}

/// Result type for path configuration operations.
pub type PathResult<T> = Result<T, PathError>;

/// A fatal path error tagged with the step that produced it.
///
/// The CLI prints this as its final diagnostic before exiting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path configuration: {step}: {source}")]
pub struct StepError {
    /// Name of the failing calculation step.
    pub step: &'static str,
    /// The underlying failure.
    #[source]
    pub source: PathError,
}

/// Attach a step name to a path error.
pub(crate) trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, StepError>;
}

impl<T> StepContext<T> for PathResult<T> {
    fn step(self, step: &'static str) -> Result<T, StepError> {
        self.map_err(|source| StepError { step, source })
    }
}
