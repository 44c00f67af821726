//! Error types for site loading.

use std::path::PathBuf;

use sidenav_tree::SpecError;

/// Failure to load the sidebars of a version.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Sidebars file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Sidebars file could not be parsed.
    #[error("invalid sidebars file {}: {source}", path.display())]
    Spec { path: PathBuf, source: SpecError },
    /// Sidebars file extension is not json, yaml, yml or toml.
    #[error("unsupported sidebars file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// Exclude pattern is not a valid glob.
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}
