//! Reading sidebar specification files.

use std::fs;
use std::path::Path;

use sidenav_tree::{SidebarsSpec, SpecError};

use crate::error::LoadError;

/// Read a sidebars file, choosing the parser by extension.
///
/// Supported extensions: `json`, `yaml`, `yml`, `toml`.
pub fn read_sidebars_file(path: &Path) -> Result<SidebarsSpec, LoadError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    let parse: fn(&str) -> Result<SidebarsSpec, SpecError> = match extension.as_deref() {
        Some("json") => SidebarsSpec::from_json_str,
        Some("yaml" | "yml") => SidebarsSpec::from_yaml_str,
        Some("toml") => SidebarsSpec::from_toml_str,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&content).map_err(|source| LoadError::Spec {
        path: path.to_path_buf(),
        source,
    })
}
