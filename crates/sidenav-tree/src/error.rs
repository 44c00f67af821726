//! Diagnostics produced while building and validating sidebars.

use std::fmt;

use serde::Serialize;

use crate::path::NodePath;

/// How a diagnostic affects the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Accompanies a valid tree.
    Warning,
    /// Blocks the tree in fail-fast mode.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Problem found in a sidebar specification or tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind")]
pub enum ValidationError {
    /// Two or more leaves share an id.
    #[error("duplicate leaf id `{id}` at {}", join_paths(.locations))]
    DuplicateLeafId {
        /// The repeated id.
        id: String,
        /// Every location of the id, in render order.
        locations: Vec<NodePath>,
    },
    /// A category has no items.
    #[error("empty category at {path}")]
    EmptyCategory { path: NodePath },
    /// A category links to a document that is not in the tree.
    #[error("category at {category} links to unknown target `{target}`")]
    DanglingLinkTarget {
        /// Location of the linking category.
        category: NodePath,
        /// The unresolved document id or URL.
        target: String,
    },
    /// An entry is neither a document id nor a well-formed object.
    #[error("malformed entry at {path}: {reason}")]
    MalformedEntry { path: NodePath, reason: String },
    /// A node is nested deeper than the configured maximum.
    #[error("node at {path} is nested {depth} levels deep (maximum {max_depth})")]
    ExcessiveDepth {
        path: NodePath,
        depth: usize,
        max_depth: usize,
    },
    /// `collapsed: true` on a category that cannot be toggled.
    #[error("category at {path} is collapsed but not collapsible")]
    IneffectiveCollapsed { path: NodePath },
}

impl ValidationError {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::ExcessiveDepth { .. } | Self::IneffectiveCollapsed { .. } => Severity::Warning,
            Self::DuplicateLeafId { .. }
            | Self::EmptyCategory { .. }
            | Self::DanglingLinkTarget { .. }
            | Self::MalformedEntry { .. } => Severity::Error,
        }
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }

    /// Primary location of the problem.
    ///
    /// For duplicates this is the first occurrence.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        match self {
            Self::DuplicateLeafId { locations, .. } => match locations.first() {
                Some(first) => first,
                None => root_path(),
            },
            Self::EmptyCategory { path }
            | Self::MalformedEntry { path, .. }
            | Self::ExcessiveDepth { path, .. }
            | Self::IneffectiveCollapsed { path } => path,
            Self::DanglingLinkTarget { category, .. } => category,
        }
    }
}

impl ValidationError {
    /// Rewrite every location carried by the diagnostic.
    pub(crate) fn map_paths(self, f: impl Fn(&NodePath) -> NodePath) -> Self {
        match self {
            Self::DuplicateLeafId { id, locations } => Self::DuplicateLeafId {
                id,
                locations: locations.iter().map(&f).collect(),
            },
            Self::EmptyCategory { path } => Self::EmptyCategory { path: f(&path) },
            Self::DanglingLinkTarget { category, target } => Self::DanglingLinkTarget {
                category: f(&category),
                target,
            },
            Self::MalformedEntry { path, reason } => Self::MalformedEntry {
                path: f(&path),
                reason,
            },
            Self::ExcessiveDepth {
                path,
                depth,
                max_depth,
            } => Self::ExcessiveDepth {
                path: f(&path),
                depth,
                max_depth,
            },
            Self::IneffectiveCollapsed { path } => Self::IneffectiveCollapsed { path: f(&path) },
        }
    }
}

fn root_path() -> &'static NodePath {
    static ROOT: NodePath = NodePath::root();
    &ROOT
}

fn join_paths(paths: &[NodePath]) -> String {
    paths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error raised when a sidebar specification cannot be parsed at all.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Invalid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid YAML.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Invalid TOML.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Parsed, but not shaped like a sidebar specification.
    #[error("invalid sidebar specification: {0}")]
    Shape(String),
}
