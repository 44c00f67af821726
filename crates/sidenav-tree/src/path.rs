//! Node locations used in diagnostics.
//!
//! A [`NodePath`] records how to reach a node from the root of a sidebar:
//! the position of each step within its parent's items, plus the category
//! label or leaf id found there. Paths render as
//! `[1] Access Control > [2] EVM > [0] accessControl/EVM/poap`.

use std::fmt;

use serde::Serialize;

/// One step from a parent sequence into one of its entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PathSegment {
    /// Position within the parent's items (zero-based).
    pub index: usize,
    /// Category label or leaf id, when the entry has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Location of a node inside a sidebar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    /// Path of the sidebar root itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the entry at `index` below this one.
    #[must_use]
    pub fn child(&self, index: usize, name: Option<&str>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(PathSegment {
            index,
            name: name.map(str::to_owned),
        });
        Self(segments)
    }

    /// Steps from the root, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Nesting depth. Root-level entries have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `self` is `other` or lies beneath it.
    #[must_use]
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "[{}] {name}", self.index),
            None => write!(f, "[{}]", self.index),
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
