//! Sidebar navigation trees for documentation sites.
//!
//! Turns author-facing sidebar specifications (ordered lists of document
//! ids and category objects) into validated, render-ready
//! [`NavigationTree`]s, or reports exactly which nodes are wrong.
//!
//! - [`build`] fails fast on the first blocking error
//! - [`build_batch`] collects every diagnostic alongside a best-effort tree
//! - [`validate`] checks an already constructed tree
//! - [`build_all`] builds every sidebar of a version in parallel
//!
//! Building is pure: no I/O, no shared state. Loading specification files
//! is left to the caller.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sidenav_tree::{BuildOptions, SidebarSpec, build};
//!
//! let spec = SidebarSpec::from_value(json!([
//!     "intro/overview",
//!     {"type": "category", "label": "Guides", "items": ["guides/setup"]},
//! ]))?;
//!
//! let built = build("docs", &spec, &BuildOptions::default())?;
//! let ids: Vec<_> = built.tree.leaf_ids().collect();
//! assert_eq!(ids, vec!["intro/overview", "guides/setup"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod build;
mod error;
mod node;
mod normalize;
mod pagination;
mod path;
mod sidebars;
mod spec;
mod validate;

pub use build::{
    BatchReport, BuildOptions, Built, DEFAULT_MAX_DEPTH, SidebarsReport, build, build_all,
    build_batch,
};
pub use error::{Severity, SpecError, ValidationError};
pub use node::{
    Category, CategoryLink, Leaf, NavNode, NavigationTree, Visit, Walk, is_external_url,
};
pub use pagination::{PageLink, Pagination};
pub use path::{NodePath, PathSegment};
pub use sidebars::Sidebars;
pub use spec::{SidebarSpec, SidebarsSpec};
pub use validate::validate;
