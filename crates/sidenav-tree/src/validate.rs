//! Two-pass validation of navigation trees.
//!
//! Pass 1 walks the tree depth-first, recording every leaf id with all of its
//! locations and reporting structural problems as they are met. Pass 2
//! resolves category links against the complete id set, so a category may
//! link to a document declared later in render order.

use std::collections::{HashMap, HashSet};

use crate::build::BuildOptions;
use crate::error::ValidationError;
use crate::node::{CategoryLink, NavNode, NavigationTree, is_external_url};
use crate::path::NodePath;

/// Collect every problem in `tree`.
///
/// Never stops early: all duplicate ids, empty categories, dangling links
/// and depth warnings are reported together. Diagnostics are ordered as
/// structural findings in render order, then duplicates (by first
/// occurrence), then dangling links.
#[must_use]
pub fn validate(tree: &NavigationTree, options: &BuildOptions) -> Vec<ValidationError> {
    let mut diagnostics = Vec::new();
    let mut locations: HashMap<&str, Vec<NodePath>> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    let mut links: Vec<(NodePath, &CategoryLink)> = Vec::new();

    for visit in tree {
        if visit.depth().checked_sub(1) == Some(options.max_depth) {
            diagnostics.push(ValidationError::ExcessiveDepth {
                path: visit.path.clone(),
                depth: visit.depth(),
                max_depth: options.max_depth,
            });
        }

        match visit.node {
            NavNode::Leaf(leaf) => {
                let seen = locations.entry(leaf.id.as_str()).or_default();
                if seen.is_empty() {
                    first_seen.push(&leaf.id);
                }
                seen.push(visit.path);
            }
            NavNode::Category(category) => {
                if category.items.is_empty() {
                    diagnostics.push(ValidationError::EmptyCategory {
                        path: visit.path.clone(),
                    });
                }
                if category.collapsed && !category.collapsible {
                    diagnostics.push(ValidationError::IneffectiveCollapsed {
                        path: visit.path.clone(),
                    });
                }
                if let Some(link) = &category.link {
                    links.push((visit.path, link));
                }
            }
        }
    }

    for id in &first_seen {
        if let Some(paths) = locations.get(id)
            && paths.len() > 1
        {
            diagnostics.push(ValidationError::DuplicateLeafId {
                id: (*id).to_owned(),
                locations: paths.clone(),
            });
        }
    }

    let ids: HashSet<&str> = first_seen.into_iter().collect();
    for (category, link) in links {
        let resolved = match link {
            CategoryLink::Doc { id } => {
                ids.contains(id.as_str()) || options.known_documents.contains(id)
            }
            CategoryLink::Url { href } => is_external_url(href),
        };
        if !resolved {
            diagnostics.push(ValidationError::DanglingLinkTarget {
                category,
                target: link.target().to_owned(),
            });
        }
    }

    tracing::trace!(
        sidebar = %tree.name,
        diagnostics = diagnostics.len(),
        "Validated sidebar"
    );

    diagnostics
}
