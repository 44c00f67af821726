//! Previous/next navigation and breadcrumbs derived from a sidebar.
//!
//! Pages are visited in render order. A category linking to a document is a
//! page of its own, placed before its children.

use serde::Serialize;

use crate::node::{NavNode, NavigationTree, Visit};
use crate::path::NodePath;

/// Reference to a page reachable from the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink<'a> {
    /// Document id.
    pub id: &'a str,
    /// Sidebar label, when the sidebar provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'a str>,
}

/// Neighbours of a page in render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageLink<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink<'a>>,
}

impl NavigationTree {
    /// Pages in render order with their locations.
    fn pages(&self) -> Vec<(PageLink<'_>, NodePath)> {
        self.iter()
            .filter_map(|Visit { node, path }| match node {
                NavNode::Leaf(leaf) => Some((
                    PageLink {
                        id: leaf.id.as_str(),
                        label: leaf.label.as_deref(),
                    },
                    path,
                )),
                NavNode::Category(category) => category.link_doc().map(|id| {
                    (
                        PageLink {
                            id,
                            label: Some(category.label.as_str()),
                        },
                        path,
                    )
                }),
            })
            .collect()
    }

    /// Previous and next pages around `doc_id`.
    ///
    /// Returns `None` if the document is not in this sidebar. When an id
    /// occurs more than once, the first occurrence is used.
    #[must_use]
    pub fn pagination(&self, doc_id: &str) -> Option<Pagination<'_>> {
        let pages = self.pages();
        let position = pages.iter().position(|(page, _)| page.id == doc_id)?;
        Some(Pagination {
            previous: position
                .checked_sub(1)
                .and_then(|i| pages.get(i))
                .map(|(page, _)| *page),
            next: pages.get(position + 1).map(|(page, _)| *page),
        })
    }

    /// Labels of the categories enclosing `doc_id`, outermost first.
    ///
    /// For a category's own link page the category itself is included.
    /// Returns `None` if the document is not in this sidebar.
    #[must_use]
    pub fn breadcrumbs(&self, doc_id: &str) -> Option<Vec<&str>> {
        let pages = self.pages();
        let (_, path) = pages.iter().find(|(page, _)| page.id == doc_id)?;
        let is_category_page = self
            .node_at(path)
            .is_some_and(|node| node.as_category().is_some());

        let mut labels = Vec::new();
        let mut level: &[NavNode] = &self.items;
        let segments = path.segments();
        let enclosing = if is_category_page {
            segments.len()
        } else {
            segments.len().saturating_sub(1)
        };
        for segment in &segments[..enclosing] {
            let category = level.get(segment.index)?.as_category()?;
            labels.push(category.label.as_str());
            level = &category.items;
        }
        Some(labels)
    }

    /// Node at a path produced by walking this tree.
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> Option<&NavNode> {
        let (last, parents) = path.segments().split_last()?;
        let mut level: &[NavNode] = &self.items;
        for segment in parents {
            level = level.get(segment.index)?.children();
        }
        level.get(last.index)
    }
}
