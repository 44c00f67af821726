//! Navigation tree data model.
//!
//! A sidebar is an ordered list of [`NavNode`]s. Leaves point at one content
//! document; categories group further nodes and may themselves link to a page.
//! Item order is render order (top to bottom in the sidebar).
//!
//! Trees are immutable once built. The serialized form is the render-ready
//! shape consumed by the documentation engine:
//!
//! ```json
//! {"type": "category", "label": "Guide", "collapsed": true, "collapsible": true,
//!  "items": [{"type": "doc", "id": "guide/intro"}]}
//! ```

use serde::Serialize;

use crate::path::NodePath;

/// Node of a navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum NavNode {
    /// Link to a single content document.
    #[serde(rename = "doc")]
    Leaf(Leaf),
    /// Ordered group of child nodes.
    #[serde(rename = "category")]
    Category(Category),
}

/// Navigation node pointing at one content document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Leaf {
    /// Document identifier (e.g. "accessControl/EVM/poap").
    pub id: String,
    /// Display label overriding the document title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Extra CSS class for the rendered item.
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Navigation node grouping an ordered list of children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Display label.
    pub label: String,
    /// Initial expand/collapse state.
    pub collapsed: bool,
    /// Whether the reader may toggle expand/collapse.
    pub collapsible: bool,
    /// Page the category itself resolves to when clicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CategoryLink>,
    /// Extra CSS class for the rendered item.
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Child nodes in render order.
    pub items: Vec<NavNode>,
}

/// Target of a category's own link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CategoryLink {
    /// Document in the same tree (or a known document outside it).
    Doc { id: String },
    /// External page.
    Url { href: String },
}

impl Leaf {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            class_name: None,
        }
    }
}

impl Category {
    /// Create a collapsible, initially collapsed category.
    #[must_use]
    pub fn new(label: impl Into<String>, items: Vec<NavNode>) -> Self {
        Self {
            label: label.into(),
            collapsed: true,
            collapsible: true,
            link: None,
            class_name: None,
            items,
        }
    }

    /// Set the initial collapse state.
    #[must_use]
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Set whether the category can be toggled.
    #[must_use]
    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Attach a link target.
    #[must_use]
    pub fn with_link(mut self, link: CategoryLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Document id the category links to, if it links to a document.
    #[must_use]
    pub fn link_doc(&self) -> Option<&str> {
        match &self.link {
            Some(CategoryLink::Doc { id }) => Some(id),
            _ => None,
        }
    }
}

impl CategoryLink {
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self::Doc { id: id.into() }
    }

    #[must_use]
    pub fn url(href: impl Into<String>) -> Self {
        Self::Url { href: href.into() }
    }

    /// The referenced document id or URL.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Doc { id } => id,
            Self::Url { href } => href,
        }
    }
}

impl NavNode {
    /// Shorthand for a leaf without label override.
    #[must_use]
    pub fn leaf(id: impl Into<String>) -> Self {
        Self::Leaf(Leaf::new(id))
    }

    /// Shorthand for a category with default flags.
    #[must_use]
    pub fn category(label: impl Into<String>, items: Vec<NavNode>) -> Self {
        Self::Category(Category::new(label, items))
    }

    /// Leaf id or category label, as shown in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.id,
            Self::Category(category) => &category.label,
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Category(_) => None,
        }
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Self::Category(category) => Some(category),
            Self::Leaf(_) => None,
        }
    }

    /// Child nodes (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[NavNode] {
        match self {
            Self::Category(category) => &category.items,
            Self::Leaf(_) => &[],
        }
    }
}

/// Check whether `href` is a well-formed external URL.
///
/// Accepts `http://` and `https://` URLs with a non-empty host and no
/// whitespace.
#[must_use]
pub fn is_external_url(href: &str) -> bool {
    let Some(rest) = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !href.chars().any(char::is_whitespace)
}

/// One named sidebar: a root sequence of navigation nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationTree {
    /// Sidebar identifier (e.g. "docs").
    pub name: String,
    /// Root nodes in render order.
    pub items: Vec<NavNode>,
}

/// Node visited during a depth-first walk.
#[derive(Clone, Debug)]
pub struct Visit<'a> {
    /// The visited node.
    pub node: &'a NavNode,
    /// Location of the node.
    pub path: NodePath,
}

impl Visit<'_> {
    /// Nesting depth of the node (root items are depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.depth()
    }
}

/// Pre-order depth-first iterator over a tree.
pub struct Walk<'a> {
    stack: Vec<(std::iter::Enumerate<std::slice::Iter<'a, NavNode>>, NodePath)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        loop {
            let (entries, parent) = self.stack.last_mut()?;
            let Some((index, node)) = entries.next() else {
                self.stack.pop();
                continue;
            };
            let path = parent.child(index, Some(node.name()));
            if let NavNode::Category(category) = node {
                self.stack
                    .push((category.items.iter().enumerate(), path.clone()));
            }
            return Some(Visit { node, path });
        }
    }
}

impl NavigationTree {
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<NavNode>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Walk every node in render order (parents before children).
    #[must_use]
    pub fn iter(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self.items.iter().enumerate(), NodePath::root())],
        }
    }

    /// Leaf ids in render order.
    pub fn leaf_ids(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter_map(|visit| visit.node.as_leaf().map(|leaf| leaf.id.as_str()))
    }

    /// Ids of every page reachable from the sidebar, in render order.
    ///
    /// A category that links to a document contributes that document
    /// before its children.
    #[must_use]
    pub fn doc_ids(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|visit| match visit.node {
                NavNode::Leaf(leaf) => Some(leaf.id.as_str()),
                NavNode::Category(category) => category.link_doc(),
            })
            .collect()
    }

    /// First leaf with the given id.
    #[must_use]
    pub fn find_leaf(&self, id: &str) -> Option<Visit<'_>> {
        self.iter()
            .find(|visit| visit.node.as_leaf().is_some_and(|leaf| leaf.id == id))
    }

    /// Depth of the deepest node (0 for an empty tree).
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.iter().map(|visit| visit.depth()).max().unwrap_or(0)
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a NavigationTree {
    type Item = Visit<'a>;
    type IntoIter = Walk<'a>;

    fn into_iter(self) -> Walk<'a> {
        self.iter()
    }
}
