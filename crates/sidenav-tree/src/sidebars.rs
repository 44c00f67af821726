//! Named collection of sidebars for one documentation version.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::NavigationTree;

/// Sidebars of one documentation version, keyed by sidebar id.
///
/// Each tree is validated on its own; a document may appear in several
/// sidebars.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sidebars {
    trees: BTreeMap<String, NavigationTree>,
}

impl Sidebars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tree, replacing any tree with the same name.
    pub fn insert(&mut self, tree: NavigationTree) {
        self.trees.insert(tree.name.clone(), tree);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NavigationTree> {
        self.trees.get(name)
    }

    /// Sidebar ids in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavigationTree> {
        self.trees.values()
    }

    /// First sidebar (by id) that renders the given document.
    #[must_use]
    pub fn sidebar_for_doc(&self, doc_id: &str) -> Option<&NavigationTree> {
        self.trees
            .values()
            .find(|tree| tree.doc_ids().contains(&doc_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl FromIterator<NavigationTree> for Sidebars {
    fn from_iter<I: IntoIterator<Item = NavigationTree>>(iter: I) -> Self {
        let mut sidebars = Self::new();
        for tree in iter {
            sidebars.insert(tree);
        }
        sidebars
    }
}
