//! Sidebar construction.
//!
//! Two modes are offered:
//!
//! - [`build`] fails fast: it returns the tree only when no blocking error
//!   exists, otherwise the first error in report order.
//! - [`build_batch`] reports everything and hands back a best-effort tree
//!   (malformed entries dropped) so the caller can decide what to do with it.
//!
//! Both are pure: building the same specification twice yields equal trees.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;

use crate::error::ValidationError;
use crate::node::NavigationTree;
use crate::normalize::Normalizer;
use crate::sidebars::Sidebars;
use crate::spec::{SidebarSpec, SidebarsSpec};
use crate::validate::validate;

/// Maximum nesting depth observed in practice by the rendering engine.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Options shared by building and validation.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Depth beyond which [`ValidationError::ExcessiveDepth`] is reported.
    pub max_depth: usize,
    /// `collapsed` value for categories that do not set it.
    pub default_collapsed: bool,
    /// `collapsible` value for categories that do not set it.
    pub default_collapsible: bool,
    /// Documents that exist outside the tree and may be linked from categories.
    pub known_documents: HashSet<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_collapsed: true,
            default_collapsible: true,
            known_documents: HashSet::new(),
        }
    }
}

/// Successfully built sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Built {
    pub tree: NavigationTree,
    /// Non-blocking diagnostics (depth, ineffective collapse).
    pub warnings: Vec<ValidationError>,
}

/// Outcome of a batch build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// Best-effort tree. Only trustworthy when [`BatchReport::is_ok`].
    pub tree: NavigationTree,
    /// Blocking diagnostics in report order.
    pub errors: Vec<ValidationError>,
    /// Non-blocking diagnostics in report order.
    pub warnings: Vec<ValidationError>,
}

impl BatchReport {
    /// Whether the tree has no blocking errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into the fail-fast result.
    ///
    /// # Errors
    ///
    /// Returns the first blocking error if any exist.
    pub fn into_result(self) -> Result<Built, ValidationError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(Built {
                tree: self.tree,
                warnings: self.warnings,
            }),
        }
    }
}

/// Build a sidebar, stopping at the first blocking error.
///
/// # Errors
///
/// Returns the first [`ValidationError`] that is not a warning. No partial
/// tree is returned in that case.
pub fn build(
    name: &str,
    spec: &SidebarSpec,
    options: &BuildOptions,
) -> Result<Built, ValidationError> {
    let normalized = Normalizer::new(options, true).run(spec.items());
    if let Some(first) = normalized.malformed.into_iter().next() {
        return Err(first);
    }

    let tree = NavigationTree::new(name, normalized.items);
    let (errors, warnings): (Vec<_>, Vec<_>) = validate(&tree, options)
        .into_iter()
        .map(|d| d.map_paths(|path| normalized.sources.to_input(path)))
        .partition(|diagnostic| !diagnostic.is_warning());
    BatchReport {
        tree,
        errors,
        warnings,
    }
    .into_result()
}

/// Build a sidebar, collecting every diagnostic.
#[must_use]
pub fn build_batch(name: &str, spec: &SidebarSpec, options: &BuildOptions) -> BatchReport {
    let normalized = Normalizer::new(options, false).run(spec.items());
    let tree = NavigationTree::new(name, normalized.items);

    let mut errors = normalized.malformed;
    let mut warnings = Vec::new();
    for diagnostic in validate(&tree, options) {
        // Report positions as written, not as left after pruning.
        match diagnostic.map_paths(|path| normalized.sources.to_input(path)) {
            // Already explained by the malformed entries inside it.
            ValidationError::EmptyCategory { ref path } if normalized.pruned.contains(path) => {}
            d if d.is_warning() => warnings.push(d),
            d => errors.push(d),
        }
    }

    tracing::debug!(
        sidebar = name,
        nodes = tree.node_count(),
        errors = errors.len(),
        warnings = warnings.len(),
        "Built sidebar"
    );

    BatchReport {
        tree,
        errors,
        warnings,
    }
}

/// Batch reports for every sidebar of one version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarsReport {
    reports: BTreeMap<String, BatchReport>,
}

impl SidebarsReport {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BatchReport> {
        self.reports.get(name)
    }

    /// Reports ordered by sidebar id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BatchReport)> {
        self.reports
            .iter()
            .map(|(name, report)| (name.as_str(), report))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut BatchReport)> {
        self.reports
            .iter_mut()
            .map(|(name, report)| (name.as_str(), report))
    }

    /// Whether no sidebar has blocking errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.reports.values().all(BatchReport::is_ok)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.reports.values().map(|r| r.errors.len()).sum()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.reports.values().map(|r| r.warnings.len()).sum()
    }

    /// Keep the best-effort trees, dropping diagnostics.
    #[must_use]
    pub fn into_sidebars(self) -> Sidebars {
        self.reports
            .into_values()
            .map(|report| report.tree)
            .collect()
    }
}

/// Batch-build every sidebar of a specification in parallel.
///
/// Sidebars are independent; each is built on the global rayon pool.
#[must_use]
pub fn build_all(specs: &SidebarsSpec, options: &BuildOptions) -> SidebarsReport {
    let entries: Vec<_> = specs.iter().collect();
    let reports = entries
        .par_iter()
        .map(|(name, spec)| ((*name).to_owned(), build_batch(name, spec, options)))
        .collect();
    SidebarsReport { reports }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Category, CategoryLink, NavNode};
    use crate::path::NodePath;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> SidebarSpec {
        SidebarSpec::from_value(value).unwrap()
    }

    #[test]
    fn test_build_preserves_leaf_order() {
        let built = build("docs", &spec(json!(["a", "b", "c"])), &BuildOptions::default()).unwrap();

        assert_eq!(
            built.tree.items,
            vec![NavNode::leaf("a"), NavNode::leaf("b"), NavNode::leaf("c")]
        );
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_in_different_categories_fails_batch_once() {
        let report = build_batch(
            "docs",
            &spec(json!([
                {"type": "category", "label": "G", "items": ["x"]},
                {"type": "category", "label": "H", "items": ["x"]},
            ])),
            &BuildOptions::default(),
        );

        assert!(!report.is_ok());
        assert_eq!(
            report.errors,
            vec![ValidationError::DuplicateLeafId {
                id: "x".to_owned(),
                locations: vec![
                    NodePath::root().child(0, Some("G")).child(0, Some("x")),
                    NodePath::root().child(1, Some("H")).child(0, Some("x")),
                ],
            }]
        );
    }

    #[test]
    fn test_duplicate_fails_fast_build() {
        let err = build("docs", &spec(json!(["x", "x"])), &BuildOptions::default()).unwrap_err();

        assert!(matches!(err, ValidationError::DuplicateLeafId { ref id, .. } if id == "x"));
    }

    #[test]
    fn test_empty_category_rejected_at_any_depth() {
        for depth in 1..=4 {
            let mut value = json!({"type": "category", "label": "E", "children": []});
            for level in 0..depth - 1 {
                value = json!({"type": "category", "label": format!("L{level}"), "items": [value]});
            }

            let err = build("docs", &spec(json!([value])), &BuildOptions::default()).unwrap_err();

            assert!(
                matches!(err, ValidationError::EmptyCategory { ref path } if path.depth() == depth),
                "depth {depth}: {err:?}"
            );
        }
    }

    #[test]
    fn test_dangling_link_fails() {
        let err = build(
            "docs",
            &spec(json!([
                {"type": "category", "label": "Auth", "link": {"type": "doc", "id": "nonexistent/path"}, "items": ["auth/sig"]},
            ])),
            &BuildOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::DanglingLinkTarget {
                category: NodePath::root().child(0, Some("Auth")),
                target: "nonexistent/path".to_owned(),
            }
        );
    }

    #[test]
    fn test_forward_link_reference_succeeds() {
        let built = build(
            "docs",
            &spec(json!([
                {"type": "category", "label": "Intro", "link": {"type": "doc", "id": "guide/overview"}, "items": ["intro"]},
                {"type": "category", "label": "Guide", "items": ["guide/overview"]},
            ])),
            &BuildOptions::default(),
        )
        .unwrap();

        assert_eq!(
            built.tree.items[0],
            NavNode::Category(
                Category::new("Intro", vec![NavNode::leaf("intro")])
                    .with_link(CategoryLink::doc("guide/overview"))
            )
        );
    }

    #[test]
    fn test_nested_order_preserved_in_traversal() {
        let built = build(
            "docs",
            &spec(json!([
                {"type": "category", "label": "G", "items": [
                    "a",
                    {"type": "category", "label": "H", "items": ["b"]},
                    "c",
                ]},
            ])),
            &BuildOptions::default(),
        )
        .unwrap();

        assert_eq!(built.tree.leaf_ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let spec = spec(json!([
            "intro",
            {"type": "category", "label": "G", "collapsible": false, "items": ["a", {"H": ["b"]}]},
        ]));

        let first = build("docs", &spec, &BuildOptions::default()).unwrap();
        let second = build("docs", &spec, &BuildOptions::default()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_entry_blocks_fail_fast_build() {
        let err = build("docs", &spec(json!(["a", 7, "a"])), &BuildOptions::default()).unwrap_err();

        assert!(matches!(err, ValidationError::MalformedEntry { ref path, .. } if path.to_string() == "[1]"));
    }

    #[test]
    fn test_batch_returns_best_effort_tree_with_all_errors() {
        let report = build_batch(
            "docs",
            &spec(json!([
                "a",
                7,
                {"type": "category", "label": "E", "items": []},
                "a",
            ])),
            &BuildOptions::default(),
        );

        assert_eq!(report.errors.len(), 3);
        assert!(matches!(report.errors[0], ValidationError::MalformedEntry { .. }));
        assert!(matches!(report.errors[1], ValidationError::EmptyCategory { .. }));
        assert!(matches!(report.errors[2], ValidationError::DuplicateLeafId { .. }));
        assert_eq!(report.tree.items.len(), 3);
    }

    #[test]
    fn test_batch_paths_point_at_input_positions_after_malformed_sibling() {
        let report = build_batch("docs", &spec(json!([7, "a", "a"])), &BuildOptions::default());

        let messages: Vec<_> = report.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "malformed entry at [0]: expected a document id or an object, found a number",
                "duplicate leaf id `a` at [1] a; [2] a",
            ]
        );
    }

    #[test]
    fn test_batch_nested_paths_skip_malformed_entries() {
        let report = build_batch(
            "docs",
            &spec(json!([
                null,
                {"type": "category", "label": "G", "items": [
                    1,
                    {"type": "category", "label": "E", "items": []},
                    {"type": "category", "label": "L", "link": "missing", "items": ["x"]},
                ]},
            ])),
            &BuildOptions::default(),
        );

        let messages: Vec<_> = report.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "malformed entry at [0]: expected a document id or an object, found null",
                "malformed entry at [1] G > [0]: expected a document id or an object, found a number",
                "empty category at [1] G > [1] E",
                "category at [1] G > [2] L links to unknown target `missing`",
            ]
        );
    }

    #[test]
    fn test_batch_suppresses_pruned_category_after_malformed_sibling() {
        let report = build_batch("docs", &spec(json!([{"G": [1, {"H": [2]}]}])), &BuildOptions::default());

        let messages: Vec<_> = report.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "malformed entry at [0] G > [0]: expected a document id or an object, found a number",
                "malformed entry at [0] G > [1] H > [0]: expected a document id or an object, found a number",
            ]
        );
    }

    #[test]
    fn test_batch_does_not_report_category_emptied_by_malformed_items() {
        let report = build_batch(
            "docs",
            &spec(json!([{"type": "category", "label": "G", "items": [false]}])),
            &BuildOptions::default(),
        );

        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], ValidationError::MalformedEntry { .. }));
    }

    #[test]
    fn test_warnings_accompany_valid_tree() {
        let options = BuildOptions {
            max_depth: 1,
            ..BuildOptions::default()
        };

        let built = build(
            "docs",
            &spec(json!([{"type": "category", "label": "G", "items": ["a"]}])),
            &options,
        )
        .unwrap();

        assert_eq!(built.warnings.len(), 1);
        assert!(matches!(built.warnings[0], ValidationError::ExcessiveDepth { depth: 2, max_depth: 1, .. }));
    }

    #[test]
    fn test_build_all_reports_each_sidebar() {
        let specs = SidebarsSpec::from_json_str(
            r#"{"docs": ["a", "b"], "api": ["x", "x"], "lab": [{"type": "category", "label": "E", "items": []}]}"#,
        )
        .unwrap();

        let report = build_all(&specs, &BuildOptions::default());

        assert!(!report.is_ok());
        assert_eq!(report.error_count(), 2);
        assert!(report.get("docs").unwrap().is_ok());
        assert!(!report.get("api").unwrap().is_ok());
        let sidebars = report.into_sidebars();
        assert_eq!(sidebars.names().collect::<Vec<_>>(), vec!["api", "docs", "lab"]);
    }

    #[test]
    fn test_same_id_in_two_sidebars_is_not_duplicate() {
        let specs = SidebarsSpec::from_json_str(r#"{"docs": ["a"], "api": ["a"]}"#).unwrap();

        let report = build_all(&specs, &BuildOptions::default());

        assert!(report.is_ok());
    }
}
