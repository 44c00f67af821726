//! Loading every sidebar of a site.
//!
//! For each configured version and instance the loader reads the sidebars
//! file, scans the docs directory, batch-builds every sidebar and checks leaf
//! ids against the scanned documents. Doc sets are loaded in parallel.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rayon::prelude::*;
use sidenav_config::{BrokenLinkPolicy, Config, InstanceConfig, VersionConfig};
use sidenav_tree::{
    BuildOptions, NavNode, NavigationTree, NodePath, Severity, Sidebars, ValidationError,
    build_all,
};

use crate::doc_index::DocIndex;
use crate::error::LoadError;
use crate::sidebars_file::read_sidebars_file;

/// Problem found in one sidebar of a loaded doc set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    /// Tree diagnostic from building the sidebar.
    #[error(transparent)]
    Tree(#[from] ValidationError),
    /// A leaf refers to a document missing from the docs directory.
    #[error("unknown document `{id}` at {path}")]
    UnknownDocument { id: String, path: NodePath },
}

/// A problem together with the sidebar it was found in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Sidebar id.
    pub sidebar: String,
    pub severity: Severity,
    pub problem: Problem,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sidebar, self.problem)
    }
}

/// A doc set of the site: a version of the main docs or a separate instance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocSet {
    Version(String),
    Instance(String),
}

impl DocSet {
    /// Version name or instance id.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Version(name) | Self::Instance(name) => name,
        }
    }
}

impl fmt::Display for DocSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(name) => write!(f, "version {name}"),
            Self::Instance(id) => write!(f, "instance {id}"),
        }
    }
}

/// Sidebars of one doc set with their diagnostics.
#[derive(Clone, Debug)]
pub struct DocSetNavigation {
    pub set: DocSet,
    /// Best-effort trees, keyed by sidebar id.
    pub sidebars: Sidebars,
    /// Diagnostics ordered by sidebar id, then report order.
    pub diagnostics: Vec<Diagnostic>,
    /// Documents found in the doc set's docs directory.
    pub documents: DocIndex,
}

impl DocSetNavigation {
    /// Whether no sidebar of this doc set has blocking problems.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    #[must_use]
    pub fn sidebar(&self, id: &str) -> Option<&NavigationTree> {
        self.sidebars.get(id)
    }
}

/// Result of loading a site: one entry per version and instance.
#[derive(Debug, Default)]
pub struct SiteNavigation {
    sets: BTreeMap<DocSet, DocSetNavigation>,
    failures: BTreeMap<DocSet, LoadError>,
}

impl SiteNavigation {
    #[must_use]
    pub fn get(&self, set: &DocSet) -> Option<&DocSetNavigation> {
        self.sets.get(set)
    }

    #[must_use]
    pub fn version(&self, name: &str) -> Option<&DocSetNavigation> {
        self.get(&DocSet::Version(name.to_owned()))
    }

    #[must_use]
    pub fn instance(&self, id: &str) -> Option<&DocSetNavigation> {
        self.get(&DocSet::Instance(id.to_owned()))
    }

    /// Loaded doc sets: versions by name, then instances by id.
    pub fn iter(&self) -> impl Iterator<Item = &DocSetNavigation> {
        self.sets.values()
    }

    /// Doc sets whose sidebars could not be loaded.
    pub fn failures(&self) -> impl Iterator<Item = (&DocSet, &LoadError)> {
        self.failures.iter()
    }

    /// Sidebar `id` of a version.
    #[must_use]
    pub fn sidebar(&self, version: &str, id: &str) -> Option<&NavigationTree> {
        self.version(version)?.sidebar(id)
    }

    /// Sidebar of `version` that renders `doc_id`.
    #[must_use]
    pub fn sidebar_for_doc(&self, version: &str, doc_id: &str) -> Option<&NavigationTree> {
        self.version(version)?.sidebars.sidebar_for_doc(doc_id)
    }

    /// Whether every doc set loaded and none has blocking problems.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty() && self.sets.values().all(DocSetNavigation::is_ok)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.failures.len()
            + self
                .sets
                .values()
                .map(|s| s.errors().count())
                .sum::<usize>()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.sets.values().map(|s| s.warnings().count()).sum()
    }
}

/// Files of one doc set.
struct Source<'c> {
    set: DocSet,
    sidebars_path: &'c Path,
    source_dir: &'c Path,
}

impl<'c> From<&'c VersionConfig> for Source<'c> {
    fn from(version: &'c VersionConfig) -> Self {
        Self {
            set: DocSet::Version(version.name.clone()),
            sidebars_path: &version.sidebars_path,
            source_dir: &version.source_dir,
        }
    }
}

impl<'c> From<&'c InstanceConfig> for Source<'c> {
    fn from(instance: &'c InstanceConfig) -> Self {
        Self {
            set: DocSet::Instance(instance.id.clone()),
            sidebars_path: &instance.sidebars_path,
            source_dir: &instance.source_dir,
        }
    }
}

/// Loads sidebars for the versions and instances of a configuration.
pub struct SiteLoader<'a> {
    config: &'a Config,
    only: Option<DocSet>,
}

impl<'a> SiteLoader<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config, only: None }
    }

    /// Restrict loading to a single version or instance.
    #[must_use]
    pub fn only(mut self, set: DocSet) -> Self {
        self.only = Some(set);
        self
    }

    /// Load every selected doc set in parallel.
    ///
    /// A doc set whose files cannot be read is recorded as a failure; the
    /// others still load.
    #[must_use]
    pub fn load(&self) -> SiteNavigation {
        let sources: Vec<Source<'_>> = self
            .config
            .versions_resolved
            .iter()
            .map(Source::from)
            .chain(self.config.instances_resolved.iter().map(Source::from))
            .filter(|source| self.only.as_ref().is_none_or(|set| source.set == *set))
            .collect();

        let results: Vec<_> = sources
            .par_iter()
            .map(|source| (source.set.clone(), self.load_source(source)))
            .collect();

        let mut site = SiteNavigation::default();
        for (set, result) in results {
            match result {
                Ok(navigation) => {
                    site.sets.insert(set, navigation);
                }
                Err(e) => {
                    tracing::warn!(docs = %set, error = %e, "Failed to load doc set");
                    site.failures.insert(set, e);
                }
            }
        }
        site
    }

    /// Load the sidebars of one version.
    pub fn load_version(&self, version: &VersionConfig) -> Result<DocSetNavigation, LoadError> {
        self.load_source(&Source::from(version))
    }

    /// Load the sidebars of one instance.
    pub fn load_instance(&self, instance: &InstanceConfig) -> Result<DocSetNavigation, LoadError> {
        self.load_source(&Source::from(instance))
    }

    fn load_source(&self, source: &Source<'_>) -> Result<DocSetNavigation, LoadError> {
        let specs = read_sidebars_file(source.sidebars_path)?;
        let documents = DocIndex::scan(source.source_dir, &self.config.docs_resolved.exclude)?;
        let options = self.build_options(&documents);
        let policy = self.config.validation.on_broken_links;

        let report = build_all(&specs, &options);
        let mut diagnostics = Vec::new();
        for (sidebar, batch) in report.iter() {
            let tree_problems = batch.errors.iter().chain(&batch.warnings).map(|e| Diagnostic {
                sidebar: sidebar.to_owned(),
                severity: e.severity(),
                problem: Problem::Tree(e.clone()),
            });
            diagnostics.extend(tree_problems);
            diagnostics.extend(unknown_documents(&batch.tree, &documents, policy));
        }

        let sidebars = report.into_sidebars();
        let navigation = DocSetNavigation {
            set: source.set.clone(),
            sidebars,
            diagnostics,
            documents,
        };

        tracing::info!(
            docs = %navigation.set,
            sidebars = navigation.sidebars.len(),
            documents = navigation.documents.len(),
            errors = navigation.errors().count(),
            warnings = navigation.warnings().count(),
            "Loaded doc set"
        );

        Ok(navigation)
    }

    fn build_options(&self, documents: &DocIndex) -> BuildOptions {
        let validation = &self.config.validation;
        BuildOptions {
            max_depth: validation.max_depth,
            default_collapsed: validation.default_collapsed,
            default_collapsible: validation.default_collapsible,
            known_documents: documents.to_known_documents(),
        }
    }
}

/// Leaves whose ids are missing from the docs directory, per policy.
fn unknown_documents(
    tree: &NavigationTree,
    documents: &DocIndex,
    policy: BrokenLinkPolicy,
) -> Vec<Diagnostic> {
    let severity = match policy {
        BrokenLinkPolicy::Ignore => return Vec::new(),
        BrokenLinkPolicy::Warn => Severity::Warning,
        BrokenLinkPolicy::Throw => Severity::Error,
    };

    tree.iter()
        .filter_map(|visit| match visit.node {
            NavNode::Leaf(leaf) if !documents.contains(&leaf.id) => Some(Diagnostic {
                sidebar: tree.name.clone(),
                severity,
                problem: Problem::UnknownDocument {
                    id: leaf.id.clone(),
                    path: visit.path,
                },
            }),
            _ => None,
        })
        .collect()
}
