//! Site-level sidebar loading for sidenav.
//!
//! Glues configuration, the filesystem and the tree builder together:
//!
//! - [`read_sidebars_file`] parses a JSON, YAML or TOML sidebars file
//! - [`DocIndex`] lists the documents of a docs directory
//! - [`SiteLoader`] builds every sidebar of every configured version and
//!   instance
//!
//! # Example
//!
//! ```no_run
//! use sidenav_config::Config;
//! use sidenav_site::SiteLoader;
//!
//! let config = Config::load(None, None)?;
//! let site = SiteLoader::new(&config).load();
//! for docs in site.iter() {
//!     for diagnostic in &docs.diagnostics {
//!         println!("{}: {diagnostic}", docs.set);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod doc_index;
mod error;
mod loader;
mod sidebars_file;

pub use doc_index::DocIndex;
pub use error::LoadError;
pub use loader::{
    Diagnostic, DocSet, DocSetNavigation, Problem, SiteLoader, SiteNavigation,
};
pub use sidebars_file::read_sidebars_file;
