//! `sidenav show` command implementation.

use std::path::PathBuf;

use clap::Args;
use sidenav_config::{CliSettings, Config};
use sidenav_site::SiteLoader;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Sidebar id (top-level key of the sidebars file).
    sidebar: String,

    /// Version to read (default: `last_version` from config).
    #[arg(long, conflicts_with = "instance")]
    version: Option<String>,

    /// Read the sidebar from this docs instance instead of a version.
    #[arg(long)]
    instance: Option<String>,

    /// Path to configuration file (default: auto-discover sidenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// Prints the best-effort tree even when the sidebar has problems;
    /// run `sidenav check` for the diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the doc set cannot be loaded
    /// or the sidebar does not exist.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let json = self.render()?;
        output.data(&json)?;
        Ok(())
    }

    fn render(self) -> Result<String, CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let loader = SiteLoader::new(&config);
        let navigation = if let Some(id) = &self.instance {
            let instance = config
                .instance(id)
                .ok_or_else(|| CliError::Validation(format!("Unknown instance: {id}")))?;
            loader.load_instance(instance)?
        } else {
            let version = match &self.version {
                Some(name) => config.version(name),
                None => config.default_version(),
            }
            .ok_or_else(|| {
                CliError::Validation(format!(
                    "Unknown version: {}",
                    self.version.as_deref().unwrap_or_default()
                ))
            })?;
            loader.load_version(version)?
        };

        let tree = navigation.sidebar(&self.sidebar).ok_or_else(|| {
            CliError::Validation(format!(
                "Sidebar `{}` not found in {}",
                self.sidebar, navigation.set
            ))
        })?;

        let problems = navigation
            .diagnostics
            .iter()
            .filter(|d| d.sidebar == self.sidebar)
            .count();
        if problems > 0 {
            output.warning(&format!(
                "Sidebar `{}` has {problems} problem(s); run `sidenav check` for details",
                self.sidebar
            ));
        }

        Ok(serde_json::to_string_pretty(tree)?)
    }
}
