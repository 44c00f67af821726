//! `sidenav check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sidenav_config::{BrokenLinkPolicy, CliSettings, Config};
use sidenav_site::{DocSet, DocSetNavigation, SiteLoader, SiteNavigation};
use sidenav_tree::Severity;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sidenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Maximum sidebar depth before warning (overrides config).
    #[arg(long, env = "SIDENAV_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Handling of sidebar entries without a document: ignore, warn or throw.
    #[arg(long)]
    on_broken_links: Option<BrokenLinkPolicy>,

    /// Only check this version.
    #[arg(long, conflicts_with = "instance")]
    version: Option<String>,

    /// Only check this docs instance.
    #[arg(long)]
    instance: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, or if any sidebar has
    /// blocking problems or could not be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            max_depth: self.max_depth,
            on_broken_links: self.on_broken_links,
            source_dir: self.source_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config = ?config.config_path,
            versions = config.versions_resolved.len(),
            instances = config.instances_resolved.len(),
            "Loaded configuration"
        );

        let mut loader = SiteLoader::new(&config);
        if let Some(name) = self.version {
            if config.version(&name).is_none() {
                return Err(CliError::Validation(format!("Unknown version: {name}")));
            }
            loader = loader.only(DocSet::Version(name));
        } else if let Some(id) = self.instance {
            if config.instance(&id).is_none() {
                return Err(CliError::Validation(format!("Unknown instance: {id}")));
            }
            loader = loader.only(DocSet::Instance(id));
        }
        let site = loader.load();

        report(&site, &output);

        let errors = site.error_count();
        let warnings = site.warning_count();
        if errors > 0 {
            return Err(CliError::Validation(summary(errors, warnings)));
        }
        output.success(&summary(errors, warnings));
        Ok(())
    }
}

/// Print every diagnostic and load failure, grouped by doc set.
fn report(site: &SiteNavigation, output: &Output) {
    for (set, error) in site.failures() {
        output.highlight(&capitalize(&set.to_string()));
        output.error(&format!("  error: {error}"));
    }
    for docs in site.iter() {
        output.highlight(&format!(
            "{} ({} sidebars)",
            capitalize(&docs.set.to_string()),
            docs.sidebars.len()
        ));
        report_doc_set(docs, output);
    }
}

fn report_doc_set(docs: &DocSetNavigation, output: &Output) {
    for diagnostic in &docs.diagnostics {
        let line = format!("  {}: {diagnostic}", diagnostic.severity);
        match diagnostic.severity {
            Severity::Error => output.error(&line),
            Severity::Warning => output.warning(&line),
        }
    }
    if docs.diagnostics.is_empty() {
        output.info("  no problems found");
    }
}

fn summary(errors: usize, warnings: usize) -> String {
    format!(
        "{errors} {}, {warnings} {}",
        plural(errors, "error"),
        plural(warnings, "warning")
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_owned()
    } else {
        format!("{word}s")
    }
}
