//! Configuration management for sidenav.
//!
//! Parses `sidenav.toml` with serde and provides auto-discovery of the
//! config file in parent directories. Relative paths are resolved against
//! the directory containing the config file.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `site.url` and `site.base_url` support `${VAR}` and `${VAR:-default}`.
//!
//! ## Versions
//!
//! Each `[versions.<name>]` table points at its own sidebars file and docs
//! directory. Without any versions table a single `current` version is
//! assumed, reading `sidebars.json` next to the config file.
//!
//! ## Instances
//!
//! `[instances.<id>]` tables declare further, unversioned doc sets served
//! next to the main docs (for example a learning lab under `/learningLab`),
//! each with its own docs directory and sidebars file.

mod expand;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override maximum sidebar depth.
    pub max_depth: Option<usize>,
    /// Override broken document link handling.
    pub on_broken_links: Option<BrokenLinkPolicy>,
    /// Override docs source directory of the default version.
    pub source_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sidenav.toml";

/// Name of the version used when no `[versions]` table is configured.
pub const CURRENT_VERSION: &str = "current";

/// Default sidebars file of the implicit `current` version.
const DEFAULT_SIDEBARS_FILE: &str = "sidebars.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata.
    pub site: SiteConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Sidebar validation policy.
    pub validation: ValidationConfig,
    /// Version shown by default.
    pub last_version: Option<String>,
    /// Documentation versions (paths are relative strings from TOML).
    versions: BTreeMap<String, VersionConfigRaw>,
    /// Additional doc sets (paths are relative strings from TOML).
    instances: BTreeMap<String, InstanceConfigRaw>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved versions (set after loading).
    #[serde(skip)]
    pub versions_resolved: Vec<VersionConfig>,
    /// Resolved instances, ordered by id (set after loading).
    #[serde(skip)]
    pub instances_resolved: Vec<InstanceConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Short description shown under the title.
    pub tagline: Option<String>,
    /// Public URL of the site.
    pub url: Option<String>,
    /// URL prefix the site is served under.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            tagline: None,
            url: None,
            base_url: "/".to_owned(),
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    exclude: Option<Vec<String>>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory scanned for documents of the default version.
    pub source_dir: PathBuf,
    /// Glob patterns (relative to a docs directory) of files that are not documents.
    pub exclude: Vec<String>,
}

/// Default exclude patterns: partials prefixed with `_`.
fn default_exclude() -> Vec<String> {
    vec!["**/_*".to_owned()]
}

/// How sidebar entries pointing at missing documents are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    /// Do not check documents.
    Ignore,
    /// Report missing documents as warnings.
    #[default]
    Warn,
    /// Report missing documents as errors.
    Throw,
}

impl FromStr for BrokenLinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "throw" => Ok(Self::Throw),
            other => Err(format!(
                "invalid policy `{other}` (expected ignore, warn or throw)"
            )),
        }
    }
}

impl fmt::Display for BrokenLinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Throw => "throw",
        })
    }
}

/// Sidebar validation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Depth beyond which a depth warning is reported.
    pub max_depth: usize,
    /// Handling of sidebar entries pointing at missing documents.
    pub on_broken_links: BrokenLinkPolicy,
    /// `collapsed` value for categories that do not set it.
    pub default_collapsed: bool,
    /// `collapsible` value for categories that do not set it.
    pub default_collapsible: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            on_broken_links: BrokenLinkPolicy::default(),
            default_collapsed: true,
            default_collapsible: true,
        }
    }
}

/// Banner shown on pages of a version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    #[default]
    None,
    Unreleased,
    Unmaintained,
}

/// Raw version configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VersionConfigRaw {
    label: Option<String>,
    path: Option<String>,
    banner: Option<Banner>,
    sidebars: Option<String>,
    source_dir: Option<String>,
}

/// Resolved documentation version with absolute paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionConfig {
    /// Version name (key of the `[versions]` table).
    pub name: String,
    /// Label shown in the version dropdown.
    pub label: String,
    /// URL path segment of the version ("" for the site root).
    pub path: String,
    /// Banner shown on the version's pages.
    pub banner: Banner,
    /// Sidebars file of the version.
    pub sidebars_path: PathBuf,
    /// Docs directory of the version.
    pub source_dir: PathBuf,
}

/// Raw instance configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InstanceConfigRaw {
    route_base_path: Option<String>,
    source_dir: Option<String>,
    sidebars: Option<String>,
}

/// Resolved unversioned doc set with absolute paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceConfig {
    /// Instance id (key of the `[instances]` table).
    pub id: String,
    /// URL path segment the instance is served under.
    pub route_base_path: String,
    /// Sidebars file of the instance.
    pub sidebars_path: PathBuf,
    /// Docs directory of the instance.
    pub source_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sidenav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the configuration (including CLI overrides) is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(max_depth) = settings.max_depth {
            self.validation.max_depth = max_depth;
        }
        if let Some(policy) = settings.on_broken_links {
            self.validation.on_broken_links = policy;
        }
        if let Some(source_dir) = &settings.source_dir {
            let previous =
                std::mem::replace(&mut self.docs_resolved.source_dir, source_dir.clone());
            // Versions reading the default docs directory follow the override.
            for version in &mut self.versions_resolved {
                if version.source_dir == previous {
                    version.source_dir.clone_from(source_dir);
                }
            }
        }
    }

    /// Resolved version by name.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<&VersionConfig> {
        self.versions_resolved.iter().find(|v| v.name == name)
    }

    /// Resolved instance by id.
    #[must_use]
    pub fn instance(&self, id: &str) -> Option<&InstanceConfig> {
        self.instances_resolved.iter().find(|i| i.id == id)
    }

    /// Version shown by default.
    ///
    /// `last_version` if set, otherwise `current` if configured, otherwise
    /// the first version by name.
    #[must_use]
    pub fn default_version(&self) -> Option<&VersionConfig> {
        let name = self.last_version.as_deref().unwrap_or(CURRENT_VERSION);
        self.version(name)
            .or_else(|| self.versions_resolved.first())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            validation: ValidationConfig::default(),
            last_version: None,
            versions: BTreeMap::new(),
            instances: BTreeMap::new(),
            docs_resolved: DocsConfig::default(),
            versions_resolved: Vec::new(),
            instances_resolved: Vec::new(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_validation()?;
        self.validate_versions()?;
        self.validate_instances()?;
        Ok(())
    }

    /// Validate site metadata.
    fn validate_site(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.site.url {
            require_http_url(url, "site.url")?;
        }
        let base_url = &self.site.base_url;
        if !base_url.starts_with('/') || !base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must start and end with /".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate the validation policy.
    fn validate_validation(&self) -> Result<(), ConfigError> {
        if self.validation.max_depth == 0 {
            return Err(ConfigError::Validation(
                "validation.max_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate versions.
    fn validate_versions(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.last_version
            && self.version(name).is_none()
        {
            return Err(ConfigError::Validation(format!(
                "last_version `{name}` is not a configured version"
            )));
        }

        let mut paths = HashSet::new();
        for version in &self.versions_resolved {
            if !paths.insert(version.path.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "versions.{}.path `{}` is used by another version",
                    version.name, version.path
                )));
            }
        }
        Ok(())
    }

    /// Validate instances.
    ///
    /// Route paths must be non-empty, unique, and distinct from version paths.
    fn validate_instances(&self) -> Result<(), ConfigError> {
        let mut routes: HashSet<&str> = self
            .versions_resolved
            .iter()
            .map(|v| v.path.as_str())
            .collect();
        for instance in &self.instances_resolved {
            let route = instance.route_base_path.as_str();
            if route.trim_matches('/').is_empty() {
                return Err(ConfigError::Validation(format!(
                    "instances.{}.route_base_path cannot be empty",
                    instance.id
                )));
            }
            if !routes.insert(route) {
                return Err(ConfigError::Validation(format!(
                    "instances.{}.route_base_path `{route}` is used by another version or instance",
                    instance.id
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.site.url {
            self.site.url = Some(expand::expand_env(url, "site.url")?);
        }
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            exclude: self.docs.exclude.clone().unwrap_or_else(default_exclude),
        };

        self.versions_resolved = if self.versions.is_empty() {
            vec![VersionConfig {
                name: CURRENT_VERSION.to_owned(),
                label: "Next".to_owned(),
                path: String::new(),
                banner: Banner::None,
                sidebars_path: config_dir.join(DEFAULT_SIDEBARS_FILE),
                source_dir: self.docs_resolved.source_dir.clone(),
            }]
        } else {
            self.versions
                .iter()
                .map(|(name, raw)| VersionConfig {
                    name: name.clone(),
                    label: raw.label.clone().unwrap_or_else(|| name.clone()),
                    path: raw.path.clone().unwrap_or_else(|| {
                        if name == CURRENT_VERSION {
                            String::new()
                        } else {
                            name.clone()
                        }
                    }),
                    banner: raw.banner.unwrap_or_default(),
                    sidebars_path: config_dir.join(
                        raw.sidebars
                            .clone()
                            .unwrap_or_else(|| default_sidebars_file(name)),
                    ),
                    source_dir: raw.source_dir.as_ref().map_or_else(
                        || default_version_source(name, &self.docs_resolved.source_dir, config_dir),
                        |dir| config_dir.join(dir),
                    ),
                })
                .collect()
        };

        self.instances_resolved = self
            .instances
            .iter()
            .map(|(id, raw)| InstanceConfig {
                id: id.clone(),
                route_base_path: raw.route_base_path.clone().unwrap_or_else(|| id.clone()),
                sidebars_path: config_dir.join(
                    raw.sidebars
                        .clone()
                        .unwrap_or_else(|| format!("sidebars-{id}.json")),
                ),
                source_dir: config_dir.join(raw.source_dir.as_deref().unwrap_or(id)),
            })
            .collect();
    }
}

/// Sidebars file of a version that does not name one.
fn default_sidebars_file(version: &str) -> String {
    if version == CURRENT_VERSION {
        DEFAULT_SIDEBARS_FILE.to_owned()
    } else {
        format!("versioned_sidebars/version-{version}-sidebars.json")
    }
}

/// Docs directory of a version that does not name one.
fn default_version_source(version: &str, docs_dir: &Path, config_dir: &Path) -> PathBuf {
    if version == CURRENT_VERSION {
        docs_dir.to_path_buf()
    } else {
        config_dir.join(format!("versioned_docs/version-{version}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str, base: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new(base));
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.exclude, vec!["**/_*".to_owned()]);
        assert_eq!(config.validation.max_depth, 5);
        assert_eq!(config.validation.on_broken_links, BrokenLinkPolicy::Warn);
        assert!(config.validation.default_collapsed);
        assert!(config.validation.default_collapsible);
        assert_eq!(
            config.versions_resolved,
            vec![VersionConfig {
                name: "current".to_owned(),
                label: "Next".to_owned(),
                path: String::new(),
                banner: Banner::None,
                sidebars_path: PathBuf::from("/test/sidebars.json"),
                source_dir: PathBuf::from("/test/docs"),
            }]
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.validation.max_depth, 5);
    }

    #[test]
    fn test_parse_site_and_validation() {
        let config = parse(
            r#"
[site]
title = "Lit Protocol"
tagline = "Blockchain based access control for the web"
url = "https://developer.litprotocol.com"
base_url = "/"

[validation]
max_depth = 4
on_broken_links = "throw"
default_collapsed = false
"#,
            "/project",
        );

        assert_eq!(config.site.title, "Lit Protocol");
        assert_eq!(
            config.site.url.as_deref(),
            Some("https://developer.litprotocol.com")
        );
        assert_eq!(config.validation.max_depth, 4);
        assert_eq!(config.validation.on_broken_links, BrokenLinkPolicy::Throw);
        assert!(!config.validation.default_collapsed);
        assert!(config.validation.default_collapsible);
        config.validate().unwrap();
    }

    #[test]
    fn test_resolve_versions() {
        let config = parse(
            r#"
last_version = "current"

[docs]
source_dir = "website/docs"

[versions.current]
label = "v3.x.x"
path = "v3"

[versions."2.0"]
label = "v2.x.x"
path = "v2"
banner = "unmaintained"
"#,
            "/project",
        );

        assert_eq!(config.versions_resolved.len(), 2);
        let v2 = config.version("2.0").unwrap();
        assert_eq!(v2.label, "v2.x.x");
        assert_eq!(v2.banner, Banner::Unmaintained);
        assert_eq!(
            v2.sidebars_path,
            PathBuf::from("/project/versioned_sidebars/version-2.0-sidebars.json")
        );
        assert_eq!(
            v2.source_dir,
            PathBuf::from("/project/versioned_docs/version-2.0")
        );
        let current = config.default_version().unwrap();
        assert_eq!(current.name, "current");
        assert_eq!(current.path, "v3");
        assert_eq!(current.sidebars_path, PathBuf::from("/project/sidebars.json"));
        assert_eq!(current.source_dir, PathBuf::from("/project/website/docs"));
        config.validate().unwrap();
    }

    #[test]
    fn test_explicit_version_paths() {
        let config = parse(
            r#"
[versions.beta]
sidebars = "beta/sidebars.yaml"
source_dir = "beta/docs"
"#,
            "/project",
        );

        let beta = config.version("beta").unwrap();
        assert_eq!(beta.label, "beta");
        assert_eq!(beta.path, "beta");
        assert_eq!(beta.sidebars_path, PathBuf::from("/project/beta/sidebars.yaml"));
        assert_eq!(beta.source_dir, PathBuf::from("/project/beta/docs"));
        // No `current` version: the first one is the default.
        assert_eq!(config.default_version().unwrap().name, "beta");
    }

    #[test]
    fn test_resolve_instances() {
        let config = parse(
            r#"
[instances.learningLab]
sidebars = "sidebarsLearningLab.json"

[instances.Ecosystem]
route_base_path = "ecosystem"
source_dir = "content/ecosystem"
"#,
            "/project",
        );

        assert_eq!(
            config.instances_resolved,
            vec![
                InstanceConfig {
                    id: "Ecosystem".to_owned(),
                    route_base_path: "ecosystem".to_owned(),
                    sidebars_path: PathBuf::from("/project/sidebars-Ecosystem.json"),
                    source_dir: PathBuf::from("/project/content/ecosystem"),
                },
                InstanceConfig {
                    id: "learningLab".to_owned(),
                    route_base_path: "learningLab".to_owned(),
                    sidebars_path: PathBuf::from("/project/sidebarsLearningLab.json"),
                    source_dir: PathBuf::from("/project/learningLab"),
                },
            ]
        );
        assert_eq!(config.instance("learningLab").unwrap().route_base_path, "learningLab");
        assert!(config.instance("missing").is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_instance_route_clashes_with_version() {
        let config = parse(
            r#"
[versions.current]
path = "v3"

[instances.lab]
route_base_path = "v3"
"#,
            "/p",
        );
        assert_validation_error(&config, &["instances.lab.route_base_path", "v3"]);
    }

    #[test]
    fn test_validate_empty_instance_route() {
        let config = parse("[instances.lab]\nroute_base_path = \"/\"", "/p");
        assert_validation_error(&config, &["instances.lab.route_base_path", "empty"]);
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            max_depth: Some(3),
            on_broken_links: Some(BrokenLinkPolicy::Ignore),
            source_dir: Some(PathBuf::from("/custom/docs")),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.validation.max_depth, 3);
        assert_eq!(config.validation.on_broken_links, BrokenLinkPolicy::Ignore);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/custom/docs"));
        assert_eq!(
            config.versions_resolved[0].source_dir,
            PathBuf::from("/custom/docs")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.validation.max_depth, 5);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
    }

    #[test]
    fn test_broken_link_policy_from_str() {
        assert_eq!("warn".parse::<BrokenLinkPolicy>(), Ok(BrokenLinkPolicy::Warn));
        assert_eq!("throw".parse::<BrokenLinkPolicy>(), Ok(BrokenLinkPolicy::Throw));
        assert!("fail".parse::<BrokenLinkPolicy>().is_err());
        assert_eq!(BrokenLinkPolicy::Ignore.to_string(), "ignore");
    }

    #[test]
    fn test_expand_env_vars_site_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SIDENAV_TEST_SITE_URL", "https://docs.test.com");
        }

        let mut config: Config = toml::from_str(
            r#"
[site]
url = "${SIDENAV_TEST_SITE_URL}"
base_url = "${SIDENAV_TEST_BASE_URL:-/docs/}"
"#,
        )
        .unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.site.url.as_deref(), Some("https://docs.test.com"));
        assert_eq!(config.site.base_url, "/docs/");

        unsafe {
            std::env::remove_var("SIDENAV_TEST_SITE_URL");
        }
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_site_url_scheme() {
        let config = parse("[site]\nurl = \"ftp://example.com\"", "/p");
        assert_validation_error(&config, &["site.url", "http://"]);
    }

    #[test]
    fn test_validate_base_url_slashes() {
        let config = parse("[site]\nbase_url = \"docs\"", "/p");
        assert_validation_error(&config, &["site.base_url"]);
    }

    #[test]
    fn test_validate_max_depth_zero() {
        let config = parse("[validation]\nmax_depth = 0", "/p");
        assert_validation_error(&config, &["max_depth"]);
    }

    #[test]
    fn test_validate_unknown_last_version() {
        let config = parse("last_version = \"9.0\"", "/p");
        assert_validation_error(&config, &["last_version", "9.0"]);
    }

    #[test]
    fn test_validate_duplicate_version_paths() {
        let config = parse(
            r#"
[versions.a]
path = "v1"
[versions.b]
path = "v1"
"#,
            "/p",
        );
        assert_validation_error(&config, &["versions.b.path", "v1"]);
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sidenav.toml");
        std::fs::write(&path, "[docs]\nsource_dir = \"content\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/sidenav.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sidenav.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            max_depth: Some(0),
            ..CliSettings::default()
        };

        let result = Config::load(Some(&path), Some(&settings));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
