use std::path::{Path, PathBuf};

use chrono::{DateTime, Days, Months, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::version::compare::Severity;

/// Base URL of the public RubyGems API
pub const DEFAULT_REGISTRY_URL: &str = "https://rubygems.org";

/// Timeout for a single latest-version lookup in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Default configuration file, relative to the project root
pub const DEFAULT_CONFIG_FILE: &str = "gem-monitor.json";

/// Default lockfile, relative to the project root
pub const DEFAULT_LOCKFILE: &str = "Gemfile.lock";

const APP_DIR: &str = "gem-monitor";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How often the cached latest versions are refreshed as a whole
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Frequency {
    /// Instant from which a cache refreshed at `updated_at` is due again
    pub fn refresh_due_at(&self, updated_at: DateTime<Utc>) -> DateTime<Utc> {
        let due = match self {
            Frequency::Daily => updated_at.checked_add_days(Days::new(1)),
            Frequency::Weekly => updated_at.checked_add_days(Days::new(7)),
            Frequency::Monthly => updated_at.checked_add_months(Months::new(1)),
        };
        due.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Monitor configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    pub enabled: bool,
    pub frequency: Frequency,
    pub default_severity: Severity,
    /// Overrides the per-project cache file under the user cache directory
    pub cache_file: Option<PathBuf>,
    pub registry_url: String,
    pub packages: Vec<PackageEntry>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: Frequency::default(),
            default_severity: Severity::Minor,
            cache_file: None,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            packages: Vec::new(),
        }
    }
}

/// One `packages` entry
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    /// Raw severity; unknown values fall back to `defaultSeverity`
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub ignore: bool,
}

impl MonitorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Cache file for the project rooted at `project_root`
    pub fn cache_file_path(&self, project_root: &Path) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| default_cache_file(project_root))
    }
}

/// Returns the default cache file for a project.
/// Uses $XDG_CACHE_HOME/gem-monitor/<project>.json if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/gem-monitor/<project>.json,
/// or ./gem-monitor/<project>.json if neither is available.
pub fn default_cache_file(project_root: &Path) -> PathBuf {
    cache_file_with_env(
        std::env::var("XDG_CACHE_HOME").ok(),
        dirs::home_dir(),
        project_root,
    )
}

fn cache_file_with_env(
    xdg_cache_home: Option<String>,
    home_dir: Option<PathBuf>,
    project_root: &Path,
) -> PathBuf {
    let cache_dir = xdg_cache_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    let project = project_root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("default");

    cache_dir.join(APP_DIR).join(format!("{project}.json"))
}
