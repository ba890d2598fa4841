//! Persisted latest-version cache with frequency-driven refresh

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Frequency;
use crate::version::error::{CacheError, RegistryError};
use crate::version::registry::Registry;
use crate::version::tracked::TrackedPackage;

/// On-disk record of the latest known versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedVersions {
    #[serde(default)]
    pub latest_versions: IndexMap<String, String>,
    /// Time of the last full refresh; `None` when nothing was ever cached
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// How the latest versions are obtained for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPlan {
    /// Discard the cached versions and fetch every package remotely
    FullRefresh,
    /// Reuse cached versions and fetch only packages missing from the cache
    IncrementalLoad,
}

/// Result of a single remote lookup
#[derive(Debug)]
pub struct LookupOutcome {
    pub package_name: String,
    pub result: Result<String, RegistryError>,
}

impl LookupOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// What a call to [`VersionCache::populate`] did
#[derive(Debug)]
pub struct PopulateSummary {
    pub plan: RefreshPlan,
    /// Remote lookups in the order they were made
    pub lookups: Vec<LookupOutcome>,
    /// Outcome of writing the cache file
    pub persisted: Result<(), CacheError>,
}

impl PopulateSummary {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RegistryError)> {
        self.lookups.iter().filter_map(|lookup| {
            lookup
                .result
                .as_ref()
                .err()
                .map(|e| (lookup.package_name.as_str(), e))
        })
    }
}

pub struct VersionCache {
    path: PathBuf,
    frequency: Frequency,
    record: CachedVersions,
}

impl VersionCache {
    /// Load the cache file at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty record, which
    /// forces a full refresh.
    pub fn load(path: &Path, frequency: Frequency) -> Self {
        let record = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<CachedVersions>(&content)
                .inspect_err(|e| warn!("Ignoring corrupt cache file {:?}: {}", path, e))
                .unwrap_or_default(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {:?}", path);
                CachedVersions::default()
            }
            Err(e) => {
                warn!("Failed to read cache file {:?}: {}", path, e);
                CachedVersions::default()
            }
        };

        Self::with_record(path, frequency, record)
    }

    pub fn with_record(path: &Path, frequency: Frequency, record: CachedVersions) -> Self {
        Self {
            path: path.to_path_buf(),
            frequency,
            record,
        }
    }

    pub fn record(&self) -> &CachedVersions {
        &self.record
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decide between a full refresh and an incremental load at `now`
    pub fn plan(&self, now: DateTime<Utc>) -> RefreshPlan {
        match self.record.updated_at {
            None => RefreshPlan::FullRefresh,
            Some(updated_at) if now >= self.frequency.refresh_due_at(updated_at) => {
                RefreshPlan::FullRefresh
            }
            Some(_) => RefreshPlan::IncrementalLoad,
        }
    }

    /// Assign latest versions to `packages` and persist the cache
    pub async fn populate(
        &mut self,
        registry: &dyn Registry,
        packages: &mut [TrackedPackage],
    ) -> PopulateSummary {
        self.populate_at(registry, packages, Utc::now()).await
    }

    /// Same as [`populate`](Self::populate) with an explicit current time.
    ///
    /// Lookups run one at a time in the order of `packages`; a failed lookup
    /// leaves that package's latest version unset and never stops the run.
    /// The cache file is written exactly once, after all lookups; a failed
    /// write is carried in the summary next to the lookups.
    pub async fn populate_at(
        &mut self,
        registry: &dyn Registry,
        packages: &mut [TrackedPackage],
        now: DateTime<Utc>,
    ) -> PopulateSummary {
        let plan = self.plan(now);
        info!(
            "Populating {} packages from {:?} ({:?})",
            packages.len(),
            self.path,
            plan
        );

        if plan == RefreshPlan::FullRefresh {
            self.record.latest_versions.clear();
            self.record.updated_at = Some(now);
        }

        let mut lookups = Vec::new();
        for package in packages.iter_mut() {
            if let Some(cached) = self.record.latest_versions.get(&package.name) {
                debug!("Using cached version {} for {}", cached, package.name);
                package.latest_version = Some(cached.clone());
                continue;
            }
            lookups.push(self.fetch_latest(registry, package).await);
        }

        PopulateSummary {
            plan,
            lookups,
            persisted: self.persist(),
        }
    }

    async fn fetch_latest(
        &mut self,
        registry: &dyn Registry,
        package: &mut TrackedPackage,
    ) -> LookupOutcome {
        let result = registry.fetch_latest_version(&package.name).await;

        match &result {
            Ok(version) => {
                info!("Fetched latest version {} for {}", version, package.name);
                self.record
                    .latest_versions
                    .insert(package.name.clone(), version.clone());
                package.latest_version = Some(version.clone());
            }
            Err(e) => debug!("Lookup failed for {}: {}", package.name, e),
        }

        LookupOutcome {
            package_name: package.name.clone(),
            result,
        }
    }

    /// Overwrite the cache file with the current record
    pub fn persist(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.record)?;
        fs::write(&self.path, content)?;

        debug!("Saved cache file {:?}", self.path);
        Ok(())
    }
}
