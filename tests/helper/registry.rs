//! Registry test utilities

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use gem_monitor::version::cache::CachedVersions;
use gem_monitor::version::error::RegistryError;
use gem_monitor::version::registry::Registry;

/// Mock registry that records every lookup it serves
#[derive(Default)]
pub struct MockRegistry {
    versions: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, package: &str, version: &str) -> Self {
        self.versions
            .insert(package.to_string(), version.to_string());
        self
    }

    /// Package names looked up so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        self.calls.lock().unwrap().push(package_name.to_string());
        match self.versions.get(package_name) {
            Some(version) => Ok(version.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}

/// Write a cache file with the given latest versions
pub fn write_cache_file(path: &Path, latest: &[(&str, &str)], updated_at: DateTime<Utc>) {
    let record = CachedVersions {
        latest_versions: latest
            .iter()
            .map(|(name, version)| (name.to_string(), version.to_string()))
            .collect::<IndexMap<_, _>>(),
        updated_at: Some(updated_at),
    };
    std::fs::write(path, serde_json::to_string(&record).unwrap()).unwrap();
}

pub fn read_cache_file(path: &Path) -> CachedVersions {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
