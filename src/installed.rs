//! Installed package versions as resolved by Bundler

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

/// A resolved spec line inside a `specs:` block, e.g. `    rspec (3.11.0)`
static SPEC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {4}([^\s(]+) \(([^)\s]+)\)$").expect("valid spec line regex"));

/// Mapping from package name to installed version string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackages {
    versions: IndexMap<String, String>,
}

impl InstalledPackages {
    /// Parse the resolved specs of a `Gemfile.lock`.
    ///
    /// Dependency constraints (six-space indent) and the `DEPENDENCIES`,
    /// `PLATFORMS` and `BUNDLED WITH` sections never match a spec line.
    /// Platform suffixes are dropped, and the first occurrence of a name wins.
    pub fn parse_lockfile(content: &str) -> Self {
        let mut versions = IndexMap::new();

        for line in content.lines() {
            let Some(captures) = SPEC_LINE.captures(line.trim_end()) else {
                continue;
            };
            let name = &captures[1];
            let version = strip_platform(&captures[2]);
            versions
                .entry(name.to_string())
                .or_insert_with(|| version.to_string());
        }

        Self { versions }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.versions.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for InstalledPackages {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            versions: iter
                .into_iter()
                .map(|(name, version)| (name.into(), version.into()))
                .collect(),
        }
    }
}

fn strip_platform(version: &str) -> &str {
    version.split_once('-').map_or(version, |(v, _)| v)
}
