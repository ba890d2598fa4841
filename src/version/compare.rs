//! Severity-aware staleness comparison of dotted numeric versions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Granularity at which a newer release counts as stale
///
/// Severities contain each other: `Minor` also trips on a major bump and
/// `Patch` trips on a major or minor bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Major,
    Minor,
    Patch,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Major => "MAJOR",
            Severity::Minor => "MINOR",
            Severity::Patch => "PATCH",
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAJOR" => Ok(Severity::Major),
            "MINOR" => Ok(Severity::Minor),
            "PATCH" => Ok(Severity::Patch),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MAJOR: usize = 0;
const MINOR: usize = 1;
const PATCH: usize = 2;
const PATCH_EXTRA: usize = 3;

/// Numeric segments of a dotted version string
///
/// Each segment is read from its leading digits; a segment without any
/// (e.g. `beta`) or one that is missing entirely reads as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSegments(Vec<u64>);

impl VersionSegments {
    pub fn parse(version: &str) -> Self {
        Self(version.split('.').map(parse_segment).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> u64 {
        self.0.get(index).copied().unwrap_or(0)
    }

    fn newer_at(&self, other: &VersionSegments, index: usize) -> bool {
        self.get(index) > other.get(index)
    }
}

fn parse_segment(segment: &str) -> u64 {
    let digits = segment
        .find(|c: char| !c.is_ascii_digit())
        .map_or(segment, |end| &segment[..end]);
    digits.parse().unwrap_or(0)
}

/// Decide whether `current` is stale against `latest` at the given severity.
///
/// An unknown latest version is never stale. The fourth segment of a
/// four-segment `current` only matters once the first three are tied, so
/// this is stricter than `latest[2] > current[2] || latest[3] > current[3]`:
/// `3.11.5.1` against `3.11.4.7` is not stale here, while that looser check
/// would report it.
pub fn is_stale(current: &str, latest: Option<&str>, severity: Severity) -> bool {
    let Some(latest) = latest else {
        return false;
    };

    let current = VersionSegments::parse(current);
    let latest = VersionSegments::parse(latest);

    let major_newer = latest.newer_at(&current, MAJOR);
    let minor_newer = major_newer || latest.newer_at(&current, MINOR);

    match severity {
        Severity::Major => major_newer,
        Severity::Minor => minor_newer,
        Severity::Patch => minor_newer || patch_newer(&current, &latest),
    }
}

fn patch_newer(current: &VersionSegments, latest: &VersionSegments) -> bool {
    if latest.newer_at(current, PATCH) {
        return true;
    }
    if current.len() <= PATCH_EXTRA {
        return false;
    }

    let leading_tied = (MAJOR..=PATCH).all(|i| latest.get(i) == current.get(i));
    leading_tied && latest.newer_at(current, PATCH_EXTRA)
}
