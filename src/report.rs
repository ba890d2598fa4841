//! Human-readable report of stale packages

use std::fmt;

use crate::version::tracked::TrackedPackage;

/// Stale packages of one run, in configuration order
#[derive(Debug)]
pub struct StaleReport<'a> {
    stale: Vec<&'a TrackedPackage>,
}

impl<'a> StaleReport<'a> {
    pub fn new(packages: &'a [TrackedPackage]) -> Self {
        Self {
            stale: packages.iter().filter(|p| p.is_stale()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stale.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stale.len()
    }

    fn header(&self) -> &'static str {
        if self.stale.len() > 1 {
            "* The following gems are out of date:"
        } else {
            "* The following gem is out of date:"
        }
    }
}

/// Renders nothing when no package is stale; otherwise a header and one
/// newline-terminated line per package.
impl fmt::Display for StaleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stale.is_empty() {
            return Ok(());
        }

        writeln!(f, "{}", self.header())?;
        for package in &self.stale {
            writeln!(
                f,
                "* {} ({} < {})",
                package.name,
                package.installed_version,
                package.latest_version.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

/// Render the report text for `packages`, empty when nothing is stale
pub fn report(packages: &[TrackedPackage]) -> String {
    StaleReport::new(packages).to_string()
}
