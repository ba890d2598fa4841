//! One monitoring run: select, populate, report

use std::io::Write;
use std::path::Path;

use tracing::{debug, error, warn};

use crate::config::MonitorConfig;
use crate::installed::InstalledPackages;
use crate::report::StaleReport;
use crate::version::cache::{RefreshPlan, VersionCache};
use crate::version::registry::Registry;
use crate::version::tracked::{TrackedPackage, select_packages};

/// What a run did, for callers that want more than the printed text
#[derive(Debug, Default)]
pub struct RunSummary {
    pub packages: Vec<TrackedPackage>,
    pub not_installed: Vec<String>,
    /// `None` when the run was disabled
    pub plan: Option<RefreshPlan>,
    pub failed_lookups: Vec<String>,
    pub cache_saved: bool,
    pub stale_count: usize,
}

pub fn not_installed_message(name: &str) -> String {
    format!(
        "{} is monitored by {} but is not installed",
        name,
        env!("CARGO_PKG_NAME")
    )
}

/// Run a check and write all console output to `out`.
///
/// Only errors writing to `out` are returned; lookup and cache failures are
/// logged and the report is still produced from whatever is known.
pub async fn run<W: Write>(
    config: &MonitorConfig,
    installed: &InstalledPackages,
    registry: &dyn Registry,
    cache_path: &Path,
    out: &mut W,
) -> std::io::Result<RunSummary> {
    if !config.enabled {
        debug!("Monitoring disabled by configuration");
        return Ok(RunSummary::default());
    }

    let selection = select_packages(config, installed);
    for name in &selection.not_installed {
        writeln!(out, "{}", not_installed_message(name))?;
    }

    let mut summary = RunSummary {
        packages: selection.tracked,
        not_installed: selection.not_installed,
        ..RunSummary::default()
    };

    let mut cache = VersionCache::load(cache_path, config.frequency);
    let populated = cache.populate(registry, &mut summary.packages).await;
    for (name, e) in populated.failures() {
        warn!("Error fetching gem version for {}: {}", name, e);
        summary.failed_lookups.push(name.to_string());
    }
    if let Err(e) = &populated.persisted {
        error!("Failed to save cache file {:?}: {}", cache.path(), e);
    }
    summary.plan = Some(populated.plan);
    summary.cache_saved = populated.persisted.is_ok();

    let report = StaleReport::new(&summary.packages);
    write!(out, "{}", report)?;
    summary.stale_count = report.len();

    Ok(summary)
}
