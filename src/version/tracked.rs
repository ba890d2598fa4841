//! Packages under staleness monitoring

use tracing::debug;

use crate::config::{MonitorConfig, PackageEntry};
use crate::installed::InstalledPackages;
use crate::version::compare::{Severity, is_stale};

/// One configured package with its installed version and target severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPackage {
    pub name: String,
    pub installed_version: String,
    pub severity: Severity,
    /// Latest known release; `None` until the version cache assigns it
    pub latest_version: Option<String>,
}

impl TrackedPackage {
    pub fn new(name: &str, installed_version: &str, severity: Severity) -> Self {
        Self {
            name: name.to_string(),
            installed_version: installed_version.to_string(),
            severity,
            latest_version: None,
        }
    }

    /// Resolve a configured severity, falling back to `default` when the
    /// value is absent or not one of PATCH, MINOR or MAJOR.
    pub fn resolve_severity(requested: Option<&str>, default: Severity) -> Severity {
        requested
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    pub fn is_stale(&self) -> bool {
        is_stale(
            &self.installed_version,
            self.latest_version.as_deref(),
            self.severity,
        )
    }
}

/// Result of matching the configured entries against installed packages
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Installed, non-ignored packages in configuration order
    pub tracked: Vec<TrackedPackage>,
    /// Configured names that are not installed
    pub not_installed: Vec<String>,
}

/// Build the tracked package list for one run.
///
/// Ignored entries are skipped, but only after the installed check, so an
/// ignored package that is missing is still reported as not installed.
pub fn select_packages(config: &MonitorConfig, installed: &InstalledPackages) -> Selection {
    let mut selection = Selection::default();

    for entry in &config.packages {
        let Some(installed_version) = installed.get(&entry.name) else {
            selection.not_installed.push(entry.name.clone());
            continue;
        };

        if entry.ignore {
            debug!("Ignoring monitored package {}", entry.name);
            continue;
        }

        selection
            .tracked
            .push(track_entry(entry, installed_version, config.default_severity));
    }

    selection
}

fn track_entry(entry: &PackageEntry, installed_version: &str, default: Severity) -> TrackedPackage {
    let severity = TrackedPackage::resolve_severity(entry.severity.as_deref(), default);
    TrackedPackage::new(&entry.name, installed_version, severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(name: &str, severity: Option<&str>, ignore: bool) -> PackageEntry {
        PackageEntry {
            name: name.to_string(),
            severity: severity.map(|s| s.to_string()),
            ignore,
        }
    }

    fn config(packages: Vec<PackageEntry>) -> MonitorConfig {
        MonitorConfig {
            packages,
            ..MonitorConfig::default()
        }
    }

    #[rstest]
    #[case(Some("PATCH"), Severity::Major, Severity::Patch)]
    #[case(Some("MAJOR"), Severity::Minor, Severity::Major)]
    #[case(Some("SOMETIMES"), Severity::Minor, Severity::Minor)]
    #[case(Some("minor"), Severity::Patch, Severity::Patch)]
    #[case(None, Severity::Major, Severity::Major)]
    fn resolve_severity_falls_back_to_default(
        #[case] requested: Option<&str>,
        #[case] default: Severity,
        #[case] expected: Severity,
    ) {
        assert_eq!(TrackedPackage::resolve_severity(requested, default), expected);
    }

    #[test]
    fn new_package_has_unknown_latest_version_and_is_not_stale() {
        let package = TrackedPackage::new("rspec", "3.11.4", Severity::Patch);

        assert_eq!(package.latest_version, None);
        assert!(!package.is_stale());
    }

    #[test]
    fn is_stale_uses_assigned_latest_version() {
        let mut package = TrackedPackage::new("rspec", "3.11.4", Severity::Patch);
        package.latest_version = Some("3.11.5".to_string());

        assert!(package.is_stale());
    }

    #[test]
    fn select_packages_keeps_configuration_order_and_resolves_severity() {
        let installed = InstalledPackages::from_iter([
            ("browser", "1.5.6"),
            ("rspec", "3.11.4"),
        ]);
        let config = config(vec![
            entry("rspec", Some("PATCH"), false),
            entry("browser", Some("bogus"), false),
        ]);

        let selection = select_packages(&config, &installed);

        assert_eq!(
            selection.tracked,
            vec![
                TrackedPackage::new("rspec", "3.11.4", Severity::Patch),
                TrackedPackage::new("browser", "1.5.6", Severity::Minor),
            ]
        );
        assert!(selection.not_installed.is_empty());
    }

    #[test]
    fn select_packages_skips_ignored_entries() {
        let installed = InstalledPackages::from_iter([("rspec", "3.11.4"), ("browser", "1.5.6")]);
        let config = config(vec![
            entry("rspec", Some("MINOR"), true),
            entry("browser", None, false),
        ]);

        let selection = select_packages(&config, &installed);

        assert_eq!(selection.tracked.len(), 1);
        assert_eq!(selection.tracked[0].name, "browser");
    }

    #[test]
    fn select_packages_reports_packages_that_are_not_installed() {
        let installed = InstalledPackages::from_iter([("rspec", "3.11.4")]);
        let config = config(vec![
            entry("strong_migrations", Some("MAJOR"), false),
            entry("rspec", None, false),
            entry("pundit", None, true),
        ]);

        let selection = select_packages(&config, &installed);

        assert_eq!(selection.not_installed, vec!["strong_migrations", "pundit"]);
        assert_eq!(selection.tracked.len(), 1);
    }
}
