//! Registry trait for looking up the latest release of a package

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for fetching the latest published version of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the latest version of a package from the registry
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "rspec")
    ///
    /// # Returns
    /// * `Ok(String)` - The latest version string
    /// * `Err(RegistryError)` - If the lookup fails
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError>;
}
