//! Package index trait for querying NuGet sources

#[cfg(test)]
use mockall::automock;

use crate::nuget::error::RegistryError;
use crate::nuget::types::{PackageCandidate, TypeSearchHit};

/// Trait for querying a package index
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageIndex: Send + Sync {
    /// Fuzzy search bounded to [`SEARCH_PAGE_SIZE`](crate::config::SEARCH_PAGE_SIZE) results
    ///
    /// # Returns
    /// * `Ok(Vec<PackageCandidate>)` - Matching packages, one entry per id, in registry rank order
    /// * `Err(RegistryError)` - If the query fails
    async fn search(
        &self,
        query: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageCandidate>, RegistryError>;

    /// Exact-id lookup returning every known version
    ///
    /// Versions are flattened across every result group (source) the index
    /// reports. They are neither sorted nor deduplicated.
    async fn search_exact(
        &self,
        id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError>;

    /// Reverse lookup from a type name to packages that contain it
    ///
    /// Best-effort: failures are logged and yield an empty list.
    async fn search_by_type(&self, type_name: &str, include_prerelease: bool)
    -> Vec<TypeSearchHit>;
}
