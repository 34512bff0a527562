//! `dotnet package search` implementation
//!
//! Queries every NuGet source configured for the workspace. The CLI reports
//! one result group per source, so the same package can show up several times.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SEARCH_PAGE_SIZE;
use crate::nuget::dedup::dedup_by_key;
use crate::nuget::dotnet::DotnetRunner;
use crate::nuget::error::RegistryError;
use crate::nuget::index::PackageIndex;
use crate::nuget::registries::type_search::TypeSearchClient;
use crate::nuget::types::{PackageCandidate, TypeSearchHit};

/// JSON document printed by `dotnet package search --format json`
#[derive(Debug, Deserialize)]
struct SearchOutput {
    #[serde(rename = "searchResult", default)]
    search_result: Option<Vec<SourceResult>>,
}

/// Results from one configured source
#[derive(Debug, Deserialize)]
struct SourceResult {
    #[serde(rename = "sourceName", default)]
    source_name: String,
    #[serde(default)]
    packages: Vec<CliPackage>,
}

/// Exact-match output carries `version`, fuzzy output carries `latestVersion`
#[derive(Debug, Deserialize)]
struct CliPackage {
    id: String,
    version: Option<String>,
    #[serde(rename = "latestVersion")]
    latest_version: Option<String>,
}

impl CliPackage {
    fn into_version(self) -> Option<String> {
        self.version.or(self.latest_version)
    }
}

fn parse_output(stdout: &str) -> Result<Vec<SourceResult>, RegistryError> {
    let output: SearchOutput = serde_json::from_str(stdout).map_err(|e| {
        warn!("Failed to parse dotnet package search output: {}", e);
        RegistryError::InvalidResponse(e.to_string())
    })?;
    Ok(output.search_result.unwrap_or_default())
}

/// Package index backed by the dotnet CLI
pub struct DotnetCliIndex {
    runner: Arc<dyn DotnetRunner>,
    workspace_root: PathBuf,
    type_search: TypeSearchClient,
}

impl DotnetCliIndex {
    pub fn new(
        runner: Arc<dyn DotnetRunner>,
        workspace_root: PathBuf,
        type_search: TypeSearchClient,
    ) -> Self {
        Self {
            runner,
            workspace_root,
            type_search,
        }
    }

    async fn run_search(
        &self,
        mut args: Vec<String>,
        include_prerelease: bool,
    ) -> Result<Vec<SourceResult>, RegistryError> {
        if include_prerelease {
            args.push("--prerelease".to_string());
        }
        let stdout = self.runner.run(&args, &self.workspace_root).await?;
        let sources = parse_output(&stdout)?;
        for source in &sources {
            debug!(
                "Source {} returned {} packages",
                source.source_name,
                source.packages.len()
            );
        }
        Ok(sources)
    }
}

#[async_trait::async_trait]
impl PackageIndex for DotnetCliIndex {
    async fn search(
        &self,
        query: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageCandidate>, RegistryError> {
        let args = vec![
            "package".to_string(),
            "search".to_string(),
            query.to_string(),
            "--take".to_string(),
            SEARCH_PAGE_SIZE.to_string(),
            "--format".to_string(),
            "json".to_string(),
        ];
        let sources = self.run_search(args, include_prerelease).await?;

        let candidates = sources
            .into_iter()
            .flat_map(|source| source.packages)
            .map(|pkg| {
                let id = pkg.id.clone();
                PackageCandidate::new(id, pkg.into_version().unwrap_or_default())
            })
            .collect();

        Ok(dedup_by_key(candidates, |c: &PackageCandidate| c.id.clone()))
    }

    async fn search_exact(
        &self,
        id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError> {
        let args = vec![
            "package".to_string(),
            "search".to_string(),
            id.to_string(),
            "--exact-match".to_string(),
            "--format".to_string(),
            "json".to_string(),
        ];
        let sources = self.run_search(args, include_prerelease).await?;

        Ok(sources
            .into_iter()
            .flat_map(|source| source.packages)
            .filter_map(CliPackage::into_version)
            .collect())
    }

    async fn search_by_type(
        &self,
        type_name: &str,
        include_prerelease: bool,
    ) -> Vec<TypeSearchHit> {
        self.type_search.find(type_name, include_prerelease).await
    }
}
