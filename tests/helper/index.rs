//! Package index and dotnet test doubles

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use nuget_lsp::nuget::dotnet::DotnetRunner;
use nuget_lsp::nuget::error::{DotnetError, RegistryError};
use nuget_lsp::nuget::index::PackageIndex;
use nuget_lsp::nuget::types::{PackageCandidate, TypeSearchHit};

/// In-memory package index
#[derive(Default)]
pub struct FakeIndex {
    packages: Vec<PackageCandidate>,
    versions: HashMap<String, Vec<String>>,
    types: HashMap<String, Vec<String>>,
}

#[allow(dead_code)]
impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, id: &str, versions: Vec<&str>) -> Self {
        let latest = versions.first().copied().unwrap_or_default();
        self.packages.push(PackageCandidate::new(id, latest));
        self.versions.insert(
            id.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_type(mut self, type_name: &str, ids: Vec<&str>) -> Self {
        self.types.insert(
            type_name.to_string(),
            ids.into_iter().map(|id| id.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl PackageIndex for FakeIndex {
    async fn search(
        &self,
        query: &str,
        _include_prerelease: bool,
    ) -> Result<Vec<PackageCandidate>, RegistryError> {
        let query = query.to_lowercase();
        Ok(self
            .packages
            .iter()
            .filter(|p| p.id.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn search_exact(
        &self,
        id: &str,
        _include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError> {
        self.versions
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    async fn search_by_type(
        &self,
        type_name: &str,
        _include_prerelease: bool,
    ) -> Vec<TypeSearchHit> {
        self.types
            .get(type_name)
            .into_iter()
            .flatten()
            .map(|id| TypeSearchHit { id: id.clone() })
            .collect()
    }
}

/// Dotnet runner that records every invocation instead of running it
pub struct RecordingRunner {
    available: bool,
    calls: Mutex<Vec<(Vec<String>, PathBuf)>>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<(Vec<String>, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DotnetRunner for RecordingRunner {
    async fn run(&self, args: &[String], cwd: &Path) -> Result<String, DotnetError> {
        self.calls
            .lock()
            .unwrap()
            .push((args.to_vec(), cwd.to_path_buf()));
        Ok(String::new())
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}
