//! Per-workspace session state shared by every command invocation

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::commands::error::CommandError;
use crate::config::{ConfigError, IndexBackend, NugetConfig};
use crate::nuget::dotnet::DotnetRunner;
use crate::nuget::index::PackageIndex;
use crate::nuget::registries::{DotnetCliIndex, NugetOrgIndex, TypeSearchClient};
use crate::workspace::{ProjectScanner, TargetResolver};

/// Context handle passed to every command.
///
/// Created once per workspace with [`Session::start`] and torn down with
/// [`Session::shutdown`].
pub struct Session {
    config: RwLock<NugetConfig>,
    index: std::sync::RwLock<Arc<dyn PackageIndex>>,
    dotnet: Arc<dyn DotnetRunner>,
    workspace_root: PathBuf,
    settings_path: Option<PathBuf>,
    targets: TargetResolver,
    projects: ProjectScanner,
}

/// Build the package index selected by `backend`
pub fn create_index(
    backend: IndexBackend,
    dotnet: Arc<dyn DotnetRunner>,
    workspace_root: &Path,
) -> Arc<dyn PackageIndex> {
    match backend {
        IndexBackend::NugetOrg => Arc::new(NugetOrgIndex::default()),
        IndexBackend::DotnetCli => Arc::new(DotnetCliIndex::new(
            dotnet,
            workspace_root.to_path_buf(),
            TypeSearchClient::default(),
        )),
    }
}

fn absolute_root(root: PathBuf) -> PathBuf {
    std::path::absolute(&root).unwrap_or(root)
}

impl Session {
    /// Build a session from explicit parts.
    ///
    /// A relative `workspace_root` is resolved against the current directory,
    /// since dotnet runs inside each project's directory.
    pub fn new(
        config: NugetConfig,
        index: Arc<dyn PackageIndex>,
        dotnet: Arc<dyn DotnetRunner>,
        workspace_root: PathBuf,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            index: std::sync::RwLock::new(index),
            dotnet,
            workspace_root: absolute_root(workspace_root),
            settings_path: None,
            targets: TargetResolver::default(),
            projects: ProjectScanner::default(),
        }
    }

    /// Persist configuration changes (e.g. prerelease toggling) to this file
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    /// Start a session for a workspace.
    ///
    /// Fails with [`CommandError::Disabled`] when the commands are turned off
    /// and with [`CommandError::ToolUnavailable`] when the dotnet CLI cannot
    /// be run. Availability is checked once here and not retried.
    pub async fn start(
        config: NugetConfig,
        dotnet: Arc<dyn DotnetRunner>,
        workspace_root: PathBuf,
    ) -> Result<Self, CommandError> {
        if !config.enabled {
            info!("NuGet commands are disabled in settings");
            return Err(CommandError::Disabled);
        }

        if !dotnet.is_available().await {
            warn!("NuGet commands require the .NET SDK to be installed");
            return Err(CommandError::ToolUnavailable);
        }

        let workspace_root = absolute_root(workspace_root);
        let index = create_index(config.backend, dotnet.clone(), &workspace_root);
        info!(
            "Session started for {:?} using {:?} index",
            workspace_root, config.backend
        );
        Ok(Self::new(config, index, dotnet, workspace_root))
    }

    /// Tear down the session
    pub fn shutdown(self) {
        info!("Session for {:?} shut down", self.workspace_root);
    }

    /// Snapshot of the current configuration
    pub async fn config(&self) -> NugetConfig {
        self.config.read().await.clone()
    }

    /// Replace the configuration, e.g. after the editor reports new settings.
    ///
    /// Changing the backend swaps in a new index.
    pub async fn update_config(&self, config: NugetConfig) {
        let mut current = self.config.write().await;
        if config.backend != current.backend {
            let index = create_index(config.backend, self.dotnet.clone(), &self.workspace_root);
            *self.index.write().unwrap_or_else(PoisonError::into_inner) = index;
        }
        *current = config;
    }

    /// Flip `includePrerelease`, persisting it when a settings file is configured.
    ///
    /// Returns the new value.
    pub async fn toggle_prerelease(&self) -> Result<bool, ConfigError> {
        let mut config = self.config.write().await;
        let mut updated = config.clone();
        updated.include_prerelease = !updated.include_prerelease;
        if let Some(path) = &self.settings_path {
            updated.save(path)?;
        }
        *config = updated;
        Ok(config.include_prerelease)
    }

    pub fn index(&self) -> Arc<dyn PackageIndex> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dotnet(&self) -> &dyn DotnetRunner {
        &*self.dotnet
    }

    pub fn dotnet_handle(&self) -> Arc<dyn DotnetRunner> {
        self.dotnet.clone()
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn targets(&self) -> &TargetResolver {
        &self.targets
    }

    pub fn projects(&self) -> &ProjectScanner {
        &self.projects
    }
}
