use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Query-related constants
// =============================================================================

/// Page size for fuzzy package search
pub const SEARCH_PAGE_SIZE: usize = 5;

/// Maximum number of hits returned by reverse type search
pub const TYPE_SEARCH_LIMIT: usize = 10;

/// Environment variable controlling the log filter
pub const LOG_ENV: &str = "NUGET_LSP_LOG";

/// NuGet command configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NugetConfig {
    /// Whether the NuGet commands are active at all
    pub enabled: bool,
    /// Whether prerelease versions are included in every query
    pub include_prerelease: bool,
    /// Which package index implementation answers queries
    pub backend: IndexBackend,
}

impl Default for NugetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_prerelease: false,
            backend: IndexBackend::default(),
        }
    }
}

/// Package index implementation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IndexBackend {
    /// NuGet v3 HTTP search service
    #[default]
    NugetOrg,
    /// `dotnet package search`, which honours the user's configured sources
    DotnetCli,
}

/// Settings as sent by an editor, either as initialization options or in
/// `workspace/didChangeConfiguration`. Both `{"nuget": {...}}` and a bare
/// `{...}` object are accepted.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LspSettings {
    pub nuget: Option<NugetConfig>,
}

/// Bare settings object. Only NuGet keys are allowed, so another
/// extension's section is never mistaken for ours.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct BareSettings {
    enabled: Option<bool>,
    include_prerelease: Option<bool>,
    backend: Option<IndexBackend>,
}

impl BareSettings {
    fn into_config(self) -> Option<NugetConfig> {
        if self.enabled.is_none() && self.include_prerelease.is_none() && self.backend.is_none() {
            return None;
        }
        let defaults = NugetConfig::default();
        Some(NugetConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            include_prerelease: self.include_prerelease.unwrap_or(defaults.include_prerelease),
            backend: self.backend.unwrap_or(defaults.backend),
        })
    }
}

impl NugetConfig {
    /// Extract the NuGet section from editor-provided settings.
    ///
    /// Returns `None` when the settings carry no NuGet keys.
    pub fn from_settings(value: serde_json::Value) -> Option<Self> {
        if let Ok(LspSettings { nuget: Some(config) }) =
            serde_json::from_value::<LspSettings>(value.clone())
        {
            return Some(config);
        }
        serde_json::from_value::<BareSettings>(value)
            .ok()
            .and_then(BareSettings::into_config)
    }

    /// Load settings from a JSON file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist settings as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returns the path to the data directory for nuget-lsp.
/// Uses $XDG_DATA_HOME/nuget-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/nuget-lsp,
/// or ./nuget-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_DATA_HOME").ok(),
        dirs::home_dir(),
        ".local/share",
    )
}

/// Returns the path to the config directory for nuget-lsp.
/// Same lookup as [`data_dir`], with $XDG_CONFIG_HOME and ~/.config.
pub fn config_dir() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
}

/// Returns the path to the persisted settings file.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("nuget-lsp.log")
}

fn dir_with_env(xdg_home: Option<String>, home_dir: Option<PathBuf>, fallback: &str) -> PathBuf {
    let base = xdg_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(fallback)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("nuget-lsp")
}
