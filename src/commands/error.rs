use thiserror::Error;

use crate::commands::prompt::Report;
use crate::config::ConfigError;
use crate::nuget::error::RegistryError;
use crate::nuget::types::TargetFailure;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(
        ".NET SDK not found. NuGet commands are disabled. Install the .NET SDK to enable them."
    )]
    ToolUnavailable,

    #[error("NuGet commands are disabled in settings.")]
    Disabled,

    #[error("No projects or solutions found in workspace.")]
    NoTargetsFound,

    #[error("{0}")]
    NoResultsFound(String),

    #[error("No NuGet packages found in selected projects.")]
    NoPackagesReferenced,

    #[error("Cancelled")]
    UserCancelled,

    #[error("{}", describe_failures(.0))]
    MutationFailed(Vec<TargetFailure>),

    #[error("Package search failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to save settings: {0}")]
    Config(#[from] ConfigError),
}

fn describe_failures(failures: &[TargetFailure]) -> String {
    let details: Vec<String> = failures
        .iter()
        .map(|f| {
            let name = f
                .project
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| f.project.display().to_string());
            format!("{}: {}", name, f.message)
        })
        .collect();
    format!(
        "Failed to update {} project(s): {}",
        failures.len(),
        details.join("; ")
    )
}

impl CommandError {
    /// Message to show the user, or `None` for a silent abort
    pub fn report(&self) -> Option<Report> {
        match self {
            CommandError::UserCancelled => None,
            CommandError::Disabled => Some(Report::info(self.to_string())),
            CommandError::ToolUnavailable
            | CommandError::NoResultsFound(_)
            | CommandError::NoPackagesReferenced => Some(Report::warning(self.to_string())),
            CommandError::NoTargetsFound
            | CommandError::MutationFailed(_)
            | CommandError::Registry(_)
            | CommandError::Config(_) => Some(Report::error(self.to_string())),
        }
    }
}
