use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Dotnet(#[from] DotnetError),
}

#[derive(Debug, Error)]
pub enum DotnetError {
    #[error("Failed to run dotnet: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("dotnet exited with code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },
}
