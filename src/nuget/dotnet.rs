//! dotnet CLI invocation

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::nuget::error::DotnetError;

/// Runs the dotnet CLI as a subprocess
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DotnetRunner: Send + Sync {
    /// Run `dotnet <args>` in `cwd` and return stdout.
    ///
    /// A non-zero exit code becomes [`DotnetError::CommandFailed`] carrying stderr.
    async fn run(&self, args: &[String], cwd: &Path) -> Result<String, DotnetError>;

    /// Whether the dotnet CLI can be invoked at all (`dotnet --version` exits 0)
    async fn is_available(&self) -> bool;
}

/// [`DotnetRunner`] backed by a real executable
#[derive(Debug, Clone)]
pub struct DotnetCli {
    program: PathBuf,
}

impl DotnetCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DotnetCli {
    fn default() -> Self {
        Self::new("dotnet")
    }
}

#[async_trait::async_trait]
impl DotnetRunner for DotnetCli {
    async fn run(&self, args: &[String], cwd: &Path) -> Result<String, DotnetError> {
        debug!("Running {} {} in {:?}", self.program.display(), args.join(" "), cwd);

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            warn!("dotnet {} failed with code {}: {}", args.join(" "), code, stderr);
            Err(DotnetError::CommandFailed { code, stderr })
        }
    }

    async fn is_available(&self) -> bool {
        match Command::new(&self.program).arg("--version").output().await {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("{} is not available: {}", self.program.display(), e);
                false
            }
        }
    }
}
