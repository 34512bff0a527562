use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};

use nuget_lsp::commands::terminal::TerminalPrompter;
use nuget_lsp::commands::{NugetCommand, Orchestrator, ReportLevel, Session};
use nuget_lsp::config::{NugetConfig, settings_path};
use nuget_lsp::logging;
use nuget_lsp::nuget::curation::curated_versions;
use nuget_lsp::nuget::dotnet::DotnetCli;

#[derive(Parser)]
#[command(name = "nuget-lsp")]
#[command(
    version,
    about = "NuGet package management for .NET workspaces. Runs the language server when no command is given."
)]
struct Cli {
    /// Workspace root to search for solutions and projects (defaults to the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a package and install it
    Add {
        /// Package name to search for; prompted when omitted
        query: Option<String>,
    },
    /// Update a package referenced by the selected projects
    Update,
    /// Remove a package from the selected projects
    Remove,
    /// Toggle whether prerelease versions are offered
    TogglePrerelease,
    /// Find packages that contain a type and install one
    ReverseSearch { type_name: String },
    /// Print the curated version list of a package
    Versions {
        id: String,
        /// Include prerelease versions regardless of settings
        #[arg(long)]
        prerelease: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => {
            runtime.block_on(nuget_lsp::lsp::server::run_server())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(command) => runtime.block_on(run_command(command, cli.workspace)),
    }
}

async fn run_command(command: Command, workspace: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    logging::init_stderr()?;

    let root = match workspace {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let settings = settings_path();
    let config = NugetConfig::load(&settings)?;
    let session = Session::start(config, Arc::new(DotnetCli::default()), root)
        .await?
        .with_settings_path(settings);

    let command = match command {
        Command::Versions { id, prerelease } => {
            let include_prerelease = prerelease || session.config().await.include_prerelease;
            let index = session.index();
            let versions = curated_versions(index.as_ref(), &id, include_prerelease).await?;
            session.shutdown();
            if versions.is_empty() {
                bail!("No versions found for package {}", id);
            }
            for version in versions {
                println!("{version}");
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Add { query } => NugetCommand::Add { query },
        Command::Update => NugetCommand::Update,
        Command::Remove => NugetCommand::Remove,
        Command::TogglePrerelease => NugetCommand::TogglePrerelease,
        Command::ReverseSearch { type_name } => NugetCommand::ReverseSearch { type_name },
    };

    let report = Orchestrator::new(&session, &TerminalPrompter)
        .with_active_file(std::env::current_dir().ok())
        .run(command)
        .await;
    session.shutdown();

    match report {
        Some(report) if report.level == ReportLevel::Error => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}
