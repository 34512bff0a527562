//! Package commands
//! - session.rs: Per-workspace context (configuration, index, dotnet runner)
//! - orchestrator.rs: Interactive add/update/remove/reverse-search flows
//! - prompt.rs: Host-provided prompts and outcome reports
//! - terminal.rs: Prompts for the command-line host
//! - error.rs: Command failures and how they are reported

pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod terminal;

use serde_json::Value;

pub use error::CommandError;
pub use orchestrator::Orchestrator;
pub use prompt::{PickItem, Prompter, Report, ReportLevel};
pub use session::Session;

pub const ADD_PACKAGE: &str = "nuget.addPackage";
pub const UPDATE_PACKAGE: &str = "nuget.updatePackage";
pub const REMOVE_PACKAGE: &str = "nuget.removePackage";
pub const TOGGLE_PRERELEASE: &str = "nuget.togglePrerelease";
pub const REVERSE_SEARCH: &str = "nuget.reverseSearch";

/// Every command id exposed to editors
pub const COMMAND_IDS: [&str; 5] = [
    ADD_PACKAGE,
    UPDATE_PACKAGE,
    REMOVE_PACKAGE,
    TOGGLE_PRERELEASE,
    REVERSE_SEARCH,
];

/// A user-invoked package operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NugetCommand {
    /// Search and install a package, optionally starting from a query
    Add { query: Option<String> },
    Update,
    Remove,
    TogglePrerelease,
    /// Find packages containing a type and install one
    ReverseSearch { type_name: String },
}

impl NugetCommand {
    pub fn id(&self) -> &'static str {
        match self {
            NugetCommand::Add { .. } => ADD_PACKAGE,
            NugetCommand::Update => UPDATE_PACKAGE,
            NugetCommand::Remove => REMOVE_PACKAGE,
            NugetCommand::TogglePrerelease => TOGGLE_PRERELEASE,
            NugetCommand::ReverseSearch { .. } => REVERSE_SEARCH,
        }
    }

    /// Build a command from a `workspace/executeCommand` request.
    ///
    /// Returns `None` for unknown ids and for a reverse search without a
    /// type name.
    pub fn from_lsp(command: &str, arguments: &[Value]) -> Option<Self> {
        let first_string = || {
            arguments
                .first()
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match command {
            ADD_PACKAGE => Some(NugetCommand::Add {
                query: first_string(),
            }),
            UPDATE_PACKAGE => Some(NugetCommand::Update),
            REMOVE_PACKAGE => Some(NugetCommand::Remove),
            TOGGLE_PRERELEASE => Some(NugetCommand::TogglePrerelease),
            REVERSE_SEARCH => {
                first_string().map(|type_name| NugetCommand::ReverseSearch { type_name })
            }
            _ => None,
        }
    }
}
