//! Workspace layer
//! - discovery.rs: Finds solution and project files under a workspace root
//! - solution.rs: Extracts member projects from `.sln` / `.slnx` files
//! - project.rs: Extracts package references from `.csproj` files
//! - target.rs: Expands a selection of solutions and projects into projects

pub mod discovery;
pub mod project;
pub mod solution;
pub mod target;

use std::path::{Component, Path, PathBuf};

pub use discovery::{DiscoveredTargets, discover_targets, nearest_project};
pub use project::ProjectScanner;
pub use solution::{SolutionKind, SolutionScanner};
pub use target::{ResolutionTarget, TargetResolver};

/// Extension of C# project files
pub const PROJECT_EXTENSION: &str = "csproj";

/// Resolve `.` and `..` components without touching the file system
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
