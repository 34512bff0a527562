//! Resolution of selected solutions and projects into the projects a
//! package operation applies to

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::nuget::dedup::dedup_by_key;
use crate::workspace::PROJECT_EXTENSION;
use crate::workspace::solution::{SolutionKind, SolutionScanner};

/// A file a package operation can be aimed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionTarget {
    /// A solution, expanded into its member projects before use
    Solution(PathBuf),
    /// A project, used as-is
    Project(PathBuf),
}

impl ResolutionTarget {
    /// Classify a path by extension. Returns `None` for anything that is
    /// neither a solution nor a project.
    pub fn from_path(path: &Path) -> Option<Self> {
        if SolutionKind::from_path(path).is_some() {
            Some(Self::Solution(path.to_path_buf()))
        } else if path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION) {
            Some(Self::Project(path.to_path_buf()))
        } else {
            None
        }
    }
}

/// Expands solutions into projects
#[derive(Default)]
pub struct TargetResolver {
    solutions: SolutionScanner,
}

impl TargetResolver {
    /// Resolve a selection into project paths.
    ///
    /// Solutions are replaced in place by their existing member projects,
    /// projects are kept, and anything else is dropped. A project reached
    /// twice (directly and through a solution, or through two solutions)
    /// is kept only at its first position. Never fails: bad entries are
    /// skipped.
    pub fn resolve_targets(&self, selection: &[PathBuf]) -> Vec<PathBuf> {
        let projects = selection
            .iter()
            .filter_map(|path| {
                let target = ResolutionTarget::from_path(path);
                if target.is_none() {
                    debug!("Ignoring non-project selection {:?}", path);
                }
                target
            })
            .flat_map(|target| match target {
                ResolutionTarget::Solution(solution) => {
                    self.solutions.projects_in_solution(&solution)
                }
                ResolutionTarget::Project(project) => vec![project],
            })
            .collect();

        dedup_by_key(projects, |p: &PathBuf| p.clone())
    }
}
