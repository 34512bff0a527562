//! Workspace discovery of solution and project files

use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::workspace::target::ResolutionTarget;

/// Directories never searched for targets
const SKIPPED_DIRS: &[&str] = &["bin", "obj", "node_modules"];

/// Solutions and projects found under a workspace root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredTargets {
    /// Solution files, sorted by file name
    pub solutions: Vec<PathBuf>,
    /// Project files, sorted by file name
    pub projects: Vec<PathBuf>,
}

impl DiscoveredTargets {
    /// Total number of candidate targets
    pub fn len(&self) -> usize {
        self.solutions.len() + self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Solutions first, then projects
    pub fn all(&self) -> Vec<PathBuf> {
        self.solutions
            .iter()
            .chain(self.projects.iter())
            .cloned()
            .collect()
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

fn sort_by_file_name(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
}

/// Walk the workspace and collect every solution and project file
pub fn discover_targets(root: &Path) -> DiscoveredTargets {
    let mut discovered = DiscoveredTargets::default();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        match ResolutionTarget::from_path(entry.path()) {
            Some(ResolutionTarget::Solution(path)) => discovered.solutions.push(path),
            Some(ResolutionTarget::Project(path)) => discovered.projects.push(path),
            None => {}
        }
    }

    sort_by_file_name(&mut discovered.solutions);
    sort_by_file_name(&mut discovered.projects);
    discovered
}

/// Number of path steps from `from_dir` to `to`, counting `..` steps
fn path_distance(from_dir: &Path, to: &Path) -> usize {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    (from.len() - common) + (to.len() - common)
}

/// The project whose directory is closest to the given file
pub fn nearest_project<'a>(current_file: &Path, projects: &'a [PathBuf]) -> Option<&'a PathBuf> {
    projects.iter().min_by_key(|project| {
        let dir = project.parent().unwrap_or_else(|| Path::new(""));
        path_distance(dir, current_file)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn discover_targets_finds_solutions_and_projects_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let sln = touch(root, "Zeta.sln");
        let slnx = touch(root, "Alpha.slnx");
        let web = touch(root, "src/Web/Web.csproj");
        let api = touch(root, "src/Api/Api.csproj");
        touch(root, "src/Api/Program.cs");

        let result = discover_targets(root);

        assert_eq!(result.solutions, vec![slnx, sln]);
        assert_eq!(result.projects, vec![api, web]);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn discover_targets_skips_build_output_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let app = touch(root, "App/App.csproj");
        touch(root, "App/obj/App.csproj");
        touch(root, "App/bin/Debug/App.csproj");
        touch(root, ".git/App.csproj");
        touch(root, "web/node_modules/pkg/Pkg.csproj");

        let result = discover_targets(root);

        assert_eq!(result.projects, vec![app]);
        assert!(result.solutions.is_empty());
    }

    #[test]
    fn discover_targets_returns_empty_for_empty_workspace() {
        let temp_dir = TempDir::new().unwrap();

        assert!(discover_targets(temp_dir.path()).is_empty());
    }

    #[test]
    fn all_lists_solutions_before_projects() {
        let discovered = DiscoveredTargets {
            solutions: vec![PathBuf::from("/w/App.sln")],
            projects: vec![PathBuf::from("/w/App/App.csproj")],
        };

        assert_eq!(
            discovered.all(),
            vec![PathBuf::from("/w/App.sln"), PathBuf::from("/w/App/App.csproj")]
        );
    }

    #[test]
    fn nearest_project_prefers_enclosing_project() {
        let projects = vec![
            PathBuf::from("/w/src/Api/Api.csproj"),
            PathBuf::from("/w/src/Web/Web.csproj"),
        ];

        let result = nearest_project(Path::new("/w/src/Web/Pages/Index.cs"), &projects);

        assert_eq!(result, Some(&projects[1]));
    }

    #[test]
    fn nearest_project_returns_none_without_projects() {
        assert_eq!(nearest_project(Path::new("/w/Program.cs"), &[]), None);
    }
}
