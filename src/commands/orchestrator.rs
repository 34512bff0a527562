//! Interactive package operations driven through a [`Prompter`]
//!
//! Every operation walks the same states: SelectTargets, then SelectPackage
//! (add and reverse search only), then SelectVersion, then Apply. A dismissed
//! prompt ends the operation before anything is mutated.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::commands::NugetCommand;
use crate::commands::error::CommandError;
use crate::commands::prompt::{PickItem, Prompter, Report};
use crate::commands::session::Session;
use crate::nuget::curation::curated_versions;
use crate::nuget::error::DotnetError;
use crate::nuget::types::{PackageCandidate, PackageMutation, TargetFailure};
use crate::workspace::{discover_targets, nearest_project};

const QUERY_PLACEHOLDER: &str = "e.g. Newtonsoft.Json or MyPackage";
const QUERY_PROMPT: &str = "Enter NuGet package name";
const NOT_FOUND_PROMPT: &str = "No package found. Enter another package name";
const NOT_SELECTED_PROMPT: &str = "No package selected. Enter another package name";
const TARGETS_PLACEHOLDER: &str = "Select target project(s) or solution(s)";

pub struct Orchestrator<'a> {
    session: &'a Session,
    prompter: &'a dyn Prompter,
    active_file: Option<PathBuf>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(session: &'a Session, prompter: &'a dyn Prompter) -> Self {
        Self {
            session,
            prompter,
            active_file: None,
        }
    }

    /// File the user is editing, used to preselect the nearest project
    pub fn with_active_file(mut self, path: Option<PathBuf>) -> Self {
        self.active_file = path;
        self
    }

    /// Execute a command and show its outcome through the prompter.
    ///
    /// Returns the report that was shown, or `None` when the user cancelled.
    pub async fn run(&self, command: NugetCommand) -> Option<Report> {
        let name = command.id();
        let report = match self.execute(command).await {
            Ok(report) => {
                info!("{} completed: {}", name, report.message);
                Some(report)
            }
            Err(CommandError::UserCancelled) => {
                debug!("{} cancelled", name);
                None
            }
            Err(err) => {
                warn!("{} failed: {}", name, err);
                err.report()
            }
        };

        if let Some(report) = &report {
            self.prompter.show(report.clone()).await;
        }
        report
    }

    pub async fn execute(&self, command: NugetCommand) -> Result<Report, CommandError> {
        match command {
            NugetCommand::Add { query } => self.add_package(query).await,
            NugetCommand::Update => self.update_package().await,
            NugetCommand::Remove => self.remove_package().await,
            NugetCommand::TogglePrerelease => self.toggle_prerelease().await,
            NugetCommand::ReverseSearch { type_name } => self.reverse_search(&type_name).await,
        }
    }

    pub async fn add_package(&self, initial_query: Option<String>) -> Result<Report, CommandError> {
        let targets = self.select_targets().await?;
        let projects = self.resolve_projects(&targets)?;
        let include_prerelease = self.session.config().await.include_prerelease;

        let package = self.select_package(initial_query, include_prerelease).await?;
        let placeholder = format!("Select version of {} to install", package.id);
        let version = self
            .select_version(&package.id, include_prerelease, &placeholder)
            .await?;

        let mutation = PackageMutation::Add {
            id: package.id.clone(),
            version: version.clone(),
        };
        self.apply(&projects, &mutation).await?;

        Ok(Report::info(format!(
            "Installed {} ({}) to {}.",
            package.id,
            version,
            describe(&targets)
        )))
    }

    pub async fn update_package(&self) -> Result<Report, CommandError> {
        let targets = self.select_targets().await?;
        let projects = self.resolve_projects(&targets)?;
        let references = self.collect_references(&projects).await;

        let id = self
            .select_referenced_package(&references, "Select a package to update")
            .await?;
        let include_prerelease = self.session.config().await.include_prerelease;
        let placeholder = format!("Select version to update {} to", id);
        let version = self
            .select_version(&id, include_prerelease, &placeholder)
            .await?;

        let mutation = PackageMutation::Add {
            id: id.clone(),
            version: version.clone(),
        };
        self.apply(&referencing(&references, &id), &mutation).await?;

        Ok(Report::info(format!(
            "Updated {} to {} in {}.",
            id,
            version,
            describe(&projects)
        )))
    }

    pub async fn remove_package(&self) -> Result<Report, CommandError> {
        let targets = self.select_targets().await?;
        let projects = self.resolve_projects(&targets)?;
        let references = self.collect_references(&projects).await;

        let id = self
            .select_referenced_package(&references, "Select a package to remove")
            .await?;

        let mutation = PackageMutation::Remove { id: id.clone() };
        self.apply(&referencing(&references, &id), &mutation).await?;

        Ok(Report::info(format!(
            "Removed {} from {}.",
            id,
            describe(&projects)
        )))
    }

    pub async fn toggle_prerelease(&self) -> Result<Report, CommandError> {
        let enabled = self.session.toggle_prerelease().await?;
        let state = if enabled { "enabled" } else { "disabled" };
        Ok(Report::info(format!(
            "Include prerelease packages is now {}.",
            state
        )))
    }

    /// Find packages that contain `type_name` and install the chosen one
    pub async fn reverse_search(&self, type_name: &str) -> Result<Report, CommandError> {
        let targets = self.select_targets().await?;
        let projects = self.resolve_projects(&targets)?;
        let include_prerelease = self.session.config().await.include_prerelease;

        let hits = self
            .session
            .index()
            .search_by_type(type_name, include_prerelease)
            .await;
        if hits.is_empty() {
            return Err(CommandError::NoResultsFound(format!(
                "No NuGet packages found containing type '{}'",
                type_name
            )));
        }

        let items = hits.iter().map(|hit| PickItem::new(&hit.id)).collect();
        let placeholder = format!("Select a package containing '{}'", type_name);
        let id = self
            .prompter
            .pick(&placeholder, items)
            .await
            .and_then(|index| hits.get(index))
            .map(|hit| hit.id.clone())
            .ok_or(CommandError::UserCancelled)?;

        let placeholder = format!("Select version of {} to install", id);
        let version = self
            .select_version(&id, include_prerelease, &placeholder)
            .await?;

        let mutation = PackageMutation::Add {
            id: id.clone(),
            version: version.clone(),
        };
        self.apply(&projects, &mutation).await?;

        Ok(Report::info(format!(
            "Installed {} ({}) to {}.",
            id,
            version,
            describe(&targets)
        )))
    }

    /// SelectTargets: auto-select a lone project, otherwise prompt.
    ///
    /// Solutions alongside a single project are not offered.
    async fn select_targets(&self) -> Result<Vec<PathBuf>, CommandError> {
        let discovered = discover_targets(self.session.workspace_root());
        match discovered.projects.as_slice() {
            [] => return Err(CommandError::NoTargetsFound),
            [project] => {
                debug!("Auto-selected target {:?}", project);
                return Ok(vec![project.clone()]);
            }
            _ => {}
        }

        let candidates = discovered.all();

        let preselected = self
            .active_file
            .as_deref()
            .and_then(|file| nearest_project(file, &discovered.projects))
            .and_then(|nearest| candidates.iter().position(|c| c == nearest))
            .into_iter()
            .collect();
        let items = candidates
            .iter()
            .map(|path| target_item(path, self.session.workspace_root()))
            .collect();

        let picked = self
            .prompter
            .pick_many(TARGETS_PLACEHOLDER, items, preselected)
            .await
            .ok_or(CommandError::UserCancelled)?;

        let selected: Vec<PathBuf> = picked
            .into_iter()
            .filter_map(|index| candidates.get(index).cloned())
            .collect();
        if selected.is_empty() {
            return Err(CommandError::NoTargetsFound);
        }
        Ok(selected)
    }

    /// Expand the selection into project files, failing before any version
    /// prompt when nothing would be mutated
    fn resolve_projects(&self, targets: &[PathBuf]) -> Result<Vec<PathBuf>, CommandError> {
        let projects = self.session.targets().resolve_targets(targets);
        if projects.is_empty() {
            warn!("Selected targets {:?} contain no existing projects", targets);
            return Err(CommandError::NoTargetsFound);
        }
        Ok(projects)
    }

    /// SelectPackage: search until the user picks a result or dismisses the query prompt
    async fn select_package(
        &self,
        initial_query: Option<String>,
        include_prerelease: bool,
    ) -> Result<PackageCandidate, CommandError> {
        let mut query = match initial_query.filter(|q| !q.trim().is_empty()) {
            Some(query) => query,
            None => self.ask_query(QUERY_PROMPT).await?,
        };

        loop {
            let results = self
                .session
                .index()
                .search(&query, include_prerelease)
                .await?;
            if results.is_empty() {
                debug!("No packages found for {:?}", query);
                query = self.ask_query(NOT_FOUND_PROMPT).await?;
                continue;
            }

            let items = results
                .iter()
                .map(|p| PickItem::new(&p.id).with_detail(&p.version))
                .collect();
            let picked = self
                .prompter
                .pick("Select a NuGet package", items)
                .await
                .and_then(|index| results.get(index));

            match picked {
                Some(package) => return Ok(package.clone()),
                None => query = self.ask_query(NOT_SELECTED_PROMPT).await?,
            }
        }
    }

    async fn ask_query(&self, prompt: &str) -> Result<String, CommandError> {
        self.prompter
            .input(prompt, QUERY_PLACEHOLDER)
            .await
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or(CommandError::UserCancelled)
    }

    /// SelectVersion: an empty curated list ends the operation
    async fn select_version(
        &self,
        id: &str,
        include_prerelease: bool,
        placeholder: &str,
    ) -> Result<String, CommandError> {
        let index = self.session.index();
        let versions = curated_versions(index.as_ref(), id, include_prerelease).await?;
        if versions.is_empty() {
            return Err(CommandError::NoResultsFound(format!(
                "No versions found for package {}",
                id
            )));
        }

        let items = versions.iter().map(PickItem::new).collect();
        self.prompter
            .pick(placeholder, items)
            .await
            .and_then(|index| versions.get(index).cloned())
            .ok_or(CommandError::UserCancelled)
    }

    /// Read the package references of every project concurrently.
    /// Unreadable projects are skipped.
    async fn collect_references(
        &self,
        projects: &[PathBuf],
    ) -> Vec<(PathBuf, IndexSet<String>)> {
        let scanner = self.session.projects();
        let reads = projects.iter().map(|project| async move {
            match scanner.read_package_references(project).await {
                Ok(ids) => Some((project.clone(), ids)),
                Err(err) => {
                    debug!("Skipping unreadable project {:?}: {}", project, err);
                    None
                }
            }
        });
        join_all(reads).await.into_iter().flatten().collect()
    }

    async fn select_referenced_package(
        &self,
        references: &[(PathBuf, IndexSet<String>)],
        placeholder: &str,
    ) -> Result<String, CommandError> {
        let mut packages: Vec<String> = references
            .iter()
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        if packages.is_empty() {
            return Err(CommandError::NoPackagesReferenced);
        }
        packages.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        let items = packages.iter().map(PickItem::new).collect();
        self.prompter
            .pick(placeholder, items)
            .await
            .and_then(|index| packages.get(index).cloned())
            .ok_or(CommandError::UserCancelled)
    }

    /// Apply: run the mutation against every project concurrently and
    /// collect each failure separately
    async fn apply(
        &self,
        projects: &[PathBuf],
        mutation: &PackageMutation,
    ) -> Result<(), CommandError> {
        let dotnet = self.session.dotnet();
        let runs = projects.iter().map(|project| async move {
            let cwd = project.parent().unwrap_or_else(|| Path::new("."));
            let result = dotnet.run(&mutation.args(project), cwd).await;
            (project, result)
        });

        let failures: Vec<TargetFailure> = join_all(runs)
            .await
            .into_iter()
            .filter_map(|(project, result)| match result {
                Ok(_) => {
                    debug!("Applied {:?} to {:?}", mutation, project);
                    None
                }
                Err(err) => {
                    warn!("Failed to apply {:?} to {:?}: {}", mutation, project, err);
                    Some(TargetFailure {
                        project: project.clone(),
                        message: failure_message(err),
                    })
                }
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CommandError::MutationFailed(failures))
        }
    }
}

fn failure_message(err: DotnetError) -> String {
    match err {
        DotnetError::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
            stderr.trim().to_string()
        }
        other => other.to_string(),
    }
}

/// Projects whose references include `id`
fn referencing(references: &[(PathBuf, IndexSet<String>)], id: &str) -> Vec<PathBuf> {
    references
        .iter()
        .filter(|(_, ids)| ids.contains(id))
        .map(|(project, _)| project.clone())
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// "App.csproj" for a single target, otherwise "all selected projects"
fn describe(paths: &[PathBuf]) -> String {
    match paths {
        [single] => file_name(single),
        _ => "all selected projects".to_string(),
    }
}

fn target_item(path: &Path, root: &Path) -> PickItem {
    let label = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name(path));
    let relative = path.strip_prefix(root).unwrap_or(path);
    PickItem::new(label).with_detail(relative.display().to_string())
}
