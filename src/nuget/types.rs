//! Common types for package index queries

use std::path::{Path, PathBuf};

/// A package returned by a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCandidate {
    /// Registry-unique package id (e.g., "Newtonsoft.Json")
    pub id: String,
    /// Version reported alongside the id, usually the latest
    pub version: String,
}

impl PackageCandidate {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// A package found by reverse type search. Only the id is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSearchHit {
    pub id: String,
}

/// A change applied to one project through the dotnet CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageMutation {
    /// `dotnet add <project> package <id> --version <version>`
    Add { id: String, version: String },
    /// `dotnet remove <project> package <id>`
    Remove { id: String },
}

impl PackageMutation {
    /// Arguments passed to `dotnet` for the given project
    pub fn args(&self, project: &Path) -> Vec<String> {
        let project = project.to_string_lossy().into_owned();
        match self {
            PackageMutation::Add { id, version } => vec![
                "add".to_string(),
                project,
                "package".to_string(),
                id.clone(),
                "--version".to_string(),
                version.clone(),
            ],
            PackageMutation::Remove { id } => vec![
                "remove".to_string(),
                project,
                "package".to_string(),
                id.clone(),
            ],
        }
    }
}

/// A project whose mutation failed during the Apply phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    pub project: PathBuf,
    pub message: String,
}
