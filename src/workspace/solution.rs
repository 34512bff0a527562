//! Solution file scanner
//!
//! Extracts member project paths from solution files without a full parser.
//!
//! Format examples:
//! - `.sln`:
//!   ```text
//!   Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "App", "src\App\App.csproj", "{GUID}"
//!   ```
//! - `.slnx`:
//!   ```text
//!   <Project Path="src/App/App.csproj" />
//!   ```

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::workspace::{PROJECT_EXTENSION, normalize_path};

/// Solution file flavour, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionKind {
    /// Classic text format (`.sln`)
    Sln,
    /// XML format (`.slnx`)
    Slnx,
}

impl SolutionKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("sln") => Some(Self::Sln),
            Some("slnx") => Some(Self::Slnx),
            _ => None,
        }
    }
}

/// Scanner for project references inside solution files
pub struct SolutionScanner {
    /// Regex for `.sln` entries: `Project(...) = "name", "relative/path", ...`
    sln_project_re: Regex,
    /// Regex for `.slnx` entries: `<Project Path="relative/path" ...>`
    slnx_project_re: Regex,
}

impl SolutionScanner {
    pub fn new() -> Self {
        Self {
            sln_project_re: Regex::new(r#"Project\(.*?\) = ".*?", "(.*?)","#).unwrap(),
            slnx_project_re: Regex::new(r#"<Project\s+Path="([^"]+)""#).unwrap(),
        }
    }

    /// Raw relative paths referenced by the solution content, in file order
    pub fn project_paths<'a>(&self, content: &'a str, kind: SolutionKind) -> Vec<&'a str> {
        let re = match kind {
            SolutionKind::Sln => &self.sln_project_re,
            SolutionKind::Slnx => &self.slnx_project_re,
        };
        re.captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Member projects of a solution that exist on disk.
    ///
    /// Entries that are not `.csproj` files (solution folders, other project
    /// types) or that do not exist are dropped. An unreadable solution yields
    /// no projects.
    pub fn projects_in_solution(&self, solution: &Path) -> Vec<PathBuf> {
        let Some(kind) = SolutionKind::from_path(solution) else {
            return Vec::new();
        };

        let content = match std::fs::read_to_string(solution) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read solution {:?}: {}", solution, e);
                return Vec::new();
            }
        };

        let dir = solution.parent().unwrap_or_else(|| Path::new("."));

        self.project_paths(&content, kind)
            .into_iter()
            .map(|relative| normalize_path(&dir.join(relative.replace('\\', "/"))))
            .filter(|path| {
                let is_project =
                    path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION);
                let keep = is_project && path.is_file();
                if is_project && !keep {
                    debug!("Skipping missing project {:?} in {:?}", path, solution);
                }
                keep
            })
            .collect()
    }
}

impl Default for SolutionScanner {
    fn default() -> Self {
        Self::new()
    }
}
