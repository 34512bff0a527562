//! Project file scanner
//!
//! Finds `<PackageReference Include="..." />` elements in SDK-style project files.

use std::path::Path;

use indexmap::IndexSet;
use regex::Regex;

/// Scanner for package references inside project files
pub struct ProjectScanner {
    /// Regex for `<PackageReference ... Include="Package.Id" ...>`
    package_reference_re: Regex,
}

impl ProjectScanner {
    pub fn new() -> Self {
        Self {
            package_reference_re: Regex::new(r#"<PackageReference[^>]*Include="([^"]+)""#)
                .unwrap(),
        }
    }

    /// Package ids referenced by the project content, in document order
    pub fn package_references(&self, content: &str) -> IndexSet<String> {
        self.package_reference_re
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Read a project file and return its package references
    pub async fn read_package_references(
        &self,
        project: &Path,
    ) -> std::io::Result<IndexSet<String>> {
        let content = tokio::fs::read_to_string(project).await?;
        Ok(self.package_references(&content))
    }
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new()
    }
}
