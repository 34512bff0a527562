//! User interaction seam between the orchestrator and the host

#[cfg(test)]
use mockall::automock;

/// An entry in a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub detail: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Single-line rendering for hosts without a detail column
    pub fn title(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} ({})", self.label, detail),
            None => self.label.clone(),
        }
    }
}

/// Severity of a message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

/// Outcome message of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub level: ReportLevel,
    pub message: String,
}

impl Report {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Error,
            message: message.into(),
        }
    }
}

/// Host-provided prompts. Every prompt returns `None` when dismissed.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Prompter: Send + Sync {
    /// Ask for free text
    async fn input(&self, prompt: &str, placeholder: &str) -> Option<String>;

    /// Pick one item, returning its index
    async fn pick(&self, placeholder: &str, items: Vec<PickItem>) -> Option<usize>;

    /// Pick any number of items, returning their indices
    async fn pick_many(
        &self,
        placeholder: &str,
        items: Vec<PickItem>,
        preselected: Vec<usize>,
    ) -> Option<Vec<usize>>;

    /// Show a command outcome
    async fn show(&self, report: Report);
}
