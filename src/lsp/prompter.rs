//! Prompts for the language-server host.
//!
//! LSP has no input box or quick pick, so picks become
//! `window/showMessageRequest` actions and free-text input is not available.
//! Commands that need a query take it as an argument instead.

use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageActionItem, MessageType};
use tracing::{debug, warn};

use crate::commands::prompt::{PickItem, Prompter, Report, ReportLevel};

/// Action offered by [`LspPrompter::pick_many`] to select every item
pub const SELECT_ALL: &str = "All";

pub struct LspPrompter {
    client: Client,
}

impl LspPrompter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Show `titles` as actions and return the index of the chosen one
    async fn request(&self, message: &str, titles: Vec<String>) -> Option<usize> {
        let actions = titles
            .iter()
            .map(|title| MessageActionItem {
                title: title.clone(),
                properties: Default::default(),
            })
            .collect();

        let chosen = self
            .client
            .show_message_request(MessageType::INFO, message, Some(actions))
            .await
            .inspect_err(|e| warn!("showMessageRequest failed: {}", e))
            .ok()
            .flatten()?;
        titles.iter().position(|title| *title == chosen.title)
    }
}

fn message_type(level: ReportLevel) -> MessageType {
    match level {
        ReportLevel::Info => MessageType::INFO,
        ReportLevel::Warning => MessageType::WARNING,
        ReportLevel::Error => MessageType::ERROR,
    }
}

#[async_trait::async_trait]
impl Prompter for LspPrompter {
    async fn input(&self, prompt: &str, placeholder: &str) -> Option<String> {
        debug!("Free-text input is not supported over LSP: {}", prompt);
        self.client
            .show_message(
                MessageType::INFO,
                format!("{}: pass it as the command argument ({})", prompt, placeholder),
            )
            .await;
        None
    }

    async fn pick(&self, placeholder: &str, items: Vec<PickItem>) -> Option<usize> {
        let titles = items.iter().map(PickItem::title).collect();
        self.request(placeholder, titles).await
    }

    async fn pick_many(
        &self,
        placeholder: &str,
        items: Vec<PickItem>,
        preselected: Vec<usize>,
    ) -> Option<Vec<usize>> {
        let titles = std::iter::once(SELECT_ALL.to_string())
            .chain(items.iter().enumerate().map(|(index, item)| {
                let title = item.title();
                if preselected.contains(&index) {
                    format!("{} (current)", title)
                } else {
                    title
                }
            }))
            .collect();

        match self.request(placeholder, titles).await? {
            0 => Some((0..items.len()).collect()),
            chosen => Some(vec![chosen - 1]),
        }
    }

    async fn show(&self, report: Report) {
        self.client
            .show_message(message_type(report.level), report.message)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReportLevel::Info, MessageType::INFO)]
    #[case(ReportLevel::Warning, MessageType::WARNING)]
    #[case(ReportLevel::Error, MessageType::ERROR)]
    fn message_type_matches_level(#[case] level: ReportLevel, #[case] expected: MessageType) {
        assert_eq!(message_type(level), expected);
    }
}
