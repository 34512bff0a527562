//! Prompts for the command-line host
//!
//! Uses dialoguer for interactive selection. Prompts run on the blocking
//! pool so the async runtime stays responsive.

use dialoguer::{Input, MultiSelect, Select};
use tracing::warn;

use crate::commands::prompt::{PickItem, Prompter, Report, ReportLevel};

pub struct TerminalPrompter;

async fn interact<T, F>(prompt: F) -> Option<T>
where
    F: FnOnce() -> dialoguer::Result<Option<T>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(prompt).await {
        Ok(Ok(answer)) => answer,
        Ok(Err(err)) => {
            warn!("Prompt failed: {}", err);
            None
        }
        Err(err) => {
            warn!("Prompt task failed: {}", err);
            None
        }
    }
}

#[async_trait::async_trait]
impl Prompter for TerminalPrompter {
    async fn input(&self, prompt: &str, placeholder: &str) -> Option<String> {
        let prompt = format!("{} ({})", prompt, placeholder);
        interact(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map(Some)
        })
        .await
        .filter(|answer| !answer.trim().is_empty())
    }

    async fn pick(&self, placeholder: &str, items: Vec<PickItem>) -> Option<usize> {
        let prompt = placeholder.to_string();
        let labels: Vec<String> = items.iter().map(PickItem::title).collect();
        interact(move || {
            Select::new()
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact_opt()
        })
        .await
    }

    async fn pick_many(
        &self,
        placeholder: &str,
        items: Vec<PickItem>,
        preselected: Vec<usize>,
    ) -> Option<Vec<usize>> {
        let prompt = format!("{} (space to toggle, enter to confirm)", placeholder);
        let labels: Vec<String> = items.iter().map(PickItem::title).collect();
        let defaults: Vec<bool> = (0..labels.len())
            .map(|index| preselected.contains(&index))
            .collect();
        interact(move || {
            MultiSelect::new()
                .with_prompt(prompt)
                .items(&labels)
                .defaults(&defaults)
                .interact_opt()
        })
        .await
    }

    async fn show(&self, report: Report) {
        match report.level {
            ReportLevel::Info => println!("{}", report.message),
            ReportLevel::Warning => eprintln!("warning: {}", report.message),
            ReportLevel::Error => eprintln!("error: {}", report.message),
        }
    }
}
