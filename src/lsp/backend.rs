use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{info, warn};

use crate::commands::error::CommandError;
use crate::commands::prompt::Report;
use crate::commands::{COMMAND_IDS, NugetCommand, Orchestrator, Session};
use crate::config::NugetConfig;
use crate::lsp::code_action::generate_reverse_search_actions;
use crate::lsp::prompter::LspPrompter;
use crate::nuget::dotnet::{DotnetCli, DotnetRunner};

pub struct Backend {
    client: Client,
    dotnet: Arc<dyn DotnetRunner>,
    session: RwLock<Option<Arc<Session>>>,
    /// Why commands are unavailable, shown when one is invoked anyway
    unavailable: RwLock<Option<Report>>,
    documents: RwLock<HashMap<Url, String>>,
    active_document: RwLock<Option<Url>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self::with_runner(client, Arc::new(DotnetCli::default()))
    }

    /// Build a Backend that starts its session with a custom dotnet runner
    pub fn with_runner(client: Client, dotnet: Arc<dyn DotnetRunner>) -> Self {
        Self {
            client,
            dotnet,
            session: RwLock::new(None),
            unavailable: RwLock::new(None),
            documents: RwLock::new(HashMap::new()),
            active_document: RwLock::new(None),
        }
    }

    /// Build a Backend around an already started session
    pub fn build(client: Client, session: Session) -> Self {
        let dotnet = session.dotnet_handle();
        let backend = Self::with_runner(client, dotnet);
        Self {
            session: RwLock::new(Some(Arc::new(session))),
            ..backend
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    ..Default::default()
                },
            )),
            code_action_provider: Some(CodeActionProviderCapability::Options(
                CodeActionOptions {
                    code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                    ..Default::default()
                },
            )),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMAND_IDS.iter().map(|id| id.to_string()).collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Workspace root from the initialize request, falling back to the cwd
    fn workspace_root(params: &InitializeParams) -> PathBuf {
        let from_folders = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|folder| folder.uri.to_file_path().ok());
        #[allow(deprecated)]
        let from_root_uri = || {
            params
                .root_uri
                .as_ref()
                .and_then(|uri| uri.to_file_path().ok())
        };

        from_folders
            .or_else(from_root_uri)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    async fn start_session(&self, params: &InitializeParams) {
        if self.session.read().await.is_some() {
            return;
        }

        let config = params
            .initialization_options
            .clone()
            .and_then(NugetConfig::from_settings)
            .unwrap_or_default();
        let root = Self::workspace_root(params);

        match Session::start(config, self.dotnet.clone(), root).await {
            Ok(session) => *self.session.write().await = Some(Arc::new(session)),
            Err(err) => {
                warn!("NuGet commands unavailable: {}", err);
                *self.unavailable.write().await = err.report();
            }
        }
    }

    async fn active_file(&self) -> Option<PathBuf> {
        self.active_document
            .read()
            .await
            .as_ref()
            .and_then(|uri| uri.to_file_path().ok())
    }

    async fn open_document(&self, uri: Url, text: String) {
        self.documents.write().await.insert(uri.clone(), text);
        *self.active_document.write().await = Some(uri);
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;
        self.start_session(&params).await;
        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "nuget-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
        if let Some(report) = self.unavailable.read().await.clone() {
            self.client
                .show_message(MessageType::WARNING, report.message)
                .await;
        }
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        if let Some(session) = self.session.write().await.take() {
            match Arc::try_unwrap(session) {
                Ok(session) => session.shutdown(),
                Err(_) => info!("Session still in use at shutdown"),
            }
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.client
            .log_message(
                MessageType::LOG,
                format!("Document opened: {}", params.text_document.uri),
            )
            .await;
        self.open_document(params.text_document.uri, params.text_document.text)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // With FULL sync mode, the last content change contains the full document text
        let Some(content) = params.content_changes.into_iter().last().map(|c| c.text) else {
            return;
        };
        self.open_document(params.text_document.uri, content).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents
            .write()
            .await
            .remove(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let Some(config) = NugetConfig::from_settings(params.settings) else {
            return;
        };
        let session = self.session.read().await.clone();
        match session {
            Some(session) => {
                info!("Configuration updated: {:?}", config);
                session.update_config(config).await;
            }
            None => info!("Configuration ignored while commands are unavailable"),
        }
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let documents = self.documents.read().await;
        let Some(content) = documents.get(&params.text_document.uri) else {
            return Ok(None);
        };

        let actions = generate_reverse_search_actions(content, &params.context.diagnostics);
        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let Some(command) = NugetCommand::from_lsp(&params.command, &params.arguments) else {
            return Err(Error::invalid_params(format!(
                "Unknown command or missing argument: {}",
                params.command
            )));
        };

        let prompter = LspPrompter::new(self.client.clone());
        let session = self.session.read().await.clone();
        let Some(session) = session else {
            let report = self
                .unavailable
                .read()
                .await
                .clone()
                .or_else(|| CommandError::ToolUnavailable.report());
            if let Some(report) = report {
                self.client
                    .show_message(MessageType::WARNING, &report.message)
                    .await;
            }
            return Ok(None);
        };

        let report = Orchestrator::new(&session, &prompter)
            .with_active_file(self.active_file().await)
            .run(command)
            .await;
        Ok(report.map(|report| Value::String(report.message)))
    }
}
