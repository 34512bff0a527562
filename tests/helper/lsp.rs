//! LSP request/notification test utilities

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tower_lsp::ClientSocket;
use tower_lsp::jsonrpc::{Request, Response};
use tower_lsp::lsp_types::*;

/// Create an LSP initialize request
pub fn create_initialize_request(id: i64) -> Request {
    Request::build("initialize")
        .id(id)
        .params(serde_json::to_value(InitializeParams::default()).unwrap())
        .finish()
}

/// Create an LSP initialize request carrying a workspace folder and settings
#[allow(dead_code)]
pub fn create_initialize_request_with(id: i64, root_uri: &str, options: Value) -> Request {
    let params = InitializeParams {
        workspace_folders: Some(vec![WorkspaceFolder {
            uri: root_uri.parse().unwrap(),
            name: "workspace".to_string(),
        }]),
        initialization_options: Some(options),
        ..Default::default()
    };
    Request::build("initialize")
        .id(id)
        .params(serde_json::to_value(params).unwrap())
        .finish()
}

/// Create an LSP initialized notification
pub fn create_initialized_notification() -> Request {
    Request::build("initialized")
        .params(serde_json::to_value(InitializedParams {}).unwrap())
        .finish()
}

/// Create an LSP didOpen notification
#[allow(dead_code)]
pub fn create_did_open_notification(uri: &str, content: &str) -> Request {
    Request::build("textDocument/didOpen")
        .params(
            serde_json::to_value(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: uri.parse().unwrap(),
                    language_id: "csharp".to_string(),
                    version: 1,
                    text: content.to_string(),
                },
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP codeAction request carrying the given diagnostics
#[allow(dead_code)]
pub fn create_code_action_request(id: i64, uri: &str, diagnostics: Vec<Diagnostic>) -> Request {
    let range = diagnostics.first().map(|d| d.range).unwrap_or_default();
    Request::build("textDocument/codeAction")
        .id(id)
        .params(
            serde_json::to_value(CodeActionParams {
                text_document: TextDocumentIdentifier {
                    uri: uri.parse().unwrap(),
                },
                range,
                context: CodeActionContext {
                    diagnostics,
                    only: None,
                    trigger_kind: None,
                },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .unwrap(),
        )
        .finish()
}

/// Create a workspace/executeCommand request
#[allow(dead_code)]
pub fn create_execute_command_request(id: i64, command: &str, arguments: Vec<Value>) -> Request {
    Request::build("workspace/executeCommand")
        .id(id)
        .params(
            serde_json::to_value(ExecuteCommandParams {
                command: command.to_string(),
                arguments,
                work_done_progress_params: Default::default(),
            })
            .unwrap(),
        )
        .finish()
}

/// Create a workspace/didChangeConfiguration notification
#[allow(dead_code)]
pub fn create_did_change_configuration_notification(settings: Value) -> Request {
    Request::build("workspace/didChangeConfiguration")
        .params(serde_json::to_value(DidChangeConfigurationParams { settings }).unwrap())
        .finish()
}

/// Collect notifications in background and return a receiver
#[allow(dead_code)]
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::Receiver<Request> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        while let Some(notification) = socket.next().await {
            if tx.send(notification).await.is_err() {
                break;
            }
        }
    });

    rx
}

/// Act as the editor: answer every `window/showMessageRequest` with the
/// action whose title starts with the next entry of `choices` (dismissing
/// when none matches), and forward every server message to the receiver.
#[allow(dead_code)]
pub fn spawn_answering_client(socket: ClientSocket, choices: Vec<&str>) -> mpsc::Receiver<Request> {
    let (tx, rx) = mpsc::channel(100);
    let mut choices: Vec<String> = choices.into_iter().map(str::to_string).collect();
    choices.reverse();
    let (mut stream, mut sink) = socket.split();

    tokio::spawn(async move {
        while let Some(request) = stream.next().await {
            if request.method() == "window/showMessageRequest" {
                if let Some(id) = request.id().cloned() {
                    let params: ShowMessageRequestParams =
                        serde_json::from_value(request.params().cloned().unwrap_or_default())
                            .unwrap();
                    let choice = choices.pop().unwrap_or_default();
                    let chosen = params
                        .actions
                        .unwrap_or_default()
                        .into_iter()
                        .find(|action| !choice.is_empty() && action.title.starts_with(&choice));
                    let response = Response::from_ok(id, serde_json::to_value(chosen).unwrap());
                    if sink.send(response).await.is_err() {
                        break;
                    }
                }
            }
            if tx.send(request).await.is_err() {
                break;
            }
        }
    });

    rx
}

/// Wait for a notification with the specified method name from the receiver
#[allow(dead_code)]
pub async fn wait_for_notification(
    rx: &mut mpsc::Receiver<Request>,
    method: &str,
) -> Option<Request> {
    let timeout_duration = Duration::from_secs(5);

    loop {
        match timeout(timeout_duration, rx.recv()).await {
            Ok(Some(notification)) => {
                if notification.method() == method {
                    return Some(notification);
                }
                // Skip other notifications (like log_message)
            }
            _ => return None,
        }
    }
}
