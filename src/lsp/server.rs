use tower_lsp::{LspService, Server};
use tracing::info;

use crate::config::log_path;
use crate::logging;
use crate::lsp::backend::Backend;

/// Serve LSP over stdio until the client disconnects
pub async fn run_server() -> anyhow::Result<()> {
    let _guard = logging::init_file(&log_path())?;
    info!("Starting nuget-lsp v{}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("nuget-lsp stopped");
    Ok(())
}
