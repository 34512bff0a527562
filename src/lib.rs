pub mod commands;
pub mod config;
pub mod logging;
pub mod lsp;
pub mod nuget;
pub mod workspace;
