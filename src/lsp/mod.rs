//! LSP (Language Server Protocol) host for the package commands
//!
//! # Modules
//!
//! - [`backend`]: Main LSP backend implementing `LanguageServer` trait
//! - [`code_action`]: Reverse-search quick-fixes for unresolved types
//! - [`prompter`]: Prompts mapped onto `window/showMessageRequest`
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod code_action;
pub mod prompter;
pub mod server;
