pub mod index;
pub mod lsp;
