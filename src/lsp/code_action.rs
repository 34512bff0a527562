//! Quick-fix generation for unresolved C# types

use serde_json::json;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Command, Diagnostic, NumberOrString,
    Position, Range,
};

use crate::commands::REVERSE_SEARCH;

/// Compiler diagnostic for "type or namespace could not be found"
const MISSING_TYPE_CODE: &str = "CS0246";
const RESHARPER_SOURCE: &str = "ReSharper";
const RESHARPER_UNRESOLVED: &str = "Cannot resolve symbol";

/// Shorter selections are never looked up
const MIN_TYPE_NAME_LEN: usize = 2;

fn is_missing_type(diagnostic: &Diagnostic) -> bool {
    matches!(&diagnostic.code, Some(NumberOrString::String(code)) if code == MISSING_TYPE_CODE)
}

fn is_resharper_unresolved(diagnostic: &Diagnostic) -> bool {
    diagnostic.source.as_deref() == Some(RESHARPER_SOURCE)
        && diagnostic.message.contains(RESHARPER_UNRESOLVED)
}

/// The diagnostic to offer a reverse search for.
///
/// A compiler CS0246 wins over a ReSharper "Cannot resolve symbol".
pub fn find_unresolved_type(diagnostics: &[Diagnostic]) -> Option<&Diagnostic> {
    diagnostics
        .iter()
        .find(|d| is_missing_type(d))
        .or_else(|| diagnostics.iter().find(|d| is_resharper_unresolved(d)))
}

/// Byte offset of an LSP position (UTF-16 columns) in `content`
fn offset_at(content: &str, position: Position) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..position.line {
        line_start += content[line_start..].find('\n')? + 1;
    }

    let line = content[line_start..].split('\n').next().unwrap_or_default();
    let mut units = 0;
    for (index, ch) in line.char_indices() {
        if units >= position.character {
            return Some(line_start + index);
        }
        units += ch.len_utf16() as u32;
    }
    Some(line_start + line.len())
}

/// Text covered by `range`, trimmed
pub fn text_in_range(content: &str, range: Range) -> Option<&str> {
    let start = offset_at(content, range.start)?;
    let end = offset_at(content, range.end)?;
    content.get(start..end).map(str::trim)
}

/// Build the "Find '<type>' on NuGet.org" quick-fix.
///
/// Returns an empty Vec when no diagnostic names an unresolved type or the
/// referenced text is too short.
pub fn generate_reverse_search_actions(
    content: &str,
    diagnostics: &[Diagnostic],
) -> Vec<CodeActionOrCommand> {
    let Some(diagnostic) = find_unresolved_type(diagnostics) else {
        return vec![];
    };

    let Some(type_name) = text_in_range(content, diagnostic.range) else {
        return vec![];
    };
    if type_name.chars().count() < MIN_TYPE_NAME_LEN {
        return vec![];
    }

    vec![CodeActionOrCommand::CodeAction(CodeAction {
        title: format!("Find '{type_name}' on NuGet.org"),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic.clone()]),
        command: Some(Command {
            title: "Find Type on NuGet.org".to_string(),
            command: REVERSE_SEARCH.to_string(),
            arguments: Some(vec![json!(type_name)]),
        }),
        is_preferred: Some(false),
        ..Default::default()
    })]
}
