//! Search result views and their text rendering.

use std::sync::Arc;

use serde::Serialize;

use super::reformulate::ENTRY_DELIMITER;
use crate::store::FaqEntry;

/// Default snippet length in characters.
pub const DEFAULT_SNIPPET_CHARS: usize = 300;

const ELLIPSIS: char = '…';

/// A short view of one search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqSnippet {
    /// 1-based rank.
    pub rank: usize,
    /// Entry text, possibly truncated.
    pub content: String,
    /// Whether `content` was cut.
    pub truncated: bool,
}

impl FaqSnippet {
    /// Builds a snippet of at most `max_chars` characters plus an ellipsis.
    pub fn from_entry(rank: usize, entry: &FaqEntry, max_chars: usize) -> Self {
        let text = entry.page_content();
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => Self {
                rank,
                content: format!("{}{ELLIPSIS}", text[..cut].trim_end()),
                truncated: true,
            },
            None => Self {
                rank,
                content: text.to_string(),
                truncated: false,
            },
        }
    }
}

fn render_blocks<'a>(header: &str, blocks: impl Iterator<Item = (usize, &'a str)>) -> String {
    let body = blocks
        .map(|(rank, content)| format!("FAQ Entry {rank}:\n{content}"))
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER);
    format!("{header}\n\n{body}")
}

/// Renders `search_faq` output for the model.
pub fn render_snippets(snippets: &[FaqSnippet]) -> String {
    if snippets.is_empty() {
        return NO_RESULTS.to_string();
    }
    render_blocks(
        &format!("Found {} relevant FAQ entries:", snippets.len()),
        snippets.iter().map(|s| (s.rank, s.content.as_str())),
    )
}

/// Renders `search_detailed_faq` output for the model.
pub fn render_entries(entries: &[Arc<FaqEntry>]) -> String {
    if entries.is_empty() {
        return NO_RESULTS.to_string();
    }
    render_blocks(
        &format!("Found {} detailed FAQ entries:", entries.len()),
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i + 1, e.page_content())),
    )
}

/// Text returned when a search finds nothing.
pub const NO_RESULTS: &str = "No relevant FAQ entries found.";
