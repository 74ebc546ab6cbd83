//! Recursive character text splitter.
//!
//! Splits on the coarsest separator present (paragraph, line, word, char),
//! recursing into pieces that are still too long, then greedily merges
//! neighbouring pieces back up to `chunk_size` characters.

use std::collections::VecDeque;

use super::FaqEntry;

/// Default maximum chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 0;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits long FAQ entries into bounded chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl TextSplitter {
    /// Creates a splitter. `chunk_size` is at least 1 and the overlap is
    /// clamped below it.
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Maximum chunk length.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Splits each entry, copying its metadata onto every chunk.
    ///
    /// Entries that already fit are returned unchanged. Chunks of a split
    /// entry gain a `chunk` metadata index.
    pub fn split_entries(&self, entries: Vec<FaqEntry>) -> Vec<FaqEntry> {
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            if char_len(entry.page_content()) <= self.chunk_size {
                out.push(entry);
                continue;
            }
            for (i, chunk) in self.split_text(entry.page_content()).into_iter().enumerate() {
                let mut piece = FaqEntry::new(chunk);
                for (k, v) in entry.metadata() {
                    piece = piece.with_metadata(k.clone(), v.clone());
                }
                out.push(piece.with_metadata("chunk", i.to_string()));
            }
        }
        out
    }

    /// Splits text into chunks of at most `chunk_size` characters.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                break;
            }
            if text.contains(sep) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut pending = Vec::new();
        for split in splits {
            if char_len(&split) < self.chunk_size {
                pending.push(split);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge(&pending, separator));
                pending.clear();
            }
            if remaining.is_empty() {
                chunks.push(split);
            } else {
                chunks.extend(self.split_recursive(&split, remaining));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(&pending, separator));
        }
        chunks
    }

    fn merge(&self, splits: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        let push_doc = |docs: &mut Vec<String>, current: &VecDeque<&str>| {
            let joined = current.iter().copied().collect::<Vec<_>>().join(separator);
            let trimmed = joined.trim();
            if !trimmed.is_empty() {
                docs.push(trimmed.to_string());
            }
        };

        for split in splits {
            let len = char_len(split);
            let joiner = if current.is_empty() { 0 } else { sep_len };

            if total + len + joiner > self.chunk_size && !current.is_empty() {
                push_doc(&mut docs, &current);
                while total > self.chunk_overlap
                    || (total > 0 && total + len + sep_len > self.chunk_size)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first) + if current.is_empty() { 0 } else { sep_len };
                }
            }

            let joiner = if current.is_empty() { 0 } else { sep_len };
            current.push_back(split);
            total += len + joiner;
        }

        push_doc(&mut docs, &current);
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = TextSplitter::default();
        assert_eq!(
            splitter.split_text("Q: Hi\nA: Hello"),
            vec!["Q: Hi\nA: Hello".to_string()]
        );
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let splitter = TextSplitter::new(12, 0);
        let chunks = splitter.split_text("aaaa bbbb\n\ncccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn test_falls_back_to_words() {
        let splitter = TextSplitter::new(10, 0);
        let chunks = splitter.split_text("one two three four five");
        assert_eq!(chunks, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn test_overlap_repeats_tail() {
        let splitter = TextSplitter::new(10, 5);
        let chunks = splitter.split_text("one two three four");
        assert_eq!(chunks, vec!["one two", "two three", "three four"]);
    }

    #[test]
    fn test_split_entries_keeps_metadata() {
        let splitter = TextSplitter::new(10, 0);
        let entries = vec![
            FaqEntry::new("short").with_metadata("row", "0"),
            FaqEntry::new("one two three four five").with_metadata("row", "1"),
        ];
        let out = splitter.split_entries(entries);
        assert_eq!(out.len(), 4);
        assert!(out[0].metadata().get("chunk").is_none());
        assert_eq!(out[1].metadata().get("row").map(String::as_str), Some("1"));
        assert_eq!(out[3].metadata().get("chunk").map(String::as_str), Some("2"));
    }

    proptest! {
        #[test]
        fn prop_chunks_bounded(text in "[a-z \n]{0,400}", size in 5usize..60) {
            let splitter = TextSplitter::new(size, 0);
            for chunk in splitter.split_text(&text) {
                prop_assert!(chunk.chars().count() <= size);
                prop_assert!(!chunk.trim().is_empty());
            }
        }
    }
}
