//! Recursive character text splitter
//!
//! Splits text on the coarsest separator present (`"\n\n"`, `"\n"`, `" "`,
//! then single characters), recursing into pieces that are still too long,
//! and merges small pieces back into chunks with a trailing overlap.
//! Lengths are counted in characters, not bytes.

use crate::errors::{AgentError, Result};
use crate::types::Document;

/// Separators tried in order; the empty separator splits into characters
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character splitter
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    /// Create a splitter; the overlap must be smaller than the chunk size
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(AgentError::ConfigError(format!(
                "Invalid splitter settings: chunk_size={} chunk_overlap={}",
                chunk_size, chunk_overlap
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split raw text into chunks of at most `chunk_size` characters
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Split a document; every chunk inherits the document metadata
    pub fn split_document(&self, document: &Document) -> Vec<Document> {
        self.split_text(&document.content)
            .into_iter()
            .map(|chunk| Document::new(chunk, document.metadata.clone()))
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();

        // Pick the first separator present in the text
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|piece| !piece.is_empty())
                .map(String::from)
                .collect()
        };

        let mut good: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) < self.chunk_size {
                good.push(piece);
                continue;
            }

            if !good.is_empty() {
                chunks.extend(self.merge(&good, separator));
                good.clear();
            }

            if remaining.is_empty() {
                chunks.extend(self.hard_cut(&piece));
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !good.is_empty() {
            chunks.extend(self.merge(&good, separator));
        }

        chunks
    }

    /// Merge pieces (each shorter than `chunk_size`) into overlapping chunks
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joiner = if current.is_empty() { 0 } else { sep_len };

            if total + len + joiner > self.chunk_size {
                if !current.is_empty() {
                    push_trimmed(&mut chunks, &current.join(separator));

                    // Drop leading pieces until the overlap budget fits
                    while total > self.chunk_overlap
                        || (total > 0
                            && total + len + if current.is_empty() { 0 } else { sep_len }
                                > self.chunk_size)
                    {
                        let first_len = char_len(current[0]);
                        let first_joiner = if current.len() > 1 { sep_len } else { 0 };
                        total = total.saturating_sub(first_len + first_joiner);
                        current.remove(0);
                        if current.is_empty() {
                            break;
                        }
                    }
                }
            }

            let joiner = if current.is_empty() { 0 } else { sep_len };
            current.push(piece);
            total += len + joiner;
        }

        if !current.is_empty() {
            push_trimmed(&mut chunks, &current.join(separator));
        }

        chunks
    }

    /// Cut an unsplittable run at character boundaries
    fn hard_cut(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        for window in chars.chunks(self.chunk_size) {
            push_trimmed(&mut chunks, &window.iter().collect::<String>());
        }
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
