//! The diagram source buffer.

use std::fmt;

/// Source loaded on startup: a five-node flowchart.
pub const DEFAULT_SOURCE: &str = "graph TD
    A[Start] --> B{Is it working?}
    B -- Yes --> C[Great!]
    B -- No --> D[Debug]
    D --> B";

/// The single text buffer holding the diagram source.
///
/// There is no history here; undo belongs to the editor widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole buffer. Returns `true` if the text changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text.clear();
        self.text.push_str(text);
        true
    }

    /// Replace the first literal occurrence of `needle` with `replacement`.
    ///
    /// The needle is matched as plain text, never as a pattern. Returns
    /// `true` if the buffer changed; an empty or absent needle is a no-op.
    pub fn replace_first(&mut self, needle: &str, replacement: &str) -> bool {
        if needle.is_empty() || needle == replacement {
            return false;
        }
        match self.text.find(needle) {
            Some(start) => {
                self.text
                    .replace_range(start..start + needle.len(), replacement);
                true
            }
            None => {
                log::debug!("label text {needle:?} not found in source");
                false
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
