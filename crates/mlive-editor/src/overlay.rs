//! Click-to-edit overlay for rendered labels.
//!
//! Clicking a label opens an [`EditSession`] with the label's text. Commit
//! writes the edit back into the source by replacing the first literal
//! occurrence of the original label text.
//!
//! This is best-effort: a label that appears more than once in the source
//! edits the first occurrence, and a label the renderer wrapped or escaped
//! may not be found at all (the commit is then a no-op).

use mlive_core::Document;
use mlive_core::label::{LabelCandidate, find_label};
use serde::Serialize;

/// State of the inline editor while it is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    /// Label text as rendered when the session opened.
    pub matched_text: String,
    pub current_text: String,
    /// Click position in client coordinates; the popover sits above it.
    pub anchor: (f64, f64),
}

/// What a key press inside the popover did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// `Enter`: the session closed; `changed` tells whether the source moved.
    Committed { changed: bool },
    /// `Escape`: the session closed without touching the source.
    Cancelled,
    Ignored,
}

#[derive(Debug, Default)]
pub struct Overlay {
    session: Option<EditSession>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session on `text` anchored at `(x, y)`, replacing any open one.
    pub fn open(&mut self, text: &str, x: f64, y: f64) {
        self.session = Some(EditSession {
            matched_text: text.to_string(),
            current_text: text.to_string(),
            anchor: (x, y),
        });
    }

    /// Resolve the clicked element chain (innermost first) to a label and
    /// open a session on it. Returns `false` if nothing editable was hit.
    pub fn open_at<'a, I>(&mut self, chain: I, x: f64, y: f64) -> bool
    where
        I: IntoIterator<Item = &'a LabelCandidate>,
    {
        match find_label(chain) {
            Some(text) => {
                log::debug!("editing label {text:?}");
                self.open(&text, x, y);
                true
            }
            None => false,
        }
    }

    /// Update the edited text. Ignored when no session is open.
    pub fn type_text(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.current_text.clear();
            session.current_text.push_str(text);
        }
    }

    /// Close the session, writing the edit into `document` if the text
    /// changed. Returns `true` if the document changed.
    pub fn commit(&mut self, document: &mut Document) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        if session.current_text == session.matched_text {
            return false;
        }
        document.replace_first(&session.matched_text, &session.current_text)
    }

    /// Close the session without touching the document.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// `Enter` commits, `Escape` cancels, anything else is ignored.
    pub fn handle_key(&mut self, key: &str, document: &mut Document) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        match key {
            "Enter" => KeyOutcome::Committed {
                changed: self.commit(document),
            },
            "Escape" => {
                self.cancel();
                KeyOutcome::Cancelled
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
