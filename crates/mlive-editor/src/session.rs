//! Root controller: owns the document and the active theme.
//!
//! `LiveSession` is the only writer of the document. Editor-pane edits come
//! in through [`LiveSession::set_text`], overlay commits through
//! [`LiveSession::commit_edit`]; both schedule a render. The host drives the
//! returned [`Ticket`]s with a real timer and feeds renderer results back.

use crate::debounce::Ticket;
use crate::overlay::{EditSession, KeyOutcome, Overlay};
use crate::render::{RenderJob, RenderOutcome, RenderPipeline, error_toast_text};
use mlive_core::label::LabelCandidate;
use mlive_core::theme::{self, StyleSink, Theme};
use mlive_core::{Document, ThemeError};
use std::time::Duration;

#[derive(Debug)]
pub struct LiveSession {
    document: Document,
    theme: &'static Theme,
    pipeline: RenderPipeline,
    overlay: Overlay,
}

impl Default for LiveSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveSession {
    /// Start on the default flowchart and theme, with its first render
    /// already requested (see [`LiveSession::pending_render`]).
    pub fn new() -> Self {
        Self::with_document(Document::default())
    }

    fn with_document(document: Document) -> Self {
        let mut pipeline = RenderPipeline::default();
        let theme = theme::default_theme();
        pipeline.request(document.text(), theme);
        Self {
            document,
            theme,
            pipeline,
            overlay: Overlay::new(),
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        self.document.text()
    }

    /// Apply an edit from the editor pane. Returns the render ticket, or
    /// `None` if the text is unchanged.
    pub fn set_text(&mut self, text: &str) -> Option<Ticket> {
        if !self.document.set_text(text) {
            return None;
        }
        Some(self.request_render())
    }

    // ─── Theme ───────────────────────────────────────────────────────────

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    /// Switch theme: write it to `sink` and re-render under it. An unknown
    /// key is rejected before anything changes.
    pub fn set_theme<S: StyleSink + ?Sized>(
        &mut self,
        key: &str,
        sink: &mut S,
    ) -> Result<Ticket, ThemeError> {
        let theme = theme::apply_theme_key(key, sink)?;
        self.theme = theme;
        Ok(self.request_render())
    }

    /// Write the current theme to `sink` (page startup).
    pub fn apply_current_theme<S: StyleSink + ?Sized>(&self, sink: &mut S) -> Result<(), ThemeError> {
        theme::apply_theme(self.theme, sink)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn debounce_window(&self) -> Duration {
        self.pipeline.window()
    }

    fn request_render(&mut self) -> Ticket {
        self.pipeline.request(self.document.text(), self.theme)
    }

    /// Ticket of the request waiting on the debounce timer, if any.
    pub fn pending_render(&self) -> Option<Ticket> {
        self.pipeline.pending_ticket()
    }

    /// The debounce timer for `ticket` expired.
    pub fn start_render(&mut self, ticket: Ticket) -> Option<RenderJob> {
        self.pipeline.start(ticket)
    }

    /// Feed back the renderer's answer. `None` means the result was stale
    /// and nothing changed.
    pub fn finish_render(
        &mut self,
        cycle: u64,
        result: Result<String, String>,
    ) -> Option<RenderOutcome> {
        self.pipeline.finish(cycle, result)
    }

    pub fn markup(&self) -> Option<&str> {
        self.pipeline.markup()
    }

    pub fn error(&self) -> Option<&str> {
        self.pipeline.error()
    }

    pub fn error_toast(&self) -> Option<String> {
        self.pipeline.error().map(error_toast_text)
    }

    pub fn renders_started(&self) -> usize {
        self.pipeline.renders_started()
    }

    // ─── Inline label editing ────────────────────────────────────────────

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.overlay.session()
    }

    /// Open the editor on the label under a click, if there is one.
    pub fn open_edit_at(&mut self, chain: &[LabelCandidate], x: f64, y: f64) -> bool {
        self.overlay.open_at(chain, x, y)
    }

    pub fn type_edit(&mut self, text: &str) {
        self.overlay.type_text(text);
    }

    /// Commit the open edit. Returns a render ticket if the document changed.
    pub fn commit_edit(&mut self) -> Option<Ticket> {
        if self.overlay.commit(&mut self.document) {
            Some(self.request_render())
        } else {
            None
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.overlay.cancel()
    }

    /// Route a key press from the popover input.
    pub fn edit_key(&mut self, key: &str) -> (KeyOutcome, Option<Ticket>) {
        let outcome = self.overlay.handle_key(key, &mut self.document);
        let ticket = match outcome {
            KeyOutcome::Committed { changed: true } => Some(self.request_render()),
            _ => None,
        };
        (outcome, ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlive_core::theme::DEFAULT_THEME;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_default_render_pending() {
        let session = LiveSession::new();
        assert_eq!(session.theme().key, DEFAULT_THEME);
        assert!(session.pending_render().is_some());
        assert_eq!(session.renders_started(), 0);
    }

    #[test]
    fn identical_text_schedules_nothing() {
        let mut session = LiveSession::new();
        let text = session.text().to_string();
        assert_eq!(session.set_text(&text), None);
    }
}
