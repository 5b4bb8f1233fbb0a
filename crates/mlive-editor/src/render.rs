//! Debounced render pipeline.
//!
//! Lifecycle of one cycle:
//!
//! 1. `request` — source text or theme changed; schedule behind the debouncer.
//! 2. `start` — the host timer fired; if the ticket is still current, hand
//!    out a [`RenderJob`] (with renderer settings when the theme changed).
//! 3. `finish` — the external renderer resolved or rejected.
//!
//! A failed cycle keeps the last good markup on screen and only sets the
//! error. Results are never merged; each finished cycle replaces the last.

use crate::debounce::{Debouncer, Ticket};
use mlive_core::theme::{RendererConfig, Theme};
use std::time::Duration;

/// Quiescence window before a render actually runs.
pub const RENDER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Message used when the renderer rejects without one.
const FALLBACK_ERROR: &str = "Syntax Error";

#[derive(Debug, Clone)]
struct RenderRequest {
    source: String,
    theme: &'static Theme,
}

/// Work for the host to run against the external renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub cycle: u64,
    pub source: String,
    /// Theme the job renders under.
    pub theme_key: &'static str,
    /// Global renderer settings to install before this render, if the theme
    /// changed since the previous job.
    pub reconfigure: Option<RendererConfig>,
}

/// Result of one finished cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { markup: String },
    Failed { message: String },
}

#[derive(Debug)]
pub struct RenderPipeline {
    debounce: Debouncer<RenderRequest>,
    /// Theme the renderer was last configured for.
    configured: Option<&'static str>,
    next_cycle: u64,
    latest_finished: Option<u64>,
    markup: Option<String>,
    error: Option<String>,
    started: usize,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(RENDER_DEBOUNCE)
    }
}

impl RenderPipeline {
    pub fn new(window: Duration) -> Self {
        Self {
            debounce: Debouncer::new(window),
            configured: None,
            next_cycle: 0,
            latest_finished: None,
            markup: None,
            error: None,
            started: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.debounce.window()
    }

    /// Schedule a render of `source` under `theme`, superseding any
    /// not-yet-started request.
    pub fn request(&mut self, source: &str, theme: &'static Theme) -> Ticket {
        self.debounce.schedule(RenderRequest {
            source: source.to_string(),
            theme,
        })
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.debounce.pending_ticket()
    }

    /// Begin the cycle for `ticket`. Returns `None` if it was superseded.
    pub fn start(&mut self, ticket: Ticket) -> Option<RenderJob> {
        let request = self.debounce.fire(ticket)?;
        let reconfigure = if self.configured != Some(request.theme.key) {
            self.configured = Some(request.theme.key);
            Some(request.theme.renderer_config())
        } else {
            None
        };
        self.next_cycle += 1;
        self.started += 1;
        log::debug!(
            "render cycle {} started ({} bytes, theme `{}`)",
            self.next_cycle,
            request.source.len(),
            request.theme.key
        );
        Some(RenderJob {
            cycle: self.next_cycle,
            source: request.source,
            theme_key: request.theme.key,
            reconfigure,
        })
    }

    /// Record the renderer's answer for `cycle`.
    ///
    /// Returns the applied outcome, or `None` when a newer cycle already
    /// finished; that result is dropped so an out-of-order completion can't
    /// roll the preview back.
    pub fn finish(
        &mut self,
        cycle: u64,
        result: Result<String, String>,
    ) -> Option<RenderOutcome> {
        if self.latest_finished.is_some_and(|latest| latest >= cycle) {
            log::debug!("dropping stale result for render cycle {cycle}");
            return None;
        }
        self.latest_finished = Some(cycle);

        let outcome = match result {
            Ok(markup) => {
                self.markup = Some(markup.clone());
                self.error = None;
                RenderOutcome::Rendered { markup }
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                log::warn!("render cycle {cycle} failed: {message}");
                self.error = Some(message.clone());
                RenderOutcome::Failed { message }
            }
        };
        Some(outcome)
    }

    /// Last successfully rendered markup, kept through later failures.
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of cycles handed to the renderer so far.
    pub fn renders_started(&self) -> usize {
        self.started
    }
}

/// Text of the on-screen error toast.
pub fn error_toast_text(message: &str) -> String {
    format!("⚠️ {message}")
}
