//! WASM bridge for Mermaid Live — exposes the session controller to the page.
//!
//! Compiled via `wasm-pack build --target web`. The host page loads
//! `mermaid` globally, wires the code editor's change event to
//! [`LiveEditor::set_text`], and repaints the preview from
//! [`LiveEditor::markup`] whenever the `on_update` callback fires.

mod dom;
mod export;
mod logger;
mod mermaid;

use gloo_timers::callback::Timeout;
use mlive_core::theme::theme_options;
use mlive_core::DEFAULT_SOURCE;
use mlive_editor::{KeyOutcome, LiveSession, RenderOutcome, Ticket};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

struct Inner {
    session: RefCell<LiveSession>,
    /// The armed debounce timer; replacing it clears the old one.
    timer: RefCell<Option<Timeout>>,
    on_update: js_sys::Function,
}

impl Inner {
    /// Tell the page that preview or document state changed. No borrows may
    /// be held here: the callback reads back through `LiveEditor`.
    fn notify(&self) {
        if let Err(e) = self.on_update.call0(&JsValue::NULL) {
            log::error!("on_update callback failed: {e:?}");
        }
    }
}

/// The page-facing controller.
///
/// Owns the document and active theme; every edit from the editor pane or
/// the label popover goes through here.
#[wasm_bindgen]
pub struct LiveEditor {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl LiveEditor {
    /// Create the controller, apply the default theme to the page, and
    /// schedule the first render. `on_update` is called with no arguments
    /// after every state change the page should repaint for.
    #[wasm_bindgen(constructor)]
    pub fn new(on_update: js_sys::Function) -> Result<LiveEditor, JsValue> {
        logger::init(log::LevelFilter::Debug);

        let session = LiveSession::new();
        let mut sink = dom::DocumentStyleSink::new().map_err(to_js)?;
        session.apply_current_theme(&mut sink).map_err(to_js)?;
        let first = session.pending_render();

        let inner = Rc::new(Inner {
            session: RefCell::new(session),
            timer: RefCell::new(None),
            on_update,
        });
        if let Some(ticket) = first {
            schedule(&inner, ticket);
        }
        Ok(Self { inner })
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// Editor-pane change: the full updated text.
    pub fn set_text(&self, text: &str) {
        let ticket = self.inner.session.borrow_mut().set_text(text);
        if let Some(ticket) = ticket {
            schedule(&self.inner, ticket);
        }
    }

    pub fn text(&self) -> String {
        self.inner.session.borrow().text().to_string()
    }

    // ─── Theme ───────────────────────────────────────────────────────────

    /// Switch theme. Unknown keys are rejected with an error.
    pub fn set_theme(&self, key: &str) -> Result<(), JsValue> {
        let mut sink = dom::DocumentStyleSink::new().map_err(to_js)?;
        let ticket = self
            .inner
            .session
            .borrow_mut()
            .set_theme(key, &mut sink)
            .map_err(to_js)?;
        schedule(&self.inner, ticket);
        self.inner.notify();
        Ok(())
    }

    pub fn theme(&self) -> String {
        self.inner.session.borrow().theme().key.to_string()
    }

    /// Theme selector entries as JSON: `[{"key":"dark","name":"Default Dark"}, ...]`.
    pub fn theme_options(&self) -> String {
        theme_options_json()
    }

    // ─── Preview ─────────────────────────────────────────────────────────

    /// Last good SVG markup, if anything has rendered yet.
    pub fn markup(&self) -> Option<String> {
        self.inner.session.borrow().markup().map(str::to_string)
    }

    pub fn error(&self) -> Option<String> {
        self.inner.session.borrow().error().map(str::to_string)
    }

    pub fn error_toast(&self) -> Option<String> {
        self.inner.session.borrow().error_toast()
    }

    // ─── Inline label editing ────────────────────────────────────────────

    /// Click inside the preview at client `(x, y)`. Returns `true` if a
    /// label was hit and the popover should open.
    pub fn handle_preview_click(&self, x: f64, y: f64) -> bool {
        let chain = dom::hit_chain(x, y);
        let opened = self.inner.session.borrow_mut().open_edit_at(&chain, x, y);
        if opened {
            self.inner.notify();
        }
        opened
    }

    /// Open popover state as JSON
    /// (`{"matchedText":..,"currentText":..,"anchor":[x,y]}`), or `""`.
    pub fn edit_session(&self) -> String {
        self.inner
            .session
            .borrow()
            .edit_session()
            .and_then(|s| serde_json::to_string(s).ok())
            .unwrap_or_default()
    }

    pub fn type_edit(&self, text: &str) {
        self.inner.session.borrow_mut().type_edit(text);
    }

    /// Commit the popover. Returns `true` if the document changed; the page
    /// should then reload the editor from [`LiveEditor::text`].
    pub fn commit_edit(&self) -> bool {
        let ticket = self.inner.session.borrow_mut().commit_edit();
        if let Some(ticket) = ticket {
            schedule(&self.inner, ticket);
        }
        self.inner.notify();
        ticket.is_some()
    }

    /// Dismiss the popover (Escape, or a click outside it).
    pub fn cancel_edit(&self) {
        if self.inner.session.borrow_mut().cancel_edit() {
            self.inner.notify();
        }
    }

    /// Key press in the popover input. Returns `"committed"`, `"cancelled"`,
    /// or `"ignored"`.
    pub fn handle_edit_key(&self, key: &str) -> String {
        let (outcome, ticket) = self.inner.session.borrow_mut().edit_key(key);
        if let Some(ticket) = ticket {
            schedule(&self.inner, ticket);
        }
        let name = match outcome {
            KeyOutcome::Committed { .. } => "committed",
            KeyOutcome::Cancelled => "cancelled",
            KeyOutcome::Ignored => return "ignored".to_string(),
        };
        self.inner.notify();
        name.to_string()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Export the rendered diagram as a PNG download. Failures are shown as
    /// alerts; returns `false` if the export could not start.
    pub fn export_png(&self) -> bool {
        let background = self.inner.session.borrow().theme().background();
        match export::export_png(background) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{e}");
                dom::alert(&e.to_string());
                false
            }
        }
    }
}

// ─── Render scheduling ───────────────────────────────────────────────────

/// Arm the debounce timer for `ticket`, clearing the previous one.
fn schedule(inner: &Rc<Inner>, ticket: Ticket) {
    let window = inner.session.borrow().debounce_window();
    let weak = Rc::downgrade(inner);
    let timeout = Timeout::new(window.as_millis() as u32, move || {
        if let Some(inner) = weak.upgrade() {
            run_render(inner, ticket);
        }
    });
    inner.timer.replace(Some(timeout));
}

fn run_render(inner: Rc<Inner>, ticket: Ticket) {
    let job = inner.session.borrow_mut().start_render(ticket);
    let Some(job) = job else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(config) = &job.reconfigure
            && let Err(e) = mermaid::configure(config)
        {
            log::error!("renderer configuration failed: {e}");
        }
        let result = mermaid::render(&job.source).await;
        let outcome = inner.session.borrow_mut().finish_render(job.cycle, result);
        match outcome {
            Some(RenderOutcome::Rendered { markup }) => {
                log::debug!(
                    "render cycle {} applied under `{}` ({} bytes)",
                    job.cycle,
                    job.theme_key,
                    markup.len()
                );
                inner.notify();
            }
            Some(RenderOutcome::Failed { .. }) => inner.notify(),
            None => {}
        }
    });
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[derive(Serialize)]
struct ThemeOption {
    key: &'static str,
    name: &'static str,
}

fn theme_options_json() -> String {
    let options: Vec<ThemeOption> = theme_options()
        .into_iter()
        .map(|(key, name)| ThemeOption { key, name })
        .collect();
    serde_json::to_string(&options).unwrap_or_else(|_| "[]".to_string())
}

// ─── Standalone functions (no controller needed) ─────────────────────────

/// The flowchart loaded on startup.
#[wasm_bindgen]
pub fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
