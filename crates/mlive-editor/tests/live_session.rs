//! Integration tests: session controller ↔ render pipeline ↔ overlay.
//!
//! The renderer is simulated: a job "renders" to `<svg>{source}</svg>`, or
//! fails when the source is marked invalid.

use mlive_core::label::LabelCandidate;
use mlive_core::theme::{ColorMode, StyleSink, theme};
use mlive_core::{DEFAULT_SOURCE, ThemeError};
use mlive_editor::{KeyOutcome, LiveSession, RenderJob, RenderOutcome, Ticket};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct NullSink {
    writes: usize,
    mode: Option<ColorMode>,
}

impl StyleSink for NullSink {
    fn set_property(&mut self, _: &str, _: &str) -> Result<(), ThemeError> {
        self.writes += 1;
        Ok(())
    }

    fn set_mode(&mut self, mode: ColorMode) -> Result<(), ThemeError> {
        self.mode = Some(mode);
        Ok(())
    }
}

fn fake_render(job: &RenderJob) -> Result<String, String> {
    if job.source.contains("-->>") {
        Err("Parse error on line 2".to_string())
    } else {
        Ok(format!("<svg>{}</svg>", job.source))
    }
}

/// Fire `tickets` in order, as expired timers would, running every job that
/// starts. Returns the jobs that ran.
fn fire(session: &mut LiveSession, tickets: &[Ticket]) -> Vec<RenderJob> {
    let mut ran = Vec::new();
    for &ticket in tickets {
        if let Some(job) = session.start_render(ticket) {
            let result = fake_render(&job);
            assert!(session.finish_render(job.cycle, result).is_some());
            ran.push(job);
        }
    }
    ran
}

fn label(text: &str) -> Vec<LabelCandidate> {
    vec![
        LabelCandidate::new("p", "", text),
        LabelCandidate::new("span", "nodeLabel", text),
        LabelCandidate::new("g", "node default", text),
    ]
}

// ─── Rendering ──────────────────────────────────────────────────────────

#[test]
fn default_source_renders_once_on_startup() {
    let mut session = LiveSession::new();
    let ticket = session.pending_render().unwrap();
    let ran = fire(&mut session, &[ticket]);

    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].source, DEFAULT_SOURCE);
    assert_eq!(ran[0].theme_key, "dark");
    assert_eq!(ran[0].reconfigure, Some(theme("dark").unwrap().renderer_config()));
    assert!(!session.markup().unwrap().is_empty());
    assert_eq!(session.error(), None);
    assert_eq!(session.error_toast(), None);
}

#[test]
fn rapid_edits_collapse_to_one_render_of_final_text() {
    let mut session = LiveSession::new();
    let initial = session.pending_render().unwrap();
    let tickets: Vec<Ticket> = ["graph LR", "graph LR\n  A", "graph LR\n  A --> B"]
        .iter()
        .filter_map(|text| session.set_text(text))
        .collect();
    assert_eq!(tickets.len(), 3);

    let mut all = vec![initial];
    all.extend(tickets);
    let ran = fire(&mut session, &all);

    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].source, "graph LR\n  A --> B");
    assert_eq!(session.renders_started(), 1);
    assert_eq!(session.markup(), Some("<svg>graph LR\n  A --> B</svg>"));
}

#[test]
fn render_error_keeps_previous_preview() {
    let mut session = LiveSession::new();
    let t = session.pending_render().unwrap();
    fire(&mut session, &[t]);
    let good = session.markup().unwrap().to_string();

    let t = session.set_text("graph TD\n  A -->> B").unwrap();
    fire(&mut session, &[t]);

    assert_eq!(session.markup(), Some(good.as_str()));
    assert_eq!(session.error(), Some("Parse error on line 2"));
    assert_eq!(
        session.error_toast().as_deref(),
        Some("⚠️ Parse error on line 2")
    );

    let t = session.set_text("graph TD\n  A --> B").unwrap();
    fire(&mut session, &[t]);
    assert_eq!(session.error(), None);
}

#[test]
fn slow_render_finishing_late_is_dropped() {
    let mut session = LiveSession::new();
    let t = session.pending_render().unwrap();
    let slow = session.start_render(t).unwrap();

    let t = session.set_text("graph LR\n  A --> B").unwrap();
    let fast = session.start_render(t).unwrap();
    assert_eq!(
        session.finish_render(fast.cycle, fake_render(&fast)),
        Some(RenderOutcome::Rendered {
            markup: "<svg>graph LR\n  A --> B</svg>".into()
        })
    );

    assert_eq!(session.finish_render(slow.cycle, fake_render(&slow)), None);
    assert_eq!(session.markup(), Some("<svg>graph LR\n  A --> B</svg>"));
}

// ─── Theme ──────────────────────────────────────────────────────────────

#[test]
fn theme_change_reconfigures_and_rerenders() {
    let mut session = LiveSession::new();
    let t = session.pending_render().unwrap();
    fire(&mut session, &[t]);

    let mut sink = NullSink::default();
    let t = session.set_theme("forest", &mut sink).unwrap();
    assert_eq!(sink.writes, 7);
    assert_eq!(sink.mode, Some(ColorMode::Dark));

    let ran = fire(&mut session, &[t]);
    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].theme_key, "forest");
    assert_eq!(
        ran[0].reconfigure,
        Some(theme("forest").unwrap().renderer_config())
    );
    assert_eq!(session.theme().key, "forest");
}

#[test]
fn unknown_theme_is_rejected() {
    let mut session = LiveSession::new();
    let mut sink = NullSink::default();
    let err = session.set_theme("neon", &mut sink).unwrap_err();
    assert_eq!(err, ThemeError::Unknown("neon".into()));
    assert_eq!(session.theme().key, "dark");
    assert_eq!(sink.writes, 0);
}

// ─── Inline label editing ───────────────────────────────────────────────

#[test]
fn commit_replaces_the_single_occurrence() {
    let mut session = LiveSession::new();
    let before = session.text().to_string();
    assert_eq!(before.matches("Debug").count(), 1);

    assert!(session.open_edit_at(&label("Debug"), 120.0, 80.0));
    session.type_edit("Investigate");
    let ticket = session.commit_edit();

    assert!(ticket.is_some());
    assert_eq!(session.text(), before.replacen("Debug", "Investigate", 1));
    assert_eq!(session.text().len(), before.len() + "Investigate".len() - "Debug".len());
    assert!(session.edit_session().is_none());
}

#[test]
fn cancel_leaves_document_untouched() {
    let mut session = LiveSession::new();
    let before = session.text().to_string();

    assert!(session.open_edit_at(&label("Great!"), 0.0, 0.0));
    session.type_edit("Awesome!");
    assert!(session.cancel_edit());

    assert_eq!(session.text().as_bytes(), before.as_bytes());
    assert!(session.edit_session().is_none());
}

#[test]
fn enter_and_escape_keys() {
    let mut session = LiveSession::new();
    assert!(session.open_edit_at(&label("Start"), 0.0, 0.0));
    session.type_edit("Begin");
    let (outcome, ticket) = session.edit_key("Enter");
    assert_eq!(outcome, KeyOutcome::Committed { changed: true });
    assert!(ticket.is_some());
    assert!(session.text().contains("A[Begin]"));

    assert!(session.open_edit_at(&label("Begin"), 0.0, 0.0));
    session.type_edit("Nope");
    let (outcome, ticket) = session.edit_key("Escape");
    assert_eq!(outcome, KeyOutcome::Cancelled);
    assert_eq!(ticket, None);
    assert!(session.text().contains("A[Begin]"));
}

#[test]
fn click_off_label_opens_nothing() {
    let mut session = LiveSession::new();
    let chain = vec![
        LabelCandidate::new("path", "flowchart-link", ""),
        LabelCandidate::new("svg", "flowchart", ""),
    ];
    assert!(!session.open_edit_at(&chain, 0.0, 0.0));
    assert!(session.edit_session().is_none());
}

#[test]
fn transformed_label_commit_is_noop() {
    let mut session = LiveSession::new();
    let before = session.text().to_string();
    assert!(session.open_edit_at(&label("Is it\nworking?"), 0.0, 0.0));
    session.type_edit("Does it work?");
    assert_eq!(session.commit_edit(), None);
    assert_eq!(session.text(), before);
}
