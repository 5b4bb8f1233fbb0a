//! DOM adapters: page-wide theme sink and click hit chains.

use mlive_core::ThemeError;
use mlive_core::export::CONTAINER_ID;
use mlive_core::label::LabelCandidate;
use mlive_core::theme::{ColorMode, StyleSink};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Writes theme variables onto `document.documentElement`.
pub struct DocumentStyleSink {
    root: HtmlElement,
}

impl DocumentStyleSink {
    pub fn new() -> Result<Self, ThemeError> {
        let root = document()
            .and_then(|doc| doc.document_element())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| ThemeError::Sink("no document element".into()))?;
        Ok(Self { root })
    }
}

impl StyleSink for DocumentStyleSink {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), ThemeError> {
        self.root
            .style()
            .set_property(name, value)
            .map_err(|_| ThemeError::Sink(format!("could not set {name}")))
    }

    fn set_mode(&mut self, mode: ColorMode) -> Result<(), ThemeError> {
        self.root
            .set_attribute("data-theme", mode.as_str())
            .map_err(|_| ThemeError::Sink("could not set data-theme".into()))
    }
}

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Topmost element at client `(x, y)` and its ancestors, innermost first,
/// stopping at the preview container.
pub fn hit_chain(x: f64, y: f64) -> Vec<LabelCandidate> {
    let Some(doc) = document() else {
        return Vec::new();
    };
    let mut chain = Vec::new();
    let mut current: Option<Element> = doc.element_from_point(x as f32, y as f32);
    while let Some(el) = current {
        if el.id() == CONTAINER_ID {
            break;
        }
        chain.push(LabelCandidate::new(
            &el.tag_name().to_ascii_lowercase(),
            // SVG `className` is an SVGAnimatedString; read the attribute.
            &el.get_attribute("class").unwrap_or_default(),
            &el.text_content().unwrap_or_default(),
        ));
        current = el.parent_element();
    }
    chain
}

/// Blocking alert, used for export failures.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window()
        && window.alert_with_message(message).is_err()
    {
        log::error!("alert failed: {message}");
    }
}
