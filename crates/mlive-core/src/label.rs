//! Label lookup for click-to-edit.
//!
//! Given the element under the pointer and its ancestors, find the nearest
//! element that carries label text. Matching is by tag name or class; the
//! renderer exposes no mapping from rendered labels back to source spans, so
//! the label's text content is what gets matched against the source.

/// Classes mermaid puts on label containers.
pub const LABEL_CLASSES: [&str; 3] = ["nodeLabel", "edgeLabel", "label"];

/// Elements that hold label text directly (`text` for SVG, the others for
/// `foreignObject` HTML labels).
pub const LABEL_TAGS: [&str; 3] = ["p", "span", "text"];

/// One element of the hit chain, as seen by the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCandidate {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
}

impl LabelCandidate {
    pub fn new(tag: &str, class_attr: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: class_attr.split_whitespace().map(str::to_string).collect(),
            text: text.to_string(),
        }
    }
}

/// Whether an element with this tag and class list is label-bearing.
pub fn is_label_element<S: AsRef<str>>(tag: &str, classes: &[S]) -> bool {
    LABEL_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
        || classes
            .iter()
            .any(|c| LABEL_CLASSES.contains(&c.as_ref()))
}

/// Walk `chain` (innermost first) to the nearest label-bearing element and
/// return its trimmed text.
///
/// Returns `None` when no label element is found or the nearest one has no
/// visible text; outer labels are not consulted in that case.
pub fn find_label<'a, I>(chain: I) -> Option<String>
where
    I: IntoIterator<Item = &'a LabelCandidate>,
{
    let label = chain
        .into_iter()
        .find(|el| is_label_element(&el.tag, &el.classes))?;
    let text = label.text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
