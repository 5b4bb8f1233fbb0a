//! Integration tests: the static host page under `web/`.
//!
//! The page toggles the popover, its backdrop, and the error toast through
//! the `hidden` attribute, so the stylesheet must not let an element rule
//! such as `#edit-popover { display: flex }` override it.

const APP_CSS: &str = include_str!("../../../web/app.css");
const INDEX_HTML: &str = include_str!("../../../web/index.html");

/// Declarations of the first rule whose selector list is exactly `selector`.
fn rule<'a>(css: &'a str, selector: &str) -> Option<&'a str> {
    css.split('}').find_map(|block| {
        let (head, body) = block.split_once('{')?;
        (head.trim() == selector).then(|| body.trim())
    })
}

#[test]
fn hidden_attribute_wins_over_element_display() {
    let body = rule(APP_CSS, "[hidden]").expect("a [hidden] rule");
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(compact.contains("display:none!important"), "got `{body}`");
}

#[test]
fn overlay_elements_start_hidden() {
    for id in ["edit-popover", "edit-backdrop", "error-toast"] {
        let tag = INDEX_HTML
            .split('<')
            .find(|t| t.contains(&format!("id=\"{id}\"")))
            .unwrap_or_else(|| panic!("#{id} missing from index.html"));
        let tag = tag.split('>').next().unwrap_or_default();
        assert!(tag.split_whitespace().any(|a| a == "hidden"), "#{id} not hidden: <{tag}>");
    }
}

#[test]
fn popover_rule_still_lays_out_as_flex() {
    let body = rule(APP_CSS, "#edit-popover").expect("an #edit-popover rule");
    assert!(body.contains("display: flex"));
}
