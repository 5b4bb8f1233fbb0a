//! PNG export geometry and naming.
//!
//! Everything here is DOM-free: the WASM bridge feeds in the attributes it
//! reads off the live SVG and gets back the raster size, the viewBox to write
//! onto the clone, the data URI, and the download filename.

use crate::error::ExportError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Rasterization scale over the diagram's own size.
pub const SUPERSAMPLE: u32 = 3;

/// How long the blob URL stays alive for the preview window.
pub const BLOB_RETENTION: Duration = Duration::from_secs(60);

/// Element id of the preview container holding the rendered SVG.
pub const CONTAINER_ID: &str = "mermaid-container";

pub const PNG_MIME: &str = "image/png";

/// Largest canvas side browsers reliably allocate.
pub const MAX_RASTER_SIDE: u32 = 32_767;

/// A parsed SVG `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse `"min-x min-y width height"`; whitespace and commas both separate.
    pub fn parse(attr: &str) -> Option<Self> {
        let mut parts = attr
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(str::parse::<f64>);
        let min_x = parts.next()?.ok()?;
        let min_y = parts.next()?.ok()?;
        let width = parts.next()?.ok()?;
        let height = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

/// Resolved export dimensions for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub width: f64,
    pub height: f64,
    /// Set when the size came from the bounding box; must be written onto
    /// the clone so the serialized SVG keeps its dimensions.
    pub synthesized_viewbox: Option<String>,
}

impl ExportPlan {
    pub fn raster_width(&self) -> u32 {
        scaled(self.width)
    }

    pub fn raster_height(&self) -> u32 {
        scaled(self.height)
    }
}

fn scaled(v: f64) -> u32 {
    (v * f64::from(SUPERSAMPLE)).round() as u32
}

/// Find the rendered diagram to export.
///
/// `container` is the preview container if the page has one; `svg_of`
/// looks up its graphical root. Nothing is exported (and nothing is
/// downloaded) unless both exist.
pub fn locate_diagram<C, S, F>(container: Option<C>, svg_of: F) -> Result<S, ExportError>
where
    F: FnOnce(&C) -> Result<Option<S>, ExportError>,
{
    let container = container.ok_or(ExportError::MissingContainer)?;
    svg_of(&container)?.ok_or(ExportError::MissingSvg)
}

/// Determine export dimensions.
///
/// A parseable `viewbox` attribute wins; otherwise `bbox` is measured and a
/// `0 0 w h` viewBox is synthesized. Non-positive or non-finite sizes fail,
/// as do sizes whose supersampled raster exceeds [`MAX_RASTER_SIDE`].
pub fn resolve_dimensions<F>(viewbox: Option<&str>, bbox: F) -> Result<ExportPlan, ExportError>
where
    F: FnOnce() -> (f64, f64),
{
    let declared = viewbox.and_then(ViewBox::parse);
    let (width, height, synthesized_viewbox) = match declared {
        Some(vb) => {
            log::debug!("dimensions from viewBox: {}x{}", vb.width, vb.height);
            (vb.width, vb.height, None)
        }
        None => {
            let (w, h) = bbox();
            log::debug!("dimensions from bbox: {w}x{h}");
            (w, h, Some(format!("0 0 {w} {h}")))
        }
    };

    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(ExportError::InvalidDimensions);
    }
    let limit = f64::from(MAX_RASTER_SIDE);
    let factor = f64::from(SUPERSAMPLE);
    if (width * factor).round() > limit || (height * factor).round() > limit {
        log::warn!("diagram too large to rasterize: {width}x{height}");
        return Err(ExportError::InvalidDimensions);
    }

    Ok(ExportPlan {
        width,
        height,
        synthesized_viewbox,
    })
}

/// Encode serialized SVG markup as a base64 `data:` URI.
pub fn svg_data_uri(markup: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(markup.as_bytes()))
}

/// `mermaid-diagram-<timestamp>.png`, with `:` and `.` in the UTC timestamp
/// replaced by `-` and fractional seconds dropped.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("mermaid-diagram-{}.png", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// HTML for the secondary window that shows the exported image for manual
/// saving.
pub fn preview_document(filename: &str, blob_url: &str) -> String {
    let filename = escape_html(filename);
    let blob_url = escape_html(blob_url);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Mermaid Diagram - {filename}</title>
  <style>
    body {{ margin: 0; padding: 20px; background: #1a1a1a; display: flex; flex-direction: column; align-items: center; font-family: Arial, sans-serif; color: #fff; }}
    h1 {{ font-size: 18px; margin-bottom: 10px; }}
    p {{ color: #aaa; margin-bottom: 20px; }}
    img {{ max-width: 100%; border: 1px solid #444; box-shadow: 0 4px 8px rgba(0,0,0,0.3); }}
  </style>
</head>
<body>
  <h1>Export complete</h1>
  <p>Right-click the image and choose "Save image as" to save it manually.</p>
  <img src="{blob_url}" alt="Mermaid Diagram" />
</body>
</html>"#
    )
}

/// Shown instead of the preview window when the popup is blocked.
pub fn popup_blocked_message(filename: &str) -> String {
    format!(
        "Export complete!\nFile name: {filename}\n\nIf the download did not start, check whether the browser blocked the popup."
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_viewbox_separators() {
        let vb = ViewBox::parse("0 0 200 100").unwrap();
        assert_eq!((vb.width, vb.height), (200.0, 100.0));
        let vb = ViewBox::parse("-8, -8,  216.5,116").unwrap();
        assert_eq!(vb.min_x, -8.0);
        assert_eq!(vb.width, 216.5);
    }

    #[test]
    fn parse_viewbox_rejects_malformed() {
        assert_eq!(ViewBox::parse(""), None);
        assert_eq!(ViewBox::parse("0 0 200"), None);
        assert_eq!(ViewBox::parse("0 0 200 100 5"), None);
        assert_eq!(ViewBox::parse("0 0 wide 100"), None);
    }

    #[test]
    fn filename_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
        assert_eq!(export_filename(at), "mermaid-diagram-2024-05-01T12-30-45.png");
    }

    #[test]
    fn data_uri_is_base64() {
        assert_eq!(
            svg_data_uri("<svg/>"),
            "data:image/svg+xml;base64,PHN2Zy8+"
        );
    }

    #[test]
    fn data_uri_handles_utf8() {
        let uri = svg_data_uri("<text>é</text>");
        let encoded = uri.trim_start_matches("data:image/svg+xml;base64,");
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "<text>é</text>");
    }

    #[test]
    fn preview_embeds_blob_url() {
        let html = preview_document("mermaid-diagram-x.png", "blob:http://localhost/abc");
        assert!(html.contains(r#"<img src="blob:http://localhost/abc""#));
        assert!(html.contains("<title>Mermaid Diagram - mermaid-diagram-x.png</title>"));
    }
}
