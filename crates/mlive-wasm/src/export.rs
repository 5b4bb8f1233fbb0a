//! SVG → canvas → PNG export.
//!
//! Runs in three stages joined by browser callbacks: prepare (synchronous,
//! clone + serialize + start image decode), draw (image `onload`), and
//! deliver (canvas `toBlob`). Each stage reports its own failure with an
//! alert; nothing here touches the live preview or the document.

use crate::dom;
use chrono::Utc;
use gloo_timers::callback::Timeout;
use mlive_core::ExportError;
use mlive_core::export::{
    BLOB_RETENTION, CONTAINER_ID, ExportPlan, PNG_MIME, export_filename, locate_diagram,
    popup_blocked_message, preview_document, resolve_dimensions, svg_data_uri,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, CanvasRenderingContext2d, Element, HtmlAnchorElement, HtmlCanvasElement,
    HtmlImageElement, SvgGraphicsElement, Url, XmlSerializer,
};

fn dom_err(e: JsValue) -> ExportError {
    ExportError::Dom(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn canvas_err(e: JsValue) -> ExportError {
    ExportError::Canvas(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// `onload`/`onerror` for one image decode. Exactly one of them fires; it
/// detaches both and frees them once the event handler has returned.
type DecodeHandlers = Rc<RefCell<Option<(Closure<dyn FnMut()>, Closure<dyn FnMut()>)>>>;

fn release(image: &HtmlImageElement, handlers: DecodeHandlers) {
    image.set_onload(None);
    image.set_onerror(None);
    wasm_bindgen_futures::spawn_local(async move {
        handlers.borrow_mut().take();
    });
}

/// Start an export of the currently rendered diagram.
///
/// Errors up to the image decode are returned; later ones are alerted from
/// their callbacks. Concurrent exports run independently.
pub fn export_png(background: &'static str) -> Result<(), ExportError> {
    log::debug!("export started");
    let doc = dom::document().ok_or_else(|| ExportError::Dom("no document".into()))?;
    let svg = locate_diagram(doc.get_element_by_id(CONTAINER_ID), |container| {
        container.query_selector("svg").map_err(dom_err)
    })?;

    let clone: Element = svg
        .clone_node_with_deep(true)
        .map_err(dom_err)?
        .dyn_into()
        .map_err(|_| ExportError::MissingSvg)?;

    let plan = resolve_dimensions(clone.get_attribute("viewBox").as_deref(), || live_bbox(&svg))?;
    if let Some(viewbox) = &plan.synthesized_viewbox {
        clone.set_attribute("viewBox", viewbox).map_err(dom_err)?;
    }
    clone
        .set_attribute("width", &plan.width.to_string())
        .map_err(dom_err)?;
    clone
        .set_attribute("height", &plan.height.to_string())
        .map_err(dom_err)?;

    let markup = XmlSerializer::new()
        .and_then(|s| s.serialize_to_string(&clone))
        .map_err(dom_err)?;
    log::debug!("svg serialized, {} bytes", markup.len());

    let image = HtmlImageElement::new().map_err(dom_err)?;

    let handlers: DecodeHandlers = Rc::new(RefCell::new(None));

    let (loaded, slot) = (image.clone(), handlers.clone());
    let onload = Closure::once(move || {
        release(&loaded, slot);
        if let Err(e) = draw(&loaded, &plan, background) {
            log::error!("{e}");
            dom::alert(&e.to_string());
        }
    });
    let (failed, slot) = (image.clone(), handlers.clone());
    let onerror = Closure::once(move || {
        release(&failed, slot);
        let e = ExportError::ImageDecode;
        log::error!("{e}");
        dom::alert(&e.to_string());
    });
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    handlers.replace(Some((onload, onerror)));
    image.set_src(&svg_data_uri(&markup));
    log::debug!("image source set, waiting for decode");
    Ok(())
}

fn live_bbox(svg: &Element) -> (f64, f64) {
    svg.dyn_ref::<SvgGraphicsElement>()
        .and_then(|g| g.get_b_box().ok())
        .map(|rect| (f64::from(rect.width()), f64::from(rect.height())))
        .unwrap_or((0.0, 0.0))
}

fn draw(image: &HtmlImageElement, plan: &ExportPlan, background: &str) -> Result<(), ExportError> {
    let doc = dom::document().ok_or_else(|| ExportError::Dom("no document".into()))?;
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")
        .map_err(canvas_err)?
        .dyn_into()
        .map_err(|_| ExportError::Canvas("not a canvas element".into()))?;
    canvas.set_width(plan.raster_width());
    canvas.set_height(plan.raster_height());
    log::debug!("canvas created: {}x{}", canvas.width(), canvas.height());

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(canvas_err)?
        .ok_or_else(|| ExportError::Canvas("no 2d context".into()))?
        .dyn_into()
        .map_err(|_| ExportError::Canvas("no 2d context".into()))?;

    let (w, h) = (f64::from(canvas.width()), f64::from(canvas.height()));
    ctx.set_fill_style_str(background);
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w, h)
        .map_err(canvas_err)?;

    let on_blob = Closure::once_into_js(move |blob: JsValue| {
        let result = blob
            .dyn_into::<Blob>()
            .map_err(|_| ExportError::BlobCreation)
            .and_then(|blob| deliver(&blob));
        if let Err(e) = result {
            log::error!("{e}");
            dom::alert(&e.to_string());
        }
    });
    canvas
        .to_blob_with_type(on_blob.unchecked_ref(), PNG_MIME)
        .map_err(canvas_err)
}

fn deliver(blob: &Blob) -> Result<(), ExportError> {
    log::debug!("png blob created, {} bytes", blob.size());
    let window = web_sys::window().ok_or_else(|| ExportError::Dom("no window".into()))?;
    let doc = window
        .document()
        .ok_or_else(|| ExportError::Dom("no document".into()))?;
    let body = doc
        .body()
        .ok_or_else(|| ExportError::Dom("no body".into()))?;

    let filename = export_filename(Utc::now());
    let url = Url::create_object_url_with_blob(blob).map_err(dom_err)?;
    revoke_later(&url);

    let link: HtmlAnchorElement = doc
        .create_element("a")
        .map_err(dom_err)?
        .dyn_into()
        .map_err(|_| ExportError::Dom("not an anchor element".into()))?;
    link.set_download(&filename);
    link.set_href(&url);
    link.set_attribute("style", "display: none").map_err(dom_err)?;
    body.append_child(&link).map_err(dom_err)?;
    link.click();
    body.remove_child(&link).map_err(dom_err)?;
    log::info!("download triggered: {filename}");

    let preview = window
        .open_with_url_and_target("", "_blank")
        .ok()
        .flatten()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    match preview {
        Some(root) => root.set_inner_html(&preview_document(&filename, &url)),
        None => dom::alert(&popup_blocked_message(&filename)),
    }
    Ok(())
}

/// Release the blob URL after the preview window has had time to load it,
/// however delivery ends.
fn revoke_later(url: &str) {
    let retained = url.to_string();
    Timeout::new(BLOB_RETENTION.as_millis() as u32, move || {
        if Url::revoke_object_url(&retained).is_ok() {
            log::debug!("blob url released");
        }
    })
    .forget();
}
