//! Browser download and preview plumbing
//!
//! PDF bytes become a `Blob`; a download is a temporary object URL clicked
//! through a detached anchor element.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::helpers::to_uint8_array;
use crate::wasm_log;

const PDF_MIME: &str = "application/pdf";

/// Wrap PDF bytes in a `Blob` typed `application/pdf`
pub fn pdf_blob(bytes: &[u8]) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&to_uint8_array(bytes));

    let mut options = BlobPropertyBag::new();
    options.type_(PDF_MIME);

    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Offer the bytes to the user as a file download
pub fn trigger_download(bytes: &[u8], file_name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let blob = pdf_blob(bytes)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("Created element is not an anchor"))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)?;
    wasm_log!("Download triggered: {} ({} bytes)", file_name, bytes.len());
    Ok(())
}
