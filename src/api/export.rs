//! Export operations for the WASM API
//!
//! This module turns JavaScript records into documents:
//! - Control form: the EPI delivery form, as a document handle, raw bytes, or a download
//! - Layout JSON: the display list, for previews and debugging
//! - Risk program: the two-page PGR sample

use wasm_bindgen::prelude::*;
use web_sys::Blob;

use super::download::{pdf_blob, trigger_download};
use super::helpers::{deserialize_json, deserialize_json_or_default, serialize, to_uint8_array};
use crate::diagnostics::{check_delivery_record, has_errors};
use crate::models::{DeliveryRecord, RiskProgramRecord};
use crate::renderers::{self, RenderOptions, RenderedDocument};
use crate::utils::ensure_pdf_extension;
use crate::{wasm_info, wasm_log, wasm_warn};

// ============================================================================
// Document Handle
// ============================================================================

/// A rendered PDF held on the WASM side
#[wasm_bindgen]
pub struct PdfDocument {
    inner: RenderedDocument,
}

impl From<RenderedDocument> for PdfDocument {
    fn from(inner: RenderedDocument) -> Self {
        Self { inner }
    }
}

#[wasm_bindgen]
impl PdfDocument {
    /// PDF bytes as a `Uint8Array`
    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&self) -> js_sys::Uint8Array {
        to_uint8_array(self.inner.as_bytes())
    }

    /// PDF as a `Blob`, e.g. for an `<iframe>` preview
    #[wasm_bindgen(js_name = toBlob)]
    pub fn to_blob(&self) -> Result<Blob, JsValue> {
        pdf_blob(self.inner.as_bytes())
    }

    /// Download the PDF, under `file_name` or the default name
    pub fn save(&self, file_name: Option<String>) -> Result<(), JsValue> {
        let name = file_name
            .as_deref()
            .and_then(ensure_pdf_extension)
            .unwrap_or_else(|| self.inner.file_name().to_string());
        trigger_download(self.inner.as_bytes(), &name)
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.inner.file_name().to_string()
    }

    #[wasm_bindgen(getter, js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    /// Problems worked around while rendering (e.g. unreadable signatures)
    pub fn diagnostics(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.diagnostics(), "Failed to serialize diagnostics")
    }
}

fn render_delivery(record: JsValue, options: JsValue) -> Result<RenderedDocument, JsValue> {
    let record: DeliveryRecord = deserialize_json(&record, "Invalid delivery record")?;
    let options: RenderOptions = deserialize_json_or_default(&options, "Invalid render options")?;

    wasm_log!(
        "Rendering control form for '{}' ({} line(s), {} item(s))",
        record.employee_name,
        record.equipment.len(),
        record.total_quantity()
    );

    let document = renderers::render_with(&record, &options);
    for diagnostic in document.diagnostics() {
        wasm_warn!("{}: {}", diagnostic.path, diagnostic.message);
    }
    Ok(document)
}

// ============================================================================
// Control Form
// ============================================================================

/// Render the control form for a delivery
#[wasm_bindgen(js_name = createDeliveryPdf)]
pub fn create_delivery_pdf(record: JsValue, options: JsValue) -> Result<PdfDocument, JsValue> {
    wasm_info!("createDeliveryPdf called");
    let document = render_delivery(record, options)?;
    wasm_info!(
        "createDeliveryPdf completed: {} ({} bytes)",
        document.file_name(),
        document.as_bytes().len()
    );
    Ok(document.into())
}

/// Render the control form and download it immediately
#[wasm_bindgen(js_name = downloadDeliveryPdf)]
pub fn download_delivery_pdf(record: JsValue, file_name: Option<String>) -> Result<(), JsValue> {
    wasm_info!("downloadDeliveryPdf called");
    let document: PdfDocument = render_delivery(record, JsValue::UNDEFINED)?.into();
    document.save(file_name)
}

/// Render the control form and return the raw PDF bytes
#[wasm_bindgen(js_name = getDeliveryPdfBytes)]
pub fn get_delivery_pdf_bytes(record: JsValue) -> Result<js_sys::Uint8Array, JsValue> {
    wasm_info!("getDeliveryPdfBytes called");
    let document = render_delivery(record, JsValue::UNDEFINED)?;
    Ok(to_uint8_array(document.as_bytes()))
}

/// Lay out the control form without encoding it
///
/// # Returns
/// The display list as a plain object (pages of tagged draw commands)
#[wasm_bindgen(js_name = layoutDeliveryForm)]
pub fn layout_delivery_form(record: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let record: DeliveryRecord = deserialize_json(&record, "Invalid delivery record")?;
    let options: RenderOptions = deserialize_json_or_default(&options, "Invalid render options")?;

    let layout = renderers::layout(&record, &options);
    wasm_log!(
        "layoutDeliveryForm: {} row(s) on {} page(s)",
        layout.rows.len(),
        layout.display_list.page_count()
    );
    serialize(&layout.display_list, "Failed to serialize display list")
}

/// Default download name for a delivery, dated today
#[wasm_bindgen(js_name = deliveryFileName)]
pub fn delivery_file_name(record: JsValue) -> Result<String, JsValue> {
    let record: DeliveryRecord = deserialize_json(&record, "Invalid delivery record")?;
    Ok(renderers::file_name_for(&record))
}

/// Check a delivery record before printing it
///
/// # Returns
/// Array of `{ path, severity, kind, message }`
#[wasm_bindgen(js_name = validateDeliveryRecord)]
pub fn validate_delivery_record(record: JsValue) -> Result<JsValue, JsValue> {
    let record: DeliveryRecord = deserialize_json(&record, "Invalid delivery record")?;
    let diagnostics = check_delivery_record(&record);
    if has_errors(&diagnostics) {
        wasm_warn!("validateDeliveryRecord: record is not printable as-is");
    }
    wasm_log!("validateDeliveryRecord: {} diagnostic(s)", diagnostics.len());
    serialize(&diagnostics, "Failed to serialize diagnostics")
}

// ============================================================================
// Risk Program
// ============================================================================

fn render_program(record: JsValue, options: JsValue) -> Result<RenderedDocument, JsValue> {
    let record: RiskProgramRecord = deserialize_json_or_default(&record, "Invalid program record")?;
    let options: RenderOptions = deserialize_json_or_default(&options, "Invalid render options")?;
    wasm_log!("Rendering PGR for '{}'", record.company_name);
    Ok(renderers::render_risk_program(&record, &options))
}

/// Render the risk management program; every field of `record` is optional
#[wasm_bindgen(js_name = createRiskProgramPdf)]
pub fn create_risk_program_pdf(record: JsValue, options: JsValue) -> Result<PdfDocument, JsValue> {
    wasm_info!("createRiskProgramPdf called");
    Ok(render_program(record, options)?.into())
}

/// Render the risk management program and download it immediately
#[wasm_bindgen(js_name = downloadRiskProgramPdf)]
pub fn download_risk_program_pdf(record: JsValue, file_name: Option<String>) -> Result<(), JsValue> {
    wasm_info!("downloadRiskProgramPdf called");
    let document: PdfDocument = render_program(record, JsValue::UNDEFINED)?.into();
    document.save(file_name)
}
