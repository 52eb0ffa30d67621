//! EPI Forms WASM API
//!
//! This module provides the JavaScript-facing API for the form renderer.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `download`: Blob and download plumbing for the browser
//! - `export`: Render entry points and the `PdfDocument` handle

pub mod helpers;
pub mod download;
pub mod export;

// Re-export the public API
pub use export::{
    create_delivery_pdf, create_risk_program_pdf, delivery_file_name, download_delivery_pdf,
    download_risk_program_pdf, get_delivery_pdf_bytes, layout_delivery_form,
    validate_delivery_record, PdfDocument,
};
