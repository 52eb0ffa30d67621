//! EPI Forms WASM Module
//!
//! Renders the EPI (personal protective equipment) delivery control form
//! and related safety documents to PDF, in the browser or natively.

pub mod api;
pub mod diagnostics;
pub mod models;
pub mod renderers;
pub mod utils;

// Re-export commonly used types
pub use diagnostics::{check_delivery_record, Diagnostic, DiagnosticSeverity};
pub use models::*;
pub use renderers::{
    file_name_for, file_name_for_date, layout, render, render_risk_program, render_with,
    RenderOptions, RenderedDocument,
};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("EPI forms WASM module initialized");
}
