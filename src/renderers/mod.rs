//! Renderers module for the EPI forms
//!
//! Templates lay documents out into a display list; the PDF page writer
//! turns any display list into bytes.

pub mod delivery_form;
pub mod display_list;
pub mod document;
pub mod options;
pub mod pdf;
pub mod risk_program;
pub mod text_metrics;

// Re-export commonly used types
pub use delivery_form::{layout, FilledRow, FormLayout, FormRow, SignatureCell};
pub use display_list::{DisplayList, DrawCommand, RenderPage};
pub use document::{
    file_name_for, file_name_for_date, program_file_name_for_date, render, render_risk_program,
    render_with, RenderedDocument,
};
pub use options::RenderOptions;
pub use pdf::{write_pdf, DocumentInfo};
