//! Rendered documents and the top-level render entry points

use std::io::{self, Write};

use chrono::NaiveDate;

use super::delivery_form::{self, FORM_TITLE};
use super::options::RenderOptions;
use super::pdf::{write_pdf, DocumentInfo};
use super::risk_program::{self, PROGRAM_TITLE};
use crate::diagnostics::Diagnostic;
use crate::models::{DeliveryRecord, RiskProgramRecord};
use crate::utils::{dated_pdf_name, ensure_pdf_extension};

const DELIVERY_FILE_PREFIX: &str = "Entrega_EPI";
const DELIVERY_NAME_FALLBACK: &str = "Funcionario";
const PROGRAM_FILE_PREFIX: &str = "PGR";
const PROGRAM_NAME_FALLBACK: &str = "Empresa";

/// A finished PDF with the name it should be saved under
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    file_name: String,
    page_count: usize,
    diagnostics: Vec<Diagnostic>,
}

impl RenderedDocument {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the PDF to any sink (a file, a response body)
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Override the default file name; `.pdf` is appended when missing
    /// and a blank name keeps the default
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        if let Some(name) = ensure_pdf_extension(file_name) {
            self.file_name = name;
        }
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Problems worked around while rendering
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Render the control form, stamping the current local time
pub fn render(record: &DeliveryRecord) -> RenderedDocument {
    render_with(record, &RenderOptions::default())
}

/// Render the control form with explicit options
pub fn render_with(record: &DeliveryRecord, options: &RenderOptions) -> RenderedDocument {
    // Read the clock once so the footer and the metadata agree
    let generated_at = options.resolve_generated_at();
    let options = RenderOptions {
        generated_at: Some(generated_at),
        ..options.clone()
    };

    let layout = delivery_form::layout(record, &options);
    let info = DocumentInfo {
        title: options.title.clone().unwrap_or_else(|| FORM_TITLE.to_string()),
        producer: options.generator_label.clone(),
        created: generated_at,
    };
    let bytes = write_pdf(&layout.display_list, &info);

    log::info!(
        "Rendered control form for '{}' ({} page(s), {} diagnostic(s))",
        record.employee_name,
        layout.display_list.page_count(),
        layout.diagnostics.len()
    );

    RenderedDocument {
        bytes,
        file_name: file_name_for_date(record, generated_at.date()),
        page_count: layout.display_list.page_count(),
        diagnostics: layout.diagnostics,
    }
}

/// Render the two-page risk management program
pub fn render_risk_program(record: &RiskProgramRecord, options: &RenderOptions) -> RenderedDocument {
    let generated_at = options.resolve_generated_at();
    let options = RenderOptions {
        generated_at: Some(generated_at),
        ..options.clone()
    };

    let list = risk_program::layout(record, &options);
    let info = DocumentInfo {
        title: options.title.clone().unwrap_or_else(|| PROGRAM_TITLE.to_string()),
        producer: options.generator_label.clone(),
        created: generated_at,
    };

    RenderedDocument {
        bytes: write_pdf(&list, &info),
        file_name: program_file_name_for_date(record, generated_at.date()),
        page_count: list.page_count(),
        diagnostics: Vec::new(),
    }
}

/// Default file name for a control form, dated today
pub fn file_name_for(record: &DeliveryRecord) -> String {
    file_name_for_date(record, crate::utils::now_local().date())
}

/// `Entrega_EPI_<Name>_<YYYY-MM-DD>.pdf`
pub fn file_name_for_date(record: &DeliveryRecord, date: NaiveDate) -> String {
    dated_pdf_name(
        DELIVERY_FILE_PREFIX,
        &record.employee_name,
        DELIVERY_NAME_FALLBACK,
        date,
    )
}

/// `PGR_<Company>_<YYYY-MM-DD>.pdf`
pub fn program_file_name_for_date(record: &RiskProgramRecord, date: NaiveDate) -> String {
    dated_pdf_name(
        PROGRAM_FILE_PREFIX,
        &record.company_name,
        PROGRAM_NAME_FALLBACK,
        date,
    )
}
