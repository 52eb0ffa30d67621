//! EPI control form ("Ficha de Controle de EPI") layout
//!
//! The form is a fixed positional grid on an A4 page:
//!
//! 1. title band and rule
//! 2. identity block (name, job title, registration, admission date)
//! 3. legal declaration with the employee signature box beside it
//! 4. equipment table, continuing on new pages with a repeated header
//! 5. footer with generator, timestamp and history count
//!
//! Layout happens in two passes. `build_rows` turns the record into a typed
//! row model (resolving signature images on the way), then `paint` places
//! the fixed grid and the rows into a `DisplayList`.

use std::collections::HashMap;

use serde::Serialize;

use super::display_list::{Color, DisplayList, DrawCommand, ImageId, RenderPage, TextAlign};
use super::options::RenderOptions;
use super::text_metrics::{line_height, split_to_width, truncate_with_ellipsis};
use crate::diagnostics::Diagnostic;
use crate::models::{DeliveryRecord, EntryStatus, SignatureImage};
use crate::utils::{format_date_br, format_timestamp_br};

pub const FORM_TITLE: &str = "FICHA DE CONTROLE DE EPI";

pub const DECLARATION_TEXT: &str = "DECLARO ter recebido pela Lei Federal o(s) Equipamento(s) de Proteção Individual - EPIs, abaixo especificado(s) nos termos do artigo 166 e 167 da CLT, com redação dada pela Lei no 6.514/77, objetivando a proteção da incolumidade física, bem como a neutralização de possíveis agentes insalubres conforme o art. 191, inciso II, da norma jurídica mencionada, e ainda, o treinamento para o uso correto do(s) mesmo(s). COMPROMETO-ME a utilizá-los sempre para os fins a que se destinam, estando ciente que o não uso incorrerá contra a minha pessoa em ato faltoso, sujeitando-me às penalidades legais. RESPONSABILIZO-ME por sua guarda, conservação, uso correto, e a devolução ao SESMT ou superior hierárquico ou Técnico em Segurança do Trabalho caso ocorra qualquer alteração que o torne impróprio para o uso, sendo possível a retirada ou troca de EPI sempre que necessário, indenizando a empresa no caso de perda, extravio ou danos por uso incorreto (art. 462, parágrafo 1º, da CLT), e, a comunicação de qualquer equipamento.";

/// Printed where a date is to be filled in by hand
pub const DATE_BLANK: &str = "___/___/____";

/// Printed in a signature cell without an image
pub const SIGNATURE_BLANK: &str = "_________";

/// Equipment names longer than this are cut with an ellipsis
pub const EQUIPMENT_NAME_MAX_CHARS: usize = 15;

// Grid, in millimetres
const LEFT: f32 = 20.0;
const RIGHT: f32 = 190.0;
const CONTENT_WIDTH: f32 = RIGHT - LEFT;
const RULE_WIDTH: f32 = 0.5;

const IDENTITY_TOP: f32 = 35.0;
const IDENTITY_HEIGHT: f32 = 30.0;
const IDENTITY_DIVIDERS: [f32; 3] = [70.0, 110.0, 150.0];

const DECLARATION_TOP: f32 = 80.0;
const DECLARATION_WIDTH: f32 = 130.0;
const DECLARATION_HEIGHT: f32 = 40.0;
const DECLARATION_WRAP: f32 = 125.0;
const DECLARATION_SIZE: f32 = 7.0;
const SIGNATURE_BOX_X: f32 = 155.0;
const SIGNATURE_BOX_WIDTH: f32 = 35.0;

const TABLE_TOP: f32 = 130.0;
const CONTINUATION_TABLE_TOP: f32 = 20.0;
const HEADER_HEIGHT: f32 = 15.0;
const ROW_HEIGHT: f32 = 15.0;
/// A body row must end at or above this line
const TABLE_BOTTOM: f32 = 262.0;
const COLUMN_DIVIDERS: [f32; 5] = [45.0, 70.0, 110.0, 135.0, 155.0];

const FOOTER_GAP: f32 = 20.0;

const PLACEHOLDER_GRAY: Color = Color::gray(150);
const FOOTER_GRAY: Color = Color::gray(100);
const BIOMETRIC_GREEN: Color = Color::rgb(0, 120, 0);

/// What goes in the signature column of a row
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "image", rename_all = "snake_case")]
pub enum SignatureCell {
    Image(ImageId),
    Blank,
}

/// A table row carrying data
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FilledRow {
    pub delivery_date: String,
    /// Print a return-date blank (returned items)
    pub return_pending: bool,
    pub quantity: String,
    /// Already truncated for the column
    pub equipment: String,
    pub certificate_code: String,
    pub reason: String,
    pub signature: SignatureCell,
    pub biometric: bool,
}

/// One row of the equipment table
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormRow {
    Filled(FilledRow),
    /// Blank row for physical filling
    Placeholder,
}

impl FormRow {
    pub fn as_filled(&self) -> Option<&FilledRow> {
        match self {
            FormRow::Filled(row) => Some(row),
            FormRow::Placeholder => None,
        }
    }
}

/// Result of laying out a control form
#[derive(Serialize, Clone, Debug)]
pub struct FormLayout {
    /// Table rows in print order
    pub rows: Vec<FormRow>,

    /// Image stamped in the declaration signature box
    pub declaration_signature: Option<ImageId>,

    /// Count printed in the footer, when a history is attached
    pub history_count: Option<usize>,

    pub display_list: DisplayList,

    /// Problems worked around while laying out
    pub diagnostics: Vec<Diagnostic>,
}

impl FormLayout {
    pub fn filled_rows(&self) -> impl Iterator<Item = &FilledRow> {
        self.rows.iter().filter_map(FormRow::as_filled)
    }
}

/// Decodes signatures into the display list, once per distinct payload
struct SignatureResolver<'a> {
    list: &'a mut DisplayList,
    diagnostics: &'a mut Vec<Diagnostic>,
    cache: HashMap<String, Option<ImageId>>,
}

impl<'a> SignatureResolver<'a> {
    fn new(list: &'a mut DisplayList, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            list,
            diagnostics,
            cache: HashMap::new(),
        }
    }

    fn resolve(&mut self, signature: &SignatureImage, path: &str) -> Option<ImageId> {
        if let Some(cached) = self.cache.get(signature.as_str()) {
            return *cached;
        }

        let resolved = match signature.decode() {
            Ok(raster) => Some(self.list.add_image(raster)),
            Err(err) => {
                log::warn!("Skipping unreadable signature at {}: {}", path, err);
                self.diagnostics.push(Diagnostic::warning(
                    path,
                    "signature_unreadable",
                    format!("Signature could not be embedded: {}", err),
                ));
                None
            }
        };

        self.cache.insert(signature.as_str().to_string(), resolved);
        resolved
    }
}

/// Lay out the control form for `record`
pub fn layout(record: &DeliveryRecord, options: &RenderOptions) -> FormLayout {
    let mut display_list = DisplayList::new();
    let mut diagnostics = Vec::new();

    let (declaration_signature, rows) = {
        let mut resolver = SignatureResolver::new(&mut display_list, &mut diagnostics);
        let declaration_signature = record
            .signature
            .as_ref()
            .and_then(|signature| resolver.resolve(signature, "signatureData"));
        let rows = build_rows(record, declaration_signature, &mut resolver, options.minimum_rows);
        (declaration_signature, rows)
    };

    let history_count = record
        .full_history
        .as_ref()
        .map(|history| history.entries.len());

    let footer = Footer {
        generator_label: &options.generator_label,
        generated_at: format_timestamp_br(&options.resolve_generated_at()),
        history_count,
    };

    paint(&mut display_list, record, declaration_signature, &rows, &footer);

    log::debug!(
        "Laid out control form for '{}': {} rows on {} page(s)",
        record.employee_name,
        rows.len(),
        display_list.page_count()
    );

    FormLayout {
        rows,
        declaration_signature,
        history_count,
        display_list,
        diagnostics,
    }
}

fn build_rows(
    record: &DeliveryRecord,
    record_signature: Option<ImageId>,
    resolver: &mut SignatureResolver<'_>,
    minimum_rows: usize,
) -> Vec<FormRow> {
    let record_cell = record_signature.map_or(SignatureCell::Blank, SignatureCell::Image);

    if let Some(entries) = record.history_entries() {
        return entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                // Row signature first, then the delivery's, then a blank
                let signature = entry
                    .signature
                    .as_ref()
                    .and_then(|signature| {
                        let path = format!("fullHistory.epiHistory[{}].signatureData", idx);
                        resolver.resolve(signature, &path)
                    })
                    .map_or(record_cell, SignatureCell::Image);

                FormRow::Filled(FilledRow {
                    delivery_date: format_date_br(&entry.delivery_date),
                    return_pending: entry.status == EntryStatus::Returned,
                    quantity: entry.quantity.to_string(),
                    equipment: truncate_with_ellipsis(&entry.equipment_name, EQUIPMENT_NAME_MAX_CHARS),
                    certificate_code: entry.certificate_code.clone(),
                    reason: entry.status.reason_label().to_string(),
                    signature,
                    biometric: entry.biometric_verified || record.biometric_verified,
                })
            })
            .collect();
    }

    let mut rows: Vec<FormRow> = record
        .equipment
        .iter()
        .map(|line| {
            FormRow::Filled(FilledRow {
                delivery_date: format_date_br(&record.delivery_date),
                return_pending: false,
                quantity: line.quantity.to_string(),
                equipment: truncate_with_ellipsis(&line.name, EQUIPMENT_NAME_MAX_CHARS),
                certificate_code: line.certificate_code.clone(),
                reason: EntryStatus::Active.reason_label().to_string(),
                signature: record_cell,
                biometric: record.biometric_verified,
            })
        })
        .collect();

    while rows.len() < minimum_rows {
        rows.push(FormRow::Placeholder);
    }

    rows
}

struct Footer<'a> {
    generator_label: &'a str,
    generated_at: String,
    history_count: Option<usize>,
}

fn paint(
    list: &mut DisplayList,
    record: &DeliveryRecord,
    declaration_signature: Option<ImageId>,
    rows: &[FormRow],
    footer: &Footer<'_>,
) {
    let mut page = RenderPage::default();

    paint_title(&mut page);
    paint_identity(&mut page, record);
    paint_declaration(&mut page, declaration_signature);

    let mut y = TABLE_TOP;
    paint_table_header(&mut page, y);
    y += HEADER_HEIGHT;

    for row in rows {
        if y + ROW_HEIGHT > TABLE_BOTTOM {
            list.push_page(std::mem::take(&mut page));
            y = CONTINUATION_TABLE_TOP;
            paint_table_header(&mut page, y);
            y += HEADER_HEIGHT;
        }
        paint_row(&mut page, row, y);
        y += ROW_HEIGHT;
    }

    paint_footer(&mut page, footer, y + FOOTER_GAP);
    list.push_page(page);
}

fn text(page: &mut RenderPage, x: f32, y: f32, text: impl Into<String>, size: f32, color: Color) {
    page.push(DrawCommand::Text {
        x,
        y,
        text: text.into(),
        size,
        color,
        align: TextAlign::Left,
    });
}

fn rule(page: &mut RenderPage, x1: f32, y1: f32, x2: f32, y2: f32) {
    page.push(DrawCommand::Rule {
        x1,
        y1,
        x2,
        y2,
        line_width: RULE_WIDTH,
        color: Color::BLACK,
    });
}

fn rect(page: &mut RenderPage, x: f32, y: f32, width: f32, height: f32) {
    page.push(DrawCommand::Rect {
        x,
        y,
        width,
        height,
        line_width: RULE_WIDTH,
        color: Color::BLACK,
    });
}

fn paint_title(page: &mut RenderPage) {
    page.push(DrawCommand::Text {
        x: 105.0,
        y: 20.0,
        text: FORM_TITLE.to_string(),
        size: 16.0,
        color: Color::BLACK,
        align: TextAlign::Center,
    });
    rule(page, LEFT, 25.0, RIGHT, 25.0);
}

fn paint_identity(page: &mut RenderPage, record: &DeliveryRecord) {
    let top = IDENTITY_TOP;
    rect(page, LEFT, top, CONTENT_WIDTH, IDENTITY_HEIGHT);
    for x in IDENTITY_DIVIDERS {
        rule(page, x, top, x, top + IDENTITY_HEIGHT);
    }

    let label_y = top + 5.0;
    let value_y = top + 15.0;
    let fields: [(f32, &str, &str, f32); 4] = [
        (22.0, "Nome do Trabalhador:", record.employee_name.as_str(), 10.0),
        (72.0, "Função:", record.employee_position.as_str(), 10.0),
        (112.0, "Matrícula:", record.employee_id_number.as_str(), 9.0),
        (152.0, "Data de Admissão:", DATE_BLANK, 9.0),
    ];
    for (x, label, value, value_size) in fields {
        text(page, x, label_y, label, 8.0, Color::BLACK);
        text(page, x, value_y, value, value_size, Color::BLACK);
    }
}

fn paint_declaration(page: &mut RenderPage, signature: Option<ImageId>) {
    let top = DECLARATION_TOP;
    rect(page, LEFT, top, DECLARATION_WIDTH, DECLARATION_HEIGHT);
    page.push(DrawCommand::TextBlock {
        x: 22.0,
        y: top + 5.0,
        lines: split_to_width(DECLARATION_TEXT, DECLARATION_SIZE, DECLARATION_WRAP),
        size: DECLARATION_SIZE,
        line_height: line_height(DECLARATION_SIZE),
        color: Color::BLACK,
    });

    rect(page, SIGNATURE_BOX_X, top, SIGNATURE_BOX_WIDTH, DECLARATION_HEIGHT);
    text(page, 158.0, top + 5.0, "Assinatura do", 8.0, Color::BLACK);
    text(page, 158.0, top + 10.0, "Funcionário:", 8.0, Color::BLACK);

    if let Some(image) = signature {
        page.push(DrawCommand::Image {
            image,
            x: 157.0,
            y: top + 15.0,
            width: 31.0,
            height: 20.0,
        });
    }
}

fn row_frame(page: &mut RenderPage, y: f32, height: f32) {
    rect(page, LEFT, y, CONTENT_WIDTH, height);
    for x in COLUMN_DIVIDERS {
        rule(page, x, y, x, y + height);
    }
}

fn paint_table_header(page: &mut RenderPage, y: f32) {
    row_frame(page, y, HEADER_HEIGHT);

    let titles: [(f32, f32, &str); 8] = [
        (22.0, 5.0, "Entrega"),
        (22.0, 10.0, "Devolução"),
        (50.0, 8.0, "Qtde."),
        (85.0, 8.0, "EPI"),
        (120.0, 8.0, "CA"),
        (140.0, 8.0, "Motivo"),
        (158.0, 5.0, "Assinatura"),
        (158.0, 10.0, "& Biometria"),
    ];
    for (x, dy, title) in titles {
        text(page, x, y + dy, title, 8.0, Color::BLACK);
    }
}

fn paint_row(page: &mut RenderPage, row: &FormRow, y: f32) {
    row_frame(page, y, ROW_HEIGHT);

    let row = match row {
        FormRow::Filled(row) => row,
        FormRow::Placeholder => {
            text(page, 157.0, y + 8.0, SIGNATURE_BLANK, 7.0, PLACEHOLDER_GRAY);
            text(page, 157.0, y + 12.0, "[ ] Bio", 6.0, PLACEHOLDER_GRAY);
            return;
        }
    };

    text(page, 22.0, y + 8.0, row.delivery_date.as_str(), 7.0, Color::BLACK);
    if row.return_pending {
        text(page, 22.0, y + 12.0, DATE_BLANK, 7.0, Color::BLACK);
    }
    text(page, 50.0, y + 8.0, row.quantity.as_str(), 7.0, Color::BLACK);
    text(page, 72.0, y + 6.0, row.equipment.as_str(), 7.0, Color::BLACK);
    text(page, 72.0, y + 10.0, "Descrição:", 7.0, Color::BLACK);
    text(page, 112.0, y + 8.0, row.certificate_code.as_str(), 7.0, Color::BLACK);
    text(page, 137.0, y + 8.0, row.reason.as_str(), 7.0, Color::BLACK);

    match row.signature {
        SignatureCell::Image(image) => page.push(DrawCommand::Image {
            image,
            x: 157.0,
            y: y + 2.0,
            width: 25.0,
            height: 10.0,
        }),
        SignatureCell::Blank => text(page, 157.0, y + 8.0, SIGNATURE_BLANK, 7.0, Color::BLACK),
    }

    if row.biometric {
        page.push(DrawCommand::CheckMark {
            x: 157.0,
            y: y + 14.0,
            size: 6.0,
            color: BIOMETRIC_GREEN,
        });
        text(page, 159.5, y + 14.0, "Bio", 6.0, BIOMETRIC_GREEN);
    }
}

fn paint_footer(page: &mut RenderPage, footer: &Footer<'_>, y: f32) {
    text(page, LEFT, y, footer.generator_label, 8.0, FOOTER_GRAY);
    text(
        page,
        LEFT,
        y + 5.0,
        format!("Documento gerado em: {}", footer.generated_at),
        8.0,
        FOOTER_GRAY,
    );
    if let Some(count) = footer.history_count {
        text(page, LEFT, y + 10.0, format!("Total de registros: {}", count), 8.0, FOOTER_GRAY);
    }
}

/// Body rows that fit on the first page
pub fn first_page_row_budget() -> usize {
    rows_between(TABLE_TOP + HEADER_HEIGHT)
}

/// Body rows that fit on a continuation page
pub fn continuation_row_budget() -> usize {
    rows_between(CONTINUATION_TABLE_TOP + HEADER_HEIGHT)
}

fn rows_between(first_row_top: f32) -> usize {
    ((TABLE_BOTTOM - first_row_top) / ROW_HEIGHT).floor() as usize
}
