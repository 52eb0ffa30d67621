//! Risk management program (PGR) sample document
//!
//! Two fixed pages: cover block and sections 1-3, then sections 4-5 with
//! the technical lead's signature block and the generation footer.

use super::display_list::{Color, DisplayList, DrawCommand, RenderPage, TextAlign};
use super::options::RenderOptions;
use super::text_metrics::{line_height, split_to_width};
use crate::models::RiskProgramRecord;
use crate::utils::{format_day_br, format_timestamp_br};

pub const PROGRAM_TITLE: &str = "Programa de Gerenciamento de Riscos (PGR)";
pub const PROGRAM_BANNER: &str = "EHSPro - Sistema QSSMA";

const OBJECTIVE_TEXT: &str = "Este Programa de Gerenciamento de Riscos tem por objetivo identificar, avaliar e controlar os riscos ocupacionais existentes no ambiente de trabalho, visando a preservação da saúde e integridade física dos trabalhadores.";

const METHODOLOGY_TEXT: &str = "A metodologia utilizada baseia-se nas diretrizes da NR-01 e demais normas regulamentadoras aplicáveis, seguindo as etapas de identificação de perigos, avaliação de riscos e determinação de medidas de controle.";

const IDENTIFIED_RISKS: [&str; 4] = [
    "• Riscos Físicos: Ruído, vibração, temperaturas extremas",
    "• Riscos Químicos: Vapores orgânicos, poeiras minerais",
    "• Riscos Ergonômicos: Postura inadequada, esforço repetitivo",
    "• Riscos Mecânicos: Máquinas e equipamentos",
];

const ADMINISTRATIVE_MEASURES: [&str; 3] = [
    "• Treinamentos periódicos sobre segurança do trabalho",
    "• Procedimentos operacionais padronizados",
    "• Programa de conscientização em SST",
];

const PROTECTIVE_EQUIPMENT: [&str; 3] = [
    "• EPIs adequados para cada função",
    "• Equipamentos de proteção coletiva",
    "• Manutenção preventiva regular",
];

const RESPONSIBILITIES: [&str; 3] = [
    "Empregador: Fornecer condições seguras de trabalho",
    "SESMT: Acompanhar e avaliar o programa",
    "Trabalhadores: Cumprir as medidas de segurança",
];

const LEFT: f32 = 20.0;
const BULLET_INDENT: f32 = 25.0;
const PARAGRAPH_WIDTH: f32 = 170.0;
const BANNER_GREEN: Color = Color::rgb(40, 120, 40);
const FOOTER_GRAY: Color = Color::gray(100);

fn text_at(page: &mut RenderPage, x: f32, y: f32, text: impl Into<String>, size: f32, color: Color) {
    page.push(DrawCommand::Text {
        x,
        y,
        text: text.into(),
        size,
        color,
        align: TextAlign::Left,
    });
}

fn paragraph(page: &mut RenderPage, y: f32, body: &str) {
    page.push(DrawCommand::TextBlock {
        x: LEFT,
        y,
        lines: split_to_width(body, 11.0, PARAGRAPH_WIDTH),
        size: 11.0,
        line_height: line_height(11.0),
        color: Color::BLACK,
    });
}

fn list_at(page: &mut RenderPage, x: f32, first_y: f32, items: &[&str]) {
    for (idx, item) in items.iter().enumerate() {
        text_at(page, x, first_y + 10.0 * idx as f32, *item, 11.0, Color::BLACK);
    }
}

/// Lay out the PGR document
pub fn layout(record: &RiskProgramRecord, options: &RenderOptions) -> DisplayList {
    let mut list = DisplayList::new();

    let mut first = RenderPage::default();
    text_at(&mut first, LEFT, 30.0, PROGRAM_BANNER, 20.0, BANNER_GREEN);
    text_at(&mut first, LEFT, 50.0, PROGRAM_TITLE, 16.0, Color::BLACK);
    first.push(DrawCommand::Rule {
        x1: LEFT,
        y1: 55.0,
        x2: 190.0,
        y2: 55.0,
        line_width: 0.5,
        color: Color::BLACK,
    });

    let cover = [
        format!("Empresa: {}", record.company_name),
        format!("CNPJ: {}", record.cnpj),
        format!("Data de Elaboração: {}", format_day_br(&record.prepared_on)),
        format!("Responsável Técnico: {}", record.technical_lead),
        format!("CREA: {}", record.crea),
    ];
    for (idx, line) in cover.into_iter().enumerate() {
        text_at(&mut first, LEFT, 70.0 + 10.0 * idx as f32, line, 12.0, Color::BLACK);
    }

    text_at(&mut first, LEFT, 130.0, "1. OBJETIVO", 14.0, Color::BLACK);
    paragraph(&mut first, 140.0, OBJECTIVE_TEXT);
    text_at(&mut first, LEFT, 160.0, "2. METODOLOGIA", 14.0, Color::BLACK);
    paragraph(&mut first, 170.0, METHODOLOGY_TEXT);
    text_at(&mut first, LEFT, 190.0, "3. RISCOS IDENTIFICADOS", 14.0, Color::BLACK);
    list_at(&mut first, LEFT, 200.0, &IDENTIFIED_RISKS);
    list.push_page(first);

    let mut second = RenderPage::default();
    text_at(&mut second, LEFT, 30.0, "4. MEDIDAS DE CONTROLE", 14.0, Color::BLACK);
    text_at(&mut second, LEFT, 45.0, "4.1 Medidas Administrativas:", 11.0, Color::BLACK);
    list_at(&mut second, BULLET_INDENT, 55.0, &ADMINISTRATIVE_MEASURES);
    text_at(&mut second, LEFT, 90.0, "4.2 Equipamentos de Proteção:", 11.0, Color::BLACK);
    list_at(&mut second, BULLET_INDENT, 100.0, &PROTECTIVE_EQUIPMENT);

    text_at(&mut second, LEFT, 140.0, "5. RESPONSABILIDADES", 14.0, Color::BLACK);
    list_at(&mut second, LEFT, 155.0, &RESPONSIBILITIES);

    let signature_block = [
        "_______________________________".to_string(),
        record.technical_lead.clone(),
        format!("CREA: {}", record.crea),
        "Responsável Técnico".to_string(),
    ];
    for (idx, line) in signature_block.into_iter().enumerate() {
        text_at(&mut second, LEFT, 220.0 + 10.0 * idx as f32, line, 12.0, Color::BLACK);
    }

    let generated_at = format_timestamp_br(&options.resolve_generated_at());
    text_at(
        &mut second,
        LEFT,
        285.0,
        format!("Documento gerado pelo {}", PROGRAM_BANNER),
        8.0,
        FOOTER_GRAY,
    );
    text_at(
        &mut second,
        LEFT,
        290.0,
        format!("Data de geração: {}", generated_at),
        8.0,
        FOOTER_GRAY,
    );
    list.push_page(second);

    log::debug!("Laid out PGR for '{}'", record.company_name);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> RiskProgramRecord {
        RiskProgramRecord {
            prepared_on: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            ..RiskProgramRecord::default()
        }
    }

    #[test]
    fn test_two_pages_with_sections_in_order() {
        let options = RenderOptions::at(
            NaiveDate::from_ymd_opt(2026, 10, 18)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
        );
        let list = layout(&record(), &options);

        assert_eq!(list.page_count(), 2);
        let first = list.pages[0].texts();
        assert_eq!(first[0], PROGRAM_BANNER);
        assert!(first.contains(&"Empresa: TechCorp Indústria Ltda."));
        assert!(first.contains(&"Data de Elaboração: 18/10/2026"));
        assert!(first.contains(&"3. RISCOS IDENTIFICADOS"));

        let second = list.pages[1].texts();
        assert!(second.contains(&"5. RESPONSABILIDADES"));
        assert!(second.contains(&"Eng. João Silva Santos"));
        assert!(second.contains(&"Data de geração: 18/10/2026, 14:00:00"));
    }

    #[test]
    fn test_paragraphs_fit_the_column() {
        let list = layout(&record(), &RenderOptions::default());
        for command in &list.pages[0].commands {
            if let DrawCommand::TextBlock { lines, size, .. } = command {
                for line in lines {
                    assert!(super::super::text_metrics::text_width(line, *size) <= PARAGRAPH_WIDTH + 1e-3);
                }
            }
        }
    }
}
