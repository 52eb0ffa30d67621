// Control form rendering through the public API

use chrono::{NaiveDate, NaiveDateTime};
use epi_forms_wasm::renderers::delivery_form::{SignatureCell, FORM_TITLE};
use epi_forms_wasm::*;
use serde_json::json;

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap()
}

fn maria_souza() -> DeliveryRecord {
    serde_json::from_value(json!({
        "employeeId": "emp-42",
        "employeeName": "Maria Souza",
        "employeeCPF": "123.456.789-00",
        "employeeSector": "Produção",
        "employeePosition": "Operadora de Máquinas",
        "companyName": "TechCorp Indústria Ltda.",
        "unitName": "Unidade Centro",
        "episDelivered": [
            { "epiId": "epi-7", "epiName": "Óculos de Proteção", "epiCA": "12345", "quantity": 1 }
        ],
        "deliveryDate": "2026-10-18T09:30:00",
        "deliveredBy": "Técnico SESMT",
        "biometricVerified": false
    }))
    .unwrap()
}

fn history_entry(idx: usize, status: &str) -> serde_json::Value {
    json!({
        "deliveryId": format!("del-{}", idx),
        "epiId": format!("epi-{}", idx),
        "epiName": "Luva de Vaqueta",
        "epiCA": format!("{}", 30000 + idx),
        "quantity": 1,
        "deliveryDate": "2026-09-01T08:00:00.000Z",
        "deliveredBy": "Técnico SESMT",
        "status": status
    })
}

fn with_history(record: DeliveryRecord, entries: Vec<serde_json::Value>) -> DeliveryRecord {
    let mut value = serde_json::to_value(&record).unwrap();
    value["fullHistory"] = json!({
        "employeeId": "emp-42",
        "employeeName": "Maria Souza",
        "currentFunction": "Operadora de Máquinas",
        "epiHistory": entries,
        "lastUpdated": "2026-10-18T09:30:00"
    });
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_first_delivery_scenario() {
    let record = maria_souza();
    let layout = layout(&record, &RenderOptions::at(generated_at()));

    let filled: Vec<_> = layout.filled_rows().collect();
    assert_eq!(filled.len(), 1);
    assert_eq!(filled[0].quantity, "1");
    assert_eq!(filled[0].certificate_code, "12345");
    assert_eq!(filled[0].reason, "Entrega");
    assert!(layout.rows.len() >= 5);
    assert!(layout.declaration_signature.is_none());
    assert!(layout.diagnostics.is_empty());
}

#[test]
fn test_default_file_name_uses_name_and_today() {
    let record = maria_souza();
    let name = file_name_for(&record);
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    assert!(name.contains("Maria_Souza"));
    assert!(name.contains(&today));
    assert!(name.ends_with(".pdf"));
}

#[test]
fn test_row_count_is_at_least_lines_or_minimum() {
    for lines in [0usize, 1, 4, 5, 6, 9] {
        let mut record = maria_souza();
        record.equipment = (0..lines)
            .map(|i| EquipmentLine::new(format!("epi-{}", i), "Capacete", "555", 1))
            .collect();

        let layout = layout(&record, &RenderOptions::at(generated_at()));
        assert_eq!(layout.rows.len(), lines.max(5), "{} line(s)", lines);
        assert_eq!(layout.filled_rows().count(), lines);
    }
}

#[test]
fn test_history_count_in_footer() {
    let entries = vec![
        history_entry(0, "active"),
        history_entry(1, "returned"),
        history_entry(2, "replaced"),
        history_entry(3, "active"),
    ];
    let record = with_history(maria_souza(), entries);

    let layout = layout(&record, &RenderOptions::at(generated_at()));
    assert_eq!(layout.history_count, Some(4));
    assert_eq!(layout.rows.len(), 4);
    assert!(layout.display_list.contains_text("Total de registros: 4"));
}

#[test]
fn test_empty_history_falls_back_to_current_lines() {
    let record = with_history(maria_souza(), Vec::new());
    let layout = layout(&record, &RenderOptions::at(generated_at()));

    assert_eq!(layout.filled_rows().count(), 1);
    assert_eq!(layout.rows.len(), 5);
    assert!(layout.display_list.contains_text("Total de registros: 0"));
}

#[test]
fn test_same_timestamp_same_bytes() {
    let record = maria_souza();
    let options = RenderOptions::at(generated_at());

    let first = render_with(&record, &options);
    let second = render_with(&record, &options);
    assert_eq!(first.to_bytes(), second.to_bytes());
    assert_eq!(first.file_name(), "Entrega_EPI_Maria_Souza_2026-10-18.pdf");
}

#[test]
fn test_corrupt_line_signature_never_fails() {
    let mut entry = history_entry(0, "active");
    entry["signatureData"] = json!("data:image/png;base64,%%%not-base64%%%");
    let record = with_history(maria_souza(), vec![entry]);

    let document = render_with(&record, &RenderOptions::at(generated_at()));
    assert!(document.as_bytes().starts_with(b"%PDF-"));
    assert_eq!(document.diagnostics().len(), 1);
    assert_eq!(document.diagnostics()[0].kind, "signature_unreadable");
    assert_eq!(document.diagnostics()[0].severity, DiagnosticSeverity::Warning);

    let layout = layout(&record, &RenderOptions::at(generated_at()));
    assert_eq!(layout.rows[0].as_filled().unwrap().signature, SignatureCell::Blank);
}

#[test]
fn test_title_metadata_override() {
    let options = RenderOptions {
        title: Some("Ficha Maria".into()),
        ..RenderOptions::at(generated_at())
    };
    let default_bytes = render_with(&maria_souza(), &RenderOptions::at(generated_at())).into_bytes();
    let titled_bytes = render_with(&maria_souza(), &options).into_bytes();

    let contains = |haystack: &[u8], needle: &[u8]| haystack.windows(needle.len()).any(|w| w == needle);
    assert!(contains(&default_bytes, format!("/Title ({})", FORM_TITLE).as_bytes()));
    assert!(contains(&titled_bytes, b"/Title (Ficha Maria)"));
}

#[test]
fn test_validate_record_reports_invariant_violations() {
    let mut record = maria_souza();
    record.equipment[0].quantity = 0;

    let diagnostics = check_delivery_record(&record);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, "quantity_zero");

    // Rendering does not validate
    let document = render_with(&record, &RenderOptions::at(generated_at()));
    assert!(document.diagnostics().is_empty());
}
