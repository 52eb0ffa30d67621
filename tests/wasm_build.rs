//! WASM build test
//!
//! This module tests that the WASM module can be built and the JavaScript
//! surface works in a browser.

#![cfg(target_arch = "wasm32")]

use epi_forms_wasm::api::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn record() -> JsValue {
    let value = serde_json::json!({
        "employeeId": "emp-1",
        "employeeName": "Maria Souza",
        "employeeCPF": "123.456.789-00",
        "employeeSector": "Produção",
        "employeePosition": "Operadora",
        "companyName": "TechCorp",
        "unitName": "Centro",
        "episDelivered": [
            { "epiId": "epi-7", "epiName": "Óculos de Proteção", "epiCA": "12345", "quantity": 1 }
        ],
        "deliveryDate": "2026-10-18T12:30:00.000Z",
        "deliveredBy": "Técnico SESMT"
    });
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    serde::Serialize::serialize(&value, &serializer).unwrap()
}

#[wasm_bindgen_test]
fn test_create_delivery_pdf() {
    let document = create_delivery_pdf(record(), JsValue::UNDEFINED).unwrap();
    assert_eq!(document.page_count(), 1);
    assert!(document.file_name().starts_with("Entrega_EPI_Maria_Souza_"));

    let bytes = document.to_bytes().to_vec();
    assert_eq!(&bytes[..5], b"%PDF-");
}

#[wasm_bindgen_test]
fn test_date_object_delivery_date() {
    let record = record();
    let delivered = js_sys::Date::new(&JsValue::from_f64(1_792_324_800_000.0));
    js_sys::Reflect::set(&record, &JsValue::from_str("deliveryDate"), &delivered).unwrap();

    let document = create_delivery_pdf(record.clone(), JsValue::UNDEFINED).unwrap();
    assert_eq!(document.page_count(), 1);

    let diagnostics = validate_delivery_record(record).unwrap();
    assert_eq!(js_sys::Array::from(&diagnostics).length(), 0);
}

#[wasm_bindgen_test]
fn test_pdf_blob_is_typed() {
    let document = create_delivery_pdf(record(), JsValue::UNDEFINED).unwrap();
    let blob = document.to_blob().unwrap();
    assert_eq!(blob.type_(), "application/pdf");
    assert!(blob.size() > 0.0);
}

#[wasm_bindgen_test]
fn test_bytes_match_document() {
    let bytes = get_delivery_pdf_bytes(record()).unwrap();
    assert!(bytes.length() > 0);
}

#[wasm_bindgen_test]
fn test_validate_record() {
    let diagnostics = validate_delivery_record(record()).unwrap();
    let array = js_sys::Array::from(&diagnostics);
    assert_eq!(array.length(), 0);
}

#[wasm_bindgen_test]
fn test_invalid_record_is_an_error() {
    let result = create_delivery_pdf(JsValue::from_str("not a record"), JsValue::UNDEFINED);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_risk_program_defaults() {
    let document = create_risk_program_pdf(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    assert_eq!(document.page_count(), 2);
    assert!(document.file_name().starts_with("PGR_TechCorp_"));
}
