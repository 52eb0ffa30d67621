//! EPI delivery data model
//!
//! A `DeliveryRecord` is built once by the delivery workflow and handed to the
//! renderer by reference. Field names on the JavaScript side are camelCase and
//! follow the objects the dashboard already passes around (`employeeCPF`,
//! `episDelivered`, `epiCA`, ...).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{flexible_datetime, flexible_datetime_opt};
use super::signature::SignatureImage;

/// One equipment item handed over in the current delivery
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentLine {
    /// Catalogue id of the equipment (must reference a known item)
    #[serde(rename = "epiId")]
    pub equipment_id: String,

    /// Display name
    #[serde(rename = "epiName")]
    pub name: String,

    /// CA (certificate of approval) code printed on the item
    #[serde(rename = "epiCA")]
    pub certificate_code: String,

    /// Units delivered, at least 1
    pub quantity: u32,
}

impl EquipmentLine {
    pub fn new(
        equipment_id: impl Into<String>,
        name: impl Into<String>,
        certificate_code: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            name: name.into(),
            certificate_code: certificate_code.into(),
            quantity,
        }
    }
}

/// Lifecycle status of a historical delivery
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Returned,
    Replaced,
}

impl EntryStatus {
    /// Reason code printed in the "Motivo" column
    pub fn reason_label(self) -> &'static str {
        match self {
            EntryStatus::Active => "Entrega",
            EntryStatus::Returned => "Devolução",
            EntryStatus::Replaced => "Substituição",
        }
    }
}

/// One past delivery / return / replacement for an employee-equipment pair
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentHistoryEntry {
    pub delivery_id: String,

    #[serde(rename = "epiId")]
    pub equipment_id: String,

    #[serde(rename = "epiName")]
    pub equipment_name: String,

    #[serde(rename = "epiCA")]
    pub certificate_code: String,

    pub quantity: u32,

    #[serde(with = "flexible_datetime")]
    pub delivery_date: NaiveDateTime,

    pub delivered_by: String,

    pub status: EntryStatus,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, with = "flexible_datetime_opt")]
    pub expiry_date: Option<NaiveDateTime>,

    /// Signature captured for this specific line
    #[serde(default, rename = "signatureData")]
    pub signature: Option<SignatureImage>,

    #[serde(default)]
    pub biometric_verified: bool,
}

/// A job title held by the employee over a period
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionPeriod {
    pub function: String,

    #[serde(with = "flexible_datetime")]
    pub start_date: NaiveDateTime,

    #[serde(default, with = "flexible_datetime_opt")]
    pub end_date: Option<NaiveDateTime>,
}

/// Full equipment history of one employee
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeEquipmentHistory {
    pub employee_id: String,
    pub employee_name: String,
    pub current_function: String,

    #[serde(default)]
    pub function_history: Vec<FunctionPeriod>,

    #[serde(rename = "epiHistory")]
    pub entries: Vec<EquipmentHistoryEntry>,

    #[serde(with = "flexible_datetime")]
    pub last_updated: NaiveDateTime,
}

/// The delivery transaction the control form is printed for
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub employee_id: String,
    pub employee_name: String,

    /// Registration number (the dashboard uses the CPF here)
    #[serde(rename = "employeeCPF")]
    pub employee_id_number: String,

    pub employee_sector: String,

    /// Job title
    pub employee_position: String,

    pub company_name: String,
    pub unit_name: String,

    #[serde(rename = "episDelivered")]
    pub equipment: Vec<EquipmentLine>,

    #[serde(default)]
    pub full_history: Option<EmployeeEquipmentHistory>,

    #[serde(with = "flexible_datetime")]
    pub delivery_date: NaiveDateTime,

    pub delivered_by: String,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, rename = "signatureData")]
    pub signature: Option<SignatureImage>,

    #[serde(default)]
    pub biometric_verified: bool,
}

impl DeliveryRecord {
    /// History entries, if a non-empty history is attached
    pub fn history_entries(&self) -> Option<&[EquipmentHistoryEntry]> {
        self.full_history
            .as_ref()
            .map(|history| history.entries.as_slice())
            .filter(|entries| !entries.is_empty())
    }

    /// Total units handed over in this delivery
    pub fn total_quantity(&self) -> u32 {
        self.equipment.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "employeeId": "emp-1",
            "employeeName": "Maria Souza",
            "employeeCPF": "123.456.789-00",
            "employeeSector": "Produção",
            "employeePosition": "Operadora",
            "companyName": "TechCorp Indústria Ltda.",
            "unitName": "Unidade Centro",
            "episDelivered": [
                { "epiId": "epi-7", "epiName": "Óculos de Proteção", "epiCA": "12345", "quantity": 1 }
            ],
            "deliveryDate": "2026-10-18T09:30:00",
            "deliveredBy": "Técnico SESMT"
        })
    }

    #[test]
    fn test_deserialize_dashboard_shape() {
        let record: DeliveryRecord = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(record.employee_id_number, "123.456.789-00");
        assert_eq!(record.equipment.len(), 1);
        assert_eq!(record.equipment[0].certificate_code, "12345");
        assert!(record.signature.is_none());
        assert!(!record.biometric_verified);
        assert!(record.history_entries().is_none());
    }

    #[test]
    fn test_history_entries_ignores_empty_history() {
        let mut value = sample_json();
        value["fullHistory"] = json!({
            "employeeId": "emp-1",
            "employeeName": "Maria Souza",
            "currentFunction": "Operadora",
            "epiHistory": [],
            "lastUpdated": "2026-10-18"
        });
        let record: DeliveryRecord = serde_json::from_value(value).unwrap();
        assert!(record.full_history.is_some());
        assert!(record.history_entries().is_none());
    }

    #[test]
    fn test_entry_status_reason_labels() {
        assert_eq!(EntryStatus::Active.reason_label(), "Entrega");
        assert_eq!(EntryStatus::Returned.reason_label(), "Devolução");
        assert_eq!(EntryStatus::Replaced.reason_label(), "Substituição");

        let status: EntryStatus = serde_json::from_str("\"returned\"").unwrap();
        assert_eq!(status, EntryStatus::Returned);
    }

    #[test]
    fn test_total_quantity() {
        let mut record: DeliveryRecord = serde_json::from_value(sample_json()).unwrap();
        record.equipment.push(EquipmentLine::new("epi-2", "Luva", "999", 3));
        assert_eq!(record.total_quantity(), 4);
    }
}
