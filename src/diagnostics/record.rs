//! Invariant checks for delivery records
//!
//! The delivery workflow owns these invariants; the renderer assumes them.
//! This pass lets a caller confirm a record before printing it.

use super::Diagnostic;
use crate::models::DeliveryRecord;

/// Check a record against the data-model invariants
pub fn check_delivery_record(record: &DeliveryRecord) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if record.employee_name.trim().is_empty() {
        diagnostics.push(Diagnostic::error(
            "employeeName",
            "missing_employee_name",
            "Employee name is empty",
        ));
    }

    if record.equipment.is_empty() && record.history_entries().is_none() {
        diagnostics.push(Diagnostic::warning(
            "episDelivered",
            "empty_equipment_list",
            "Delivery has no equipment lines; the form will only contain blank rows",
        ));
    }

    for (idx, line) in record.equipment.iter().enumerate() {
        if line.equipment_id.trim().is_empty() {
            diagnostics.push(Diagnostic::error(
                format!("episDelivered[{}].epiId", idx),
                "missing_equipment_id",
                format!("Line '{}' does not reference an equipment id", line.name),
            ));
        }
        if line.quantity == 0 {
            diagnostics.push(Diagnostic::error(
                format!("episDelivered[{}].quantity", idx),
                "quantity_zero",
                format!("Line '{}' has quantity 0 (must be at least 1)", line.name),
            ));
        }
    }

    if let Some(history) = &record.full_history {
        for (idx, entry) in history.entries.iter().enumerate() {
            if entry.equipment_id.trim().is_empty() {
                diagnostics.push(Diagnostic::error(
                    format!("fullHistory.epiHistory[{}].epiId", idx),
                    "missing_equipment_id",
                    format!("History entry '{}' does not reference an equipment id", entry.delivery_id),
                ));
            }
            if entry.quantity == 0 {
                diagnostics.push(Diagnostic::error(
                    format!("fullHistory.epiHistory[{}].quantity", idx),
                    "quantity_zero",
                    format!("History entry '{}' has quantity 0", entry.delivery_id),
                ));
            }
        }
    }

    diagnostics
}
