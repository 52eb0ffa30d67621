//! Risk management program (PGR) document input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serde_helpers::flexible_date;

/// Identification printed on the PGR cover block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskProgramRecord {
    pub company_name: String,
    pub cnpj: String,

    /// "Data de Elaboração"
    #[serde(with = "flexible_date")]
    pub prepared_on: NaiveDate,

    /// Responsible engineer, printed in the header block and signature
    pub technical_lead: String,

    /// Engineer's CREA registration
    pub crea: String,
}

impl Default for RiskProgramRecord {
    fn default() -> Self {
        Self {
            company_name: "TechCorp Indústria Ltda.".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            prepared_on: chrono::Local::now().date_naive(),
            technical_lead: "Eng. João Silva Santos".to_string(),
            crea: "123456-SP".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let record: RiskProgramRecord =
            serde_json::from_str(r#"{ "companyName": "Metalúrgica Sul", "preparedOn": "2026-03-01" }"#)
                .unwrap();
        assert_eq!(record.company_name, "Metalúrgica Sul");
        assert_eq!(record.prepared_on, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(record.crea, "123456-SP");
    }
}
