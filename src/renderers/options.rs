//! Configuration shared by the document templates

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::serde_helpers::flexible_datetime_opt;
use crate::utils::now_local;

/// Footer line identifying the generating system
pub const DEFAULT_GENERATOR_LABEL: &str = "EHSPro - Sistema de Gestão de Segurança do Trabalho";

/// Rows printed in the equipment table of a first delivery
pub const DEFAULT_MINIMUM_ROWS: usize = 5;

/// Options for a single render call
///
/// Every field has a default, so JavaScript callers may pass `{}`,
/// `undefined`, or only the fields they care about.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// "Generated at" timestamp; the local clock is read once when unset
    #[serde(with = "flexible_datetime_opt")]
    pub generated_at: Option<NaiveDateTime>,

    pub generator_label: String,

    /// Minimum equipment table rows when no history is attached
    pub minimum_rows: usize,

    /// PDF metadata title; each template has its own default
    pub title: Option<String>,
}

impl RenderOptions {
    /// Options pinned to a fixed generation timestamp
    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at: Some(generated_at),
            ..Self::default()
        }
    }

    /// The timestamp to print
    pub fn resolve_generated_at(&self) -> NaiveDateTime {
        self.generated_at.unwrap_or_else(now_local)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            generated_at: None,
            generator_label: DEFAULT_GENERATOR_LABEL.to_string(),
            minimum_rows: DEFAULT_MINIMUM_ROWS,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let options: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.minimum_rows, 5);
    }

    #[test]
    fn test_partial_options() {
        let options: RenderOptions =
            serde_json::from_str(r#"{ "generatedAt": "2026-10-18T10:00:00", "minimumRows": 8 }"#).unwrap();
        assert_eq!(options.minimum_rows, 8);
        assert_eq!(
            options.resolve_generated_at().format("%H:%M").to_string(),
            "10:00"
        );
        assert_eq!(options.generator_label, DEFAULT_GENERATOR_LABEL);
    }
}
