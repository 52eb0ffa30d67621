//! Default download names for generated documents

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("valid regex"));

/// Collapse every run of non letters/digits into `_`, trimming the ends
///
/// Returns `fallback` when nothing printable remains.
pub fn normalize_segment(raw: &str, fallback: &str) -> String {
    let replaced = NON_ALNUM.replace_all(raw.trim(), "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<prefix>_<segment>_<YYYY-MM-DD>.pdf`
pub fn dated_pdf_name(prefix: &str, segment: &str, fallback: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.pdf",
        prefix,
        normalize_segment(segment, fallback),
        date.format("%Y-%m-%d")
    )
}

/// Make sure a caller-supplied name ends in `.pdf`
///
/// Returns `None` for a blank name so callers keep their default.
pub fn ensure_pdf_extension(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.to_ascii_lowercase().ends_with(".pdf") {
        Some(trimmed.to_string())
    } else {
        Some(format!("{}.pdf", trimmed))
    }
}
