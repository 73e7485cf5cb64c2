//! Column addressing for plan records.
//!
//! Plan records carry one numeric FTE column per (month, year) pair, keyed by
//! a physical name like `mrz_2026`. This module owns the mapping from
//! free-text German month spellings to the twelve canonical abbreviations,
//! the supported year range, and the numeric coercion applied to FTE values.

use crate::error::{Result, StaffingError};
use crate::store::PlanRecord;
use serde_json::Value;

pub const YEAR_MIN: i32 = 2026;
pub const YEAR_MAX: i32 = 2099;

/// Canonical month abbreviations in calendar order, as used in column keys.
pub const MONTH_ABBREVS: [&str; 12] = [
    "jan", "feb", "mrz", "apr", "mai", "jun", "jul", "aug", "sep", "okt", "nov", "dez",
];

fn normalize_month(text: &str) -> String {
    text.to_lowercase()
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
}

/// Fixed lookup table from normalized month spellings (full German names and
/// three-letter abbreviations, diacritics already transliterated) to the
/// canonical abbreviation.
fn canonical_abbrev(normalized: &str) -> Option<&'static str> {
    let abbrev = match normalized {
        "januar" | "jan" => "jan",
        "februar" | "feb" => "feb",
        "maerz" | "mrz" => "mrz",
        "april" | "apr" => "apr",
        "mai" => "mai",
        "juni" | "jun" => "jun",
        "juli" | "jul" => "jul",
        "august" | "aug" => "aug",
        "september" | "sep" => "sep",
        "oktober" | "okt" => "okt",
        "november" | "nov" => "nov",
        "dezember" | "dez" => "dez",
        _ => return None,
    };
    Some(abbrev)
}

/// Maps a free-text month and a year to the physical column key.
///
/// Unknown month text degrades to its first three normalized characters
/// without re-validation; a wrong key is caught later by
/// [`ensure_column_exists`] on the fetched record.
pub fn month_column(month_text: &str, year: i32) -> String {
    let normalized = normalize_month(month_text);
    let base = match canonical_abbrev(&normalized) {
        Some(abbrev) => abbrev.to_string(),
        None => normalized.chars().take(3).collect(),
    };
    format!("{}_{}", base, year)
}

/// The twelve canonical column keys for a year, in calendar order.
pub fn month_columns_for_year(year: i32) -> Vec<String> {
    MONTH_ABBREVS
        .iter()
        .map(|abbrev| format!("{}_{}", abbrev, year))
        .collect()
}

/// Fails for years outside the supported planning range. Called by every
/// year-dependent action before any store I/O.
pub fn ensure_year_in_range(year: i32) -> Result<()> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(StaffingError::YearOutOfRange(year));
    }
    Ok(())
}

/// Fails when the physical column is absent from the fetched record. Absence
/// is a schema error, never silently defaulted.
pub fn ensure_column_exists(record: &PlanRecord, column: &str, table: &str) -> Result<()> {
    if record.has_column(column) {
        return Ok(());
    }
    Err(StaffingError::MissingColumn {
        column: column.to_string(),
        table: table.to_string(),
    })
}

/// Coerces an FTE-like value to a finite number.
///
/// Strings are parsed after substituting a comma decimal separator with a
/// period; anything non-numeric or non-finite coerces to `0.0`.
pub fn coerce_fte(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        _ => 0.0,
    }
}
