//! Display formatting for money and timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder for missing values.
pub const DASH: &str = "-";

/// Formats an amount with two decimals, a decimal comma and non-breaking
/// space grouping from five integer digits up (`1234,50`, `12 345,50`).
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if int_part.len() >= 5 {
        let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push('\u{a0}');
            }
            out.push(ch);
        }
        out
    } else {
        int_part.to_string()
    };

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}

/// Like [`format_amount`] but `None` renders as zero.
pub fn format_optional_amount(amount: Option<f64>) -> String {
    format_amount(amount.unwrap_or(0.0))
}

/// Formats a backend timestamp as `dd.mm.yyyy HH:MM`.
///
/// Missing or blank values render as `-`; unparseable ones are shown verbatim.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return DASH.to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%d.%m.%Y").to_string();
    }
    raw.to_string()
}

/// Text or `-` when missing or blank.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(DASH)
}
