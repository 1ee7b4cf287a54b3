//! Display formatting for the POS screens

use crate::money::to_decimal;
use chrono::DateTime;
use chrono_tz::Tz;
use rust_decimal::prelude::*;
use shared::types::Timestamp;

/// Colombian peso amount, e.g. `$ 20.000`
///
/// Rounded to whole pesos; negatives get a leading `-`.
pub fn format_currency(amount: f64) -> String {
    let rounded = to_decimal(amount)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default();

    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

/// `dd/mm/yyyy` in the operator's timezone
pub fn format_date(ts: Timestamp, tz: Tz) -> String {
    format_with(ts, tz, "%d/%m/%Y")
}

/// `dd/mm/yyyy HH:MM` in the operator's timezone
pub fn format_date_time(ts: Timestamp, tz: Tz) -> String {
    format_with(ts, tz, "%d/%m/%Y %H:%M")
}

fn format_with(ts: Timestamp, tz: Tz, pattern: &str) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.with_timezone(&tz).format(pattern).to_string())
        .unwrap_or_default()
}

/// Group a Colombian phone number for display
///
/// Ten-digit numbers become `300 123 4567`, numbers carrying the `57`
/// country prefix become `+57 300 123 4567`. Anything else is returned
/// trimmed.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..]),
        12 if digits.starts_with("57") => {
            format!("+57 {} {} {}", &digits[2..5], &digits[5..8], &digits[8..])
        }
        _ => raw.trim().to_string(),
    }
}
