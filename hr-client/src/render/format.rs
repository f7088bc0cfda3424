//! Field formatting: money, periods, dates, durations

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::Lang;
use shared::salary::format_amount;
use std::time::Duration;

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_AR: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر", "أكتوبر",
    "نوفمبر", "ديسمبر",
];

/// Replace ASCII digits with Arabic-Indic ones
pub fn arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Amount with two decimals and grouped thousands.
///
/// English: `12,345.50`. Arabic: `١٢٬٣٤٥٫٥٠`.
pub fn currency(amount: f64, lang: Lang) -> String {
    let fixed = format_amount(amount);
    let (negative, digits) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let (group_sep, decimal_sep) = match lang {
        Lang::En => (',', '.'),
        Lang::Ar => ('٬', '٫'),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative && digits.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&grouped);
    out.push(decimal_sep);
    out.push_str(frac_part);

    match lang {
        Lang::En => out,
        Lang::Ar => arabic_digits(&out),
    }
}

/// Localized month name, `None` outside 1..=12
pub fn month_name(month: u32, lang: Lang) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    match lang {
        Lang::En => MONTHS_EN.get(index).copied(),
        Lang::Ar => MONTHS_AR.get(index).copied(),
    }
}

/// Payroll period label (`Mar 2025`, `مارس 2025`)
pub fn period(month: u32, year: i32, lang: Lang) -> String {
    match month_name(month, lang) {
        Some(name) => format!("{name} {year}"),
        None => format!("{month}/{year}"),
    }
}

/// Parse the timestamp forms the server emits (RFC 3339, naive ISO, bare date)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn unknown(lang: Lang) -> String {
    lang.pick("غير محدد", "N/A").to_string()
}

/// `2025-03-14`, or a localized placeholder when missing
pub fn date(value: Option<&str>, lang: Lang) -> String {
    match value.and_then(parse_timestamp) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => value
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| unknown(lang)),
    }
}

/// `2025-03-14 09:30`, or a localized placeholder when missing
pub fn date_time(value: Option<&str>, lang: Lang) -> String {
    match value.and_then(parse_timestamp) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => value
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| unknown(lang)),
    }
}

/// `HH:MM` for chat bubbles; empty when unparseable
pub fn clock(value: Option<&str>) -> String {
    value
        .and_then(parse_timestamp)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Minutes below an hour, hours below a day, days otherwise
pub fn time_ago(value: Option<&str>, now: NaiveDateTime, lang: Lang) -> String {
    let Some(then) = value.and_then(parse_timestamp) else {
        return lang.pick("غير معروف", "unknown").to_string();
    };
    let minutes = (now - then).num_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;
    if minutes < 60 {
        format!("{minutes} {}", lang.pick("دقيقة", "min"))
    } else if hours < 24 {
        format!("{hours} {}", lang.pick("ساعة", "h"))
    } else {
        format!("{days} {}", lang.pick("يوم", "d"))
    }
}

/// Recording counter (`0:07`, `12:30`)
pub fn elapsed_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Cut to `max` characters, adding an ellipsis only when something was cut
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
