//! Display helpers for job fields: dates, salary ranges, capitalization and
//! tag colors.  All pure, all infallible.

use chrono::{DateTime, NaiveDate};
use ratatui::style::Color;

/// Palette tags are assigned from.
const TAG_COLORS: [Color; 3] = [Color::Blue, Color::Green, Color::Magenta];

/// A stable color for `tag`: the sum of its UTF-16 code units picks an
/// entry from the palette, so the same tag always gets the same color.
pub fn tag_color(tag: &str) -> Color {
    let sum: u64 = tag.encode_utf16().map(u64::from).sum();
    TAG_COLORS[(sum % TAG_COLORS.len() as u64) as usize]
}

/// `2024-02-20T08:30:00Z` → `Feb 20, 2024`.  Input that is neither RFC 3339
/// nor a bare `YYYY-MM-DD` date is returned unchanged.
pub fn format_date(raw: &str) -> String {
    const FORMAT: &str = "%b %-d, %Y";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }
    raw.to_string()
}

/// `50000, 80000, "USD"` → `$50,000 - $80,000`.  Equal bounds render a
/// single amount.  Amounts are rounded to whole units.
pub fn format_salary(min: f64, max: f64, currency: &str) -> String {
    let min = min.round() as u64;
    let max = max.round() as u64;

    if min == max {
        return money(min, currency);
    }
    format!("{} - {}", money(min, currency), money(max, currency))
}

fn money(amount: u64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let symbol = match code.as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    };

    let digits = group_thousands(amount);
    match symbol {
        Some(symbol) => format!("{symbol}{digits}"),
        None if code.is_empty() => digits,
        None => format!("{code} {digits}"),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Upper-case the first letter of every space-separated word and
/// lower-case the rest: `"full-TIME job"` → `"Full-time Job"`.
pub fn capitalize(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
