// src/domain/format.rs
//
// Display helpers. Amounts stay unrounded everywhere else.

use chrono::NaiveDate;

/// US dollars, whole units, thousands separators: `$1,234,568`, `-$50`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `Mar 15, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `3%`, `2.5%`
pub fn format_percent(value: f64) -> String {
    format!("{value}%")
}

/// Width of a bar relative to the largest one. A zero (or negative) max
/// gives 0 rather than dividing by it.
pub fn bar_width_percent(total: f64, max: f64) -> f64 {
    if max > 0.0 {
        total / max * 100.0
    } else {
        0.0
    }
}
