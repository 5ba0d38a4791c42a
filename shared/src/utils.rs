// Display formatting shared by the report writers.

/// Formats `value` with `decimals` places and `,` thousands separators.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.decimals$}", value.abs(), decimals = decimals);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0 after rounding prints as 0
    let is_negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if is_negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Formats a table cell; missing values render as an empty string.
pub fn format_cell(value: Option<f64>, decimals: usize, thousands: bool) -> String {
    match value {
        Some(v) if thousands => format_thousands(v, decimals),
        Some(v) => format!("{:.decimals$}", v, decimals = decimals),
        None => String::new(),
    }
}
