// Counter text helpers

/// Whole-number count with thousands separators, e.g. `4,020,000,101`.
pub fn format_count(value: f64) -> String {
    let whole = value.floor();
    if !whole.is_finite() {
        return "—".to_string();
    }
    let digits = format!("{:.0}", whole.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Currency with two decimals, e.g. `$0.80`.
pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}
