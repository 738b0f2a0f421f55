use chrono::NaiveDate;

pub const PESO: &str = "₱";

pub fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.unsigned_abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// `₱ 1,234.50`. Rounds to the nearest centavo.
pub fn format_currency(amount: f64) -> String {
    let cents = if amount.is_finite() {
        (amount * 100.0).round() as i64
    } else {
        0
    };
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{} {}.{:02}",
        sign,
        PESO,
        format_with_commas((cents / 100) as i64),
        cents % 100
    )
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

pub fn format_due_date(date: Option<NaiveDate>) -> String {
    date.map(format_date)
        .unwrap_or_else(|| "No Due Date".to_string())
}
