//! Display helpers shared by the terminal UI, the HTML report and the CLI.

use chrono::NaiveDateTime;

/// Placeholder for missing values
pub const MISSING: &str = "-";

/// Format an amount in soles: `S/ 12.50`
pub fn price(amount: f64) -> String {
    format!("S/ {amount:.2}")
}

/// Format an optional amount, `-` when absent
pub fn optional_price(amount: Option<f64>) -> String {
    amount.map(price).unwrap_or_else(|| MISSING.to_string())
}

/// Text or `-` when absent or blank
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(MISSING)
}

/// Signed percentage with two decimals, empty when absent
pub fn change_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{v:.2}%"),
        Some(v) => format!("{v:.2}%"),
        None => String::new(),
    }
}

/// Short timestamp for tables
pub fn timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formatting() {
        assert_eq!(price(4.2), "S/ 4.20");
        assert_eq!(price(1234.567), "S/ 1234.57");
        assert_eq!(optional_price(None), "-");
        assert_eq!(optional_price(Some(0.5)), "S/ 0.50");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("Gloria")), "Gloria");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(None), "-");
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(change_percent(Some(2.5)), "+2.50%");
        assert_eq!(change_percent(Some(-1.0)), "-1.00%");
        assert_eq!(change_percent(Some(0.0)), "0.00%");
        assert_eq!(change_percent(None), "");
    }
}
