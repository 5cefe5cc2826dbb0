//! FILENAME: core/forest-engine/src/number_format.rs
//! PURPOSE: Number formatting for the text columns and axis ticks.
//! CONTEXT: Estimates and intervals are always shown with two fixed decimals;
//! sample sizes get thousands separators; tick labels use the shortest form.

/// Decimal places used for estimates and confidence bounds.
pub const INTERVAL_DECIMALS: u8 = 2;

/// "2.30 (2.10, 2.50)"
pub fn format_interval(estimate: f64, lower: f64, upper: f64) -> String {
    format!(
        "{} ({}, {})",
        format_decimal(estimate, INTERVAL_DECIMALS),
        format_decimal(lower, INTERVAL_DECIMALS),
        format_decimal(upper, INTERVAL_DECIMALS),
    )
}

/// Format a sample size, e.g. 12500 -> "12,500".
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format an axis tick value without trailing zeros (2.50 -> "2.5", 3.0 -> "3").
pub fn format_tick(value: f64) -> String {
    // Ticks computed from float steps can land on -0.0 or 1.9999999
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        return "0".to_string();
    }

    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{:.0}", rounded);
    }

    let formatted = format!("{:.6}", rounded);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Fixed-point formatting, e.g. (2.3, 2) -> "2.30".
pub fn format_decimal(value: f64, decimal_places: u8) -> String {
    format!("{:.prec$}", value, prec = decimal_places as usize)
}

/// Inserts a comma every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(2.3, 2.1, 2.5), "2.30 (2.10, 2.50)");
        assert_eq!(format_interval(6.0, 5.0, 7.0), "6.00 (5.00, 7.00)");
        assert_eq!(format_interval(0.456, 0.1234, 1.005), "0.46 (0.12, 1.00)");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234.567, 2), "1234.57");
        assert_eq!(format_decimal(-0.5, 2), "-0.50");
        assert_eq!(format_decimal(3.0, 0), "3");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(100000), "100,000");
        assert_eq!(format_count(0), "0");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(-0.0000001), "0");
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.30000000000000004), "0.3");
        assert_eq!(format_tick(-1.25), "-1.25");
    }
}
