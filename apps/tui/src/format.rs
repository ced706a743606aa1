//! Label and number formatting shared by the controls and the chart builders.

/// Turns a raw product column name into a display label.
///
/// `"Maize_Production"` becomes `"Maize Production"`. Applying it twice gives
/// the same result as applying it once.
pub fn format_product_name(product: &str) -> String {
    let spaced = product.replace('_', " ");

    let label = match spaced.to_ascii_lowercase().find("production") {
        Some(start) => {
            let end = start + "production".len();
            format!("{}Production{}", &spaced[..start], &spaced[end..])
        }
        None => spaced,
    };

    label.trim().to_string()
}

/// Option label for a raw dimension value. Only underscored identifiers are
/// run through [`format_product_name`].
pub fn option_label(value: &str) -> String {
    if value.contains('_') {
        format_product_name(value)
    } else {
        value.to_string()
    }
}

/// Formats a number with `,` group separators and at most two fraction
/// digits, e.g. `1234567.891` -> `"1,234,567.89"`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (integer != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// `format_thousands` for optional values, `"N/A"` when absent.
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), format_thousands)
}

/// Compact form used where a chart bar only has a few cells for its value.
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_names_are_humanised() {
        assert_eq!(format_product_name("Maize_Production"), "Maize Production");
        assert_eq!(format_product_name("Wheat"), "Wheat");
        assert_eq!(format_product_name("_Rice_"), "Rice");
        assert_eq!(
            format_product_name("cocoa_beans_production"),
            "cocoa beans Production"
        );
    }

    #[test]
    fn product_name_formatting_is_idempotent() {
        for raw in [
            "Maize_Production",
            "Wheat",
            "  Bananas_production_tonnes ",
            "Soybeans__Production",
            "",
        ] {
            let once = format_product_name(raw);
            assert_eq!(format_product_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn option_labels_only_format_underscored_values() {
        assert_eq!(option_label("Rice_Production"), "Rice Production");
        assert_eq!(option_label("United States"), "United States");
        assert_eq!(option_label(" padded "), " padded ");
        assert_eq!(option_label("2020"), "2020");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(format_thousands(-42_000.5), "-42,000.5");
        assert_eq!(format_thousands(f64::NAN), "N/A");
        assert_eq!(format_optional(None), "N/A");
    }

    #[test]
    fn compact_values_use_suffixes() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(12_500.0), "12.5k");
        assert_eq!(format_compact(3_400_000.0), "3.4M");
        assert_eq!(format_compact(1_200_000_000.0), "1.2B");
    }
}
