//! Display formatting and conditional styling.
//!
//! Everything here is a pure function of a value and the active currency
//! symbol: the same value always produces the same text and style.

use serde::{Deserialize, Serialize};

/// Values strictly above this are highlighted as positive.
pub const POSITIVE_THRESHOLD: f64 = 100.0;

/// Background signal for a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl Background {
    /// Hex color used by the desktop theme.
    pub fn color(self) -> &'static str {
        match self {
            Background::Neutral => "#3c3f41",
            Background::Positive => "#4caf50",
            Background::Negative => "#f44336",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Visual style derived from a cell's value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub background: Background,
    pub alignment: Alignment,
}

/// Map a cell's numeric value (None for non-numeric text) to its style.
pub fn classify(value: Option<f64>) -> Style {
    match value {
        None => Style::default(),
        Some(v) => {
            let background = if v > POSITIVE_THRESHOLD {
                Background::Positive
            } else if v < 0.0 {
                Background::Negative
            } else {
                Background::Neutral
            };
            Style {
                background,
                alignment: Alignment::Right,
            }
        }
    }
}

/// Parse display text as a number, ignoring thousands separators,
/// surrounding whitespace and the currency symbol.
/// Only finite values are accepted.
pub fn parse_number(text: &str, currency_symbol: &str) -> Option<f64> {
    let stripped = if currency_symbol.is_empty() {
        text.to_string()
    } else {
        text.replace(currency_symbol, "")
    };
    let cleaned: String = stripped
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a value with thousands separators, two decimals and a trailing
/// currency symbol: `1234.5` with `"₺"` gives `"1,234.50 ₺"`.
///
/// Negative values that round to zero print without a sign (`-0.001` gives
/// `"0.00 ₺"`), matching what [`parse_number`] reads back at cent resolution.
pub fn format_currency(value: f64, currency_symbol: &str) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = value < 0.0 && fixed != "0.00";

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 4);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    out.push('.');
    out.push_str(frac_part);
    if !currency_symbol.is_empty() {
        out.push(' ');
        out.push_str(currency_symbol);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a formula result for display.
///
/// Dependent formulas read this text back, so non-integral values use the
/// shortest representation that parses to the same `f64`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(Some(150.0)).background, Background::Positive);
        assert_eq!(classify(Some(-5.0)).background, Background::Negative);
        assert_eq!(classify(Some(50.0)).background, Background::Neutral);
        assert_eq!(classify(Some(100.0)).background, Background::Neutral);
        assert_eq!(classify(Some(0.0)).background, Background::Neutral);
        assert_eq!(classify(parse_number("abc", "$")), Style::default());
    }

    #[test]
    fn test_numbers_align_right() {
        assert_eq!(classify(Some(1.0)).alignment, Alignment::Right);
        assert_eq!(classify(None).alignment, Alignment::Left);
    }

    #[test]
    fn test_format_currency_suffix() {
        assert_eq!(format_currency(1234.56, "₺"), "1,234.56 ₺");
        assert_eq!(format_currency(1234.5, "$"), "1,234.50 $");
        assert_eq!(format_currency(0.0, "$"), "0.00 $");
        assert_eq!(format_currency(999.999, "$"), "1,000.00 $");
        assert_eq!(format_currency(1_000_000.0, ""), "1,000,000.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1234.5, "$"), "-1,234.50 $");
        assert_eq!(format_currency(-0.001, "$"), "0.00 $");
    }

    #[test]
    fn test_parse_number_strips_decorations() {
        assert_eq!(parse_number(" 1,234.50 ₺ ", "₺"), Some(1234.5));
        assert_eq!(parse_number("-7", "$"), Some(-7.0));
        assert_eq!(parse_number("", "$"), None);
        assert_eq!(parse_number("$", "$"), None);
        assert_eq!(parse_number("inf", "$"), None);
        assert_eq!(parse_number("NaN", "$"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.004), "0.004");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_format_number_reads_back_exactly() {
        for n in [1.0 / 3.0, 0.1 + 0.2, -2.0 / 7.0, 1e-9, 12345678901.5] {
            assert_eq!(parse_number(&format_number(n), "$"), Some(n));
        }
    }

    #[test]
    fn test_background_colors() {
        assert_eq!(Background::Positive.color(), "#4caf50");
        assert_eq!(Background::Negative.color(), "#f44336");
        assert_eq!(Background::Neutral.color(), "#3c3f41");
    }

    #[test]
    fn test_currency_round_trip_example() {
        assert_eq!(parse_number(&format_currency(1234.5, "$"), "$"), Some(1234.5));
    }

    proptest! {
        #[test]
        fn currency_round_trip_at_cent_resolution(cents in 0u64..100_000_000_000_000) {
            let value = cents as f64 / 100.0;
            let text = format_currency(value, "₺");
            prop_assert_eq!(parse_number(&text, "₺"), Some(value));
        }

        #[test]
        fn currency_format_is_idempotent(value in 0.0f64..1e12) {
            let once = format_currency(value, "$");
            let reparsed = parse_number(&once, "$").unwrap();
            prop_assert_eq!(format_currency(reparsed, "$"), once);
        }
    }
}
