//! Conversion between integer cents and displayed/persisted amounts.

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

pub fn cents_to_units(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn units_to_cents(units: f64) -> i64 {
    (units * 100.0).round() as i64
}

/// Separators used when rendering numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleConfig {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pt-BR" | "de-DE" | "es-ES" | "it-IT" => Self {
                language_tag: tag.to_string(),
                decimal_separator: ',',
                grouping_separator: '.',
            },
            _ => Self {
                language_tag: tag.to_string(),
                ..Self::default()
            },
        }
    }
}

/// Renders `cents` with two decimals and digit grouping.
pub fn format_number(locale: &LocaleConfig, cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(locale.grouping_separator);
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!(
        "{sign}{grouped}{}{fraction:02}",
        locale.decimal_separator
    )
}

pub fn format_currency_value(locale: &LocaleConfig, symbol: &str, cents: i64) -> String {
    if symbol.is_empty() {
        format_number(locale, cents)
    } else {
        format!("{symbol} {}", format_number(locale, cents))
    }
}

/// Parses user-typed amounts such as `1234.5`, `1,234.50` or `1.234,50`.
/// The right-most separator followed by one or two digits is the decimal mark.
pub fn parse_amount(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let invalid = || LedgerError::invalid(format!("`{input}` is not a valid amount"));
    if trimmed.is_empty() {
        return Err(invalid());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return Err(invalid());
    }

    let decimal_at = trimmed
        .rfind(['.', ','])
        .filter(|idx| (1..=2).contains(&(trimmed.len() - idx - 1)));
    let (whole, fraction) = match decimal_at {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => (trimmed, ""),
    };
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let whole_value: i64 = if digits.is_empty() {
        0
    } else {
        digits.parse().map_err(|_| invalid())?
    };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    whole_value
        .checked_mul(100)
        .and_then(|value| value.checked_add(fraction_value))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping() {
        let locale = LocaleConfig::default();
        assert_eq!(format_number(&locale, 123_456_789), "1,234,567.89");
        assert_eq!(format_number(&locale, -5), "-0.05");
        assert_eq!(
            format_currency_value(&LocaleConfig::from_tag("pt-BR"), "R$", 150_000),
            "R$ 1.500,00"
        );
    }

    #[test]
    fn parses_common_amount_shapes() {
        assert_eq!(parse_amount("1234.5").unwrap(), 123_450);
        assert_eq!(parse_amount("1,234.50").unwrap(), 123_450);
        assert_eq!(parse_amount("1.234,50").unwrap(), 123_450);
        assert_eq!(parse_amount("1,234").unwrap(), 123_400);
        assert_eq!(parse_amount("42").unwrap(), 4_200);
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-10").is_err());
    }

    #[test]
    fn unit_conversion_rounds_to_nearest_cent() {
        assert_eq!(units_to_cents(350.5), 35_050);
        assert_eq!(units_to_cents(0.1 + 0.2), 30);
        assert_eq!(cents_to_units(1_999), 19.99);
    }
}
