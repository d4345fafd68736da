//! Currency formatting driven by an explicit locale/currency configuration.
//!
//! Three renderings are offered:
//! - [`CurrencyFormat::format_exact`]: grouped digits, fixed fraction digits (`$24,500.00`).
//! - [`CurrencyFormat::format_rounded`]: grouped digits, no fraction (`$24,500`).
//! - [`CurrencyFormat::format_compact`]: the three-tier legend policy (`$2.1m`, `$24k`, `$450`).

use crate::utils::error::{ReportError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub locale: String,
    pub currency: String,
    pub symbol: String,
    pub position: SymbolPosition,
    pub group_separator: String,
    pub decimal_separator: String,
    pub fraction_digits: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            currency: "USD".to_string(),
            symbol: "$".to_string(),
            position: SymbolPosition::Prefix,
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            fraction_digits: 2,
        }
    }
}

impl CurrencyFormat {
    /// Resolves separators and symbol placement for a locale tag and ISO currency code.
    pub fn new(locale: &str, currency: &str) -> Result<Self> {
        let (group_separator, decimal_separator, position) = match locale {
            "en-US" | "en-GB" | "en-CA" | "en-AU" => (",", ".", SymbolPosition::Prefix),
            "de-DE" | "es-ES" | "it-IT" | "nl-NL" => (".", ",", SymbolPosition::Suffix),
            "fr-FR" => ("\u{202f}", ",", SymbolPosition::Suffix),
            other => {
                return Err(ReportError::invalid_configuration(format!(
                    "unsupported locale '{}'",
                    other
                )))
            }
        };

        let symbol = match currency.to_ascii_uppercase().as_str() {
            "USD" | "CAD" | "AUD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            other => {
                return Err(ReportError::invalid_configuration(format!(
                    "unsupported currency '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            locale: locale.to_string(),
            currency: currency.to_ascii_uppercase(),
            symbol: symbol.to_string(),
            position,
            group_separator: group_separator.to_string(),
            decimal_separator: decimal_separator.to_string(),
            fraction_digits: 2,
        })
    }

    pub fn with_fraction_digits(mut self, fraction_digits: u32) -> Self {
        self.fraction_digits = fraction_digits;
        self
    }

    pub fn format_exact(&self, amount: Decimal) -> String {
        self.format_grouped(amount, self.fraction_digits)
    }

    pub fn format_rounded(&self, amount: Decimal) -> String {
        self.format_grouped(amount, 0)
    }

    /// Legend/summary rendering: `m` with one decimal from a million up, whole `k` from a
    /// thousand up, otherwise the whole amount. Tier rounding is half-to-even.
    pub fn format_compact(&self, amount: Decimal) -> String {
        let magnitude = amount.abs();
        let body = if magnitude >= MILLION {
            self.millions(magnitude)
        } else {
            let whole = magnitude.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
            // 999.6 rounds up into the k tier, 999,500 into the m tier.
            if whole >= THOUSAND {
                let thousands = (magnitude / THOUSAND)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
                if thousands >= THOUSAND {
                    self.millions(magnitude)
                } else {
                    format!("{}k", thousands.normalize())
                }
            } else {
                whole.normalize().to_string()
            }
        };
        self.with_symbol(&body, amount.is_sign_negative() && !amount.is_zero())
    }

    fn millions(&self, magnitude: Decimal) -> String {
        let mut millions =
            (magnitude / MILLION).round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
        millions.rescale(1);
        format!(
            "{}m",
            millions.to_string().replace('.', &self.decimal_separator)
        )
    }

    fn format_grouped(&self, amount: Decimal, fraction_digits: u32) -> String {
        let mut rounded = amount
            .abs()
            .round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(fraction_digits);

        let text = rounded.to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut body = group_digits(integer, &self.group_separator);
        if let Some(fraction) = fraction {
            body.push_str(&self.decimal_separator);
            body.push_str(fraction);
        }
        self.with_symbol(&body, amount.is_sign_negative() && !rounded.is_zero())
    }

    fn with_symbol(&self, body: &str, negative: bool) -> String {
        let sign = if negative { "-" } else { "" };
        match self.position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, self.symbol, body),
            SymbolPosition::Suffix => format!("{}{}\u{a0}{}", sign, body, self.symbol),
        }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyFormat {
        CurrencyFormat::default()
    }

    #[test]
    fn test_compact_tiers() {
        let format = usd();
        assert_eq!(format.format_compact(Decimal::new(1_000_000, 0)), "$1.0m");
        assert_eq!(format.format_compact(Decimal::new(2_140_000, 0)), "$2.1m");
        assert_eq!(format.format_compact(Decimal::new(24_500, 0)), "$24k");
        assert_eq!(format.format_compact(Decimal::new(24_700, 0)), "$25k");
        assert_eq!(format.format_compact(Decimal::new(1_000, 0)), "$1k");
        assert_eq!(format.format_compact(Decimal::new(450, 0)), "$450");
        assert_eq!(format.format_compact(Decimal::ZERO), "$0");
    }

    #[test]
    fn test_compact_promotes_rounded_thousands() {
        assert_eq!(usd().format_compact(Decimal::new(999_600, 0)), "$1.0m");
        assert_eq!(usd().format_compact(Decimal::new(9996, 1)), "$1k");
        assert_eq!(usd().format_compact(Decimal::new(-9996, 1)), "-$1k");
        assert_eq!(usd().format_compact(Decimal::new(9994, 1)), "$999");
    }

    #[test]
    fn test_compact_negative() {
        assert_eq!(usd().format_compact(Decimal::new(-24_200, 0)), "-$24k");
    }

    #[test]
    fn test_exact_and_rounded() {
        let format = usd();
        assert_eq!(format.format_exact(Decimal::new(2_450_050, 2)), "$24,500.50");
        assert_eq!(format.format_exact(Decimal::new(450, 0)), "$450.00");
        assert_eq!(format.format_exact(Decimal::new(123_456_789, 2)), "$1,234,567.89");
        assert_eq!(format.format_rounded(Decimal::new(24_500, 0)), "$24,500");
        assert_eq!(format.format_rounded(Decimal::new(-1_234_56, 2)), "-$1,235");
    }

    #[test]
    fn test_locale_separators() {
        let format = CurrencyFormat::new("de-DE", "EUR").unwrap();
        assert_eq!(format.format_exact(Decimal::new(1_234_550, 2)), "12.345,50\u{a0}€");
        assert_eq!(format.format_compact(Decimal::new(2_100_000, 0)), "2,1m\u{a0}€");
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        assert!(matches!(
            CurrencyFormat::new("xx-XX", "USD"),
            Err(ReportError::InvalidConfiguration { .. })
        ));
        assert!(CurrencyFormat::new("en-US", "JPY").is_err());
    }
}
