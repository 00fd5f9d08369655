//! Currency tags carried by contracts and positions.
//!
//! The valuation core never converts between currencies; the tag travels
//! with a contract so that portfolio reports can show it next to each
//! position value.

use std::fmt;
use std::str::FromStr;

use super::error::CurrencyError;

/// ISO 4217 currency code.
///
/// # Examples
///
/// ```
/// use pricer_core::types::currency::Currency;
///
/// assert_eq!(Currency::default(), Currency::EUR);
/// assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
/// assert_eq!(Currency::JPY.decimal_places(), 0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    /// Euro
    #[default]
    EUR,
    /// United States Dollar
    USD,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
}

impl Currency {
    /// Three-letter ISO code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
        }
    }

    /// Number of minor-unit digits used when displaying amounts.
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, CurrencyError> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CHF" => Ok(Currency::CHF),
            _ => Err(CurrencyError::UnknownCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
        assert_eq!(" Gbp ".parse::<Currency>().unwrap(), Currency::GBP);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "XYZ".parse::<Currency>().unwrap_err();
        assert_eq!(err, CurrencyError::UnknownCurrency("XYZ".to_string()));
    }

    #[test]
    fn test_display_matches_code() {
        for ccy in [
            Currency::EUR,
            Currency::USD,
            Currency::GBP,
            Currency::JPY,
            Currency::CHF,
        ] {
            assert_eq!(ccy.to_string(), ccy.code());
            assert_eq!(ccy.code().parse::<Currency>().unwrap(), ccy);
        }
    }
}
