use std::{fmt, str::FromStr};

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 通貨
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    CZK,
    EUR,
    USD,
    JPY,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CZK => "CZK",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::JPY => "JPY",
        }
    }

    /// 小数点以下の桁数
    pub fn minor_digits(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            Currency::CZK | Currency::EUR | Currency::USD => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CZK" => Ok(Currency::CZK),
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "JPY" => Ok(Currency::JPY),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// 金額。`amount` は補助単位 (CZK なら haléř) で保持する。
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.currency.minor_digits();
        let scale = 10u64.pow(digits);
        let abs = self.amount.unsigned_abs();
        let major = (abs / scale).to_formatted_string(&Locale::en);
        let sign = if self.amount < 0 { "-" } else { "" };
        let body = match digits {
            0 => major,
            _ => format!("{}.{:0width$}", major, abs % scale, width = digits as usize),
        };
        match self.currency {
            Currency::CZK => write!(f, "{}{} Kč", sign, body),
            Currency::EUR => write!(f, "{}€{}", sign, body),
            Currency::USD => write!(f, "{}${}", sign, body),
            Currency::JPY => write!(f, "{}¥{}", sign, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(format!("{}", Money::new(1000000, Currency::JPY)), "¥1,000,000");
        assert_eq!(format!("{}", Money::new(20000, Currency::CZK)), "200.00 Kč");
        assert_eq!(format!("{}", Money::new(123450, Currency::EUR)), "€1,234.50");
        assert_eq!(format!("{}", Money::new(-75013, Currency::USD)), "-$750.13");
        assert_eq!(format!("{}", Money::new(5, Currency::CZK)), "0.05 Kč");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("EUR".parse::<Currency>(), Ok(Currency::EUR));
        assert_eq!(
            "XYZ".parse::<Currency>(),
            Err(UnknownCurrency("XYZ".to_owned()))
        );
        assert_eq!(Currency::CZK.code().parse::<Currency>(), Ok(Currency::CZK));
    }
}
