use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use thiserror::Error;

/// Signed currency amount represented as **integer cents**.
///
/// Income and expense amounts are bounded to four integer digits and two
/// fractional digits (`-9999.99..=9999.99`). Derived values such as a budget
/// revenue are sums of bounded amounts and may exceed that range.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_cents(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input:
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// assert!("10000".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

/// Digits allowed before the decimal point.
pub const MAX_INTEGER_DIGITS: usize = 4;
/// Digits allowed after the decimal point.
pub const DECIMAL_PLACES: usize = 2;

/// Why a textual amount was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("This field may not be blank.")]
    Empty,
    #[error("A valid number is required.")]
    Invalid,
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimals,
    #[error("Ensure that there are no more than 4 digits before the decimal point.")]
    TooManyDigits,
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts an optional leading `+`/`-` and `.` as decimal separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, rest) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (units_str, frac_str) = match rest.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (rest, ""),
        };
        if units_str.is_empty() && frac_str.is_empty() {
            return Err(AmountError::Invalid);
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(units_str) || !all_digits(frac_str) {
            return Err(AmountError::Invalid);
        }

        // Every written decimal counts, zero or not.
        if frac_str.len() > DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimals);
        }
        let units_str = units_str.trim_start_matches('0');
        if units_str.len() > MAX_INTEGER_DIGITS {
            return Err(AmountError::TooManyDigits);
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| AmountError::Invalid)?
        };
        let cents: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10,
            _ => frac_str.parse().map_err(|_| AmountError::Invalid)?,
        };

        let total = units * 100 + cents;
        Ok(Amount(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::from_cents(0).to_string(), "0.00");
        assert_eq!(Amount::from_cents(1).to_string(), "0.01");
        assert_eq!(Amount::from_cents(10).to_string(), "0.10");
        assert_eq!(Amount::from_cents(9_900).to_string(), "99.00");
        assert_eq!(Amount::from_cents(-1_050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_common_forms() {
        assert_eq!("100.00".parse::<Amount>().unwrap().cents(), 10_000);
        assert_eq!("1".parse::<Amount>().unwrap().cents(), 100);
        assert_eq!("1.5".parse::<Amount>().unwrap().cents(), 150);
        assert_eq!(".5".parse::<Amount>().unwrap().cents(), 50);
        assert_eq!("-0.01".parse::<Amount>().unwrap().cents(), -1);
        assert_eq!("+2.30".parse::<Amount>().unwrap().cents(), 230);
        assert_eq!("  9999.99 ".parse::<Amount>().unwrap().cents(), 999_999);
        assert_eq!("00042".parse::<Amount>().unwrap().cents(), 4_200);
    }

    #[test]
    fn parse_rejects_out_of_range_and_garbage() {
        assert_eq!("12.345".parse::<Amount>(), Err(AmountError::TooManyDecimals));
        assert_eq!("1.500".parse::<Amount>(), Err(AmountError::TooManyDecimals));
        assert_eq!("12.3400".parse::<Amount>(), Err(AmountError::TooManyDecimals));
        assert_eq!("10000".parse::<Amount>(), Err(AmountError::TooManyDigits));
        assert_eq!("-10000.00".parse::<Amount>(), Err(AmountError::TooManyDigits));
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("-".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!(".".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("1,50".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("1e3".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::Invalid));
    }

    #[test]
    fn sum_and_difference() {
        let incomes = [Amount::from_cents(10_000), Amount::from_cents(1_000)];
        let expenses = [Amount::from_cents(100)];
        let revenue = incomes.iter().sum::<Amount>() - expenses.iter().sum::<Amount>();
        assert_eq!(revenue, Amount::from_cents(10_900));
        assert_eq!(Vec::<Amount>::new().into_iter().sum::<Amount>(), Amount::ZERO);
    }
}
