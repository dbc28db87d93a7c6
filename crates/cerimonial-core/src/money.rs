//! Monetary amounts in Brazilian reais, held as integer centavos.

use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// An amount of money in centavos. Arithmetic never goes through floats
/// except when scaling by a fractional quantity, which rounds to the nearest
/// centavo.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
  pub const ZERO: Money = Money(0);

  pub const fn from_cents(cents: i64) -> Self { Money(cents) }

  pub const fn cents(self) -> i64 { self.0 }

  /// Convert a float amount in reais, rounding to the nearest centavo.
  pub fn from_reais(value: f64) -> Self { Money((value * 100.0).round() as i64) }

  /// Multiply by a whole count, saturating on overflow.
  pub fn times(self, count: u32) -> Self { Money(self.0.saturating_mul(i64::from(count))) }

  /// Multiply by a possibly fractional quantity (e.g. 2.5 kg).
  pub fn scale(self, factor: f64) -> Self { Money((self.0 as f64 * factor).round() as i64) }
}

impl Add for Money {
  type Output = Money;

  fn add(self, rhs: Money) -> Money { Money(self.0.saturating_add(rhs.0)) }
}

impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::ZERO, Add::add) }
}

/// Formats as `R$ 1.234,56`.
impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.0 < 0 { "-" } else { "" };
    let abs = self.0.unsigned_abs();
    let units = (abs / 100).to_string();
    let cents = abs % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
      if i > 0 && (units.len() - i) % 3 == 0 {
        grouped.push('.');
      }
      grouped.push(ch);
    }

    write!(f, "{sign}R$ {grouped},{cents:02}")
  }
}

/// Parses `"50"`, `"50.5"`, `"50.00"` or `"50,00"`, optionally prefixed with
/// `R$`. At most two decimal places; no thousands separators.
impl FromStr for Money {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || Error::InvalidMoney(s.to_owned());

    let raw = s.trim();
    let raw = raw.strip_prefix("R$").unwrap_or(raw).trim();

    let (units, frac) = match raw.find(['.', ',']) {
      Some(i) => (&raw[..i], &raw[i + 1..]),
      None => (raw, ""),
    };

    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (units.is_empty() && frac.is_empty())
      || !all_digits(units)
      || !all_digits(frac)
      || frac.len() > 2
    {
      return Err(invalid());
    }

    let units: i64 = if units.is_empty() { 0 } else { units.parse().map_err(|_| invalid())? };
    let cents: i64 = match frac.len() {
      0 => 0,
      1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
      _ => frac.parse().map_err(|_| invalid())?,
    };

    units
      .checked_mul(100)
      .and_then(|u| u.checked_add(cents))
      .map(Money)
      .ok_or_else(invalid)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_both_decimal_separators() {
    assert_eq!("50.00".parse::<Money>().unwrap(), Money::from_cents(5000));
    assert_eq!("50,5".parse::<Money>().unwrap(), Money::from_cents(5050));
    assert_eq!("R$ 12".parse::<Money>().unwrap(), Money::from_cents(1200));
    assert_eq!(".75".parse::<Money>().unwrap(), Money::from_cents(75));
  }

  #[test]
  fn rejects_garbage() {
    for bad in ["", "abc", "1.234,56", "10.999", "-5", "."] {
      assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
    }
  }

  #[test]
  fn displays_in_brazilian_format() {
    assert_eq!(Money::from_cents(500_000).to_string(), "R$ 5.000,00");
    assert_eq!(Money::from_cents(123_456_789).to_string(), "R$ 1.234.567,89");
    assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
    assert_eq!(Money::from_cents(-150).to_string(), "-R$ 1,50");
  }

  #[test]
  fn times_and_scale() {
    let per_guest: Money = "50.00".parse().unwrap();
    assert_eq!(per_guest.times(100), Money::from_cents(500_000));
    assert_eq!(Money::from_cents(1000).scale(2.5), Money::from_cents(2500));
    assert_eq!(Money::from_reais(19.999), Money::from_cents(2000));
  }

  #[test]
  fn sums() {
    let total: Money = [100, 250, 5].into_iter().map(Money::from_cents).sum();
    assert_eq!(total, Money::from_cents(355));
  }
}
