// core/src/money.rs

//! Presentation of money amounts. Totals are carried at full precision and
//! only rounded here.

use crate::error::{BoxOfficeError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rounds half away from zero to 2 decimal places and always prints both
/// fraction digits, e.g. `12.5` → `"12.50"`.
pub fn format_currency(amount: Decimal) -> String {
  let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("{:.2}", rounded)
}

/// Parses an amount produced by [`format_currency`], tolerating a leading `$`
/// and `,` thousands separators. The result is rounded to 2 decimal places.
pub fn parse_currency(input: &str) -> Result<Decimal> {
  let trimmed = input.trim();
  let (negative, unsigned) = match trimmed.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, trimmed),
  };
  let digits: String = unsigned
    .strip_prefix('$')
    .unwrap_or(unsigned)
    .chars()
    .filter(|c| *c != ',')
    .collect();

  if digits.is_empty() {
    return Err(BoxOfficeError::InvalidAmount {
      input: input.to_string(),
      reason: "empty amount".to_string(),
    });
  }
  if digits.starts_with(['-', '+']) {
    return Err(BoxOfficeError::InvalidAmount {
      input: input.to_string(),
      reason: "sign must come first and appear once".to_string(),
    });
  }

  let value = Decimal::from_str(&digits).map_err(|e| BoxOfficeError::InvalidAmount {
    input: input.to_string(),
    reason: e.to_string(),
  })?;
  let value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  #[test]
  fn formats_with_two_fraction_digits() {
    assert_eq!(format_currency(Decimal::new(125, 1)), "12.50");
    assert_eq!(format_currency(Decimal::new(35, 0)), "35.00");
    assert_eq!(format_currency(Decimal::new(10005, 3)), "10.01");
    assert_eq!(format_currency(Decimal::ZERO), "0.00");
  }

  #[test]
  fn parse_recovers_formatted_value() {
    let original = Decimal::new(1250, 2);
    let parsed = parse_currency(&format_currency(original)).unwrap();
    assert_eq!(parsed, original);
  }

  #[test]
  fn parse_accepts_symbol_and_separators() {
    assert_eq!(parse_currency("$1,234.5").unwrap(), Decimal::new(123450, 2));
    assert_eq!(parse_currency("-$3.10").unwrap(), Decimal::new(-310, 2));
  }

  #[test]
  fn parse_rejects_garbage() {
    assert!(matches!(
      parse_currency("twelve"),
      Err(BoxOfficeError::InvalidAmount { .. })
    ));
    assert!(parse_currency("  ").is_err());
  }

  #[test]
  fn parse_rejects_repeated_or_misplaced_signs() {
    for input in ["--5", "-$-5", "$-5", "-+5", "$+5"] {
      assert!(
        matches!(parse_currency(input), Err(BoxOfficeError::InvalidAmount { .. })),
        "{} should be rejected",
        input
      );
    }
  }
}
