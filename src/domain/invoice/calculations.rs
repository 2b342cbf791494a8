//! Money arithmetic shared by every financial computation.
//!
//! All monetary fields pass through [`round_currency`] before storage or
//! comparison. Intermediate precision is kept until the final rounding step
//! of each computed field so rounding error never compounds.

use rust_decimal::{Decimal, RoundingStrategy};

use super::value_objects::Currency;

/// Rounds an amount to the currency's minor-unit precision.
///
/// Half-way values round away from zero, matching conventional currency
/// rounding (2.005 -> 2.01, not 2.00).
pub fn round_currency(amount: Decimal, currency: Currency) -> Decimal {
  amount.round_dp_with_strategy(currency.precision(), RoundingStrategy::MidpointAwayFromZero)
}

/// `round(quantity * unit_price)`
pub fn line_total(quantity: Decimal, unit_price: Decimal, currency: Currency) -> Decimal {
  round_currency(quantity * unit_price, currency)
}

/// `round(subtotal * rate / 100)`, zero when the rate is zero.
pub fn tax_amount(subtotal: Decimal, tax_rate: Decimal, currency: Currency) -> Decimal {
  if tax_rate.is_zero() {
    return Decimal::ZERO;
  }
  round_currency(subtotal * tax_rate / Decimal::from(100), currency)
}

/// `round(subtotal + tax_amount)`
pub fn invoice_total(subtotal: Decimal, tax_amount: Decimal, currency: Currency) -> Decimal {
  round_currency(subtotal + tax_amount, currency)
}

/// Remaining unpaid amount, clamped at zero. Negative balances are never
/// reported.
pub fn balance_due(total: Decimal, amount_paid: Decimal, currency: Currency) -> Decimal {
  let balance = round_currency(total - amount_paid, currency);
  balance.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_round_currency_two_decimals() {
    assert_eq!(round_currency(dec!(10.005), Currency::USD), dec!(10.01));
    assert_eq!(round_currency(dec!(10.004), Currency::USD), dec!(10.00));
    assert_eq!(round_currency(dec!(85000), Currency::INR), dec!(85000));
  }

  #[test]
  fn test_round_currency_zero_decimal() {
    assert_eq!(round_currency(dec!(1000.5), Currency::JPY), dec!(1001));
    assert_eq!(round_currency(dec!(1000.4), Currency::JPY), dec!(1000));
  }

  #[test]
  fn test_line_total() {
    assert_eq!(line_total(dec!(3), dec!(19.99), Currency::USD), dec!(59.97));
    // 2.5 * 10.333 = 25.8325 -> rounds once at the end
    assert_eq!(
      line_total(dec!(2.5), dec!(10.333), Currency::EUR),
      dec!(25.83)
    );
    assert_eq!(line_total(dec!(0), dec!(100), Currency::USD), dec!(0));
  }

  #[test]
  fn test_tax_amount() {
    assert_eq!(tax_amount(dec!(85000), dec!(18), Currency::INR), dec!(15300));
    assert_eq!(tax_amount(dec!(1500), dec!(10), Currency::USD), dec!(150));
    assert_eq!(tax_amount(dec!(420), dec!(20), Currency::EUR), dec!(84));
    assert_eq!(tax_amount(dec!(999.99), dec!(0), Currency::USD), dec!(0));
    // 33.33 * 7.25% = 2.416425 -> 2.42, no truncation of intermediates
    assert_eq!(tax_amount(dec!(33.33), dec!(7.25), Currency::USD), dec!(2.42));
  }

  #[test]
  fn test_invoice_total() {
    assert_eq!(
      invoice_total(dec!(85000), dec!(15300), Currency::INR),
      dec!(100300)
    );
    assert_eq!(invoice_total(dec!(1500), dec!(150), Currency::USD), dec!(1650));
  }

  #[test]
  fn test_balance_due_clamps_at_zero() {
    assert_eq!(balance_due(dec!(100), dec!(40), Currency::USD), dec!(60));
    assert_eq!(balance_due(dec!(100), dec!(100), Currency::USD), dec!(0));
    assert_eq!(balance_due(dec!(100), dec!(150), Currency::USD), dec!(0));
  }

  #[test]
  fn test_balance_due_jpy_whole_units() {
    assert_eq!(balance_due(dec!(1000), dec!(333), Currency::JPY), dec!(667));
  }
}
