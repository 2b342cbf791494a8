use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
  #[error("Unknown currency: {0}")]
  UnknownCurrency(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid line item description: {0}")]
  InvalidDescription(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(String),
  #[error("Invalid customer name: {0}")]
  InvalidCustomerName(String),
  #[error("Invalid status: {0}")]
  InvalidStatus(String),
}

// Invoice Number - human-readable unique identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 100 {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot exceed 100 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
//
// Payments only ever promote Draft to Paid; the ledger never demotes.
// Reverting a paid invoice would be an explicit external action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Draft,
  Paid,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Draft => "draft",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "draft" => Ok(InvoiceStatus::Draft),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

// Currency - fixed registry with display and tax policy per code.
// Adding a currency is one new arm per method, no logic changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
  INR,
  USD,
  EUR,
  GBP,
  JPY,
  AUD,
}

impl Currency {
  pub fn as_str(&self) -> &'static str {
    match self {
      Currency::INR => "INR",
      Currency::USD => "USD",
      Currency::EUR => "EUR",
      Currency::GBP => "GBP",
      Currency::JPY => "JPY",
      Currency::AUD => "AUD",
    }
  }

  pub fn symbol(&self) -> &'static str {
    match self {
      Currency::INR => "₹",
      Currency::USD => "$",
      Currency::EUR => "€",
      Currency::GBP => "£",
      Currency::JPY => "¥",
      Currency::AUD => "A$",
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Currency::INR => "Indian Rupee",
      Currency::USD => "US Dollar",
      Currency::EUR => "Euro",
      Currency::GBP => "British Pound",
      Currency::JPY => "Japanese Yen",
      Currency::AUD => "Australian Dollar",
    }
  }

  /// Minor-unit precision used for all monetary rounding in this currency.
  /// JPY has no minor unit.
  pub fn precision(&self) -> u32 {
    match self {
      Currency::JPY => 0,
      _ => 2,
    }
  }

  pub fn tax_label(&self) -> &'static str {
    match self {
      Currency::INR | Currency::AUD => "GST",
      Currency::USD => "Sales Tax",
      Currency::EUR | Currency::GBP => "VAT",
      Currency::JPY => "Consumption Tax",
    }
  }
}

impl FromStr for Currency {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_uppercase().as_str() {
      "INR" => Ok(Currency::INR),
      "USD" => Ok(Currency::USD),
      "EUR" => Ok(Currency::EUR),
      "GBP" => Ok(Currency::GBP),
      "JPY" => Ok(Currency::JPY),
      "AUD" => Ok(Currency::AUD),
      _ => Err(ValueObjectError::UnknownCurrency(s.to_string())),
    }
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

// Customer Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerName(String);

impl CustomerName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidCustomerName(
        "Customer name cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidCustomerName(
        "Customer name cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// Line Item Description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDescription(String);

impl LineItemDescription {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 200 {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot exceed 200 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Quantity - non-negative; zero is allowed for placeholder lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(Decimal);

impl Quantity {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity cannot be negative".to_string(),
      ));
    }
    if value.scale() > 4 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity cannot have more than 4 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

// Tax Rate - percentage between 0 and 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO || value > Decimal::from(100) {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate must be between 0 and 100".to_string(),
      ));
    }
    if value.scale() > 2 {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate cannot have more than 2 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  pub fn is_zero(&self) -> bool {
    self.0.is_zero()
  }
}
