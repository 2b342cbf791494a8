use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculations;
use super::errors::InvoiceError;
use super::value_objects::{
  Currency, CustomerName, InvoiceNumber, InvoiceStatus, LineItemDescription, Quantity, TaxRate,
  ValueObjectError,
};

// Invoice - billable document with its cached financial snapshot.
//
// `amount_paid` and `balance_due` are a projection of the payment ledger;
// every ledger append updates them in the same unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub invoice_number: InvoiceNumber,
  pub customer_name: CustomerName,
  pub currency: Currency,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub subtotal: Decimal,
  pub tax_rate: TaxRate,
  pub tax_amount: Decimal,
  pub total: Decimal,
  pub amount_paid: Decimal,
  pub balance_due: Decimal,
  pub is_archived: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Invoice {
  pub fn new(
    invoice_number: InvoiceNumber,
    customer_name: CustomerName,
    currency: Currency,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    tax_rate: TaxRate,
    subtotal: Decimal,
  ) -> Result<Self, ValueObjectError> {
    if subtotal.is_sign_negative() {
      return Err(ValueObjectError::InvalidAmount(
        "Subtotal cannot be negative".to_string(),
      ));
    }

    let subtotal = calculations::round_currency(subtotal, currency);
    let tax_amount = calculations::tax_amount(subtotal, tax_rate.value(), currency);
    let total = calculations::invoice_total(subtotal, tax_amount, currency);
    let now = Utc::now();

    Ok(Self {
      id: Uuid::new_v4(),
      invoice_number,
      customer_name,
      currency,
      issue_date,
      due_date,
      status: InvoiceStatus::Draft,
      subtotal,
      tax_rate,
      tax_amount,
      total,
      amount_paid: Decimal::ZERO,
      balance_due: total,
      is_archived: false,
      created_at: now,
      updated_at: now,
    })
  }

  /// Pure state transition for a payment of `amount` against this invoice.
  ///
  /// Returns the post-payment snapshot without touching storage; the ledger
  /// persists it together with the payment row in one unit of work. The
  /// amount is rounded to the currency precision before any comparison.
  /// Paying exactly the remaining balance is allowed and settles the
  /// invoice; exceeding it is not.
  pub fn apply_payment(&self, amount: Decimal) -> Result<Invoice, InvoiceError> {
    if self.is_archived {
      return Err(InvoiceError::ArchivedInvoice);
    }
    if self.balance_due.is_zero() {
      return Err(InvoiceError::AlreadySettled);
    }

    let amount = calculations::round_currency(amount, self.currency);
    if amount <= Decimal::ZERO {
      return Err(InvoiceError::Validation(ValueObjectError::InvalidAmount(
        "Payment amount must be greater than 0".to_string(),
      )));
    }
    if amount > self.balance_due {
      return Err(InvoiceError::Overpayment {
        amount,
        balance_due: self.balance_due,
      });
    }

    let amount_paid = calculations::round_currency(self.amount_paid + amount, self.currency);
    let balance_due = calculations::balance_due(self.total, amount_paid, self.currency);
    let status = if balance_due.is_zero() {
      InvoiceStatus::Paid
    } else {
      self.status
    };

    Ok(Invoice {
      amount_paid,
      balance_due,
      status,
      updated_at: Utc::now(),
      ..self.clone()
    })
  }

  /// Archiving hides the invoice from payment processing without altering
  /// any financial field. Idempotent.
  pub fn archive(&mut self) {
    self.is_archived = true;
    self.updated_at = Utc::now();
  }

  pub fn restore(&mut self) -> Result<(), InvoiceError> {
    if !self.is_archived {
      return Err(InvoiceError::NotArchived);
    }
    self.is_archived = false;
    self.updated_at = Utc::now();
    Ok(())
  }
}

// Invoice Line - one billed item, owned by its invoice. Created once,
// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub description: LineItemDescription,
  pub quantity: Quantity,
  pub unit_price: Decimal,
  pub line_total: Decimal,
  pub created_at: DateTime<Utc>,
}

impl InvoiceLine {
  pub fn new(
    invoice_id: Uuid,
    description: LineItemDescription,
    quantity: Quantity,
    unit_price: Decimal,
    currency: Currency,
  ) -> Result<Self, ValueObjectError> {
    if unit_price.is_sign_negative() {
      return Err(ValueObjectError::InvalidAmount(
        "Unit price cannot be negative".to_string(),
      ));
    }

    let line_total = calculations::line_total(quantity.value(), unit_price, currency);

    Ok(Self {
      id: Uuid::new_v4(),
      invoice_id,
      description,
      quantity,
      unit_price,
      line_total,
      created_at: Utc::now(),
    })
  }
}

// Payment - immutable ledger entry. Appended by the payment ledger, never
// mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub amount: Decimal,
  pub payment_date: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Payment {
  pub fn new(
    invoice_id: Uuid,
    amount: Decimal,
    payment_date: DateTime<Utc>,
  ) -> Result<Self, ValueObjectError> {
    if amount <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Payment amount must be greater than 0".to_string(),
      ));
    }

    Ok(Self {
      id: Uuid::new_v4(),
      invoice_id,
      amount,
      payment_date,
      created_at: Utc::now(),
    })
  }
}
