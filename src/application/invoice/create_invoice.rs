use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::list_invoices::InvoiceDto;
use crate::domain::invoice::{
  Currency, InvoiceError, InvoiceService, LineItemDescription, NewInvoiceData, Quantity,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceLineDto {
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceCommand {
  pub invoice_number: String,
  pub customer_name: String,
  pub currency: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub tax_rate: Decimal,
  pub line_items: Vec<CreateInvoiceLineDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceLineResponseDto {
  pub id: Uuid,
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
  #[serde(flatten)]
  pub invoice: InvoiceDto,
  pub line_items: Vec<CreateInvoiceLineResponseDto>,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CreateInvoiceCommand,
  ) -> Result<CreateInvoiceResponse, InvoiceError> {
    let currency = Currency::from_str(&command.currency)?;

    let line_items = command
      .line_items
      .into_iter()
      .map(|line| {
        Ok((
          LineItemDescription::new(line.description)?,
          Quantity::new(line.quantity)?,
          line.unit_price,
        ))
      })
      .collect::<Result<Vec<_>, InvoiceError>>()?;

    let (invoice, lines) = self
      .invoice_service
      .create_invoice(NewInvoiceData {
        invoice_number: command.invoice_number,
        customer_name: command.customer_name,
        currency,
        issue_date: command.issue_date,
        due_date: command.due_date,
        tax_rate: command.tax_rate,
        line_items,
      })
      .await?;

    Ok(CreateInvoiceResponse {
      invoice: InvoiceDto::from_invoice(&invoice),
      line_items: lines
        .iter()
        .map(|line| CreateInvoiceLineResponseDto {
          id: line.id,
          description: line.description.value().to_string(),
          quantity: line.quantity.value(),
          unit_price: line.unit_price,
          line_total: line.line_total,
        })
        .collect(),
    })
  }
}
