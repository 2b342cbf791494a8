//! Development seed data. Wipes the invoice tables and repopulates them
//! through the domain services, then prints a session token for the API.
//!
//! Usage: `cargo run --bin seed`

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use merubill::{
  domain::auth::AuthService,
  domain::invoice::{
    Currency, InvoiceService, InvoiceServiceDependencies, LineItemDescription, NewInvoiceData,
    PaymentLedgerService, Quantity,
  },
  infrastructure::{
    config::Config,
    persistence::postgres::{
      PostgresInvoiceLineRepository, PostgresInvoiceRepository, PostgresLedgerStore,
      PostgresPaymentRepository, PostgresSessionRepository,
    },
    security::SecureTokenGenerator,
  },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  let config = Config::load().context("failed to load configuration")?;

  let pool = PgPoolOptions::new()
    .max_connections(2)
    .connect(&config.database.url)
    .await
    .context("failed to connect to database")?;

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("failed to run migrations")?;

  sqlx::query("TRUNCATE payments, invoice_line_items, invoices, sessions")
    .execute(&pool)
    .await
    .context("failed to wipe existing data")?;

  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(pool.clone()));
  let line_repo = Arc::new(PostgresInvoiceLineRepository::new(pool.clone()));
  let payment_repo = Arc::new(PostgresPaymentRepository::new(pool.clone()));
  let ledger_store = Arc::new(PostgresLedgerStore::new(pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(pool.clone()));

  let invoices = InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo,
    line_repo,
    payment_repo: payment_repo.clone(),
  });
  let ledger = PaymentLedgerService::new(ledger_store, payment_repo);
  let auth = AuthService::new(session_repo, Arc::new(SecureTokenGenerator::new()));

  let today = Utc::now().date_naive();

  let line = |description: &str, quantity, unit_price| {
    Ok::<_, anyhow::Error>((
      LineItemDescription::new(description.to_string())?,
      Quantity::new(quantity)?,
      unit_price,
    ))
  };

  // Partially paid INR invoice with GST
  let (gst_invoice, _) = invoices
    .create_invoice(NewInvoiceData {
      invoice_number: "INV-2026-001".to_string(),
      customer_name: "Meru Textiles Pvt Ltd".to_string(),
      currency: Currency::INR,
      issue_date: today - Duration::days(30),
      due_date: today + Duration::days(15),
      tax_rate: dec!(18),
      line_items: vec![
        line("Warehouse automation consulting", dec!(40), dec!(1500))?,
        line("On-site training", dec!(5), dec!(5000))?,
      ],
    })
    .await?;
  ledger
    .add_payment(
      gst_invoice.id,
      dec!(35000),
      Some(Utc::now() - Duration::days(10)),
    )
    .await?;

  // Fully settled USD invoice
  let (usd_invoice, _) = invoices
    .create_invoice(NewInvoiceData {
      invoice_number: "INV-2026-002".to_string(),
      customer_name: "Bluegrass Software LLC".to_string(),
      currency: Currency::USD,
      issue_date: today - Duration::days(60),
      due_date: today - Duration::days(30),
      tax_rate: dec!(0),
      line_items: vec![line("API integration retainer", dec!(1), dec!(4800))?],
    })
    .await?;
  ledger
    .add_payment(
      usd_invoice.id,
      dec!(4800),
      Some(Utc::now() - Duration::days(35)),
    )
    .await?;

  // Unpaid EUR invoice with VAT
  invoices
    .create_invoice(NewInvoiceData {
      invoice_number: "INV-2026-003".to_string(),
      customer_name: "Nordlicht GmbH".to_string(),
      currency: Currency::EUR,
      issue_date: today - Duration::days(5),
      due_date: today + Duration::days(25),
      tax_rate: dec!(19),
      line_items: vec![
        line("Design sprint", dec!(2), dec!(3200))?,
        line("Prototype hosting", dec!(3), dec!(120.50))?,
      ],
    })
    .await?;

  // JPY invoice, whole currency units
  invoices
    .create_invoice(NewInvoiceData {
      invoice_number: "INV-2026-004".to_string(),
      customer_name: "Sakura Trading KK".to_string(),
      currency: Currency::JPY,
      issue_date: today - Duration::days(14),
      due_date: today + Duration::days(16),
      tax_rate: dec!(10),
      line_items: vec![line("Logistics dashboard licence", dec!(12), dec!(48000))?],
    })
    .await?;

  // Archived GBP invoice
  let (archived, _) = invoices
    .create_invoice(NewInvoiceData {
      invoice_number: "INV-2026-005".to_string(),
      customer_name: "Harborview Analytics Ltd".to_string(),
      currency: Currency::GBP,
      issue_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
      due_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
      tax_rate: dec!(20),
      line_items: vec![line("Quarterly data audit", dec!(1), dec!(2500))?],
    })
    .await?;
  invoices.archive_invoice(archived.id).await?;

  let (session, token) = auth.issue_session("dev@merubill.local".to_string()).await?;

  println!("Seeded 5 invoices.");
  println!("Dev session for {} (expires {}):", session.user_email, session.expires_at);
  println!("  Authorization: Bearer {}", token);

  Ok(())
}
