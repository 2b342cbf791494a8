use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use merubill::{
  adapters::http::{
    InvoiceRouteDependencies, RequestIdMiddleware, SessionAuthMiddleware, configure_invoice_routes,
  },
  application::invoice::{
    AddPaymentUseCase, ArchiveInvoiceUseCase, CreateInvoiceUseCase, GetInvoiceDetailsUseCase,
    ListInvoicesUseCase, ListPaymentsUseCase, RestoreInvoiceUseCase,
  },
  domain::auth::{AuthService, SessionRepository},
  domain::invoice::{InvoiceService, InvoiceServiceDependencies, PaymentLedgerService},
  infrastructure::{
    config::Config,
    persistence::postgres::{
      PostgresInvoiceLineRepository, PostgresInvoiceRepository, PostgresLedgerStore,
      PostgresPaymentRepository, PostgresSessionRepository,
    },
    security::SecureTokenGenerator,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "merubill=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting MeruBill application");

  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  tracing::info!("Connecting to database: {}", config.database.url);

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    std::io::Error::other(format!("Database error: {}", e))
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Repositories
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let line_repo = Arc::new(PostgresInvoiceLineRepository::new(db_pool.clone()));
  let payment_repo = Arc::new(PostgresPaymentRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool.clone()));
  let ledger_store = Arc::new(PostgresLedgerStore::new(db_pool.clone()));

  match session_repo.delete_expired().await {
    Ok(removed) if removed > 0 => tracing::info!("Removed {} expired sessions", removed),
    Ok(_) => {}
    Err(e) => tracing::warn!("Failed to remove expired sessions: {}", e),
  }

  // Domain services
  let invoice_service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo,
    line_repo,
    payment_repo: payment_repo.clone(),
  }));
  let ledger_service = Arc::new(PaymentLedgerService::new(ledger_store, payment_repo));
  let auth_service = Arc::new(AuthService::new(
    session_repo,
    Arc::new(SecureTokenGenerator::new()),
  ));

  // Use cases
  let list_invoices = Arc::new(ListInvoicesUseCase::new(invoice_service.clone()));
  let create_invoice = Arc::new(CreateInvoiceUseCase::new(invoice_service.clone()));
  let get_invoice_details = Arc::new(GetInvoiceDetailsUseCase::new(invoice_service.clone()));
  let archive_invoice = Arc::new(ArchiveInvoiceUseCase::new(invoice_service.clone()));
  let restore_invoice = Arc::new(RestoreInvoiceUseCase::new(invoice_service.clone()));
  let add_payment = Arc::new(AddPaymentUseCase::new(ledger_service.clone()));
  let list_payments = Arc::new(ListPaymentsUseCase::new(ledger_service.clone()));

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .route(
        "/health",
        web::get().to(merubill::adapters::http::handlers::health::health_handler),
      )
      .service(
        web::scope("/api/invoices")
          .wrap(SessionAuthMiddleware::new(auth_service.clone()))
          .configure(|cfg| {
            configure_invoice_routes(
              cfg,
              InvoiceRouteDependencies {
                list_invoices: list_invoices.clone(),
                create_invoice: create_invoice.clone(),
                get_invoice_details: get_invoice_details.clone(),
                archive_invoice: archive_invoice.clone(),
                restore_invoice: restore_invoice.clone(),
                add_payment: add_payment.clone(),
                list_payments: list_payments.clone(),
              },
            )
          }),
      )
  })
  .bind((server_host, server_port))?
  .run()
  .await
}
