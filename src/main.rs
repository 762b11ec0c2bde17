use std::io;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use autoescuela::config::Config;
use autoescuela::modules::fees::{FeeCalculator, FeeDetector};
use autoescuela::modules::students::MySqlStudentRepository;
use autoescuela::modules::tax_invoices::{MySqlTaxInvoiceRepository, TaxInvoiceService};
use autoescuela::modules::{fees, health, tax_invoices};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoescuela=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(io::Error::other)?;
    config.validate().map_err(io::Error::other)?;

    tracing::info!("Starting autoescuela billing service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Issuer: {}", config.billing.company_name);

    let db_pool = config
        .database
        .create_pool()
        .await
        .map_err(io::Error::other)?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(io::Error::other)?;

    tracing::info!(
        "Database pool initialized (up to {} connections)",
        config.database.max_connections
    );

    let calculator = FeeCalculator::new();
    let detector = FeeDetector::new();
    let tax_invoice_service = Arc::new(TaxInvoiceService::new(
        Arc::new(MySqlTaxInvoiceRepository::new(db_pool.clone())),
        Arc::new(MySqlStudentRepository::new(db_pool.clone())),
        calculator,
        config.billing.clone(),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(calculator))
            .app_data(web::Data::new(detector))
            .app_data(web::Data::new(tax_invoice_service.clone()))
            .configure(health::configure)
            .configure(fees::controllers::configure)
            .configure(tax_invoices::controllers::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}
