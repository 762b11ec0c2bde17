use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use autoescuela::config::Config;
use autoescuela::modules::fees::{FeeCalculator, FeeDetector};
use autoescuela::modules::imports::{AmountPolicy, ImportOptions, QuarterImporter};
use autoescuela::modules::students::MySqlStudentRepository;
use autoescuela::modules::tax_invoices::{MySqlTaxInvoiceRepository, TaxInvoiceService};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load a quarterly invoice sheet (CSV export) into the database
#[derive(Debug, Parser)]
#[command(name = "import_quarter", version)]
struct Args {
    /// CSV file: course, invoice, date, name, DNI, base, IVA, fees, total,
    /// street, postal code, municipality, province
    file: PathBuf,

    /// Parse and check everything without writing
    #[arg(long)]
    dry_run: bool,

    /// Recompute base and IVA from the total instead of keeping the sheet's
    #[arg(long)]
    regenerate: bool,

    /// Name noted on imported invoices (defaults to the file name)
    #[arg(long)]
    source_name: Option<String>,

    /// Field separator
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoescuela=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .context("delimiter must be a single ASCII character")?;

    let config = Config::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let pool = config
        .database
        .create_pool()
        .await
        .context("failed to connect to the database")?;

    let invoices = Arc::new(TaxInvoiceService::new(
        Arc::new(MySqlTaxInvoiceRepository::new(pool.clone())),
        Arc::new(MySqlStudentRepository::new(pool.clone())),
        FeeCalculator::new(),
        config.billing.clone(),
    ));
    let importer = QuarterImporter::new(
        Arc::new(MySqlStudentRepository::new(pool)),
        invoices,
        FeeDetector::new(),
    );

    let source_name = args.source_name.clone().or_else(|| {
        args.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    });
    let options = ImportOptions {
        dry_run: args.dry_run,
        amount_policy: if args.regenerate {
            AmountPolicy::Regenerate
        } else {
            AmountPolicy::Recorded
        },
        source_name,
        delimiter,
    };

    let summary = importer
        .import_path(&args.file, &options)
        .await
        .with_context(|| format!("import of {} failed", args.file.display()))?;

    for skip in &summary.skipped {
        println!("row {}: {}", skip.row, skip.reason);
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
