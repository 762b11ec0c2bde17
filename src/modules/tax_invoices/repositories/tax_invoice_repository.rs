// Storage for quarterly tax invoices.
//
// invoice_number is UNIQUE in the schema. Allocation reads the highest
// sequence of the year and the insert either wins or fails with
// DuplicateInvoiceNumber; callers retry with a fresh number.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Quarter, Result};
use crate::modules::fees::{Course, DetectionConfidence, FeeSet, InvoiceTotals};
use crate::modules::tax_invoices::models::{
    ClientSnapshot, InvoiceNumber, IssuerSnapshot, NewTaxInvoice, QuarterSummary, TaxInvoice,
    TaxInvoiceFilter,
};

#[async_trait]
pub trait TaxInvoiceRepository: Send + Sync {
    /// Next free number for `year` (highest issued sequence + 1)
    async fn next_number(&self, year: i32) -> Result<InvoiceNumber>;

    /// Insert under `number`; `DuplicateInvoiceNumber` if it is taken
    async fn insert(&self, number: InvoiceNumber, invoice: &NewTaxInvoice) -> Result<TaxInvoice>;

    async fn find_by_id(&self, id: i64) -> Result<Option<TaxInvoice>>;

    async fn find_by_number(&self, number: InvoiceNumber) -> Result<Option<TaxInvoice>>;

    /// An invoice for the same student, date and total, if any
    async fn find_payment(
        &self,
        student_id: i64,
        date: NaiveDate,
        total: Decimal,
    ) -> Result<Option<TaxInvoice>>;

    /// Newest first: year, quarter, number descending
    async fn list(
        &self,
        filter: &TaxInvoiceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaxInvoice>>;

    async fn summarize(&self, year: i32, quarter: Quarter) -> Result<QuarterSummary>;
}

/// MySQL-backed tax invoice repository
#[derive(Clone)]
pub struct MySqlTaxInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlTaxInvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, invoice_number, year, quarter, sequence, invoice_date, course, student_id,
           has_basic_fee, has_motorcycle_fee, has_transfer_fee, renewal_count,
           base_taxable, vat_amount, fees_amount, total,
           client_name, client_dni, client_street, client_postal_code,
           client_municipality, client_province, issuer_name, issuer_tax_id,
           issuer_address, issuer_city, issuer_phone, issuer_email,
           recorded_fees_total, fee_detection, notes, created_at
    FROM tax_invoices
"#;

#[async_trait]
impl TaxInvoiceRepository for MySqlTaxInvoiceRepository {
    async fn next_number(&self, year: i32) -> Result<InvoiceNumber> {
        let highest: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(MAX(sequence), 0) AS SIGNED)
            FROM tax_invoices
            WHERE year = ?
            "#,
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        let highest = u32::try_from(highest)
            .map_err(|_| AppError::internal(format!("Invalid sequence {} for {}", highest, year)))?;

        Ok(InvoiceNumber::after(year, (highest > 0).then_some(highest)))
    }

    async fn insert(&self, number: InvoiceNumber, invoice: &NewTaxInvoice) -> Result<TaxInvoice> {
        if number.year != invoice.year() {
            return Err(AppError::validation(format!(
                "Invoice number {} does not belong to fiscal year {}",
                number,
                invoice.year()
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO tax_invoices (
                invoice_number, year, quarter, sequence, invoice_date, course, student_id,
                has_basic_fee, has_motorcycle_fee, has_transfer_fee, renewal_count,
                base_taxable, vat_amount, fees_amount, total,
                client_name, client_dni, client_street, client_postal_code,
                client_municipality, client_province, issuer_name, issuer_tax_id,
                issuer_address, issuer_city, issuer_phone, issuer_email,
                recorded_fees_total, fee_detection, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(number.to_string())
        .bind(number.year)
        .bind(invoice.quarter().number())
        .bind(number.sequence)
        .bind(invoice.date)
        .bind(invoice.course.code())
        .bind(invoice.student_id)
        .bind(invoice.fees.basic_fee)
        .bind(invoice.fees.motorcycle_fee)
        .bind(invoice.fees.transfer_fee)
        .bind(invoice.fees.renewal_count)
        .bind(invoice.totals.base_taxable)
        .bind(invoice.totals.vat)
        .bind(invoice.totals.fees_total)
        .bind(invoice.totals.total)
        .bind(&invoice.client.name)
        .bind(&invoice.client.dni)
        .bind(&invoice.client.street)
        .bind(&invoice.client.postal_code)
        .bind(&invoice.client.municipality)
        .bind(&invoice.client.province)
        .bind(&invoice.issuer.name)
        .bind(&invoice.issuer.tax_id)
        .bind(&invoice.issuer.address)
        .bind(&invoice.issuer.city)
        .bind(&invoice.issuer.phone)
        .bind(&invoice.issuer.email)
        .bind(invoice.recorded_fees_total)
        .bind(invoice.fee_detection.map(|d| d.as_str()))
        .bind(&invoice.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateInvoiceNumber(number.to_string());
                }
            }
            AppError::Database(e)
        })?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Inserted id out of range"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Invoice {} vanished after insert", number)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TaxInvoice>> {
        let row = sqlx::query_as::<_, TaxInvoiceRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TaxInvoiceRow::into_invoice).transpose()
    }

    async fn find_by_number(&self, number: InvoiceNumber) -> Result<Option<TaxInvoice>> {
        let row = sqlx::query_as::<_, TaxInvoiceRow>(&format!(
            "{} WHERE invoice_number = ?",
            SELECT_COLUMNS
        ))
        .bind(number.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TaxInvoiceRow::into_invoice).transpose()
    }

    async fn find_payment(
        &self,
        student_id: i64,
        date: NaiveDate,
        total: Decimal,
    ) -> Result<Option<TaxInvoice>> {
        let row = sqlx::query_as::<_, TaxInvoiceRow>(&format!(
            "{} WHERE student_id = ? AND invoice_date = ? AND total = ? ORDER BY id LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(student_id)
        .bind(date)
        .bind(total)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TaxInvoiceRow::into_invoice).transpose()
    }

    async fn list(
        &self,
        filter: &TaxInvoiceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaxInvoice>> {
        let year = filter.year;
        let quarter = filter.quarter.map(|q| q.number());
        let client = filter.client_pattern().map(|c| format!("%{}%", c));

        let rows = sqlx::query_as::<_, TaxInvoiceRow>(&format!(
            r#"{}
            WHERE (? IS NULL OR year = ?)
              AND (? IS NULL OR quarter = ?)
              AND (? IS NULL OR LOWER(client_name) LIKE ? OR LOWER(client_dni) LIKE ?)
            ORDER BY year DESC, quarter DESC, sequence DESC
            LIMIT ? OFFSET ?
            "#,
            SELECT_COLUMNS
        ))
        .bind(year)
        .bind(year)
        .bind(quarter)
        .bind(quarter)
        .bind(client.clone())
        .bind(client.clone())
        .bind(client)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TaxInvoiceRow::into_invoice).collect()
    }

    async fn summarize(&self, year: i32, quarter: Quarter) -> Result<QuarterSummary> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT COUNT(*) AS invoice_count,
                   COALESCE(SUM(base_taxable), 0) AS base_taxable,
                   COALESCE(SUM(vat_amount), 0) AS vat_amount,
                   COALESCE(SUM(fees_amount), 0) AS fees_amount,
                   COALESCE(SUM(total), 0) AS total
            FROM tax_invoices
            WHERE year = ? AND quarter = ?
            "#,
        )
        .bind(year)
        .bind(quarter.number())
        .fetch_one(&self.pool)
        .await?;

        Ok(QuarterSummary {
            year,
            quarter,
            invoice_count: row.invoice_count,
            base_taxable: crate::core::money::round2(row.base_taxable),
            vat: crate::core::money::round2(row.vat_amount),
            fees_total: crate::core::money::round2(row.fees_amount),
            total: crate::core::money::round2(row.total),
        })
    }
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
struct TaxInvoiceRow {
    id: i64,
    invoice_number: String,
    year: i32,
    quarter: u8,
    sequence: u32,
    invoice_date: NaiveDate,
    course: String,
    student_id: i64,
    has_basic_fee: bool,
    has_motorcycle_fee: bool,
    has_transfer_fee: bool,
    renewal_count: u32,
    base_taxable: Decimal,
    vat_amount: Decimal,
    fees_amount: Decimal,
    total: Decimal,
    client_name: String,
    client_dni: String,
    client_street: String,
    client_postal_code: String,
    client_municipality: String,
    client_province: String,
    issuer_name: String,
    issuer_tax_id: String,
    issuer_address: String,
    issuer_city: String,
    issuer_phone: String,
    issuer_email: String,
    recorded_fees_total: Option<Decimal>,
    fee_detection: Option<String>,
    notes: String,
    created_at: DateTime<Utc>,
}

impl TaxInvoiceRow {
    fn into_invoice(self) -> Result<TaxInvoice> {
        let invoice_number = InvoiceNumber::from_str(&self.invoice_number)
            .map_err(|e| AppError::internal(format!("Invalid invoice number in database: {}", e)))?;
        if invoice_number.sequence != self.sequence {
            return Err(AppError::internal(format!(
                "Invoice {} stored with sequence {}",
                invoice_number, self.sequence
            )));
        }

        let course = Course::from_str(&self.course)
            .map_err(|e| AppError::internal(format!("Invalid course in database: {}", e)))?;

        let quarter = Quarter::from_number(self.quarter)
            .map_err(|e| AppError::internal(format!("Invalid quarter in database: {}", e)))?;

        let fee_detection = self
            .fee_detection
            .as_deref()
            .map(DetectionConfidence::from_str)
            .transpose()
            .map_err(|e| AppError::internal(format!("Invalid fee detection in database: {}", e)))?;

        Ok(TaxInvoice {
            id: self.id,
            invoice_number,
            year: self.year,
            quarter,
            date: self.invoice_date,
            course,
            student_id: self.student_id,
            fees: FeeSet {
                basic_fee: self.has_basic_fee,
                motorcycle_fee: self.has_motorcycle_fee,
                transfer_fee: self.has_transfer_fee,
                renewal_count: self.renewal_count,
            },
            totals: InvoiceTotals {
                base_taxable: self.base_taxable,
                vat: self.vat_amount,
                fees_total: self.fees_amount,
                total: self.total,
            },
            client: ClientSnapshot {
                name: self.client_name,
                dni: self.client_dni,
                street: self.client_street,
                postal_code: self.client_postal_code,
                municipality: self.client_municipality,
                province: self.client_province,
            },
            issuer: IssuerSnapshot {
                name: self.issuer_name,
                tax_id: self.issuer_tax_id,
                address: self.issuer_address,
                city: self.issuer_city,
                phone: self.issuer_phone,
                email: self.issuer_email,
            },
            recorded_fees_total: self.recorded_fees_total,
            fee_detection,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    invoice_count: i64,
    base_taxable: Decimal,
    vat_amount: Decimal,
    fees_amount: Decimal,
    total: Decimal,
}
