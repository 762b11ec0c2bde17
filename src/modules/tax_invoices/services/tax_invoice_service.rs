use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::BillingConfig;
use crate::core::{AppError, Quarter, Result};
use crate::modules::fees::FeeCalculator;
use crate::modules::students::StudentRepository;
use crate::modules::tax_invoices::models::{
    ClientSnapshot, CreateTaxInvoiceRequest, InvoiceNumber, IssuerSnapshot, NewTaxInvoice,
    QuarterSummary, TaxInvoice, TaxInvoiceFilter,
};
use crate::modules::tax_invoices::repositories::TaxInvoiceRepository;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 100;

/// Issues and queries quarterly tax invoices
pub struct TaxInvoiceService {
    invoices: Arc<dyn TaxInvoiceRepository>,
    students: Arc<dyn StudentRepository>,
    calculator: FeeCalculator,
    billing: BillingConfig,
}

impl TaxInvoiceService {
    pub fn new(
        invoices: Arc<dyn TaxInvoiceRepository>,
        students: Arc<dyn StudentRepository>,
        calculator: FeeCalculator,
        billing: BillingConfig,
    ) -> Self {
        Self {
            invoices,
            students,
            calculator,
            billing,
        }
    }

    /// Issue an invoice for a student: compute the breakdown, snapshot
    /// client and issuer, and take the next number of the invoice's year.
    pub async fn create(&self, request: CreateTaxInvoiceRequest) -> Result<TaxInvoice> {
        request.validate()?;

        let student = self
            .students
            .find_by_id(request.student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {}", request.student_id)))?;

        let totals = self
            .calculator
            .compute(request.gross_total, &request.fees, request.course);

        let new_invoice = NewTaxInvoice {
            date: request.date,
            course: request.course,
            student_id: student.id,
            fees: request.fees,
            totals,
            client: ClientSnapshot::from_student(&student, &self.billing.default_province),
            issuer: IssuerSnapshot::from(&self.billing),
            recorded_fees_total: None,
            fee_detection: None,
            notes: request.notes.unwrap_or_default(),
        };

        self.insert_with_next_number(&new_invoice).await
    }

    /// Insert under the next free number of the invoice's year, retrying
    /// when a concurrent writer takes the same number first.
    pub async fn insert_with_next_number(&self, new_invoice: &NewTaxInvoice) -> Result<TaxInvoice> {
        let year = new_invoice.year();
        let mut last_attempted: Option<InvoiceNumber> = None;

        for attempt in 1..=self.billing.number_retry_limit {
            let number = self.invoices.next_number(year).await?;

            match self.invoices.insert(number, new_invoice).await {
                Ok(invoice) => {
                    info!(
                        invoice_number = %invoice.invoice_number,
                        student_id = invoice.student_id,
                        total = %invoice.totals.total,
                        "Tax invoice issued"
                    );
                    return Ok(invoice);
                }
                Err(AppError::DuplicateInvoiceNumber(taken)) => {
                    warn!(attempt, invoice_number = %taken, "Invoice number taken, retrying");
                    last_attempted = Some(number);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::DuplicateInvoiceNumber(
            last_attempted
                .map(|n| n.to_string())
                .unwrap_or_else(|| year.to_string()),
        ))
    }

    /// Insert under a number taken from an external source; fails with
    /// `DuplicateInvoiceNumber` when it is already stored
    pub async fn insert_with_number(
        &self,
        number: InvoiceNumber,
        new_invoice: &NewTaxInvoice,
    ) -> Result<TaxInvoice> {
        let invoice = self.invoices.insert(number, new_invoice).await?;
        info!(invoice_number = %invoice.invoice_number, "Tax invoice stored");
        Ok(invoice)
    }

    pub async fn get(&self, id: i64) -> Result<TaxInvoice> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tax invoice {}", id)))
    }

    pub async fn find_by_number(&self, number: InvoiceNumber) -> Result<Option<TaxInvoice>> {
        self.invoices.find_by_number(number).await
    }

    /// Invoice already issued to `student_id` for this date and total
    pub async fn find_payment(
        &self,
        student_id: i64,
        date: NaiveDate,
        total: Decimal,
    ) -> Result<Option<TaxInvoice>> {
        self.invoices.find_payment(student_id, date, total).await
    }

    /// Newest first; `limit` defaults to 50 and is capped at 100
    pub async fn list(
        &self,
        filter: &TaxInvoiceFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TaxInvoice>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        let offset = offset.unwrap_or(0).max(0);

        self.invoices.list(filter, limit, offset).await
    }

    pub async fn quarter_summary(&self, year: i32, quarter: Quarter) -> Result<QuarterSummary> {
        self.invoices.summarize(year, quarter).await
    }

    pub fn billing(&self) -> &BillingConfig {
        &self.billing
    }

    pub fn calculator(&self) -> &FeeCalculator {
        &self.calculator
    }
}
