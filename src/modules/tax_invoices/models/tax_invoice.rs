// A quarterly invoice: one client, one course, a gross amount split into
// base + IVA + DGT fees. Totals are computed once at creation and never
// edited; a correction replaces the record.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::InvoiceNumber;
use crate::config::BillingConfig;
use crate::core::money::round2;
use crate::core::{AppError, Quarter, Result};
use crate::modules::fees::{Course, DetectionConfidence, FeeSet, InvoiceTotals};
use crate::modules::students::Student;

/// Upper bound on renewals bundled in one invoice
pub const MAX_RENEWALS: u32 = 99;

/// Client data copied onto the invoice at issue time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub name: String,
    pub dni: String,
    pub street: String,
    pub postal_code: String,
    pub municipality: String,
    pub province: String,
}

impl ClientSnapshot {
    /// Snapshot of `student`, falling back to `default_province`
    pub fn from_student(student: &Student, default_province: &str) -> Self {
        let province = if student.address.province.trim().is_empty() {
            default_province.to_string()
        } else {
            student.address.province.clone()
        };

        Self {
            name: student.full_name(),
            dni: student.dni.clone(),
            street: student.address.street.clone(),
            postal_code: student.address.postal_code.clone(),
            municipality: student.address.municipality.clone(),
            province,
        }
    }
}

/// Issuing company identity at issue time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerSnapshot {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: String,
}

impl From<&BillingConfig> for IssuerSnapshot {
    fn from(billing: &BillingConfig) -> Self {
        Self {
            name: billing.company_name.clone(),
            tax_id: billing.company_tax_id.clone(),
            address: billing.company_address.clone(),
            city: billing.company_city.clone(),
            phone: billing.company_phone.clone(),
            email: billing.company_email.clone(),
        }
    }
}

/// Persisted quarterly tax invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxInvoice {
    pub id: i64,
    pub invoice_number: InvoiceNumber,
    pub year: i32,
    pub quarter: Quarter,
    pub date: NaiveDate,
    pub course: Course,
    pub student_id: i64,
    pub fees: FeeSet,
    pub totals: InvoiceTotals,
    pub client: ClientSnapshot,
    pub issuer: IssuerSnapshot,
    /// Lump fee sum from the import source, before detection
    pub recorded_fees_total: Option<Decimal>,
    pub fee_detection: Option<DetectionConfidence>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Everything about an invoice except its number and storage identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaxInvoice {
    pub date: NaiveDate,
    pub course: Course,
    pub student_id: i64,
    pub fees: FeeSet,
    pub totals: InvoiceTotals,
    pub client: ClientSnapshot,
    pub issuer: IssuerSnapshot,
    pub recorded_fees_total: Option<Decimal>,
    pub fee_detection: Option<DetectionConfidence>,
    pub notes: String,
}

impl NewTaxInvoice {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn quarter(&self) -> Quarter {
        Quarter::from_date(self.date)
    }

    /// Materialize as a stored invoice
    pub fn into_invoice(self, id: i64, invoice_number: InvoiceNumber) -> TaxInvoice {
        TaxInvoice {
            id,
            invoice_number,
            year: self.year(),
            quarter: self.quarter(),
            date: self.date,
            course: self.course,
            student_id: self.student_id,
            fees: self.fees,
            totals: self.totals,
            client: self.client,
            issuer: self.issuer,
            recorded_fees_total: self.recorded_fees_total,
            fee_detection: self.fee_detection,
            notes: self.notes,
            created_at: Utc::now(),
        }
    }
}

/// Body of POST /tax-invoices
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaxInvoiceRequest {
    pub student_id: i64,
    pub date: NaiveDate,
    pub course: Course,
    #[serde(default)]
    pub fees: FeeSet,
    /// Amount the client paid, fees and IVA included
    pub gross_total: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateTaxInvoiceRequest {
    pub fn validate(&self) -> Result<()> {
        if self.gross_total < Decimal::ZERO {
            return Err(AppError::validation("gross_total cannot be negative"));
        }
        if round2(self.gross_total) != self.gross_total {
            return Err(AppError::validation(
                "gross_total must be a whole number of cents",
            ));
        }
        if self.fees.renewal_count > MAX_RENEWALS {
            return Err(AppError::validation(format!(
                "renewal_count cannot exceed {}",
                MAX_RENEWALS
            )));
        }
        Ok(())
    }
}

/// Listing filter; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaxInvoiceFilter {
    pub year: Option<i32>,
    pub quarter: Option<Quarter>,
    /// Substring of client name or DNI
    pub client: Option<String>,
}

impl TaxInvoiceFilter {
    pub fn matches(&self, invoice: &TaxInvoice) -> bool {
        if self.year.is_some_and(|year| invoice.year != year) {
            return false;
        }
        if self.quarter.is_some_and(|quarter| invoice.quarter != quarter) {
            return false;
        }
        match self.client_pattern() {
            Some(pattern) => {
                invoice.client.name.to_lowercase().contains(&pattern)
                    || invoice.client.dni.to_lowercase().contains(&pattern)
            }
            None => true,
        }
    }

    /// Lower-cased client search term, if any
    pub fn client_pattern(&self) -> Option<String> {
        self.client
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }
}
