use std::sync::Arc;

use chrono::NaiveDate;

use autoescuela::config::BillingConfig;
use autoescuela::modules::fees::{Course, FeeCalculator, FeeDetector};
use autoescuela::modules::imports::QuarterImporter;
use autoescuela::modules::students::{NewStudent, PostalAddress};
use autoescuela::modules::tax_invoices::TaxInvoiceService;

use super::{InMemoryStudentRepository, InMemoryTaxInvoiceRepository};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn billing_config() -> BillingConfig {
    BillingConfig {
        company_name: "Autoescuela Test S.L.".to_string(),
        company_tax_id: "B12345678".to_string(),
        default_province: "VALENCIA".to_string(),
        number_retry_limit: 3,
        ..BillingConfig::default()
    }
}

pub fn new_student(dni: &str, first_name: &str, last_name: &str) -> NewStudent {
    NewStudent {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        dni: dni.to_string(),
        course: Course::B,
        address: PostalAddress {
            street: "C/ Mayor 1".to_string(),
            postal_code: "46001".to_string(),
            municipality: "Valencia".to_string(),
            province: String::new(),
        },
    }
}

/// Service and importer over fresh in-memory storage
pub struct TestContext {
    pub students: Arc<InMemoryStudentRepository>,
    pub invoices: Arc<InMemoryTaxInvoiceRepository>,
    pub service: Arc<TaxInvoiceService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_invoice_repository(InMemoryTaxInvoiceRepository::new())
    }

    pub fn with_invoice_repository(invoices: InMemoryTaxInvoiceRepository) -> Self {
        let students = Arc::new(InMemoryStudentRepository::new());
        let invoices = Arc::new(invoices);
        let service = Arc::new(TaxInvoiceService::new(
            invoices.clone(),
            students.clone(),
            FeeCalculator::new(),
            billing_config(),
        ));

        Self {
            students,
            invoices,
            service,
        }
    }

    pub fn importer(&self) -> QuarterImporter {
        QuarterImporter::new(
            self.students.clone(),
            self.service.clone(),
            FeeDetector::new(),
        )
    }
}
