// Quarterly tax invoices with DGT fees

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    ClientSnapshot, CreateTaxInvoiceRequest, InvoiceNumber, IssuerSnapshot, NewTaxInvoice,
    QuarterSummary, TaxInvoice, TaxInvoiceFilter,
};
pub use repositories::{MySqlTaxInvoiceRepository, TaxInvoiceRepository};
pub use services::TaxInvoiceService;
