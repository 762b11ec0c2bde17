pub mod tax_invoice_repository;

pub use tax_invoice_repository::{MySqlTaxInvoiceRepository, TaxInvoiceRepository};
