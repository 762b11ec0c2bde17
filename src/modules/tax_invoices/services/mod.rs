pub mod tax_invoice_service;

pub use tax_invoice_service::TaxInvoiceService;
