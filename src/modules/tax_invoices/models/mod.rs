mod invoice_number;
mod summary;
mod tax_invoice;

pub use invoice_number::InvoiceNumber;
pub use summary::QuarterSummary;
pub use tax_invoice::{
    ClientSnapshot, CreateTaxInvoiceRequest, IssuerSnapshot, NewTaxInvoice, TaxInvoice,
    TaxInvoiceFilter,
};
