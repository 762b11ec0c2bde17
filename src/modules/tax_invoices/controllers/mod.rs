pub mod tax_invoice_controller;

pub use tax_invoice_controller::configure;
