pub mod fees;
pub mod health;
pub mod imports;
pub mod students;
pub mod tax_invoices;
pub mod vouchers;
