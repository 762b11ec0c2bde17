//! Autoescuela billing library
//!
//! Quarterly tax invoices for a driving school: splitting what a client paid
//! into taxable base, IVA and DGT fees, recovering fee flags from legacy
//! lump sums, and numbering invoices per fiscal year.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::fees;
pub use modules::imports;
pub use modules::students;
pub use modules::tax_invoices;
