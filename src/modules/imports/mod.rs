// Bulk load of quarterly invoice spreadsheets exported as CSV

pub mod models;
pub mod services;

pub use models::{AmountPolicy, ImportOptions, ImportSummary, QuarterRow, RowSkip};
pub use services::QuarterImporter;
