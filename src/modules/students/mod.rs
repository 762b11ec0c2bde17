// Students: client identity for invoices and the balance ledger

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{NewStudent, PostalAddress, Student};
pub use repositories::{MySqlStudentRepository, StudentRepository};
pub use services::StudentLedger;
