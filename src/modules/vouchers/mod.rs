// Charge concepts and the practice-minutes bonus discount

pub mod models;
pub mod services;

pub use models::VoucherConcept;
pub use services::{BonusAccrual, BonusStatus};
