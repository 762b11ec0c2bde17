pub mod bonus_accrual;

pub use bonus_accrual::{BonusAccrual, BonusStatus};
