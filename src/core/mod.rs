pub mod error;
pub mod fiscal;
pub mod money;

pub use error::{AppError, Result};
pub use fiscal::Quarter;
