mod catalog;
mod course;
mod detection;
mod fee_set;

pub use catalog::FeeCatalog;
pub use course::Course;
pub use detection::{DetectionConfidence, FeeDetection};
pub use fee_set::{FeeSet, InvoiceTotals};
