// Fees module: DGT fee catalog plus forward/reverse breakdown of invoice totals

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Course, DetectionConfidence, FeeCatalog, FeeDetection, FeeSet, InvoiceTotals};
pub use services::{FeeCalculator, FeeDetector};
