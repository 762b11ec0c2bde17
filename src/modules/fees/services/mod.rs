pub mod fee_calculator;
pub mod fee_detector;

pub use fee_calculator::FeeCalculator;
pub use fee_detector::FeeDetector;
