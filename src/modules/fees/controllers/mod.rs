pub mod fee_controller;

pub use fee_controller::configure;
