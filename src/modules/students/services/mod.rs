pub mod ledger;

pub use ledger::StudentLedger;
