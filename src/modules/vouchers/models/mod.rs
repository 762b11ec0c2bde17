mod concept;

pub use concept::VoucherConcept;
