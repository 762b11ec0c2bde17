mod student;

pub use student::{normalize_dni, NewStudent, PostalAddress, Student};
