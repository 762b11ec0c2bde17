use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::AppError;

/// Per-year sequential invoice number, printed as `YYYY/NNNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber {
    pub year: i32,
    pub sequence: u32,
}

impl InvoiceNumber {
    pub fn new(year: i32, sequence: u32) -> Self {
        Self { year, sequence }
    }

    /// First number of a fiscal year
    pub fn first(year: i32) -> Self {
        Self::new(year, 1)
    }

    /// Number following the highest one already issued in `year`
    pub fn after(year: i32, highest_sequence: Option<u32>) -> Self {
        match highest_sequence {
            Some(sequence) => Self::new(year, sequence + 1),
            None => Self::first(year),
        }
    }

    pub fn next(&self) -> Self {
        Self::new(self.year, self.sequence + 1)
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:04}", self.year, self.sequence)
    }
}

impl FromStr for InvoiceNumber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::parse(format!("invalid invoice number '{}'", s.trim()));

        let (year, sequence) = s.trim().split_once('/').ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let sequence: u32 = sequence.parse().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }

        Ok(Self::new(year, sequence))
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(number: InvoiceNumber) -> Self {
        number.to_string()
    }
}
