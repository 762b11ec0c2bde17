use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Fiscal quarter used for tax reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Quarter containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Quarter::Q1),
            2 => Ok(Quarter::Q2),
            3 => Ok(Quarter::Q3),
            4 => Ok(Quarter::Q4),
            other => Err(AppError::validation(format!(
                "quarter must be between 1 and 4, got {}",
                other
            ))),
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    /// First and last day (inclusive) of this quarter in `year`
    pub fn date_range(&self, year: i32) -> Result<(NaiveDate, NaiveDate)> {
        let first_month = (self.number() as u32 - 1) * 3 + 1;
        let start = NaiveDate::from_ymd_opt(year, first_month, 1)
            .ok_or_else(|| AppError::validation(format!("invalid fiscal year {}", year)))?;
        let end = start
            .checked_add_months(chrono::Months::new(3))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| AppError::validation(format!("invalid fiscal year {}", year)))?;
        Ok((start, end))
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.number())
    }
}

impl TryFrom<u8> for Quarter {
    type Error = AppError;

    fn try_from(number: u8) -> Result<Self> {
        Quarter::from_number(number)
    }
}

impl From<Quarter> for u8 {
    fn from(quarter: Quarter) -> Self {
        quarter.number()
    }
}
