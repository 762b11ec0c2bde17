// Field parsers for spreadsheet cells

use chrono::NaiveDate;

use crate::core::{AppError, Result};
use crate::modules::fees::Course;

const LONG_DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parses `dd/mm/yyyy`, `dd-mm-yyyy`, `yyyy-mm-dd` or `dd/mm/yy`.
/// A trailing time part (`2024-05-10 00:00:00`) is ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let value = raw.split_whitespace().next().unwrap_or("");
    if value.is_empty() {
        return Err(AppError::parse("missing date"));
    }

    let short_year = value
        .rsplit_once('/')
        .is_some_and(|(_, year)| year.len() == 2);
    let parsed = if short_year {
        NaiveDate::parse_from_str(value, "%d/%m/%y").ok()
    } else {
        LONG_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    };

    parsed.ok_or_else(|| AppError::parse(format!("invalid date '{}'", raw.trim())))
}

/// Splits "APELLIDO1 APELLIDO2 NOMBRE" into (first names, last names).
///
/// One word is a first name, two are surname + name, three or more take
/// the first two words as surnames.
pub fn split_full_name(raw: &str) -> Option<(String, String)> {
    let words: Vec<&str> = raw.split_whitespace().collect();

    match words.as_slice() {
        [] => None,
        [first] => Some((first.to_string(), String::new())),
        [last, first] => Some((first.to_string(), last.to_string())),
        [last1, last2, rest @ ..] => Some((rest.join(" "), format!("{} {}", last1, last2))),
    }
}

/// Course cell: blank means B
pub fn parse_course(raw: &str) -> Result<Course> {
    if raw.trim().is_empty() {
        Ok(Course::B)
    } else {
        raw.parse()
    }
}
