use csv::StringRecord;

use crate::modules::students::PostalAddress;

/// One spreadsheet line, columns in sheet order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterRow {
    pub course: String,
    pub invoice_number: String,
    pub date: String,
    pub full_name: String,
    pub dni: String,
    pub base_taxable: String,
    pub vat: String,
    pub fees: String,
    pub total: String,
    pub street: String,
    pub postal_code: String,
    pub municipality: String,
    pub province: String,
}

impl QuarterRow {
    pub const COLUMNS: usize = 13;

    /// Missing trailing columns read as empty
    pub fn from_record(record: &StringRecord) -> Self {
        let field = |index: usize| record.get(index).unwrap_or("").trim().to_string();

        Self {
            course: field(0),
            invoice_number: field(1),
            date: field(2),
            full_name: field(3),
            dni: field(4),
            base_taxable: field(5),
            vat: field(6),
            fees: field(7),
            total: field(8),
            street: field(9),
            postal_code: field(10),
            municipality: field(11),
            province: field(12),
        }
    }

    pub fn is_blank(&self) -> bool {
        [
            &self.course,
            &self.invoice_number,
            &self.date,
            &self.full_name,
            &self.dni,
            &self.total,
        ]
        .iter()
        .all(|value| value.is_empty())
    }

    pub fn address(&self) -> PostalAddress {
        PostalAddress {
            street: self.street.clone(),
            postal_code: self.postal_code.clone(),
            municipality: self.municipality.clone(),
            province: self.province.clone(),
        }
    }
}
