use serde::Serialize;

/// A row left out of the import, with the 1-based line number in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSkip {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub dry_run: bool,
    pub rows_read: usize,
    pub students_created: usize,
    pub students_updated: usize,
    pub invoices_created: usize,
    /// Rows whose invoice number is already stored
    pub duplicates_skipped: usize,
    /// Rows with a zero or negative total: student kept, no invoice
    pub without_amount: usize,
    pub skipped: Vec<RowSkip>,
}

impl ImportSummary {
    pub fn rows_skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn skip(&mut self, row: usize, reason: impl Into<String>) {
        self.skipped.push(RowSkip {
            row,
            reason: reason.into(),
        });
    }
}
