/// Which amounts end up on imported invoices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountPolicy {
    /// Keep the sheet breakdown when it adds up; unbalanced rows are skipped
    #[default]
    Recorded,
    /// Recompute the breakdown from the sheet total and the detected fees
    Regenerate,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Parse and look up everything, write nothing
    pub dry_run: bool,
    pub amount_policy: AmountPolicy,
    /// Sheet name noted on each imported invoice
    pub source_name: Option<String>,
    pub delimiter: u8,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            amount_policy: AmountPolicy::Recorded,
            source_name: None,
            delimiter: b',',
        }
    }
}

impl ImportOptions {
    pub fn import_note(&self) -> String {
        match self.source_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("Importado de {}", name),
            _ => "Importado".to_string(),
        }
    }
}
