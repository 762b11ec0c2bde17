use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxInvoice;
use crate::core::money::round2;
use crate::core::Quarter;

/// Totals of one fiscal quarter, as filed in the quarterly VAT return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterSummary {
    pub year: i32,
    pub quarter: Quarter,
    pub invoice_count: i64,
    pub base_taxable: Decimal,
    pub vat: Decimal,
    pub fees_total: Decimal,
    pub total: Decimal,
}

impl QuarterSummary {
    pub fn empty(year: i32, quarter: Quarter) -> Self {
        let zero = round2(Decimal::ZERO);
        Self {
            year,
            quarter,
            invoice_count: 0,
            base_taxable: zero,
            vat: zero,
            fees_total: zero,
            total: zero,
        }
    }

    /// Summary over the invoices of `year`/`quarter`; others are ignored
    pub fn from_invoices<'a>(
        year: i32,
        quarter: Quarter,
        invoices: impl IntoIterator<Item = &'a TaxInvoice>,
    ) -> Self {
        invoices
            .into_iter()
            .filter(|invoice| invoice.year == year && invoice.quarter == quarter)
            .fold(Self::empty(year, quarter), |mut summary, invoice| {
                summary.invoice_count += 1;
                summary.base_taxable += invoice.totals.base_taxable;
                summary.vat += invoice.totals.vat;
                summary.fees_total += invoice.totals.fees_total;
                summary.total += invoice.totals.total;
                summary
            })
    }

    pub fn is_empty(&self) -> bool {
        self.invoice_count == 0
    }
}
