use rust_decimal::Decimal;
use tracing::debug;

use crate::core::money::round2;
use crate::modules::fees::models::{Course, FeeCatalog, FeeSet, InvoiceTotals};

/// Splits a collected gross total into base, IVA and DGT fees
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeCalculator {
    catalog: FeeCatalog,
}

impl FeeCalculator {
    pub fn new() -> Self {
        Self::with_catalog(FeeCatalog::default())
    }

    pub fn with_catalog(catalog: FeeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FeeCatalog {
        &self.catalog
    }

    /// Compute the invoice breakdown for a gross amount the client paid.
    ///
    /// Fees are VAT-exempt pass-through charges and come off the top; the
    /// remainder is VAT-inclusive unless the course is exempt. Nothing is
    /// returned for the service part when fees swallow the whole amount.
    ///
    /// The recomposed `total` can differ from `gross_total` by a cent of
    /// rounding. That drift is kept: issued invoices carry it too.
    pub fn compute(&self, gross_total: Decimal, fees: &FeeSet, course: Course) -> InvoiceTotals {
        let fees_total = fees.fees_total(&self.catalog);
        let remainder = gross_total - fees_total;

        let (base_taxable, vat) = if remainder <= Decimal::ZERO {
            (round2(Decimal::ZERO), round2(Decimal::ZERO))
        } else if course.is_vat_exempt() {
            (round2(remainder), round2(Decimal::ZERO))
        } else {
            let base = round2(remainder / (Decimal::ONE + self.catalog.vat_rate));
            let vat = round2(base * self.catalog.vat_rate);
            (base, vat)
        };

        let totals = InvoiceTotals {
            base_taxable,
            vat,
            fees_total,
            total: base_taxable + vat + fees_total,
        };

        let drift = totals.drift_from(gross_total);
        if !drift.is_zero() && remainder > Decimal::ZERO {
            debug!(
                gross_total = %gross_total,
                total = %totals.total,
                drift = %drift,
                "Recomposed total differs from gross total by rounding"
            );
        }

        totals
    }
}
