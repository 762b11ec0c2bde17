use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FeeCatalog;
use crate::core::money::round2;

/// Which government fees one invoice carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeSet {
    #[serde(default)]
    pub basic_fee: bool,
    #[serde(default)]
    pub motorcycle_fee: bool,
    #[serde(default)]
    pub transfer_fee: bool,
    /// Extra renewal charges, each billed at the basic fee amount
    #[serde(default)]
    pub renewal_count: u32,
}

impl FeeSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn basic() -> Self {
        Self {
            basic_fee: true,
            ..Self::default()
        }
    }

    pub fn with_motorcycle(mut self) -> Self {
        self.motorcycle_fee = true;
        self
    }

    pub fn with_transfer(mut self) -> Self {
        self.transfer_fee = true;
        self
    }

    pub fn with_renewals(mut self, renewal_count: u32) -> Self {
        self.renewal_count = renewal_count;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.basic_fee && !self.motorcycle_fee && !self.transfer_fee && self.renewal_count == 0
    }

    /// Sum of the flagged fees, rounded to cents
    pub fn fees_total(&self, catalog: &FeeCatalog) -> Decimal {
        let mut sum = Decimal::ZERO;
        if self.basic_fee {
            sum += catalog.basic_fee;
        }
        if self.motorcycle_fee {
            sum += catalog.motorcycle_fee;
        }
        if self.transfer_fee {
            sum += catalog.transfer_fee;
        }
        sum += Decimal::from(self.renewal_count) * catalog.renewal_fee;
        round2(sum)
    }
}

/// Breakdown of an invoice total. Always produced by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub base_taxable: Decimal,
    pub vat: Decimal,
    pub fees_total: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    pub fn zero() -> Self {
        let zero = round2(Decimal::ZERO);
        Self {
            base_taxable: zero,
            vat: zero,
            fees_total: zero,
            total: zero,
        }
    }

    /// `total == base_taxable + vat + fees_total`
    pub fn is_balanced(&self) -> bool {
        self.base_taxable + self.vat + self.fees_total == self.total
    }

    /// Recomposed total minus what was actually collected
    pub fn drift_from(&self, gross_total: Decimal) -> Decimal {
        self.total - gross_total
    }
}
