use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::core::money::{is_exact_multiple, round2};
use crate::modules::fees::models::{DetectionConfidence, FeeCatalog, FeeDetection, FeeSet};

/// Slack allowed around a single basic fee before the fallback gives up
const BASIC_FEE_TOLERANCE: Decimal = Decimal::ONE;

/// Reconstructs fee flags from a lump fee sum.
///
/// Only legacy spreadsheets need this: they recorded the fees as one
/// number. The reconstruction is greedy (motorcycle fee first, then
/// transfer, the rest in basic-fee units) and can be wrong when two
/// combinations add up to the same amount, so every result carries a
/// confidence and the original sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeDetector {
    catalog: FeeCatalog,
}

impl FeeDetector {
    pub fn new() -> Self {
        Self::with_catalog(FeeCatalog::default())
    }

    pub fn with_catalog(catalog: FeeCatalog) -> Self {
        Self { catalog }
    }

    pub fn detect(&self, fees_total: Decimal) -> FeeDetection {
        let original_total = round2(fees_total);

        if original_total <= Decimal::ZERO {
            let confidence = if original_total.is_zero() {
                DetectionConfidence::Exact
            } else {
                DetectionConfidence::Unresolved
            };
            return self.detection(FeeSet::none(), original_total, confidence);
        }

        if let Some(fees) = self.exact_decomposition(original_total) {
            let matches = self.count_exact_decompositions(original_total);
            let confidence = if matches > 1 {
                warn!(
                    fees_total = %original_total,
                    combinations = matches,
                    "Fee sum matches several fee combinations, keeping greedy choice"
                );
                DetectionConfidence::Ambiguous
            } else {
                DetectionConfidence::Exact
            };
            return self.detection(fees, original_total, confidence);
        }

        let fees = self.fallback(original_total);
        let confidence = if fees.is_empty() {
            DetectionConfidence::Unresolved
        } else {
            DetectionConfidence::Approximate
        };
        let detection = self.detection(fees, original_total, confidence);

        warn!(
            fees_total = %original_total,
            detected_total = %detection.detected_total,
            confidence = %confidence,
            "No exact fee decomposition found"
        );

        detection
    }

    fn detection(
        &self,
        fees: FeeSet,
        original_total: Decimal,
        confidence: DetectionConfidence,
    ) -> FeeDetection {
        FeeDetection {
            fees,
            detected_total: fees.fees_total(&self.catalog),
            original_total,
            confidence,
        }
    }

    fn exact_decomposition(&self, total: Decimal) -> Option<FeeSet> {
        let basic = self.catalog.basic_fee;
        let mut fees = FeeSet::none();
        let mut remaining = total;

        let after_motorcycle = remaining - self.catalog.motorcycle_fee;
        if after_motorcycle >= Decimal::ZERO && is_exact_multiple(after_motorcycle, basic) {
            fees.motorcycle_fee = true;
            remaining = after_motorcycle;
        }

        let after_transfer = remaining - self.catalog.transfer_fee;
        if after_transfer >= Decimal::ZERO && is_exact_multiple(after_transfer, basic) {
            fees.transfer_fee = true;
            remaining = after_transfer;
        }

        if remaining.is_zero() {
            return Some(fees);
        }

        if is_exact_multiple(remaining, basic) {
            let units = (remaining / basic).to_u32()?;
            fees.basic_fee = true;
            fees.renewal_count = units.saturating_sub(1);
            return Some(fees);
        }

        None
    }

    /// Number of (motorcycle, transfer) choices whose rest is whole basic fees
    fn count_exact_decompositions(&self, total: Decimal) -> usize {
        let mut matches = 0;
        for motorcycle in [false, true] {
            for transfer in [false, true] {
                let mut rest = total;
                if motorcycle {
                    rest -= self.catalog.motorcycle_fee;
                }
                if transfer {
                    rest -= self.catalog.transfer_fee;
                }
                if is_exact_multiple(rest, self.catalog.basic_fee) {
                    matches += 1;
                }
            }
        }
        matches
    }

    fn fallback(&self, total: Decimal) -> FeeSet {
        let basic = self.catalog.basic_fee;

        if (total - basic).abs() <= BASIC_FEE_TOLERANCE {
            return FeeSet::basic();
        }

        if total > basic {
            // A renewal count that does not fit is not a guess worth keeping
            return match ((total - basic) / basic).floor().to_u32() {
                Some(renewals) => FeeSet::basic().with_renewals(renewals),
                None => FeeSet::none(),
            };
        }

        FeeSet::none()
    }
}
