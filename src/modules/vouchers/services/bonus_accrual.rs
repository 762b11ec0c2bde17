use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::modules::vouchers::models::VoucherConcept;

/// Where a student stands toward the next practice discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BonusStatus {
    pub total_minutes: u32,
    pub bonuses_earned: u32,
    pub discounts_applied: u32,
    /// Discounts earned but not yet charged
    pub pending_discounts: u32,
    pub minutes_toward_next: u32,
    pub minutes_for_next: u32,
}

/// Every 450 minutes of individually billed practices earn one 25.00
/// discount: five 90' practices at 65.00 cost 25.00 more than the
/// five-practice bonus.
#[derive(Debug, Clone, Copy)]
pub struct BonusAccrual {
    minutes_per_bonus: u32,
    discount: Decimal,
}

impl BonusAccrual {
    pub const MINUTES_PER_BONUS: u32 = 450;

    pub fn new() -> Self {
        Self {
            minutes_per_bonus: Self::MINUTES_PER_BONUS,
            discount: VoucherConcept::BonusDiscount.default_price().abs(),
        }
    }

    /// Minutes that count toward the bonus: single practices only
    pub fn counted_minutes(concepts: impl IntoIterator<Item = VoucherConcept>) -> u32 {
        concepts
            .into_iter()
            .filter_map(|concept| concept.practice_minutes())
            .sum()
    }

    pub fn evaluate(&self, total_minutes: u32, discounts_applied: u32) -> BonusStatus {
        let bonuses_earned = total_minutes / self.minutes_per_bonus;
        let minutes_toward_next = total_minutes % self.minutes_per_bonus;

        BonusStatus {
            total_minutes,
            bonuses_earned,
            discounts_applied,
            pending_discounts: bonuses_earned.saturating_sub(discounts_applied),
            minutes_toward_next,
            minutes_for_next: self.minutes_per_bonus - minutes_toward_next,
        }
    }

    /// Negative charge amounts to add for the pending discounts
    pub fn pending_discount_charges(&self, status: &BonusStatus) -> Vec<Decimal> {
        if status.pending_discounts > 0 {
            info!(
                total_minutes = status.total_minutes,
                pending = status.pending_discounts,
                "Practice bonus reached, applying discount"
            );
        }
        (0..status.pending_discounts)
            .map(|_| -self.discount)
            .collect()
    }
}

impl Default for BonusAccrual {
    fn default() -> Self {
        Self::new()
    }
}
