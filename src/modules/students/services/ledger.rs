use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::money::round2;

/// Running account of one student: charges owed against payments made.
///
/// Discounts are charges with a negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StudentLedger {
    pub total_debt: Decimal,
    pub total_paid: Decimal,
}

impl StudentLedger {
    pub fn new(
        charges: impl IntoIterator<Item = Decimal>,
        payments: impl IntoIterator<Item = Decimal>,
    ) -> Self {
        Self {
            total_debt: round2(charges.into_iter().sum()),
            total_paid: round2(payments.into_iter().sum()),
        }
    }

    /// Negative while the student owes money, positive on credit
    pub fn balance(&self) -> Decimal {
        self.total_paid - self.total_debt
    }

    /// What is still owed, zero when settled or in credit
    pub fn pending_amount(&self) -> Decimal {
        let balance = self.balance();
        if balance < Decimal::ZERO {
            balance.abs()
        } else {
            round2(Decimal::ZERO)
        }
    }

    pub fn is_settled(&self) -> bool {
        self.balance() >= Decimal::ZERO
    }
}
