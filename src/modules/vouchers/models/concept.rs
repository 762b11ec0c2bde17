use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of charge added to a student's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherConcept {
    #[serde(rename = "RENEWAL")]
    Renewal,
    #[serde(rename = "PRACTICAL_EXAM")]
    PracticalExam,
    #[serde(rename = "THEORY_EXAM")]
    TheoryExam,
    #[serde(rename = "REGISTRATION")]
    Registration,
    #[serde(rename = "PRACTICE_90")]
    Practice90,
    #[serde(rename = "PRACTICE_60")]
    Practice60,
    #[serde(rename = "PRACTICE_45")]
    Practice45,
    #[serde(rename = "PRACTICE_30")]
    Practice30,
    /// Five 90' practices sold together
    #[serde(rename = "BONUS_5_PRACTICES")]
    Bonus5Practices,
    /// Negative charge granted every 450 practice minutes
    #[serde(rename = "BONUS_DISCOUNT")]
    BonusDiscount,
    /// Free-form charge, amount always supplied by the user
    #[serde(rename = "OTHER")]
    Other,
}

impl VoucherConcept {
    pub const ALL: [VoucherConcept; 11] = [
        VoucherConcept::Renewal,
        VoucherConcept::PracticalExam,
        VoucherConcept::TheoryExam,
        VoucherConcept::Registration,
        VoucherConcept::Practice90,
        VoucherConcept::Practice60,
        VoucherConcept::Practice45,
        VoucherConcept::Practice30,
        VoucherConcept::Bonus5Practices,
        VoucherConcept::BonusDiscount,
        VoucherConcept::Other,
    ];

    /// List price in euros
    pub fn default_price(&self) -> Decimal {
        match self {
            VoucherConcept::Renewal => Decimal::new(18000, 2),
            VoucherConcept::PracticalExam => Decimal::new(4000, 2),
            VoucherConcept::TheoryExam => Decimal::new(3000, 2),
            VoucherConcept::Registration => Decimal::new(30000, 2),
            VoucherConcept::Practice90 => Decimal::new(6500, 2),
            VoucherConcept::Practice60 => Decimal::new(4333, 2),
            VoucherConcept::Practice45 => Decimal::new(3250, 2),
            VoucherConcept::Practice30 => Decimal::new(8000, 2),
            VoucherConcept::Bonus5Practices => Decimal::new(30000, 2),
            VoucherConcept::BonusDiscount => Decimal::new(-2500, 2),
            VoucherConcept::Other => Decimal::new(0, 2),
        }
    }

    /// Charged amount: the given one, or the list price when absent or zero
    pub fn resolve_amount(&self, amount: Option<Decimal>) -> Decimal {
        match amount {
            Some(amount) if !amount.is_zero() => amount,
            _ => self.default_price(),
        }
    }

    /// Length of a single billed practice
    pub fn practice_minutes(&self) -> Option<u32> {
        match self {
            VoucherConcept::Practice90 => Some(90),
            VoucherConcept::Practice60 => Some(60),
            VoucherConcept::Practice45 => Some(45),
            VoucherConcept::Practice30 => Some(30),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VoucherConcept::Renewal => "Renovación de carnet",
            VoucherConcept::PracticalExam => "Examen práctico",
            VoucherConcept::TheoryExam => "Examen teórico",
            VoucherConcept::Registration => "Inscripción",
            VoucherConcept::Practice90 => "Práctica 90'",
            VoucherConcept::Practice60 => "Práctica 60'",
            VoucherConcept::Practice45 => "Práctica 45'",
            VoucherConcept::Practice30 => "Práctica 30'",
            VoucherConcept::Bonus5Practices => "Bono 5 Prácticas 90'",
            VoucherConcept::BonusDiscount => "Descuento Bono 450'",
            VoucherConcept::Other => "Otros",
        }
    }
}
