use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Government (DGT) fee amounts and the VAT rate applied to the service part.
///
/// Renewals are charged at the basic fee amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCatalog {
    pub basic_fee: Decimal,
    pub motorcycle_fee: Decimal,
    pub transfer_fee: Decimal,
    pub renewal_fee: Decimal,
    pub vat_rate: Decimal,
}

impl FeeCatalog {
    /// Tasa básica: 94.05
    pub const BASIC_FEE: Decimal = Decimal::from_parts(9405, 0, 0, false, 2);
    /// Tasa A (motorcycle licences): 28.87
    pub const MOTORCYCLE_FEE: Decimal = Decimal::from_parts(2887, 0, 0, false, 2);
    /// Traslado de expediente: 8.67
    pub const TRANSFER_FEE: Decimal = Decimal::from_parts(867, 0, 0, false, 2);
    pub const RENEWAL_FEE: Decimal = Self::BASIC_FEE;
    /// IVA general: 21%
    pub const VAT_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

    pub const DGT: FeeCatalog = FeeCatalog {
        basic_fee: Self::BASIC_FEE,
        motorcycle_fee: Self::MOTORCYCLE_FEE,
        transfer_fee: Self::TRANSFER_FEE,
        renewal_fee: Self::RENEWAL_FEE,
        vat_rate: Self::VAT_RATE,
    };
}

impl Default for FeeCatalog {
    fn default() -> Self {
        Self::DGT
    }
}
