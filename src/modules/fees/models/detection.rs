use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FeeSet;

/// How much the detector trusts its reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionConfidence {
    /// One flag combination sums exactly to the lump sum
    Exact,
    /// Exact, but another combination yields the same sum
    Ambiguous,
    /// No exact decomposition; the fallback heuristic picked the flags
    Approximate,
    /// Nothing could be attributed
    Unresolved,
}

impl DetectionConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionConfidence::Exact => "exact",
            DetectionConfidence::Ambiguous => "ambiguous",
            DetectionConfidence::Approximate => "approximate",
            DetectionConfidence::Unresolved => "unresolved",
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, DetectionConfidence::Exact)
    }
}

impl std::fmt::Display for DetectionConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DetectionConfidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(DetectionConfidence::Exact),
            "ambiguous" => Ok(DetectionConfidence::Ambiguous),
            "approximate" => Ok(DetectionConfidence::Approximate),
            "unresolved" => Ok(DetectionConfidence::Unresolved),
            _ => Err(format!("Invalid detection confidence: {}", s)),
        }
    }
}

/// Best guess of the fees behind a lump fee sum from legacy records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDetection {
    pub fees: FeeSet,
    /// What `fees` recomposes to with the catalog amounts
    pub detected_total: Decimal,
    /// The lump sum as recorded, kept for audit
    pub original_total: Decimal,
    pub confidence: DetectionConfidence,
}

impl FeeDetection {
    /// Recorded sum minus what the detected flags add up to
    pub fn residual(&self) -> Decimal {
        self.original_total - self.detected_total
    }
}
