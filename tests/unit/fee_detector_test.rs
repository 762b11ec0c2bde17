// Reverse fee detection over the DGT catalog
//
// Combinations the greedy detector can resolve (basic fee with renewals,
// plus at most one of motorcycle or transfer) come back exactly.

use autoescuela::fees::{DetectionConfidence, FeeCalculator, FeeDetector, FeeSet};
use proptest::prelude::*;
use rust_decimal_macros::dec;

proptest! {
    #[test]
    fn test_detect_inverts_resolvable_fee_sets(
        renewals in 0u32..20,
        extra in 0u8..3
    ) {
        let fees = match extra {
            0 => FeeSet::basic(),
            1 => FeeSet::basic().with_motorcycle(),
            _ => FeeSet::basic().with_transfer(),
        }
        .with_renewals(renewals);
        let calculator = FeeCalculator::new();
        let fees_total = fees.fees_total(calculator.catalog());

        let detection = FeeDetector::new().detect(fees_total);

        prop_assert_eq!(detection.confidence, DetectionConfidence::Exact);
        prop_assert_eq!(detection.fees, fees);
        prop_assert_eq!(detection.detected_total, fees_total);
    }

    #[test]
    fn test_detection_keeps_original_sum(cents in 0i64..2_000_000) {
        let total = rust_decimal::Decimal::new(cents, 2);

        let detection = FeeDetector::new().detect(total);

        prop_assert_eq!(detection.original_total, total);
        prop_assert_eq!(detection.residual(), total - detection.detected_total);
        if detection.confidence.is_exact() {
            prop_assert_eq!(detection.residual(), dec!(0.00));
        }
    }
}

#[test]
fn test_reference_detections() {
    let detector = FeeDetector::new();

    assert_eq!(detector.detect(dec!(94.05)).fees, FeeSet::basic());
    assert_eq!(
        detector.detect(dec!(188.10)).fees,
        FeeSet::basic().with_renewals(1)
    );
    assert_eq!(
        detector.detect(dec!(122.92)).fees,
        FeeSet::basic().with_motorcycle()
    );
    assert_eq!(detector.detect(dec!(0)).fees, FeeSet::none());
}

#[test]
fn test_motorcycle_and_transfer_together_fall_back() {
    // 94.05 + 28.87 + 8.67: the greedy pass cannot take both extras
    let detection = FeeDetector::new().detect(dec!(131.59));

    assert_eq!(detection.confidence, DetectionConfidence::Approximate);
    assert_eq!(detection.fees, FeeSet::basic());
    assert_eq!(detection.residual(), dec!(37.54));
}
