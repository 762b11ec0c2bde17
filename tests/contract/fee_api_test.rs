// Contract tests for /fees/compute and /fees/detect
//
// Decimals travel as JSON strings; responses are read back into typed
// structs and compared as decimals.

use actix_web::{test, web, App};
use autoescuela::fees::{controllers, DetectionConfidence, FeeCalculator, FeeDetector, FeeSet};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ComputeBody {
    base_taxable: Decimal,
    vat: Decimal,
    fees_total: Decimal,
    total: Decimal,
    drift: Decimal,
}

#[derive(Debug, Deserialize)]
struct DetectBody {
    fees: FeeSet,
    detected_total: Decimal,
    original_total: Decimal,
    confidence: DetectionConfidence,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    code: u16,
}

macro_rules! fee_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(FeeCalculator::new()))
                .app_data(web::Data::new(FeeDetector::new()))
                .configure(controllers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_compute_course_b_with_basic_fee() {
    let app = fee_app!();

    let req = test::TestRequest::post()
        .uri("/fees/compute")
        .set_json(json!({
            "gross_total": "500.00",
            "course": "B",
            "fees": { "basic_fee": true }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: ComputeBody = test::read_body_json(resp).await;
    assert_eq!(body.fees_total, dec!(94.05));
    assert_eq!(body.base_taxable, dec!(335.50));
    assert_eq!(body.vat, dec!(70.46));
    assert_eq!(body.total, dec!(500.01));
    assert_eq!(body.drift, dec!(0.01));
}

#[actix_web::test]
async fn test_compute_exempt_course_without_fees() {
    let app = fee_app!();

    let req = test::TestRequest::post()
        .uri("/fees/compute")
        .set_json(json!({ "gross_total": "300.00", "course": "C" }))
        .to_request();
    let body: ComputeBody = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.base_taxable, dec!(300.00));
    assert_eq!(body.vat, dec!(0.00));
    assert_eq!(body.fees_total, dec!(0.00));
    assert_eq!(body.drift, dec!(0.00));
}

#[actix_web::test]
async fn test_compute_rejects_negative_and_unknown_course() {
    let app = fee_app!();

    let req = test::TestRequest::post()
        .uri("/fees/compute")
        .set_json(json!({ "gross_total": "-1.00", "course": "B" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error.code, 400);
    assert!(body.error.message.contains("gross_total"));

    let req = test::TestRequest::post()
        .uri("/fees/compute")
        .set_json(json!({ "gross_total": "10.00", "course": "X" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_detect_basic_with_renewal() {
    let app = fee_app!();

    let req = test::TestRequest::post()
        .uri("/fees/detect")
        .set_json(json!({ "fees_total": "188.10" }))
        .to_request();
    let body: DetectBody = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.fees, FeeSet::basic().with_renewals(1));
    assert_eq!(body.detected_total, dec!(188.10));
    assert_eq!(body.original_total, dec!(188.10));
    assert_eq!(body.confidence, DetectionConfidence::Exact);
}

#[actix_web::test]
async fn test_detect_reports_approximation() {
    let app = fee_app!();

    let req = test::TestRequest::post()
        .uri("/fees/detect")
        .set_json(json!({ "fees_total": "94.50" }))
        .to_request();
    let body: DetectBody = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.fees, FeeSet::basic());
    assert_eq!(body.original_total, dec!(94.50));
    assert_eq!(body.confidence, DetectionConfidence::Approximate);
}
