// Contract tests for /tax-invoices

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, web, App};
use autoescuela::core::Quarter;
use autoescuela::tax_invoices::{controllers, QuarterSummary, TaxInvoice};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::json;

macro_rules! invoice_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.service.clone()))
                .configure(controllers::configure),
        )
        .await
    };
}

fn create_payload(student_id: i64, date: &str, gross_total: &str) -> serde_json::Value {
    json!({
        "student_id": student_id,
        "date": date,
        "course": "B",
        "fees": { "basic_fee": true },
        "gross_total": gross_total,
        "notes": "Permiso B"
    })
}

#[actix_web::test]
async fn test_create_and_fetch_invoice() {
    let ctx = TestContext::new();
    let student = ctx.students.seed(new_student("12345678Z", "ANA", "PEREZ LOPEZ"));
    let app = invoice_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/tax-invoices")
        .set_json(create_payload(student.id, "2024-05-10", "500.00"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let created: TaxInvoice = test::read_body_json(resp).await;
    assert_eq!(created.invoice_number.to_string(), "2024/0001");
    assert_eq!(created.quarter, Quarter::Q2);
    assert_eq!(created.totals.vat, dec!(70.46));
    assert_eq!(created.notes, "Permiso B");

    let req = test::TestRequest::get()
        .uri(&format!("/tax-invoices/{}", created.id))
        .to_request();
    let fetched: TaxInvoice = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.invoice_number, created.invoice_number);
    assert_eq!(fetched.client.dni, "12345678Z");
}

#[actix_web::test]
async fn test_create_error_statuses() {
    let ctx = TestContext::new();
    let student = ctx.students.seed(new_student("12345678Z", "ANA", "PEREZ LOPEZ"));
    let app = invoice_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/tax-invoices")
        .set_json(create_payload(404, "2024-05-10", "500.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post()
        .uri("/tax-invoices")
        .set_json(create_payload(student.id, "2024-05-10", "-10.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get().uri("/tax-invoices/77").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_list_with_filters() {
    let ctx = TestContext::new();
    let student = ctx.students.seed(new_student("12345678Z", "ANA", "PEREZ LOPEZ"));
    let app = invoice_app!(ctx);

    for date in ["2024-02-01", "2024-05-01", "2024-05-20"] {
        let req = test::TestRequest::post()
            .uri("/tax-invoices")
            .set_json(create_payload(student.id, date, "200.00"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/tax-invoices?year=2024&quarter=2")
        .to_request();
    let listed: Vec<TaxInvoice> = test::call_and_read_body_json(&app, req).await;
    let numbers: Vec<String> = listed.iter().map(|i| i.invoice_number.to_string()).collect();
    assert_eq!(numbers, ["2024/0003", "2024/0002"]);

    let req = test::TestRequest::get()
        .uri("/tax-invoices?limit=1")
        .to_request();
    let listed: Vec<TaxInvoice> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);

    let req = test::TestRequest::get()
        .uri("/tax-invoices?quarter=9")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_quarter_summary_route() {
    let ctx = TestContext::new();
    let student = ctx.students.seed(new_student("12345678Z", "ANA", "PEREZ LOPEZ"));
    let app = invoice_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/tax-invoices")
        .set_json(create_payload(student.id, "2024-05-10", "500.00"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::get()
        .uri("/tax-invoices/summary?year=2024&quarter=2")
        .to_request();
    let summary: QuarterSummary = test::call_and_read_body_json(&app, req).await;

    assert_eq!(summary.invoice_count, 1);
    assert_eq!(summary.quarter, Quarter::Q2);
    assert_eq!(summary.base_taxable, dec!(335.50));
    assert_eq!(summary.total, dec!(500.01));

    let req = test::TestRequest::get()
        .uri("/tax-invoices/summary?year=2024")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}
