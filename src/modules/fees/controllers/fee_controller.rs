use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::modules::fees::models::{Course, FeeDetection, FeeSet, InvoiceTotals};
use crate::modules::fees::services::{FeeCalculator, FeeDetector};

/// Body of POST /fees/compute
#[derive(Debug, Deserialize)]
pub struct ComputeFeesRequest {
    pub gross_total: Decimal,
    pub course: Course,
    #[serde(default)]
    pub fees: FeeSet,
}

#[derive(Debug, Serialize)]
pub struct ComputeFeesResponse {
    pub base_taxable: Decimal,
    pub vat: Decimal,
    pub fees_total: Decimal,
    pub total: Decimal,
    /// Recomposed total minus gross total (rounding cents)
    pub drift: Decimal,
}

impl ComputeFeesResponse {
    fn new(totals: InvoiceTotals, gross_total: Decimal) -> Self {
        Self {
            base_taxable: totals.base_taxable,
            vat: totals.vat,
            fees_total: totals.fees_total,
            total: totals.total,
            drift: totals.drift_from(gross_total),
        }
    }
}

/// Body of POST /fees/detect
#[derive(Debug, Deserialize)]
pub struct DetectFeesRequest {
    pub fees_total: Decimal,
}

/// POST /fees/compute
pub async fn compute_fees(
    calculator: web::Data<FeeCalculator>,
    request: web::Json<ComputeFeesRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    if request.gross_total < Decimal::ZERO {
        return Err(AppError::validation("gross_total cannot be negative"));
    }

    let totals = calculator.compute(request.gross_total, &request.fees, request.course);

    Ok(HttpResponse::Ok().json(ComputeFeesResponse::new(totals, request.gross_total)))
}

/// POST /fees/detect
pub async fn detect_fees(
    detector: web::Data<FeeDetector>,
    request: web::Json<DetectFeesRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    if request.fees_total < Decimal::ZERO {
        return Err(AppError::validation("fees_total cannot be negative"));
    }

    let detection: FeeDetection = detector.detect(request.fees_total);

    Ok(HttpResponse::Ok().json(detection))
}

/// Configure fee routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fees")
            .route("/compute", web::post().to(compute_fees))
            .route("/detect", web::post().to(detect_fees)),
    );
}
