use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::Quarter;
use crate::modules::tax_invoices::models::{CreateTaxInvoiceRequest, TaxInvoiceFilter};
use crate::modules::tax_invoices::services::TaxInvoiceService;

/// Query parameters for listing tax invoices
#[derive(Debug, Default, Deserialize)]
pub struct ListTaxInvoicesQuery {
    pub year: Option<i32>,
    pub quarter: Option<u8>,
    pub client: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListTaxInvoicesQuery {
    fn filter(&self) -> Result<TaxInvoiceFilter, AppError> {
        Ok(TaxInvoiceFilter {
            year: self.year,
            quarter: self.quarter.map(Quarter::from_number).transpose()?,
            client: self.client.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub year: i32,
    pub quarter: u8,
}

/// POST /tax-invoices
pub async fn create_tax_invoice(
    service: web::Data<Arc<TaxInvoiceService>>,
    request: web::Json<CreateTaxInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.create(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// GET /tax-invoices/{id}
pub async fn get_tax_invoice(
    service: web::Data<Arc<TaxInvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// GET /tax-invoices
pub async fn list_tax_invoices(
    service: web::Data<Arc<TaxInvoiceService>>,
    query: web::Query<ListTaxInvoicesQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.filter()?;
    let invoices = service.list(&filter, query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(invoices))
}

/// GET /tax-invoices/summary?year=&quarter=
pub async fn quarter_summary(
    service: web::Data<Arc<TaxInvoiceService>>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let quarter = Quarter::from_number(query.quarter)?;
    let summary = service.quarter_summary(query.year, quarter).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Configure tax invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tax-invoices")
            .route("", web::post().to(create_tax_invoice))
            .route("", web::get().to(list_tax_invoices))
            // before /{id} so "summary" is not taken as an id
            .route("/summary", web::get().to(quarter_summary))
            .route("/{id}", web::get().to(get_tax_invoice)),
    );
}
