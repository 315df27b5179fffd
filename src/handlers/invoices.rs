use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::application::invoice_service::{
    ActionOutcome, DeleteOutcome, FormState, InvoiceListResponse, InvoiceService,
};
use crate::domain::invoice::Invoice;
use crate::domain::validation::InvoiceForm;
use crate::errors::AppError;

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListInvoicesParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// `303 See Other` so the browser follows with a GET.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn action_response(outcome: ActionOutcome) -> HttpResponse {
    match outcome {
        ActionOutcome::Redirect(location) => see_other(location),
        ActionOutcome::Invalid(state) => HttpResponse::UnprocessableEntity().json(state),
        ActionOutcome::Failed(state) => HttpResponse::InternalServerError().json(state),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /dashboard/invoices
///
/// Paginated invoice list, newest first. Served from the page cache until an
/// invoice is created, updated or deleted.
#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    params(ListInvoicesParams),
    responses(
        (status = 200, description = "Paginated list of invoices", body = InvoiceListResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    service: web::Data<InvoiceService>,
    query: web::Query<ListInvoicesParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let body = web::block(move || service.list_invoices(params.page, params.limit)).await??;
    Ok(HttpResponse::Ok().json(body))
}

/// POST /dashboard/invoices
#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    request_body(content = InvoiceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice created; redirect to the invoice list"),
        (status = 422, description = "Form did not validate", body = FormState),
        (status = 500, description = "Database error", body = FormState),
    ),
    tag = "invoices"
)]
pub async fn create_invoice(
    service: web::Data<InvoiceService>,
    form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let outcome = web::block(move || service.create_invoice(&form)).await?;
    Ok(action_response(outcome))
}

/// GET /dashboard/invoices/{id}
#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = String, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 200, description = "Invoice found", body = Invoice),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Invoice not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let invoice = web::block(move || service.get_invoice(&id)).await??;

    match invoice {
        Some(invoice) => Ok(HttpResponse::Ok().json(invoice)),
        None => Err(AppError::NotFound),
    }
}

/// POST /dashboard/invoices/{id}/edit
#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}/edit",
    params(
        ("id" = String, Path, description = "Invoice UUID"),
    ),
    request_body(content = InvoiceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice updated; redirect to the invoice list"),
        (status = 422, description = "Form did not validate", body = FormState),
        (status = 500, description = "Database error", body = FormState),
    ),
    tag = "invoices"
)]
pub async fn update_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<String>,
    form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let form = form.into_inner();
    let outcome = web::block(move || service.update_invoice(&id, &form)).await?;
    Ok(action_response(outcome))
}

/// POST /dashboard/invoices/{id}/delete
///
/// The caller stays on the current page; only a message comes back.
#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}/delete",
    params(
        ("id" = String, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 200, description = "Invoice deleted", body = FormState),
        (status = 500, description = "Database error", body = FormState),
    ),
    tag = "invoices"
)]
pub async fn delete_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let outcome = web::block(move || service.delete_invoice(&id)).await?;

    Ok(match outcome {
        DeleteOutcome::Deleted(state) => HttpResponse::Ok().json(state),
        DeleteOutcome::Failed(state) => HttpResponse::InternalServerError().json(state),
    })
}
