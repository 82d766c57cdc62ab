//! JSON routes for pricing, submitting and browsing quotations.
//!
//! - `POST /api/v1/quotations/price`  : price openings and surcharges without saving
//! - `POST /api/v1/quotations`        : validate, reprice and persist a submission
//! - `GET  /api/v1/quotations`        : list saved quotations, newest first
//! - `GET  /api/v1/quotations/revenue`: revenue for the most recent twelve active months
//! - `GET  /api/v1/quotations/{id}`   : load one quotation with its customer and openings

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shutterquote_core::domain::opening::Opening;
use shutterquote_core::domain::quotation::{
    QuotationId, QuotationRecord, QuotationSummary, SubmitOutcome, SubmitRequest,
};
use shutterquote_core::domain::surcharge::SurchargeSelections;
use shutterquote_core::errors::{ApplicationError, InterfaceError};
use shutterquote_core::pricing::PricingBreakdown;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::bootstrap::SharedQuotationService;

#[derive(Clone)]
pub struct ApiState {
    quotations: SharedQuotationService,
}

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub openings: Vec<Opening>,
    #[serde(default)]
    pub surcharges: SurchargeSelections,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevenuePoint {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub retryable: bool,
    pub correlation_id: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn router(quotations: SharedQuotationService) -> Router {
    Router::new()
        .route("/api/v1/quotations", get(list_quotations).post(submit_quotation))
        .route("/api/v1/quotations/price", post(price_quotation))
        .route("/api/v1/quotations/revenue", get(monthly_revenue))
        .route("/api/v1/quotations/{id}", get(get_quotation))
        .with_state(ApiState { quotations })
}

pub async fn price_quotation(
    State(state): State<ApiState>,
    Json(request): Json<PriceRequest>,
) -> ApiResult<Json<PricingBreakdown>> {
    state
        .quotations
        .compute(&request.openings, &request.surcharges)
        .map(Json)
        .map_err(|error| failure("price_quotation", error.into()))
}

pub async fn submit_quotation(
    State(state): State<ApiState>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmitOutcome>)> {
    let outcome =
        state.quotations.submit(request).await.map_err(|error| failure("submit_quotation", error))?;

    info!(
        event_name = "api.quotation.created",
        quotation_id = outcome.quotation.id.0,
        is_existing_customer = outcome.is_existing_customer,
        "quotation submitted"
    );
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_quotations(
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<QuotationSummary>>> {
    state.quotations.list().await.map(Json).map_err(|error| failure("list_quotations", error))
}

pub async fn monthly_revenue(State(state): State<ApiState>) -> ApiResult<Json<Vec<RevenuePoint>>> {
    let months = state
        .quotations
        .monthly_revenue()
        .await
        .map_err(|error| failure("monthly_revenue", error))?;

    Ok(Json(
        months
            .into_iter()
            .map(|month| RevenuePoint {
                label: month.label(),
                year: month.year,
                month: month.month,
                revenue: month.revenue,
            })
            .collect(),
    ))
}

pub async fn get_quotation(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<QuotationRecord>> {
    match state.quotations.get(QuotationId(id)).await {
        Ok(Some(quotation)) => Ok(Json(quotation)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("quotation {id} not found"),
                detail: None,
                retryable: false,
                correlation_id: Uuid::new_v4().simple().to_string(),
            }),
        )),
        Err(error) => Err(failure("get_quotation", error)),
    }
}

/// Logs the full error under a fresh correlation id and returns only the
/// user-facing message. Rejected input also carries the field-level detail.
fn failure(operation: &'static str, error: ApplicationError) -> (StatusCode, Json<ApiError>) {
    let correlation_id = Uuid::new_v4().simple().to_string();
    let retryable = error.is_retryable();
    let interface = error.into_interface(correlation_id.clone());

    let (status, detail) = match &interface {
        InterfaceError::BadRequest { message, .. } => {
            warn!(
                event_name = "api.request.rejected",
                operation,
                correlation_id = %correlation_id,
                error = %interface,
                "request rejected"
            );
            (StatusCode::BAD_REQUEST, Some(message.clone()))
        }
        InterfaceError::ServiceUnavailable { .. } => {
            error!(
                event_name = "api.request.unavailable",
                operation,
                correlation_id = %correlation_id,
                retryable,
                error = %interface,
                "request failed on an unavailable dependency"
            );
            (StatusCode::SERVICE_UNAVAILABLE, None)
        }
        InterfaceError::Internal { .. } => {
            error!(
                event_name = "api.request.failed",
                operation,
                correlation_id = %correlation_id,
                error = %interface,
                "request failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, None)
        }
    };

    (
        status,
        Json(ApiError {
            error: interface.user_message().to_string(),
            detail,
            retryable,
            correlation_id,
        }),
    )
}
