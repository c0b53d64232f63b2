//! Payment service endpoints.

use axum::Json;
use axum::extract::{Path, State};
use common::{
    CompensateRequest, CompensationResponse, PaymentId, ProcessPaymentRequest,
    ProcessPaymentResponse,
};
use domain::{PaymentRecord, PaymentStore};

use crate::error::ApiError;

/// POST /payments: charges an order.
///
/// A declined charge is a 200 response with status FAILED.
#[tracing::instrument(skip(store, request), fields(order_id = %request.order_id))]
pub async fn process(
    State(store): State<PaymentStore>,
    Json(request): Json<ProcessPaymentRequest>,
) -> Result<Json<ProcessPaymentResponse>, ApiError> {
    Ok(Json(store.process_payment(request).await?))
}

/// POST /payments/{id}/refund
#[tracing::instrument(skip(store, request), fields(order_id = %request.order_id))]
pub async fn refund(
    State(store): State<PaymentStore>,
    Path(id): Path<PaymentId>,
    Json(request): Json<CompensateRequest>,
) -> Result<Json<CompensationResponse>, ApiError> {
    Ok(Json(store.refund_payment(&request.order_id, &id).await?))
}

/// GET /payments/{id}
#[tracing::instrument(skip(store))]
pub async fn get(
    State(store): State<PaymentStore>,
    Path(id): Path<PaymentId>,
) -> Result<Json<PaymentRecord>, ApiError> {
    store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))
}
