//! Order service endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CompensationResponse, CreateOrderResponse, OrderDetails, OrderId};
use domain::{OrderRecord, OrderStore};

use crate::error::ApiError;

/// POST /orders: creates a PENDING order.
#[tracing::instrument(skip(store, details), fields(user_id = %details.user_id))]
pub async fn create(
    State(store): State<OrderStore>,
    Json(details): Json<OrderDetails>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let response = store.create_order(details).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /orders/{id}/cancel: compensates order creation.
#[tracing::instrument(skip(store))]
pub async fn cancel(
    State(store): State<OrderStore>,
    Path(id): Path<OrderId>,
) -> Result<Json<CompensationResponse>, ApiError> {
    Ok(Json(store.cancel_order(&id).await?))
}

/// POST /orders/{id}/complete: marks a PENDING order COMPLETED.
#[tracing::instrument(skip(store))]
pub async fn complete(
    State(store): State<OrderStore>,
    Path(id): Path<OrderId>,
) -> Result<Json<CompensationResponse>, ApiError> {
    Ok(Json(store.complete_order(&id).await?))
}

/// GET /orders/{id}
#[tracing::instrument(skip(store))]
pub async fn get(
    State(store): State<OrderStore>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderRecord>, ApiError> {
    store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))
}
