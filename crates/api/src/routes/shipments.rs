//! Shipping service endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{
    ArrangeShippingRequest, ArrangeShippingResponse, CompensateRequest, CompensationResponse,
    ShipmentId,
};
use domain::{ShipmentRecord, ShippingStore};

use crate::error::ApiError;

/// POST /shipments: books a carrier for an order.
#[tracing::instrument(skip(store, request), fields(order_id = %request.order_id))]
pub async fn arrange(
    State(store): State<ShippingStore>,
    Json(request): Json<ArrangeShippingRequest>,
) -> Result<(StatusCode, Json<ArrangeShippingResponse>), ApiError> {
    let response = store.arrange_shipping(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /shipments/{id}/cancel
#[tracing::instrument(skip(store, request), fields(order_id = %request.order_id))]
pub async fn cancel(
    State(store): State<ShippingStore>,
    Path(id): Path<ShipmentId>,
    Json(request): Json<CompensateRequest>,
) -> Result<Json<CompensationResponse>, ApiError> {
    Ok(Json(store.cancel_shipping(&request.order_id, &id).await?))
}

/// GET /shipments/{id}
#[tracing::instrument(skip(store))]
pub async fn get(
    State(store): State<ShippingStore>,
    Path(id): Path<ShipmentId>,
) -> Result<Json<ShipmentRecord>, ApiError> {
    store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Shipment {id} not found")))
}
