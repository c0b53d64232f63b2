//! Orchestrator endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::{OrderId, PaymentId, ShipmentId};
use saga::{
    CreateOrderSagaRequest, OrderClient, PaymentClient, SagaCoordinator, SagaError,
    ShippingClient, UnresolvedCompensation,
};
use serde::Serialize;

/// Result of one create-order saga, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SagaResponse {
    Completed {
        order_id: OrderId,
        payment_id: PaymentId,
        shipment_id: ShipmentId,
        /// False when the order could not be marked COMPLETED afterwards.
        finalized: bool,
    },
    Failed {
        reason: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        unresolved: Vec<UnresolvedCompensation>,
    },
}

impl From<SagaError> for SagaResponse {
    fn from(err: SagaError) -> Self {
        SagaResponse::Failed {
            reason: err.to_string(),
            unresolved: err.unresolved().to_vec(),
        }
    }
}

/// POST /sagas/create-order: runs one create-order saga to completion.
///
/// Responds 200 when the saga completed and 422 when it failed and was
/// compensated.
#[tracing::instrument(skip_all, fields(user_id = %request.order.user_id))]
pub async fn create_order<O, P, S>(
    State(coordinator): State<Arc<SagaCoordinator<O, P, S>>>,
    Json(request): Json<CreateOrderSagaRequest>,
) -> (StatusCode, Json<SagaResponse>)
where
    O: OrderClient + 'static,
    P: PaymentClient + 'static,
    S: ShippingClient + 'static,
{
    match coordinator.execute(request).await {
        Ok(saga) => match (saga.order_id, saga.payment_id, saga.shipment_id) {
            (Some(order_id), Some(payment_id), Some(shipment_id)) => (
                StatusCode::OK,
                Json(SagaResponse::Completed {
                    order_id,
                    payment_id,
                    shipment_id,
                    finalized: saga.finalized,
                }),
            ),
            _ => {
                tracing::error!("completed saga is missing a record id");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SagaResponse::Failed {
                        reason: "saga completed without record ids".to_string(),
                        unresolved: Vec::new(),
                    }),
                )
            }
        },
        Err(err) => (StatusCode::UNPROCESSABLE_ENTITY, Json(SagaResponse::from(err))),
    }
}
