//! Shipment record store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{
    ArrangeShippingRequest, ArrangeShippingResponse, CompensationResponse, OrderId, ShipmentId,
    ShippingAddress, ShippingStatus,
};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{DomainError, Result};
use crate::gateway::{BookingOutcome, CarrierGateway};

/// A shipment as stored by the Shipping service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRecord {
    pub id: ShipmentId,
    pub order_id: OrderId,
    pub address: ShippingAddress,
    pub status: ShippingStatus,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory shipment store guarded by a single read/write lock.
///
/// Unlike payments, a carrier refusal leaves no record: the caller only sees
/// an `Unavailable` error.
#[derive(Clone)]
pub struct ShippingStore {
    shipments: Arc<RwLock<HashMap<ShipmentId, ShipmentRecord>>>,
    carrier: Arc<dyn CarrierGateway>,
}

impl std::fmt::Debug for ShippingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingStore").finish_non_exhaustive()
    }
}

impl ShippingStore {
    /// Creates a new, empty shipment store booking through `carrier`.
    pub fn new(carrier: impl CarrierGateway + 'static) -> Self {
        Self {
            shipments: Arc::default(),
            carrier: Arc::new(carrier),
        }
    }

    /// Books the shipment with the carrier and stores it as SHIPPED.
    #[tracing::instrument(skip(self, request), fields(order_id = %request.order_id, city = %request.address.city))]
    pub async fn arrange_shipping(
        &self,
        request: ArrangeShippingRequest,
    ) -> Result<ArrangeShippingResponse> {
        let ArrangeShippingRequest { order_id, address } = request;

        if order_id.is_empty() {
            return Err(DomainError::InvalidArgument(
                "order_id is required".to_string(),
            ));
        }

        let tracking_number = match self.carrier.book(&order_id, &address).await {
            BookingOutcome::Booked { tracking_number } => tracking_number,
            BookingOutcome::Unavailable { reason } => {
                metrics::counter!("shipments_failed_total").increment(1);
                tracing::warn!(%order_id, %reason, "carrier refused shipment");
                return Err(DomainError::Unavailable(format!(
                    "Failed to arrange shipping for order {order_id}: {reason}"
                )));
            }
        };

        let now = Utc::now();
        let shipment_id = ShipmentId::generate();
        let record = ShipmentRecord {
            id: shipment_id.clone(),
            order_id: order_id.clone(),
            address,
            status: ShippingStatus::Shipped,
            tracking_number: Some(tracking_number),
            created_at: now,
            updated_at: now,
        };

        self.shipments
            .write()
            .await
            .insert(shipment_id.clone(), record);

        metrics::counter!("shipments_created_total").increment(1);
        tracing::info!(%shipment_id, %order_id, "shipment stored with status SHIPPED");

        Ok(ArrangeShippingResponse {
            shipment_id,
            status: ShippingStatus::Shipped,
        })
    }

    /// Compensates ArrangeShipping by moving the shipment to CANCELLED.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_shipping(
        &self,
        order_id: &OrderId,
        shipment_id: &ShipmentId,
    ) -> Result<CompensationResponse> {
        let mut shipments = self.shipments.write().await;
        let shipment = shipments
            .get_mut(shipment_id)
            .ok_or_else(|| DomainError::not_found("Shipment", shipment_id))?;

        if &shipment.order_id != order_id {
            drop(shipments);
            tracing::warn!(%shipment_id, %order_id, "cancel rejected, shipment belongs to another order");
            return Err(DomainError::InvalidArgument(format!(
                "Shipment {shipment_id} does not belong to order {order_id}"
            )));
        }

        if !shipment.status.can_cancel() {
            drop(shipments);
            tracing::info!(%shipment_id, "cancel skipped, shipment already cancelled");
            return Ok(CompensationResponse::ok("Shipment already cancelled"));
        }

        // Shipped shipments may still be cancelled (recalled from the carrier).
        shipment.status = ShippingStatus::Cancelled;
        shipment.updated_at = Utc::now();
        drop(shipments);

        metrics::counter!("shipments_cancelled_total").increment(1);
        tracing::info!(%shipment_id, %order_id, "shipment status updated to CANCELLED");
        Ok(CompensationResponse::ok("Shipping cancelled successfully"))
    }

    /// Returns a snapshot of the shipment, if it exists.
    pub async fn get(&self, shipment_id: &ShipmentId) -> Option<ShipmentRecord> {
        self.shipments.read().await.get(shipment_id).cloned()
    }

    /// Returns all shipments stored for an order.
    pub async fn for_order(&self, order_id: &OrderId) -> Vec<ShipmentRecord> {
        self.shipments
            .read()
            .await
            .values()
            .filter(|s| &s.order_id == order_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.shipments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shipments.read().await.is_empty()
    }
}
