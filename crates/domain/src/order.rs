//! Order record store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{
    CompensationResponse, CreateOrderResponse, Item, Money, OrderDetails, OrderId, OrderStatus,
};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{DomainError, Result};

/// An order as stored by the Order service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: String,
    pub items: Vec<Item>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory order store guarded by a single read/write lock.
///
/// Orders are created PENDING and only ever move to CANCELLED (compensation)
/// or COMPLETED (saga finalization). Records are never deleted.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
}

impl OrderStore {
    /// Creates a new, empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a PENDING order for the given details.
    #[tracing::instrument(skip(self, details), fields(user_id = %details.user_id))]
    pub async fn create_order(&self, details: OrderDetails) -> Result<CreateOrderResponse> {
        let total_amount = validate_details(&details)?;

        let now = Utc::now();
        let order_id = OrderId::generate();
        let record = OrderRecord {
            id: order_id.clone(),
            total_amount,
            user_id: details.user_id,
            items: details.items,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let total = record.total_amount;

        self.orders.write().await.insert(order_id.clone(), record);

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(%order_id, %total, "order created with status PENDING");

        Ok(CreateOrderResponse {
            order_id,
            status: OrderStatus::Pending,
        })
    }

    /// Compensates CreateOrder by moving the order to CANCELLED.
    ///
    /// Cancelling an already cancelled order succeeds without touching it.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<CompensationResponse> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found("Order", order_id))?;

        if order.status == OrderStatus::Cancelled {
            drop(orders);
            tracing::info!(%order_id, "cancel skipped, order already cancelled");
            return Ok(CompensationResponse::ok("Order already cancelled"));
        }

        let previous = order.status;
        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        drop(orders);

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(%order_id, %previous, "order status updated to CANCELLED");
        Ok(CompensationResponse::ok("Order cancelled successfully"))
    }

    /// Finalizes a PENDING order as COMPLETED.
    ///
    /// Any other status is left alone and still reported as processed.
    #[tracing::instrument(skip(self))]
    pub async fn complete_order(&self, order_id: &OrderId) -> Result<CompensationResponse> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found("Order", order_id))?;

        if order.status.can_complete() {
            order.status = OrderStatus::Completed;
            order.updated_at = Utc::now();
            drop(orders);
            metrics::counter!("orders_completed_total").increment(1);
            tracing::info!(%order_id, "order status updated to COMPLETED");
        } else {
            let status = order.status;
            drop(orders);
            tracing::info!(%order_id, %status, "complete skipped, order not PENDING");
        }

        Ok(CompensationResponse::ok("Order completion processed"))
    }

    /// Returns a snapshot of the order, if it exists.
    pub async fn get(&self, order_id: &OrderId) -> Option<OrderRecord> {
        self.orders.read().await.get(order_id).cloned()
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

/// Checks the details and returns the order total.
fn validate_details(details: &OrderDetails) -> Result<Money> {
    if details.user_id.trim().is_empty() {
        return Err(DomainError::InvalidArgument(
            "user_id is required".to_string(),
        ));
    }
    if details.items.is_empty() {
        return Err(DomainError::InvalidArgument(
            "order must contain at least one item".to_string(),
        ));
    }
    for item in &details.items {
        if item.quantity == 0 {
            return Err(DomainError::InvalidArgument(format!(
                "item {} has zero quantity",
                item.product_id
            )));
        }
        if item.price.is_negative() {
            return Err(DomainError::InvalidArgument(format!(
                "item {} has a negative price",
                item.product_id
            )));
        }
    }
    details.total().ok_or_else(|| {
        DomainError::InvalidArgument("order total exceeds the supported amount".to_string())
    })
}
