//! Record status state machines.

use serde::{Deserialize, Serialize};

/// The status of an order record.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Completed
///           └──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created, saga still in flight.
    #[default]
    Pending,

    /// Saga finished and the order was finalized (terminal state).
    Completed,

    /// Order was compensated (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order can be completed in this status.
    pub fn can_complete(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of a payment record.
///
/// State transitions:
/// ```text
/// Success ──► Refunded
/// Failed  (terminal on creation, nothing to refund)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// The charge went through.
    Success,

    /// The charge was declined; the record exists but no money moved.
    Failed,

    /// A successful charge was refunded (terminal state).
    Refunded,
}

impl PaymentStatus {
    /// Returns true if this status counts as a successful forward step.
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Success)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of a shipment record.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Shipped ──► Cancelled
///           └──────────────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingStatus {
    #[default]
    Pending,

    Shipped,

    /// Shipment was compensated (terminal state).
    Cancelled,
}

impl ShippingStatus {
    /// Returns true if the shipment can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, ShippingStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingStatus::Pending => "PENDING",
            ShippingStatus::Shipped => "SHIPPED",
            ShippingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
