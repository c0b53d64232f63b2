//! Service clients used by the orchestrator.
//!
//! Each trait is the orchestrator's view of one remote domain service: a
//! forward action plus its compensation. Implementations decide the
//! transport; [`local`] calls the stores in-process and [`http`] talks JSON
//! over HTTP to the service binaries.

pub mod http;
pub mod local;

use async_trait::async_trait;
use common::{
    ArrangeShippingResponse, CompensationResponse, CreateOrderResponse, OrderDetails, OrderId,
    PaymentId, PaymentInfo, ProcessPaymentResponse, ShipmentId, ShippingAddress,
};

use crate::error::CallError;

pub use http::{HttpOrderClient, HttpPaymentClient, HttpShippingClient};

/// Client of the Order service.
#[async_trait]
pub trait OrderClient: Send + Sync {
    async fn create_order(&self, details: OrderDetails) -> Result<CreateOrderResponse, CallError>;

    async fn cancel_order(&self, order_id: &OrderId) -> Result<CompensationResponse, CallError>;

    /// Finalizes a PENDING order as COMPLETED.
    async fn complete_order(&self, order_id: &OrderId)
    -> Result<CompensationResponse, CallError>;
}

/// Client of the Payment service.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Charges the order. A declined charge is an `Ok` response with
    /// status FAILED, not an error.
    async fn process_payment(
        &self,
        order_id: &OrderId,
        payment_info: PaymentInfo,
    ) -> Result<ProcessPaymentResponse, CallError>;

    async fn refund_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<CompensationResponse, CallError>;
}

/// Client of the Shipping service.
#[async_trait]
pub trait ShippingClient: Send + Sync {
    /// Arranges shipping. A carrier refusal is reported as an error.
    async fn arrange_shipping(
        &self,
        order_id: &OrderId,
        address: ShippingAddress,
    ) -> Result<ArrangeShippingResponse, CallError>;

    async fn cancel_shipping(
        &self,
        order_id: &OrderId,
        shipment_id: &ShipmentId,
    ) -> Result<CompensationResponse, CallError>;
}
