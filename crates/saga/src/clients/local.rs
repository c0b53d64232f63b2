//! In-process clients backed directly by the record stores.

use async_trait::async_trait;
use common::{
    ArrangeShippingRequest, ArrangeShippingResponse, CompensationResponse, CreateOrderResponse,
    OrderDetails, OrderId, PaymentId, PaymentInfo, ProcessPaymentRequest, ProcessPaymentResponse,
    ShipmentId, ShippingAddress,
};
use domain::{OrderStore, PaymentStore, ShippingStore};

use super::{OrderClient, PaymentClient, ShippingClient};
use crate::error::CallError;

#[async_trait]
impl OrderClient for OrderStore {
    async fn create_order(&self, details: OrderDetails) -> Result<CreateOrderResponse, CallError> {
        Ok(OrderStore::create_order(self, details).await?)
    }

    async fn cancel_order(&self, order_id: &OrderId) -> Result<CompensationResponse, CallError> {
        Ok(OrderStore::cancel_order(self, order_id).await?)
    }

    async fn complete_order(
        &self,
        order_id: &OrderId,
    ) -> Result<CompensationResponse, CallError> {
        Ok(OrderStore::complete_order(self, order_id).await?)
    }
}

#[async_trait]
impl PaymentClient for PaymentStore {
    async fn process_payment(
        &self,
        order_id: &OrderId,
        payment_info: PaymentInfo,
    ) -> Result<ProcessPaymentResponse, CallError> {
        let request = ProcessPaymentRequest {
            order_id: order_id.clone(),
            payment_info,
        };
        Ok(PaymentStore::process_payment(self, request).await?)
    }

    async fn refund_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<CompensationResponse, CallError> {
        Ok(PaymentStore::refund_payment(self, order_id, payment_id).await?)
    }
}

#[async_trait]
impl ShippingClient for ShippingStore {
    async fn arrange_shipping(
        &self,
        order_id: &OrderId,
        address: ShippingAddress,
    ) -> Result<ArrangeShippingResponse, CallError> {
        let request = ArrangeShippingRequest {
            order_id: order_id.clone(),
            address,
        };
        Ok(ShippingStore::arrange_shipping(self, request).await?)
    }

    async fn cancel_shipping(
        &self,
        order_id: &OrderId,
        shipment_id: &ShipmentId,
    ) -> Result<CompensationResponse, CallError> {
        Ok(ShippingStore::cancel_shipping(self, order_id, shipment_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ErrorCode, Item, Money};
    use domain::StubCarrier;

    #[tokio::test]
    async fn test_store_errors_become_status_errors() {
        let orders = OrderStore::new();
        let err = OrderClient::cancel_order(&orders, &OrderId::new("order-missing"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NotFound));

        let shipping = ShippingStore::new(StubCarrier::unavailable());
        let address = ShippingAddress {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
        };
        let err = ShippingClient::arrange_shipping(&shipping, &OrderId::new("order-1"), address)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Unavailable));
    }

    #[tokio::test]
    async fn test_create_order_through_client() {
        let orders = OrderStore::new();
        let details = OrderDetails::new("u1", vec![Item::new("A", 1, Money::from_cents(500))]);
        let response = OrderClient::create_order(&orders, details).await.unwrap();
        assert!(orders.get(&response.order_id).await.is_some());
    }
}
