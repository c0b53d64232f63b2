//! Request and response messages exchanged with the domain services.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::status::{OrderStatus, PaymentStatus, ShippingStatus};
use crate::types::{OrderId, PaymentId, ShipmentId};

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub product_id: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
}

impl Item {
    /// Creates a new line item.
    pub fn new(product_id: impl Into<String>, quantity: u32, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price,
        }
    }

    /// Returns `price * quantity`, or `None` if it does not fit in cents.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_multiply(self.quantity)
    }
}

/// What the caller wants to order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub user_id: String,
    pub items: Vec<Item>,
}

impl OrderDetails {
    pub fn new(user_id: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
        }
    }

    /// Returns the sum of all line totals, or `None` on overflow.
    pub fn total(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.line_total()?))
    }
}

/// Card details and the amount to charge.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub amount: Money,
}

// Card data never ends up in logs.
impl std::fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last4: String = self
            .card_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        f.debug_struct("PaymentInfo")
            .field("card_number", &format_args!("****{last4}"))
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"***")
            .field("amount", &self.amount)
            .finish()
    }
}

/// Destination of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Response of CreateOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Request of ProcessPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPaymentRequest {
    pub order_id: OrderId,
    pub payment_info: PaymentInfo,
}

/// Response of ProcessPayment.
///
/// A declined charge is still a response: `status` is `FAILED` and
/// `message` carries the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPaymentResponse {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    pub message: String,
}

/// Request of ArrangeShipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangeShippingRequest {
    pub order_id: OrderId,
    pub address: ShippingAddress,
}

/// Response of ArrangeShipping. Only produced on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangeShippingResponse {
    pub shipment_id: ShipmentId,
    pub status: ShippingStatus,
}

/// Body of RefundPayment and CancelShipping; the record id travels in the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensateRequest {
    pub order_id: OrderId,
}

/// Result of a compensating or finalizing action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationResponse {
    pub success: bool,
    pub message: String,
}

impl CompensationResponse {
    /// A successful response with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total() {
        let details = OrderDetails::new(
            "u1",
            vec![
                Item::new("A", 2, Money::from_cents(1050)),
                Item::new("B", 1, Money::from_cents(2500)),
            ],
        );
        assert_eq!(details.total(), Some(Money::from_cents(4600)));
    }

    #[test]
    fn test_order_total_overflow() {
        let details = OrderDetails::new(
            "u1",
            vec![
                Item::new("A", 1, Money::from_cents(i64::MAX)),
                Item::new("B", 1, Money::from_cents(1)),
            ],
        );
        assert_eq!(details.total(), None);
    }

    #[test]
    fn test_payment_info_debug_masks_card() {
        let info = PaymentInfo {
            card_number: "4111-1111-1111-1234".to_string(),
            expiry_date: "12/26".to_string(),
            cvv: "123".to_string(),
            amount: Money::from_cents(2100),
        };
        let debug = format!("{info:?}");
        assert!(debug.contains("****1234"));
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("\"123\""));
    }

    #[test]
    fn test_payment_response_wire_format() {
        let response = ProcessPaymentResponse {
            payment_id: PaymentId::new("pay-1"),
            status: PaymentStatus::Failed,
            message: "declined".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["payment_id"], "pay-1");
        assert_eq!(json["status"], "FAILED");
    }
}
