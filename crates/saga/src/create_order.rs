//! Create-order saga steps.

use common::{OrderDetails, PaymentInfo, ShippingAddress};
use serde::{Deserialize, Serialize};

/// The saga type identifier for create-order.
pub const SAGA_TYPE: &str = "CreateOrder";

/// Input of one create-order saga execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderSagaRequest {
    pub order: OrderDetails,
    pub payment: PaymentInfo,
    pub shipping: ShippingAddress,
}

/// A forward step of the create-order saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SagaStep {
    CreateOrder,
    ProcessPayment,
    ArrangeShipping,
}

impl SagaStep {
    /// All steps in forward order.
    const ALL: [SagaStep; 3] = [
        SagaStep::CreateOrder,
        SagaStep::ProcessPayment,
        SagaStep::ArrangeShipping,
    ];

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStep::CreateOrder => "create_order",
            SagaStep::ProcessPayment => "process_payment",
            SagaStep::ArrangeShipping => "arrange_shipping",
        }
    }

    /// Name of the compensating action that undoes this step.
    pub fn compensation(&self) -> &'static str {
        match self {
            SagaStep::CreateOrder => "cancel_order",
            SagaStep::ProcessPayment => "refund_payment",
            SagaStep::ArrangeShipping => "cancel_shipping",
        }
    }

    /// Reason reported to the caller when this step fails.
    pub fn failure_reason(&self) -> &'static str {
        match self {
            SagaStep::CreateOrder => "failed to create order",
            SagaStep::ProcessPayment => "failed to process payment",
            SagaStep::ArrangeShipping => "failed to arrange shipping",
        }
    }

    /// Steps to compensate when this step fails: this step first, then every
    /// earlier step in reverse order.
    pub fn compensation_chain(&self) -> impl Iterator<Item = SagaStep> {
        let position = Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default();
        Self::ALL.into_iter().take(position + 1).rev()
    }
}

impl std::fmt::Display for SagaStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
