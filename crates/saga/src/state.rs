//! Saga state machine and accumulated step results.

use common::{OrderId, PaymentId, ShipmentId};
use serde::{Deserialize, Serialize};

/// Where a saga execution is in its lifecycle.
///
/// ```text
/// Running ──┬──► Completed
///           └──► Compensating ──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SagaStatus {
    /// Forward steps are in flight.
    #[default]
    Running,
    /// A forward step failed; compensating calls are in flight.
    Compensating,
    Completed,
    /// Compensation ran to the end, whatever its individual results.
    Failed,
}

/// Ids produced by the forward steps of one saga execution.
///
/// Each id is set only once its step has succeeded. The state lives for a
/// single execution and is never shared between sagas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SagaState {
    pub status: SagaStatus,
    pub order_id: Option<OrderId>,
    pub payment_id: Option<PaymentId>,
    pub shipment_id: Option<ShipmentId>,
    /// Whether the order was marked COMPLETED after the forward steps.
    pub finalized: bool,
}

impl SagaState {
    /// Creates the state of a new execution.
    pub fn start() -> Self {
        Self::default()
    }

    /// Running -> Compensating. Returns false from any other status.
    pub fn begin_compensation(&mut self) -> bool {
        self.transition(SagaStatus::Running, SagaStatus::Compensating)
    }

    /// Running -> Completed. Returns false from any other status.
    pub fn complete(&mut self) -> bool {
        self.transition(SagaStatus::Running, SagaStatus::Completed)
    }

    /// Compensating -> Failed. Returns false from any other status.
    pub fn fail(&mut self) -> bool {
        self.transition(SagaStatus::Compensating, SagaStatus::Failed)
    }

    fn transition(&mut self, from: SagaStatus, to: SagaStatus) -> bool {
        if self.status != from {
            tracing::warn!(status = ?self.status, target_status = ?to, "ignored saga transition");
            return false;
        }
        self.status = to;
        true
    }

    /// Order id usable for a compensating call, if step 1 produced one.
    pub fn compensable_order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref().filter(|id| !id.is_empty())
    }

    pub fn compensable_payment_id(&self) -> Option<&PaymentId> {
        self.payment_id.as_ref().filter(|id| !id.is_empty())
    }

    pub fn compensable_shipment_id(&self) -> Option<&ShipmentId> {
        self.shipment_id.as_ref().filter(|id| !id.is_empty())
    }
}
