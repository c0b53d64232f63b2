//! Payment record store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{
    CompensationResponse, Money, OrderId, PaymentId, PaymentStatus, ProcessPaymentRequest,
    ProcessPaymentResponse,
};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{DomainError, Result};
use crate::gateway::{ChargeOutcome, PaymentGateway};

/// A payment attempt as stored by the Payment service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Money,
    pub status: PaymentStatus,
    /// Reference assigned by the gateway for approved charges.
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory payment store guarded by a single read/write lock.
///
/// Every charge attempt leaves a record, approved (SUCCESS) or declined
/// (FAILED). Only SUCCESS payments can move on to REFUNDED.
#[derive(Clone)]
pub struct PaymentStore {
    payments: Arc<RwLock<HashMap<PaymentId, PaymentRecord>>>,
    gateway: Arc<dyn PaymentGateway>,
}

impl std::fmt::Debug for PaymentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentStore").finish_non_exhaustive()
    }
}

impl PaymentStore {
    /// Creates a new, empty payment store charging through `gateway`.
    pub fn new(gateway: impl PaymentGateway + 'static) -> Self {
        Self {
            payments: Arc::default(),
            gateway: Arc::new(gateway),
        }
    }

    /// Charges the order and records the attempt.
    ///
    /// A declined charge is not an error: it yields a FAILED record and a
    /// response carrying the decline reason.
    #[tracing::instrument(skip(self, request), fields(order_id = %request.order_id, amount = %request.payment_info.amount))]
    pub async fn process_payment(
        &self,
        request: ProcessPaymentRequest,
    ) -> Result<ProcessPaymentResponse> {
        let ProcessPaymentRequest {
            order_id,
            payment_info,
        } = request;

        if order_id.is_empty() {
            return Err(DomainError::InvalidArgument(
                "order_id is required".to_string(),
            ));
        }
        if payment_info.amount.is_negative() {
            return Err(DomainError::InvalidArgument(format!(
                "amount {} must not be negative",
                payment_info.amount
            )));
        }

        // The gateway is consulted before the lock is taken.
        let outcome = self.gateway.charge(&order_id, payment_info.amount).await;

        let (status, message, transaction_id) = match outcome {
            ChargeOutcome::Approved { transaction_id } => (
                PaymentStatus::Success,
                "Payment processed successfully.".to_string(),
                Some(transaction_id),
            ),
            ChargeOutcome::Declined { reason } => (PaymentStatus::Failed, reason, None),
        };

        let now = Utc::now();
        let payment_id = PaymentId::generate();
        let record = PaymentRecord {
            id: payment_id.clone(),
            order_id: order_id.clone(),
            amount: payment_info.amount,
            status,
            transaction_id,
            created_at: now,
            updated_at: now,
        };

        self.payments.write().await.insert(payment_id.clone(), record);

        metrics::counter!("payments_processed_total", "status" => status.as_str()).increment(1);
        tracing::info!(%payment_id, %order_id, %status, "payment record stored");

        Ok(ProcessPaymentResponse {
            payment_id,
            status,
            message,
        })
    }

    /// Compensates ProcessPayment by refunding a SUCCESS payment.
    ///
    /// Refunding an already refunded payment, or one that failed in the first
    /// place, succeeds without touching the record.
    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<CompensationResponse> {
        let mut payments = self.payments.write().await;
        let payment = payments
            .get_mut(payment_id)
            .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;

        if &payment.order_id != order_id {
            drop(payments);
            tracing::warn!(%payment_id, %order_id, "refund rejected, payment belongs to another order");
            return Err(DomainError::InvalidArgument(format!(
                "Payment {payment_id} does not belong to order {order_id}"
            )));
        }

        let status = payment.status;
        match status {
            PaymentStatus::Refunded => {
                drop(payments);
                tracing::info!(%payment_id, "refund skipped, payment already refunded");
                Ok(CompensationResponse::ok("Payment already refunded"))
            }
            PaymentStatus::Failed => {
                drop(payments);
                tracing::info!(%payment_id, "refund skipped, payment originally failed");
                Ok(CompensationResponse::ok(
                    "Payment originally failed, no refund needed",
                ))
            }
            PaymentStatus::Success => {
                payment.status = PaymentStatus::Refunded;
                payment.updated_at = Utc::now();
                drop(payments);

                metrics::counter!("payments_refunded_total").increment(1);
                tracing::info!(%payment_id, %order_id, "payment status updated to REFUNDED");
                Ok(CompensationResponse::ok("Payment refunded successfully"))
            }
        }
    }

    /// Returns a snapshot of the payment, if it exists.
    pub async fn get(&self, payment_id: &PaymentId) -> Option<PaymentRecord> {
        self.payments.read().await.get(payment_id).cloned()
    }

    /// Returns all payment attempts made for an order.
    pub async fn for_order(&self, order_id: &OrderId) -> Vec<PaymentRecord> {
        self.payments
            .read()
            .await
            .values()
            .filter(|p| &p.order_id == order_id)
            .cloned()
            .collect()
    }

    /// Returns the number of stored payment records.
    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}
