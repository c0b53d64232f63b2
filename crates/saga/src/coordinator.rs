//! Saga coordinator for the create-order workflow.

use std::future::Future;
use std::time::Duration;

use common::{OrderDetails, OrderId, PaymentInfo, ShippingAddress};
use tokio::time::Instant;

use crate::clients::{OrderClient, PaymentClient, ShippingClient};
use crate::config::SagaConfig;
use crate::create_order::{CreateOrderSagaRequest, SAGA_TYPE, SagaStep};
use crate::error::{CallError, SagaError, UnresolvedCompensation};
use crate::outcome::StepOutcome;
use crate::state::SagaState;

/// Orchestrates create-order sagas across the Order, Payment and Shipping
/// services.
///
/// Steps run strictly in sequence: create order, process payment, arrange
/// shipping, then mark the order completed. When a step fails, that step
/// and every earlier one are compensated in reverse order. Compensation is
/// best-effort: a failing compensating call is logged and reported, and the
/// chain moves on.
pub struct SagaCoordinator<O, P, S>
where
    O: OrderClient,
    P: PaymentClient,
    S: ShippingClient,
{
    order: O,
    payment: P,
    shipping: S,
    config: SagaConfig,
}

impl<O, P, S> SagaCoordinator<O, P, S>
where
    O: OrderClient,
    P: PaymentClient,
    S: ShippingClient,
{
    /// Creates a coordinator with the default timeouts.
    pub fn new(order: O, payment: P, shipping: S) -> Self {
        Self::with_config(order, payment, shipping, SagaConfig::default())
    }

    pub fn with_config(order: O, payment: P, shipping: S, config: SagaConfig) -> Self {
        Self {
            order,
            payment,
            shipping,
            config,
        }
    }

    pub fn config(&self) -> &SagaConfig {
        &self.config
    }

    /// Executes a saga bounded by the configured saga timeout.
    pub async fn execute(&self, request: CreateOrderSagaRequest) -> Result<SagaState, SagaError> {
        let deadline = Instant::now() + self.config.saga_timeout;
        self.execute_create_order_saga(request.order, request.payment, request.shipping, deadline)
            .await
    }

    /// Executes a create-order saga whose forward steps must finish before
    /// `deadline`.
    ///
    /// On success the returned state holds all three record ids. On failure
    /// the error names the failed step and lists any compensation that could
    /// not be applied.
    #[tracing::instrument(
        skip_all,
        fields(saga_type = SAGA_TYPE, user_id = %details.user_id)
    )]
    pub async fn execute_create_order_saga(
        &self,
        details: OrderDetails,
        payment_info: PaymentInfo,
        address: ShippingAddress,
        deadline: Instant,
    ) -> Result<SagaState, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = Instant::now();
        let mut saga = SagaState::start();

        // 1. Create order
        tracing::info!(step = %SagaStep::CreateOrder, "saga step started");
        let outcome = StepOutcome::classify(
            forward(deadline, self.order.create_order(details)).await,
        );
        let order_id = match outcome {
            StepOutcome::Succeeded(response) => response.order_id,
            failed => {
                return Err(self
                    .fail(&mut saga, SagaStep::CreateOrder, &failed, saga_start)
                    .await);
            }
        };
        tracing::info!(%order_id, "order created");
        saga.order_id = Some(order_id.clone());

        // 2. Process payment
        tracing::info!(step = %SagaStep::ProcessPayment, %order_id, "saga step started");
        let outcome = StepOutcome::classify(
            forward(
                deadline,
                self.payment.process_payment(&order_id, payment_info),
            )
            .await,
        );
        let payment_id = match outcome {
            StepOutcome::Succeeded(response) => response.payment_id,
            failed => {
                return Err(self
                    .fail(&mut saga, SagaStep::ProcessPayment, &failed, saga_start)
                    .await);
            }
        };
        tracing::info!(%order_id, %payment_id, "payment processed");
        saga.payment_id = Some(payment_id);

        // 3. Arrange shipping
        tracing::info!(step = %SagaStep::ArrangeShipping, %order_id, "saga step started");
        let outcome = StepOutcome::classify(
            forward(deadline, self.shipping.arrange_shipping(&order_id, address)).await,
        );
        let shipment_id = match outcome {
            StepOutcome::Succeeded(response) => response.shipment_id,
            failed => {
                return Err(self
                    .fail(&mut saga, SagaStep::ArrangeShipping, &failed, saga_start)
                    .await);
            }
        };
        tracing::info!(%order_id, %shipment_id, "shipping arranged");
        saga.shipment_id = Some(shipment_id);

        // 4. Finalize. Its outcome never changes the saga result.
        saga.finalized = self.finalize(&order_id).await;
        saga.complete();

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        metrics::counter!("saga_completed").increment(1);
        tracing::info!(%order_id, duration, finalized = saga.finalized, "saga completed successfully");

        Ok(saga)
    }

    /// Compensates after `step` failed and builds the error for the caller.
    async fn fail<T>(
        &self,
        saga: &mut SagaState,
        step: SagaStep,
        outcome: &StepOutcome<T>,
        saga_start: Instant,
    ) -> SagaError {
        tracing::warn!(
            step = %step,
            kind = outcome.kind(),
            detail = %outcome.failure_detail().unwrap_or_default(),
            "saga step failed"
        );

        let unresolved = self.compensate(saga, step).await;
        saga.fail();

        metrics::histogram!("saga_duration_seconds").record(saga_start.elapsed().as_secs_f64());
        metrics::counter!("saga_failed", "step" => step.as_str()).increment(1);
        tracing::warn!(
            order_id = ?saga.order_id,
            reason = step.failure_reason(),
            unresolved = unresolved.len(),
            "saga failed"
        );

        SagaError::StepFailed { step, unresolved }
    }

    /// Runs the compensation chain of `failed_step`: the failed step itself
    /// first, then every earlier step in reverse order.
    #[tracing::instrument(skip(self, saga), fields(order_id = ?saga.order_id))]
    async fn compensate(
        &self,
        saga: &mut SagaState,
        failed_step: SagaStep,
    ) -> Vec<UnresolvedCompensation> {
        saga.begin_compensation();

        let mut unresolved = Vec::new();
        for step in failed_step.compensation_chain() {
            if let Some(failure) = self.compensate_step(saga, step).await {
                unresolved.push(failure);
            }
        }
        unresolved
    }

    /// Issues one compensating call under its own timeout.
    ///
    /// Returns `None` when the compensation succeeded or was skipped because
    /// the forward step never produced an id.
    async fn compensate_step(
        &self,
        saga: &SagaState,
        step: SagaStep,
    ) -> Option<UnresolvedCompensation> {
        let timeout = self.config.compensation_timeout;

        let (record_id, result) = match step {
            SagaStep::ArrangeShipping => {
                let (Some(order_id), Some(shipment_id)) =
                    (saga.compensable_order_id(), saga.compensable_shipment_id())
                else {
                    return skipped(step);
                };
                let result = bounded(timeout, self.shipping.cancel_shipping(order_id, shipment_id)).await;
                (shipment_id.to_string(), result)
            }
            SagaStep::ProcessPayment => {
                let (Some(order_id), Some(payment_id)) =
                    (saga.compensable_order_id(), saga.compensable_payment_id())
                else {
                    return skipped(step);
                };
                let result = bounded(timeout, self.payment.refund_payment(order_id, payment_id)).await;
                (payment_id.to_string(), result)
            }
            SagaStep::CreateOrder => {
                let Some(order_id) = saga.compensable_order_id() else {
                    return skipped(step);
                };
                let result = bounded(timeout, self.order.cancel_order(order_id)).await;
                (order_id.to_string(), result)
            }
        };

        metrics::counter!("saga_compensations_total", "step" => step.as_str()).increment(1);

        match result {
            Ok(response) if response.success => {
                tracing::info!(
                    step = %step,
                    compensation = step.compensation(),
                    %record_id,
                    message = %response.message,
                    "compensation succeeded"
                );
                None
            }
            Ok(response) => Some(unresolved(step, record_id, response.message)),
            Err(err) => Some(unresolved(step, record_id, err.to_string())),
        }
    }

    /// Marks the order COMPLETED under a fresh timeout. Returns whether it
    /// worked; a failure is only logged.
    async fn finalize(&self, order_id: &OrderId) -> bool {
        let result = bounded(
            self.config.finalize_timeout,
            self.order.complete_order(order_id),
        )
        .await;

        match result {
            Ok(response) if response.success => {
                tracing::info!(%order_id, "order marked as COMPLETED");
                true
            }
            Ok(response) => {
                metrics::counter!("saga_finalize_failures_total").increment(1);
                tracing::warn!(%order_id, message = %response.message, "saga succeeded, but order was not marked COMPLETED");
                false
            }
            Err(err) => {
                metrics::counter!("saga_finalize_failures_total").increment(1);
                tracing::warn!(%order_id, error = %err, "saga succeeded, but failed to mark order as COMPLETED");
                false
            }
        }
    }
}

/// Runs a forward call that must finish before the saga deadline.
async fn forward<T, F>(deadline: Instant, call: F) -> Result<T, CallError>
where
    F: Future<Output = Result<T, CallError>>,
{
    if Instant::now() >= deadline {
        return Err(CallError::DeadlineExceeded);
    }
    tokio::time::timeout_at(deadline, call)
        .await
        .unwrap_or_else(|_| Err(CallError::DeadlineExceeded))
}

/// Runs a call with its own timeout, independent of the saga deadline.
async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, CallError>
where
    F: Future<Output = Result<T, CallError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(CallError::DeadlineExceeded))
}

fn skipped(step: SagaStep) -> Option<UnresolvedCompensation> {
    tracing::info!(
        step = %step,
        compensation = step.compensation(),
        "no id was produced, skipping compensation"
    );
    None
}

fn unresolved(step: SagaStep, record_id: String, reason: String) -> UnresolvedCompensation {
    metrics::counter!("saga_compensation_failures_total", "step" => step.as_str()).increment(1);
    tracing::error!(
        step = %step,
        compensation = step.compensation(),
        %record_id,
        %reason,
        "CRITICAL: compensation failed, manual intervention required"
    );
    UnresolvedCompensation {
        step,
        record_id,
        reason,
    }
}
