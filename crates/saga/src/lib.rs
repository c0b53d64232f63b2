//! Create-order saga orchestration.
//!
//! A create-order saga spans three independent services, each owning its
//! own records:
//!
//! 1. Create order (Order service)
//! 2. Process payment (Payment service)
//! 3. Arrange shipping (Shipping service)
//!
//! When every step succeeds, the order is marked COMPLETED. If any step
//! fails, the failed step and all earlier steps are compensated in reverse
//! order (cancel shipping, refund payment, cancel order).
//!
//! The [`SagaCoordinator`] talks to the services through the
//! [`OrderClient`], [`PaymentClient`] and [`ShippingClient`] traits. The
//! record stores from the `domain` crate implement them directly for
//! in-process use; the `Http*` clients reach the service binaries.

pub mod clients;
pub mod config;
pub mod coordinator;
pub mod create_order;
pub mod error;
pub mod outcome;
pub mod state;

pub use clients::{
    HttpOrderClient, HttpPaymentClient, HttpShippingClient, OrderClient, PaymentClient,
    ShippingClient,
};
pub use config::SagaConfig;
pub use coordinator::SagaCoordinator;
pub use create_order::{CreateOrderSagaRequest, SAGA_TYPE, SagaStep};
pub use error::{CallError, SagaError, UnresolvedCompensation};
pub use outcome::{StepOutcome, StepResponse};
pub use state::{SagaState, SagaStatus};
