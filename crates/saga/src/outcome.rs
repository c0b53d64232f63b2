//! Classification of forward step results.

use common::{ArrangeShippingResponse, CreateOrderResponse, ProcessPaymentResponse};

use crate::error::CallError;

/// A forward response that may report a domain-level failure.
pub trait StepResponse {
    /// Returns the failure message if the response reports a business failure.
    fn business_failure(&self) -> Option<&str> {
        None
    }
}

impl StepResponse for CreateOrderResponse {}

impl StepResponse for ArrangeShippingResponse {}

impl StepResponse for ProcessPaymentResponse {
    fn business_failure(&self) -> Option<&str> {
        (!self.status.is_success()).then_some(self.message.as_str())
    }
}

/// How a forward step ended.
///
/// Both failure kinds take the same compensation path; only `Succeeded`
/// advances the saga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Succeeded(T),
    /// The call completed but reported an unsuccessful outcome.
    BusinessFailure(String),
    /// The call produced no response.
    TransportFailure(CallError),
}

impl<T: StepResponse> StepOutcome<T> {
    /// Classifies the raw result of a forward call.
    pub fn classify(result: Result<T, CallError>) -> Self {
        match result {
            Ok(response) => match response.business_failure() {
                Some(message) => StepOutcome::BusinessFailure(message.to_string()),
                None => StepOutcome::Succeeded(response),
            },
            Err(err) => StepOutcome::TransportFailure(err),
        }
    }
}

impl<T> StepOutcome<T> {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StepOutcome::Succeeded(_) => "succeeded",
            StepOutcome::BusinessFailure(_) => "business_failure",
            StepOutcome::TransportFailure(_) => "transport_failure",
        }
    }

    /// Describes the failure, or `None` on success.
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            StepOutcome::Succeeded(_) => None,
            StepOutcome::BusinessFailure(message) => Some(message.clone()),
            StepOutcome::TransportFailure(err) => Some(err.to_string()),
        }
    }
}
