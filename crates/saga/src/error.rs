//! Saga error types.

use common::ErrorCode;
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

use crate::create_order::SagaStep;

/// Why a call to a domain service produced no response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The service could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not finish before its deadline.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The service answered with an error status.
    #[error("{code}: {message}")]
    Status { code: ErrorCode, message: String },

    /// The service answered with a body that could not be understood.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl CallError {
    /// Returns the service error code, if the service answered at all.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CallError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<DomainError> for CallError {
    fn from(err: DomainError) -> Self {
        CallError::Status {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// A compensating action that itself failed.
///
/// Each one leaves the named record in a state inconsistent with the saga
/// outcome and needs manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedCompensation {
    /// The forward step whose effect could not be undone.
    pub step: SagaStep,
    pub record_id: String,
    pub reason: String,
}

/// Errors returned by a saga execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SagaError {
    /// A forward step failed and compensation ran.
    #[error("{}", .step.failure_reason())]
    StepFailed {
        step: SagaStep,
        unresolved: Vec<UnresolvedCompensation>,
    },
}

impl SagaError {
    /// The step that failed.
    pub fn step(&self) -> SagaStep {
        match self {
            SagaError::StepFailed { step, .. } => *step,
        }
    }

    /// Compensations that failed while unwinding.
    pub fn unresolved(&self) -> &[UnresolvedCompensation] {
        match self {
            SagaError::StepFailed { unresolved, .. } => unresolved,
        }
    }

    /// Returns true if every completed step was undone.
    pub fn is_fully_compensated(&self) -> bool {
        self.unresolved().is_empty()
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
