//! Wire representation of a failed service call.

use serde::{Deserialize, Serialize};

/// Machine-readable failure category of a service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The targeted record does not exist.
    NotFound,
    /// The request is malformed or targets a record owned by another order.
    InvalidArgument,
    /// A downstream dependency (carrier, gateway) could not serve the request.
    Unavailable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON body returned by a service alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_wire_format() {
        let body = ErrorBody::new(ErrorCode::InvalidArgument, "wrong order");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "invalid_argument");
        assert_eq!(json["message"], "wrong order");
    }
}
