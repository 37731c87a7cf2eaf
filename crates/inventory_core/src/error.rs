use thiserror::Error;

use crate::contract::ErrorBody;

/// Message returned to callers for store failures; the underlying cause is only logged.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Product store unavailable";

/// Failure reported by a [`crate::store::ProductStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Network, throttling or permission failure while talking to the store.
    #[error("{0}")]
    Unavailable(String),
    /// The store answered, but with an item or page this service cannot read.
    #[error("{0}")]
    MalformedPayload(String),
}

/// Request-level failure, rendered at the boundary as a status-coded response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    StoreUnavailable(String),
    #[error("{0}")]
    ProtocolViolation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StoreUnavailable(_) => 503,
            Self::ProtocolViolation(_) => 502,
            Self::NotFound(_) => 404,
            Self::BadRequest(_) => 400,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::ProtocolViolation(_) => "protocol_violation",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Caller-facing body. Store failure detail stays out of it.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            Self::StoreUnavailable(_) => STORE_UNAVAILABLE_MESSAGE.to_string(),
            _ => self.to_string(),
        };
        ErrorBody {
            error: self.code().to_string(),
            message,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(message) => Self::StoreUnavailable(message),
            StoreError::MalformedPayload(message) => Self::ProtocolViolation(message),
        }
    }
}
