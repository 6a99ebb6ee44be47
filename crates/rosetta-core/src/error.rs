use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by every layer of the Rosetta test client.
///
/// The taxonomy is deliberately small: a request that was malformed or
/// rejected by the remote service (HTTP 4xx, or a local invariant violation
/// such as a fee exceeding the input total) is [`Error::Validation`]; a
/// transport failure or HTTP 5xx is [`Error::Network`]. A transaction that
/// never appears on-chain before the polling deadline is reported as
/// [`Error::ConfirmationTimeout`], which reflects chain latency rather than
/// a malformed request and is therefore its own variant.
#[derive(Error, Debug)]
pub enum Error {
    /// Request malformed or rejected (HTTP 4xx, or a local invariant violation)
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable diagnostic
        message: String,
        /// Parsed server error body, when the response carried one
        details: Option<Value>,
    },

    /// Transport failure or server error (HTTP 5xx, timeouts, refused connections)
    #[error("network error: {0}")]
    Network(String),

    /// Submitted transaction did not appear in a block before the deadline
    #[error("transaction {hash} not confirmed within {waited_secs}s")]
    ConfirmationTimeout {
        /// Hash of the submitted transaction
        hash: String,
        /// Total seconds spent polling
        waited_secs: u64,
    },
}

impl Error {
    /// Builds a validation error with no server body attached
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Builds a network error
    pub fn network(message: impl Into<String>) -> Self {
        Error::Network(message.into())
    }

    /// Returns true for validation errors
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true for network errors
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// The parsed server error body, if one was attached
    pub fn details(&self) -> Option<&Value> {
        match self {
            Error::Validation { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

/// Convenient Result type using the shared error taxonomy
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::validation("fee is greater than the total input");
        assert!(err.to_string().contains("fee is greater"));
        assert!(err.is_validation());
        assert!(!err.is_network());
    }

    #[test]
    fn test_details_attached() {
        let err = Error::Validation {
            message: "rejected".into(),
            details: Some(serde_json::json!({"code": 4005})),
        };
        assert_eq!(err.details().unwrap()["code"], 4005);
    }

    #[test]
    fn test_timeout_is_neither_kind() {
        let err = Error::ConfirmationTimeout {
            hash: "abc".into(),
            waited_secs: 180,
        };
        assert!(!err.is_validation());
        assert!(!err.is_network());
        assert!(err.to_string().contains("180"));
    }
}
