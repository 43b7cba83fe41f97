//! Typed error handling for the portal data layer
//!
//! Every failure that can come back from the Remote Data Service falls into one
//! of three categories, and pages treat all three the same way: log, keep the
//! last-good state, never surface a hard failure.
//!
//! # Error Categories
//!
//! - [`PortalError::Transport`]: connection, timeout or IO failure
//! - [`PortalError::Status`]: the service answered with a non-2xx status
//! - [`PortalError::Payload`]: the body did not decode into the expected shape
//!
//! Two local variants cover problems that never reach the network:
//! [`PortalError::Config`] and [`PortalError::Internal`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ev_portal::prelude::*;
//!
//! match service.market_stats().await {
//!     Ok(stats) => println!("BEV share: {:?}", stats.bev_market_share),
//!     Err(PortalError::Status { status: 404, endpoint }) => {
//!         println!("{} is not deployed", endpoint);
//!     }
//!     Err(e) => tracing::warn!(code = e.error_code(), "fetch failed: {}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for the portal data layer
#[derive(Debug, Error)]
pub enum PortalError {
    /// The request never produced a response (DNS, connect, timeout, IO)
    #[error("transport error on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The service answered with a non-success status code
    #[error("{endpoint} returned HTTP {status}")]
    Status { status: u16, endpoint: String },

    /// The response body could not be decoded into the expected shape
    #[error("unexpected payload from {endpoint}: {message}")]
    Payload { endpoint: String, message: String },

    /// Invalid client configuration (base URL, timeout, ...)
    #[error("configuration error: {0}")]
    Config(String),

    /// A fetch task ended without producing a result
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse failure category, matching how the boundary reasons about errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Status,
    Payload,
    Local,
}

impl PortalError {
    /// Build a transport error from a reqwest failure
    pub fn transport(endpoint: impl Into<String>, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        PortalError::Transport {
            endpoint: endpoint.into(),
            message,
        }
    }

    /// Build a payload error from a serde_json failure
    pub fn payload(endpoint: impl Into<String>, err: &serde_json::Error) -> Self {
        PortalError::Payload {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::Transport { .. } => "TRANSPORT_ERROR",
            PortalError::Status { .. } => "STATUS_ERROR",
            PortalError::Payload { .. } => "PAYLOAD_ERROR",
            PortalError::Config(_) => "CONFIG_ERROR",
            PortalError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the failure category
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Transport { .. } => ErrorKind::Transport,
            PortalError::Status { .. } => ErrorKind::Status,
            PortalError::Payload { .. } => ErrorKind::Payload,
            PortalError::Config(_) | PortalError::Internal(_) => ErrorKind::Local,
        }
    }

    /// The endpoint the failure relates to, if it came from a request
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            PortalError::Transport { endpoint, .. }
            | PortalError::Status { endpoint, .. }
            | PortalError::Payload { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = PortalError::Status {
            status: 503,
            endpoint: "/market/stats".to_string(),
        };
        assert_eq!(err.to_string(), "/market/stats returned HTTP 503");
        assert_eq!(err.error_code(), "STATUS_ERROR");
        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.endpoint(), Some("/market/stats"));
    }

    #[test]
    fn test_payload_error_from_serde() {
        let serde_err = serde_json::from_str::<Vec<u32>>("{\"not\": \"a list\"}").unwrap_err();
        let err = PortalError::payload("/vehicles", &serde_err);

        assert_eq!(err.kind(), ErrorKind::Payload);
        assert!(err.to_string().starts_with("unexpected payload from /vehicles"));
    }

    #[test]
    fn test_local_errors_have_no_endpoint() {
        let err = PortalError::Config("bad url".to_string());
        assert_eq!(err.kind(), ErrorKind::Local);
        assert_eq!(err.endpoint(), None);

        let err = PortalError::Internal("task panicked".to_string());
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_value(ErrorKind::Transport).unwrap();
        assert_eq!(json, "transport");
    }
}
