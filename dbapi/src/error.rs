//! Error types for the StationData client.

use std::borrow::Cow;

/// Errors raised by the underlying HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// reqwest failed (connection refused, timeout, DNS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure, e.g. from an injected transport
    #[error("transport failure: {0}")]
    Other(String),
}

/// Errors that can occur when querying the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No API token configured; nothing was sent
    #[error("no API token given")]
    MissingCredentials,

    /// The token contains characters that cannot appear in a header
    #[error("invalid API token format")]
    InvalidToken,

    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API reported a not-found or internal error (404 / 500)
    #[error("API error {err_no} (status {status}): {err_msg}")]
    Domain {
        status: u16,
        err_no: i64,
        err_msg: String,
    },

    /// The API rejected the call because its own quota was exceeded (429)
    #[error("rate limited {code}: {message} - {description}")]
    RateLimited {
        code: i64,
        message: String,
        description: String,
    },

    /// The body did not match the shape expected for its status code
    #[error("JSON parse error (status {status}): {message}")]
    Decode {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// A status code outside 200, 404, 429 and 500
    #[error("unexpected status {status}: {}", String::from_utf8_lossy(.body))]
    UnrecognizedStatus { status: u16, body: Vec<u8> },

    /// Client configuration could not be loaded
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Whether the server throttled us.
    ///
    /// The client's own throttle only delays calls and never shows up here.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// HTTP status of the response that caused this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Domain { status, .. }
            | ApiError::Decode { status, .. }
            | ApiError::UnrecognizedStatus { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::MissingCredentials
            | ApiError::InvalidToken
            | ApiError::Transport(_)
            | ApiError::Config(_) => None,
        }
    }

    /// Body of an unrecognized-status response as text, with invalid UTF-8
    /// replaced.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ApiError::UnrecognizedStatus { body, .. } => Some(String::from_utf8_lossy(body)),
            _ => None,
        }
    }
}

/// Errors from loading configuration out of the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::Domain {
            status: 404,
            err_no: 404,
            err_msg: "Station not found".into(),
        };
        assert_eq!(err.to_string(), "API error 404 (status 404): Station not found");

        let err = ApiError::RateLimited {
            code: 900802,
            message: "Message throttled out".into(),
            description: "You have exceeded your quota".into(),
        };
        assert_eq!(
            err.to_string(),
            "rate limited 900802: Message throttled out - You have exceeded your quota"
        );

        let err = ApiError::UnrecognizedStatus {
            status: 502,
            body: b"Bad \xffGateway".to_vec(),
        };
        assert_eq!(err.to_string(), "unexpected status 502: Bad \u{fffd}Gateway");

        let err = ApiError::Transport(TransportError::Other("connection refused".into()));
        assert_eq!(err.to_string(), "transport failure: connection refused");
    }

    #[test]
    fn status_of_each_variant() {
        assert_eq!(ApiError::MissingCredentials.status(), None);
        assert_eq!(
            ApiError::UnrecognizedStatus {
                status: 777,
                body: Vec::new()
            }
            .status(),
            Some(777)
        );
        let limited = ApiError::RateLimited {
            code: 1,
            message: String::new(),
            description: String::new(),
        };
        assert_eq!(limited.status(), Some(429));
        assert!(limited.is_rate_limited());
        assert!(!ApiError::InvalidToken.is_rate_limited());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidNumber {
            var: "DBAPI_STADA_RATE_LIMIT",
            value: "fast".into(),
        };
        assert_eq!(
            err.to_string(),
            "DBAPI_STADA_RATE_LIMIT must be a non-negative integer, got \"fast\""
        );
    }
}
