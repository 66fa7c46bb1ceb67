//! Response classification by status code.
//!
//! The API answers with one of three JSON shapes depending on the status:
//!
//! | status   | shape                                          |
//! |----------|------------------------------------------------|
//! | 200      | `{offset, total, limit, result: [...]}`        |
//! | 404, 500 | `{errNo, errMsg}`                              |
//! | 429      | `{error: {code, message, description}}`        |
//!
//! Anything else is kept as raw text. A body that does not match the shape
//! for its status is a decode error; nothing is filled in with defaults.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::stada::types::{Envelope, ErrorResponse, RateLimitErrorDetails, RateLimitErrorResponse};

/// Longest body excerpt kept in a decode error.
const BODY_EXCERPT_CHARS: usize = 500;

/// A response sorted by what its status code says it contains.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<T> {
    /// 200 with a decoded envelope
    Success(Envelope<T>),
    /// 404 or 500 with the API's error payload
    Domain { status: u16, error: ErrorResponse },
    /// 429 from the API gateway
    RateLimited(RateLimitErrorDetails),
    /// Any other status; the body bytes are kept verbatim
    Unrecognized { status: u16, body: Vec<u8> },
}

impl<T> Classified<T> {
    /// Turn every non-success outcome into its error.
    pub fn into_result(self) -> Result<Envelope<T>, ApiError> {
        match self {
            Classified::Success(envelope) => Ok(envelope),
            Classified::Domain { status, error } => Err(ApiError::Domain {
                status,
                err_no: error.err_no,
                err_msg: error.err_msg,
            }),
            Classified::RateLimited(details) => Err(ApiError::RateLimited {
                code: details.code,
                message: details.message,
                description: details.description,
            }),
            Classified::Unrecognized { status, body } => {
                Err(ApiError::UnrecognizedStatus { status, body })
            }
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            Classified::Success(_) => "success",
            Classified::Domain { .. } => "domain error",
            Classified::RateLimited(_) => "rate limited",
            Classified::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Decode `body` into the shape that `status` calls for.
pub fn classify<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Classified<T>, ApiError> {
    let classified = match status {
        200 => Classified::Success(decode(status, body)?),
        404 | 500 => Classified::Domain {
            status,
            error: decode(status, body)?,
        },
        429 => {
            let response: RateLimitErrorResponse = decode(status, body)?;
            Classified::RateLimited(response.error)
        }
        _ => Classified::Unrecognized {
            status,
            body: body.to_vec(),
        },
    };

    debug!(status, outcome = classified.outcome(), "classified response");
    Ok(classified)
}

fn decode<D: DeserializeOwned>(status: u16, body: &[u8]) -> Result<D, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
        body: Some(String::from_utf8_lossy(body).chars().take(BODY_EXCERPT_CHARS).collect()),
    })
}
