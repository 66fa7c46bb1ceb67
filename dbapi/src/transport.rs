//! HTTP transport abstraction.
//!
//! The dispatcher only needs "send this request, give me a status and a
//! body". Putting that behind a trait lets tests swap the network for a stub.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::error::TransportError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A fully composed request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

/// Status code and the complete response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response with `status` and `body`.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Something that can execute an HTTP request.
pub trait Transport {
    /// Execute `request` and read the whole body.
    ///
    /// Fails only if no complete response was received.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).execute(request)
    }
}

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Consumes the response; the connection goes back to the pool either way.
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation() {
        assert!(ReqwestTransport::new(DEFAULT_TIMEOUT_SECS).is_ok());
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is (almost certainly) closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(5).unwrap();
        let result = transport
            .execute(HttpRequest {
                method: Method::GET,
                url: format!("http://{addr}/stada/v2/stations/1"),
                headers: HeaderMap::new(),
            })
            .await;

        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
