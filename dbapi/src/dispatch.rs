//! Authenticated, throttled request dispatch for one sub-API.

use std::fmt;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::classify::classify;
use crate::error::ApiError;
use crate::stada::types::Envelope;
use crate::throttle::Throttle;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Path segment of the StationData v2 API, appended to the base URL.
pub const STADA_API_PATH: &str = "/stada/v2";

/// Issues requests for one sub-API, sharing one token and one throttle.
pub struct Dispatcher<T> {
    transport: T,
    base_url: String,
    token: String,
    throttle: Throttle,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher sending through `transport`.
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        token: impl Into<String>,
        throttle: Throttle,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            token: token.into(),
            throttle,
        }
    }

    /// Full URL for `path` (which must start with `/`) and an optional query.
    pub fn url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            STADA_API_PATH,
            path
        );
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Send one request and return the raw response.
    ///
    /// Credentials are checked before the throttle is touched, so a call that
    /// fails here costs no throttle slot and sends nothing.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let headers = self.headers()?;
        let url = self.url(path, query);

        self.throttle.wait().await;

        debug!(%method, %url, "dispatching request");
        let response = self
            .transport
            .execute(HttpRequest {
                method,
                url,
                headers,
            })
            .await?;
        debug!(status = response.status, bytes = response.body.len(), "received response");

        Ok(response)
    }

    /// `GET` `path` and decode the envelope, turning error statuses into errors.
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<Envelope<R>, ApiError> {
        let response = self.send(Method::GET, path, query).await?;
        classify(response.status, &response.body)?.into_result()
    }

    /// The throttle every call waits on.
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    fn headers(&self) -> Result<HeaderMap, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::stub::StubTransport;
    use super::*;
    use crate::error::TransportError;
    use crate::stada::types::Station;

    const ONE_STATION: &str = r#"{"offset":0,"limit":10,"total":1,"result":[{"number":1,"name":"Aachen Hbf"}]}"#;

    fn dispatcher(stub: &Arc<StubTransport>, token: &str, rate: u32) -> Dispatcher<Arc<StubTransport>> {
        Dispatcher::new(
            Arc::clone(stub),
            "http://localhost:8080",
            token,
            Throttle::per_minute(rate),
        )
    }

    #[test]
    fn url_composition() {
        let stub = Arc::new(StubTransport::default());
        let d = dispatcher(&stub, "t", 0);
        assert_eq!(d.url("/stations/1", None), "http://localhost:8080/stada/v2/stations/1");
        assert_eq!(
            d.url("/stations", Some("limit=5")),
            "http://localhost:8080/stada/v2/stations?limit=5"
        );
        assert_eq!(d.url("/stations", Some("")), "http://localhost:8080/stada/v2/stations");

        let trailing = Dispatcher::new(Arc::clone(&stub), "http://host/", "t", Throttle::Unlimited);
        assert_eq!(trailing.url("/szentralen", None), "http://host/stada/v2/szentralen");
    }

    #[tokio::test]
    async fn sets_auth_and_accept_headers() {
        let stub = Arc::new(StubTransport::always(200, ONE_STATION));
        let d = dispatcher(&stub, "SomeFakeToken", 0);

        d.send(Method::GET, "/stations/1", None).await.unwrap();

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://localhost:8080/stada/v2/stations/1");
        assert_eq!(request.headers[ACCEPT], "application/json");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer SomeFakeToken");
        assert!(request.headers[AUTHORIZATION].is_sensitive());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_token_sends_nothing_and_keeps_throttle_slot() {
        let stub = Arc::new(StubTransport::always(200, ONE_STATION));
        let d = dispatcher(&stub, "", 1);

        let err = d.send(Method::GET, "/stations/1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingCredentials));
        assert_eq!(stub.call_count(), 0);

        // The free first release is still available.
        let start = Instant::now();
        d.throttle().wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn token_with_newline_is_rejected() {
        let stub = Arc::new(StubTransport::always(200, ONE_STATION));
        let d = dispatcher(&stub, "bad\ntoken", 0);

        let err = d.send(Method::GET, "/stations/1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through() {
        let stub = Arc::new(StubTransport::sequence(vec![Err(TransportError::Other(
            "connection refused".into(),
        ))]));
        let d = dispatcher(&stub, "t", 0);

        let err = d.get::<Station>("/stations/1", None).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::Other(ref m)) if m == "connection refused"
        ));
    }

    #[tokio::test]
    async fn get_decodes_success() {
        let stub = Arc::new(StubTransport::always(200, ONE_STATION));
        let d = dispatcher(&stub, "t", 0);

        let envelope = d.get::<Station>("/stations/1", None).await.unwrap();
        assert_eq!(envelope.total, 1);
        assert_eq!(envelope.result[0].name.as_deref(), Some("Aachen Hbf"));
    }

    #[tokio::test]
    async fn get_surfaces_api_errors() {
        let stub = Arc::new(StubTransport::sequence(vec![
            Ok(HttpResponse::new(404, r#"{"errNo":404,"errMsg":"Not Found"}"#)),
            Ok(HttpResponse::new(429, r#"{"error":{"code":900802,"message":"Message throttled out","description":"quota"}}"#)),
            Ok(HttpResponse::new(502, "Bad Gateway")),
        ]));
        let d = dispatcher(&stub, "t", 0);

        let err = d.get::<Station>("/stations/9999999", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Domain { status: 404, err_no: 404, .. }));

        let err = d.get::<Station>("/stations/1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { code: 900802, .. }));

        let err = d.get::<Station>("/stations/1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::UnrecognizedStatus { status: 502, ref body } if body == b"Bad Gateway"));
    }

    #[tokio::test(start_paused = true)]
    async fn one_throttle_slot_per_dispatch() {
        let stub = Arc::new(StubTransport::always(200, ONE_STATION));
        let d = dispatcher(&stub, "t", 60);

        let start = Instant::now();
        for _ in 0..3 {
            d.send(Method::GET, "/stations/1", None).await.unwrap();
        }
        // Free first call plus two one-second gaps
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
        assert_eq!(stub.call_count(), 3);
    }

    #[test]
    fn debug_redacts_token() {
        let stub = Arc::new(StubTransport::default());
        let d = dispatcher(&stub, "SuperSecret", 0);
        let debug = format!("{d:?}");
        assert!(!debug.contains("SuperSecret"));
        assert!(debug.contains("<redacted>"));
    }
}
