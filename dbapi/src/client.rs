//! Client facade for the Deutsche Bahn open data APIs.

use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ConfigError};
use crate::stada::StationDataApi;
use crate::throttle::Throttle;
use crate::transport::{DEFAULT_TIMEOUT_SECS, ReqwestTransport, Transport};

/// Default base URL for the DB API gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.deutschebahn.com";

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "DBAPI_TOKEN";
const BASE_URL_ENV: &str = "DBAPI_BASE_URL";
const TIMEOUT_ENV: &str = "DBAPI_TIMEOUT_SECS";
const STADA_RATE_LIMIT_ENV: &str = "DBAPI_STADA_RATE_LIMIT";

/// Configuration for the StationData sub-API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationDataConfig {
    /// Calls per minute; zero disables client-side rate limiting
    pub rate_limit_per_minute: u32,
}

impl StationDataConfig {
    /// Create a config allowing `rate_limit_per_minute` calls per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            rate_limit_per_minute,
        }
    }
}

/// Configuration shared by all sub-APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub station_data: StationDataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            station_data: StationDataConfig::default(),
        }
    }
}

impl Config {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the StationData sub-API config.
    pub fn with_station_data(mut self, station_data: StationDataConfig) -> Self {
        self.station_data = station_data;
        self
    }

    /// Read overrides from `DBAPI_BASE_URL`, `DBAPI_TIMEOUT_SECS` and
    /// `DBAPI_STADA_RATE_LIMIT`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.is_empty()) {
            config.base_url = url;
        }
        if let Some(value) = lookup(TIMEOUT_ENV) {
            config.timeout_secs = parse_number(TIMEOUT_ENV, value)?;
        }
        if let Some(value) = lookup(STADA_RATE_LIMIT_ENV) {
            config.station_data.rate_limit_per_minute = parse_number(STADA_RATE_LIMIT_ENV, value)?;
        }
        Ok(config)
    }
}

fn parse_number<N: std::str::FromStr>(var: &'static str, value: String) -> Result<N, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

/// Entry point to the implemented APIs.
///
/// Sub-APIs are built on first access and then reused, each with its own
/// throttle.
pub struct Client<T = ReqwestTransport> {
    token: String,
    config: Config,
    transport: T,
    station_data: OnceLock<StationDataApi<T>>,
}

impl Client<ReqwestTransport> {
    /// Create a client talking HTTP through reqwest.
    ///
    /// An empty token is accepted here; every call then fails with
    /// [`ApiError::MissingCredentials`].
    pub fn new(token: impl Into<String>, config: Config) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout_secs)?;
        Ok(Self::with_transport(token, config, transport))
    }

    /// Create a client from `DBAPI_TOKEN` and [`Config::from_env`].
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let config = Config::from_lookup(&lookup)?;
        let token = lookup(TOKEN_ENV).unwrap_or_default();
        if token.is_empty() {
            warn!("{TOKEN_ENV} not set, API calls will fail");
        }
        Self::new(token, config)
    }
}

impl<T: Transport + Clone> Client<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(token: impl Into<String>, config: Config, transport: T) -> Self {
        Self {
            token: token.into(),
            config,
            transport,
            station_data: OnceLock::new(),
        }
    }

    /// The StationData API.
    pub fn station_data(&self) -> &StationDataApi<T> {
        self.station_data.get_or_init(|| {
            let rate = self.config.station_data.rate_limit_per_minute;
            debug!(rate_limit_per_minute = rate, "initializing StationData API");
            StationDataApi::new(Dispatcher::new(
                self.transport.clone(),
                self.config.base_url.clone(),
                self.token.clone(),
                Throttle::per_minute(rate),
            ))
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
