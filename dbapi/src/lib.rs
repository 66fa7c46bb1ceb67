//! Client for the Deutsche Bahn open data APIs.
//!
//! Currently implements the StationData (StaDa v2) API: stations and
//! 3-S-Zentralen by id, and stations by filter. Requests carry a bearer
//! token and can be throttled client-side to stay within the API tier's
//! calls-per-minute quota.
//!
//! ```no_run
//! use dbapi::{Client, Config, StationDataConfig, StationFilter};
//!
//! # async fn example() -> Result<(), dbapi::ApiError> {
//! let config = Config::default().with_station_data(StationDataConfig::new(20));
//! let client = Client::new("my-token", config)?;
//!
//! let aachen = client.station_data().station_by_id(1).await?;
//! let berlin = client
//!     .station_data()
//!     .station_by_filter(&StationFilter::new().with_search("Berlin*"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod query;
pub mod stada;
pub mod throttle;
pub mod transport;

pub use classify::{Classified, classify};
pub use client::{Client, Config, StationDataConfig};
pub use error::{ApiError, ConfigError, TransportError};
pub use query::StationFilter;
pub use stada::StationDataApi;
pub use stada::types::{Envelope, SZentrale, SZentralenResponse, Station, StationsResponse};
pub use throttle::Throttle;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
