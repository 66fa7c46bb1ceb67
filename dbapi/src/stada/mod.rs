//! StationData (StaDa v2) sub-API.
//!
//! Stations and 3-S-Zentralen can be queried by id, and stations by filter.
//! Every method goes through the sub-API's dispatcher, so they all share
//! one token and one throttle.

pub mod types;

use crate::dispatch::Dispatcher;
use crate::error::ApiError;
use crate::query::StationFilter;
use crate::transport::{ReqwestTransport, Transport};

use types::{SZentralenResponse, StationsResponse};

/// Queries against the StationData API.
#[derive(Debug)]
pub struct StationDataApi<T = ReqwestTransport> {
    dispatcher: Dispatcher<T>,
}

impl<T: Transport> StationDataApi<T> {
    /// Wrap a dispatcher for the StationData API.
    pub fn new(dispatcher: Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Station with the given number.
    ///
    /// An unknown number is an [`ApiError::Domain`] with status 404.
    pub async fn station_by_id(&self, id: u32) -> Result<StationsResponse, ApiError> {
        self.dispatcher.get(&format!("/stations/{id}"), None).await
    }

    /// Stations matching `filter`.
    ///
    /// An empty filter returns all stations, like [`station_all`](Self::station_all).
    pub async fn station_by_filter(
        &self,
        filter: &StationFilter,
    ) -> Result<StationsResponse, ApiError> {
        let query = filter.to_query_string();
        self.dispatcher.get("/stations", Some(&query)).await
    }

    /// All stations (the API returns at most 10,000).
    pub async fn station_all(&self) -> Result<StationsResponse, ApiError> {
        self.station_by_filter(&StationFilter::default()).await
    }

    /// 3-S-Zentrale with the given number.
    pub async fn szentrale_by_id(&self, id: u32) -> Result<SZentralenResponse, ApiError> {
        self.dispatcher.get(&format!("/szentralen/{id}"), None).await
    }

    /// All 3-S-Zentralen.
    pub async fn szentralen_all(&self) -> Result<SZentralenResponse, ApiError> {
        self.dispatcher.get("/szentralen", None).await
    }

    /// The dispatcher shared by every call.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }
}
