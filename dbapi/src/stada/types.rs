//! StationData API response DTOs.
//!
//! These types map directly to the StaDa v2 JSON responses. The API leaves
//! out fields rather than sending nulls or defaults, so nearly everything is
//! an `Option`, and absent values are left out again when serializing.

use serde::{Deserialize, Serialize};

/// Success wrapper: pagination metadata plus one page of results.
///
/// `result.len()` is not necessarily `total`; use `offset`/`limit` to page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

/// Response of the `/stations` endpoints.
pub type StationsResponse = Envelope<Station>;

/// Response of the `/szentralen` endpoints.
pub type SZentralenResponse = Envelope<SZentrale>;

/// Body of a 404 or 500 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub err_no: i64,
    #[serde(default)]
    pub err_msg: String,
}

/// Body of a 429 response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitErrorResponse {
    pub error: RateLimitErrorDetails,
}

/// Details of the API gateway's own rate limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitErrorDetails {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub description: String,
}

/// Postal address of a station.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
}

/// GeoJSON-style point: `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeographicCoordinates {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinates: Vec<f64>,
}

impl GeographicCoordinates {
    /// Longitude in degrees (first coordinate).
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    /// Latitude in degrees (second coordinate).
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }
}

/// One EVA number of a station. Stations can have several; one is the main one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaNumber {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_main: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_coordinates: Option<GeographicCoordinates>,
}

/// One RIL100 identifier (alphanumeric operating-point code) of a station.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ril100Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ril_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_main: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_steam_permission: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_coordinates: Option<GeographicCoordinates>,
}

/// Office responsible for the station's timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimetableOffice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StationManagement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

/// Opening and closing time, as `HH:MM` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningTimes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_time: Option<String>,
}

/// Weekly opening schedule; `holiday` applies on public holidays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Availability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<OpeningTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday: Option<OpeningTimes>,
}

/// When local service staff are on site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalServiceStaff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

/// Opening times of the DB Information desk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DbInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

/// DB Netz regional division of the station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Regionalbereich {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SZentraleAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
}

/// 3-S-Zentrale: the centre responsible for service, security and
/// cleanliness at a station.
///
/// Unlike the rest of the API this object uses snake_case keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SZentrale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<SZentraleAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_fax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_fax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Public authority ordering the local train services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Aufgabentraeger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Everything the API may return about a station.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<MailingAddress>,
    /// Station category, 1 (largest) to 7
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_category: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub federal_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_parking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_bicycle_parking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_local_public_transport: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_public_facilities: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_locker_system: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_taxi_rank: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_travel_necessities: Option<bool>,
    /// `yes`, `no` or `partial`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_stepless_access: Option<String>,
    /// Free text, e.g. booking instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_mobility_service: Option<String>,
    #[serde(rename = "hasWiFi", skip_serializing_if = "Option::is_none")]
    pub has_wifi: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_travel_center: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_railway_mission: Option<bool>,
    #[serde(rename = "hasDBLounge", skip_serializing_if = "Option::is_none")]
    pub has_db_lounge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_lost_and_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_car_rental: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub eva_numbers: Vec<EvaNumber>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ril100_identifiers: Vec<Ril100Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timetable_office: Option<TimetableOffice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_management: Option<StationManagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_service_staff: Option<LocalServiceStaff>,
    #[serde(rename = "DBinformation", skip_serializing_if = "Option::is_none")]
    pub db_information: Option<DbInformation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regionalbereich: Option<Regionalbereich>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub szentrale: Option<SZentrale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aufgabentraeger: Option<Aufgabentraeger>,
}

impl Station {
    /// The EVA number flagged as main, falling back to the first one.
    pub fn main_eva_number(&self) -> Option<u64> {
        self.eva_numbers
            .iter()
            .find(|e| e.is_main == Some(true))
            .or_else(|| self.eva_numbers.first())
            .and_then(|e| e.number)
    }

    /// The RIL100 identifier flagged as main, falling back to the first one.
    pub fn main_ril100(&self) -> Option<&str> {
        self.ril100_identifiers
            .iter()
            .find(|r| r.is_main == Some(true))
            .or_else(|| self.ril100_identifiers.first())
            .and_then(|r| r.ril_identifier.as_deref())
    }
}
