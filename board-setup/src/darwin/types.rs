//! Darwin API response DTOs.
//!
//! Only the parts of `GetDepBoardWithDetails` the setup wizard looks at.
//! Darwin omits fields rather than sending nulls, so almost everything is
//! optional.

use serde::Deserialize;

/// Response from `GetDepBoardWithDetails`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoardDto {
    /// When this response was generated (ISO 8601 datetime).
    pub generated_at: Option<String>,

    /// Human-readable name of the station.
    pub location_name: Option<String>,

    /// CRS code of the station.
    pub crs: Option<String>,

    /// Train services at this station.
    pub train_services: Option<Vec<ServiceItemDto>>,

    /// Bus replacement services.
    pub bus_services: Option<Vec<ServiceItemDto>>,
}

/// A service on the departure board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItemDto {
    /// Ephemeral Darwin service ID.
    #[serde(rename = "serviceID")]
    pub service_id: Option<String>,

    /// Scheduled time of departure, "HH:MM".
    pub std: Option<String>,

    /// Estimated time of departure: "On time", "Delayed", "Cancelled" or "HH:MM".
    pub etd: Option<String>,

    pub platform: Option<String>,

    /// Train operating company name.
    pub operator: Option<String>,

    pub is_cancelled: Option<bool>,

    /// Destination station(s).
    pub destination: Option<Vec<ServiceLocationDto>>,
}

/// Origin or destination of a service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocationDto {
    pub location_name: String,
    pub crs: Option<String>,
    pub via: Option<String>,
}
