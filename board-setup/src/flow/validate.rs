//! Validation of setup input against the rail service.
//!
//! Validation makes two requests. The first checks the token alone against
//! a route that always exists, so a bad token is reported as a bad token
//! even when the user's station is also wrong. The second checks the user's
//! station and destinations and supplies the station's display name.

use tracing::{debug, warn};

use crate::darwin::{RailClient, RailClientError};
use crate::domain::{ApiToken, Destinations, StationCode};

use super::error::{ValidationError, error_chain};

/// Station queried when checking a token.
pub const SENTINEL_STATION: &str = "WAT";

/// Destination queried when checking a token.
pub const SENTINEL_DESTINATION: &str = "CHK";

/// What a successful validation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationInfo {
    /// Title for the configuration entry.
    pub title: String,
    /// Display name of the home station.
    pub station_name: String,
}

/// Check that `token` is accepted and that `station`/`destinations` are
/// valid, then build the entry title.
pub async fn validate<R: RailClient>(
    client: &R,
    token: &ApiToken,
    station: &StationCode,
    destinations: &Destinations,
) -> Result<ValidationInfo, ValidationError> {
    check_token(client, token).await?;

    let board = client
        .fetch(token, station, destinations)
        .await
        .map_err(|e| {
            let err = ValidationError::from(e);
            warn!(station = %station, error = %error_chain(&err), "station input rejected");
            err
        })?;

    let station_name = board
        .display_name()
        .unwrap_or_else(|| station.as_str())
        .to_string();

    let title = entry_title(&station_name, destinations);
    debug!(station = %station, %title, "validated station input");

    Ok(ValidationInfo {
        title,
        station_name,
    })
}

/// Title of an entry for a station and its destination filter.
///
/// ```
/// use board_setup::domain::Destinations;
/// use board_setup::flow::entry_title;
///
/// assert_eq!(
///     entry_title("Waterloo", &Destinations::parse("CHK,VIC")),
///     "Train Schedule Waterloo -> ['CHK', 'VIC']"
/// );
/// assert_eq!(
///     entry_title("Waterloo", &Destinations::none()),
///     "Train Schedule Waterloo (All Destinations)"
/// );
/// ```
pub fn entry_title(station_name: &str, destinations: &Destinations) -> String {
    if destinations.is_empty() {
        format!("Train Schedule {station_name} (All Destinations)")
    } else {
        format!("Train Schedule {station_name} -> {destinations}")
    }
}

/// First request: only an invalid token matters here.
async fn check_token<R: RailClient>(client: &R, token: &ApiToken) -> Result<(), ValidationError> {
    let station = StationCode::from_static(SENTINEL_STATION);
    let destinations = Destinations::parse(SENTINEL_DESTINATION);

    match client.fetch(token, &station, &destinations).await {
        Ok(_) => Ok(()),
        // The sentinel route tells us nothing about the user's input.
        Err(RailClientError::InvalidInput { message }) => {
            debug!(%message, "sentinel route rejected, token accepted");
            Ok(())
        }
        Err(e) => {
            let err = ValidationError::from(e);
            warn!(error = %error_chain(&err), "token check failed");
            Err(err)
        }
    }
}

/// Outcome of a best-effort station name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationLookup {
    /// The rail service named the station.
    Resolved(String),
    /// The lookup failed or returned no name; show the raw code.
    Fallback { code: String, reason: String },
}

impl StationLookup {
    /// The name to display either way.
    pub fn display_name(&self) -> &str {
        match self {
            StationLookup::Resolved(name) => name,
            StationLookup::Fallback { code, .. } => code,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, StationLookup::Resolved(_))
    }
}

/// Ask the rail service for a station's display name.
///
/// Never fails: any problem becomes [`StationLookup::Fallback`].
pub async fn lookup_station_name<R: RailClient>(
    client: &R,
    token: &ApiToken,
    station: &StationCode,
) -> StationLookup {
    match client.fetch(token, station, &Destinations::none()).await {
        Ok(board) => match board.display_name() {
            Some(name) => StationLookup::Resolved(name.to_string()),
            None => StationLookup::Fallback {
                code: station.as_str().to_string(),
                reason: "no station name in response".to_string(),
            },
        },
        Err(e) => {
            debug!(station = %station, error = %e, "station name lookup failed");
            StationLookup::Fallback {
                code: station.as_str().to_string(),
                reason: e.to_string(),
            }
        }
    }
}
