//! The rail client seam used by the setup flows.

use std::future::Future;

use crate::domain::{ApiToken, Destinations, StationCode};

use super::client::DarwinClient;
use super::convert::Board;
use super::error::RailClientError;
use super::mock::MockRailClient;

/// Trait for fetching a departure board on behalf of a user.
///
/// This abstraction allows the flows to be tested without network access.
pub trait RailClient: Send + Sync {
    /// Fetch the board for `station` using `token`.
    ///
    /// An empty `destinations` list means "all departures"; otherwise only
    /// services calling at one of the destinations are returned.
    fn fetch(
        &self,
        token: &ApiToken,
        station: &StationCode,
        destinations: &Destinations,
    ) -> impl Future<Output = Result<Board, RailClientError>> + Send;
}

/// The rail client chosen at start-up.
#[derive(Debug, Clone)]
pub enum RailBackend {
    Darwin(DarwinClient),
    Mock(MockRailClient),
}

impl RailClient for RailBackend {
    async fn fetch(
        &self,
        token: &ApiToken,
        station: &StationCode,
        destinations: &Destinations,
    ) -> Result<Board, RailClientError> {
        match self {
            RailBackend::Darwin(client) => client.fetch(token, station, destinations).await,
            RailBackend::Mock(client) => client.fetch(token, station, destinations).await,
        }
    }
}
