//! Mock rail client for running the wizard without API access.
//!
//! Knows a handful of stations and which tokens it accepts, and answers
//! the way Darwin would: unknown tokens are unauthorized, unknown station
//! codes are invalid input.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{ApiToken, Destinations, StationCode};

use super::convert::Board;
use super::error::RailClientError;
use super::rail::RailClient;

/// Stations served by [`MockRailClient::sample`].
const SAMPLE_STATIONS: &[(&str, &str)] = &[
    ("WAT", "London Waterloo"),
    ("CHK", "Chiswick"),
    ("VIC", "London Victoria"),
    ("CLJ", "Clapham Junction"),
    ("PAD", "London Paddington"),
    ("RDG", "Reading"),
    ("KGX", "London Kings Cross"),
];

/// Which tokens the mock treats as valid.
#[derive(Debug, Clone)]
enum TokenPolicy {
    AnyNonEmpty,
    Only(HashSet<String>),
}

/// In-memory rail client.
#[derive(Debug, Clone)]
pub struct MockRailClient {
    /// Station names, keyed by code.
    stations: Arc<RwLock<HashMap<String, String>>>,
    tokens: TokenPolicy,
}

impl MockRailClient {
    /// A client with no stations that accepts any non-empty token.
    pub fn new() -> Self {
        Self {
            stations: Arc::new(RwLock::new(HashMap::new())),
            tokens: TokenPolicy::AnyNonEmpty,
        }
    }

    /// A client preloaded with a few London-area stations.
    pub fn sample() -> Self {
        let stations = SAMPLE_STATIONS
            .iter()
            .map(|(code, name)| ((*code).to_string(), (*name).to_string()))
            .collect();

        Self {
            stations: Arc::new(RwLock::new(stations)),
            tokens: TokenPolicy::AnyNonEmpty,
        }
    }

    /// Accept only the given tokens.
    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = TokenPolicy::Only(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Add or rename a station.
    pub async fn add_station(&self, code: &str, name: &str) {
        let mut stations = self.stations.write().await;
        stations.insert(code.to_string(), name.to_string());
    }

    /// List known station codes.
    pub async fn available_stations(&self) -> Vec<String> {
        let stations = self.stations.read().await;
        let mut codes: Vec<String> = stations.keys().cloned().collect();
        codes.sort();
        codes
    }

    fn accepts(&self, token: &ApiToken) -> bool {
        match &self.tokens {
            TokenPolicy::AnyNonEmpty => !token.expose().is_empty(),
            TokenPolicy::Only(allowed) => allowed.contains(token.expose()),
        }
    }
}

impl Default for MockRailClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RailClient for MockRailClient {
    async fn fetch(
        &self,
        token: &ApiToken,
        station: &StationCode,
        destinations: &Destinations,
    ) -> Result<Board, RailClientError> {
        if !self.accepts(token) {
            return Err(RailClientError::InvalidToken);
        }

        let stations = self.stations.read().await;

        let name = stations
            .get(station.as_str())
            .ok_or_else(|| RailClientError::InvalidInput {
                message: format!("unknown station {}", station.as_str()),
            })?;

        if let Some(unknown) = destinations.iter().find(|d| !stations.contains_key(*d)) {
            return Err(RailClientError::InvalidInput {
                message: format!("unknown destination {unknown}"),
            });
        }

        Ok(Board {
            station_name: Some(name.clone()),
            departures: Vec::new(),
        })
    }
}
