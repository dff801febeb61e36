//! Darwin LDB HTTP client.
//!
//! Queries the Darwin Live Departure Boards API on the Rail Data
//! Marketplace. Unlike a long-running board client, the token is supplied
//! per request: the setup wizard checks whatever token the user typed.

use reqwest::header::HeaderValue;
use tracing::debug;

use crate::domain::{ApiToken, Destinations, StationCode};

use super::convert::{Board, convert_station_board};
use super::error::RailClientError;
use super::rail::RailClient;
use super::types::StationBoardDto;

/// Default base URL for Darwin LDB API.
pub const DEFAULT_BASE_URL: &str =
    "https://api1.raildata.org.uk/1010-live-departure-board-dep-with-details/LDBWS";

/// Default number of services requested per board.
const DEFAULT_NUM_ROWS: u8 = 10;

/// Configuration for the Darwin client.
#[derive(Debug, Clone)]
pub struct DarwinConfig {
    /// Base URL for the API (defaults to production Darwin)
    pub base_url: String,
    /// Number of services to request per board (max 150)
    pub num_rows: u8,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DarwinConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the number of rows requested per board.
    pub fn with_num_rows(mut self, n: u8) -> Self {
        self.num_rows = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DarwinConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            num_rows: DEFAULT_NUM_ROWS,
            timeout_secs: 30,
        }
    }
}

/// Darwin LDB API client.
#[derive(Debug, Clone)]
pub struct DarwinClient {
    http: reqwest::Client,
    base_url: String,
    num_rows: u8,
}

impl DarwinClient {
    /// Create a new Darwin client with the given configuration.
    pub fn new(config: DarwinConfig) -> Result<Self, RailClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            num_rows: config.num_rows,
        })
    }

    /// Get one departure board, optionally filtered to services calling at
    /// `filter_crs`.
    async fn get_board(
        &self,
        token: &ApiToken,
        crs: &StationCode,
        filter_crs: Option<&str>,
    ) -> Result<Board, RailClientError> {
        // A token that can't be sent as a header can't be a valid token.
        let api_key =
            HeaderValue::from_str(token.expose()).map_err(|_| RailClientError::InvalidToken)?;

        let url = format!(
            "{}/api/20220120/GetDepBoardWithDetails/{}",
            self.base_url,
            crs.as_str()
        );

        let mut query = vec![("numRows", self.num_rows.to_string())];
        if let Some(filter) = filter_crs {
            query.push(("filterCrs", filter.to_string()));
            query.push(("filterType", "to".to_string()));
        }

        debug!(station = %crs, filter = ?filter_crs, "requesting departure board");

        let response = self
            .http
            .get(&url)
            .header("x-apikey", api_key)
            .query(&query)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RailClientError::InvalidToken);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), body));
        }

        let body = response.text().await?;

        let board: StationBoardDto =
            serde_json::from_str(&body).map_err(|e| RailClientError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(convert_station_board(board))
    }
}

impl RailClient for DarwinClient {
    async fn fetch(
        &self,
        token: &ApiToken,
        station: &StationCode,
        destinations: &Destinations,
    ) -> Result<Board, RailClientError> {
        if destinations.is_empty() {
            return self.get_board(token, station, None).await;
        }

        // Darwin filters on a single CRS, so ask once per destination.
        let mut merged: Option<Board> = None;
        for dest in destinations.iter() {
            let board = self.get_board(token, station, Some(dest)).await?;
            merged = Some(match merged {
                Some(acc) => acc.merge(board),
                None => board,
            });
        }

        Ok(merged.unwrap_or_default())
    }
}

/// Map a non-success, non-auth status onto a client error.
///
/// Darwin reports unknown CRS codes either as a client error or as a 500
/// whose body names the bad code.
fn classify_failure(status: u16, body: String) -> RailClientError {
    let mentions_crs = body.to_ascii_lowercase().contains("crs");

    match status {
        400 | 404 => RailClientError::InvalidInput { message: body },
        500 if mentions_crs => RailClientError::InvalidInput { message: body },
        _ => RailClientError::Api {
            status,
            message: body,
        },
    }
}
