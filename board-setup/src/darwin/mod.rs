//! Darwin LDB (Live Departure Boards) client.
//!
//! The setup wizard only needs two things from Darwin: whether a token is
//! accepted, and whether a station/destination combination is. Both are
//! answered by asking for a departure board and classifying the failure.
//!
//! - 401/403 means the token is bad
//! - 400/404, or a 500 complaining about a CRS, means the input is bad
//! - anything else is an unclassified failure

mod client;
mod convert;
mod error;
mod mock;
mod rail;
mod types;

pub use client::{DEFAULT_BASE_URL, DarwinClient, DarwinConfig};
pub use convert::{Board, Departure};
pub use error::RailClientError;
pub use mock::MockRailClient;
pub use rail::{RailBackend, RailClient};
pub use types::{ServiceItemDto, ServiceLocationDto, StationBoardDto};
