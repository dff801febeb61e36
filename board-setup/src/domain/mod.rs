//! Domain types for the departure board setup wizard.
//!
//! User input arrives as free-form strings; these types hold it in its
//! normalized form so the flows, the rail client and the stores can trust
//! what they receive.

mod normalize;
mod station;
mod token;

pub use normalize::{normalize_destinations, normalize_station};
pub use station::{Destinations, InvalidStationCode, StationCode};
pub use token::ApiToken;
