//! Station code types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::normalize::{normalize_destinations, normalize_station};

/// Error returned when a station code is unusable after normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A normalized home station code.
///
/// Always uppercase, never empty, never containing whitespace. The code is
/// not checked against any station list here; the rail service is the only
/// authority on whether a station exists.
///
/// # Examples
///
/// ```
/// use board_setup::domain::StationCode;
///
/// let wat = StationCode::parse_normalized(" wat ").unwrap();
/// assert_eq!(wat.as_str(), "WAT");
///
/// assert!(StationCode::parse_normalized("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Parse an already-normalized station code.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        if s.is_empty() {
            return Err(InvalidStationCode {
                reason: "must not be empty",
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidStationCode {
                reason: "must not contain whitespace",
            });
        }
        if s.chars().any(char::is_lowercase) {
            return Err(InvalidStationCode {
                reason: "must be uppercase",
            });
        }
        Ok(Self(s.to_string()))
    }

    /// A code known at compile time to be normalized.
    pub(crate) fn from_static(code: &'static str) -> Self {
        debug_assert!(Self::parse(code).is_ok(), "{code} is not a normalized code");
        Self(code.to_string())
    }

    /// Normalize raw user input, then parse it.
    pub fn parse_normalized(raw: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&normalize_station(raw))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidStationCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered list of destination station codes.
///
/// Stored on disk as the comma-joined string (`"CHK,VIC"`), so an entry
/// with no destinations round-trips as `""` rather than null.
///
/// `Display` renders the bracketed list used in entry titles:
///
/// ```
/// use board_setup::domain::Destinations;
///
/// let dests = Destinations::from_raw(Some("chk, vic"));
/// assert_eq!(dests.to_string(), "['CHK', 'VIC']");
/// assert_eq!(dests.joined(), "CHK,VIC");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Destinations(Vec<String>);

impl Destinations {
    /// No destination filter: the board shows every departure.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Split an already-normalized comma-joined string.
    ///
    /// Empty segments (from `""` or a trailing comma) are dropped.
    pub fn parse(normalized: &str) -> Self {
        Self(
            normalized
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Normalize the optional raw form field, then split it.
    pub fn from_raw(raw: Option<&str>) -> Self {
        Self::parse(&normalize_destinations(raw))
    }

    /// The comma-joined form kept in configuration entries.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<String> for Destinations {
    fn from(s: String) -> Self {
        Self::from_raw(Some(&s))
    }
}

impl From<Destinations> for String {
    fn from(dests: Destinations) -> Self {
        dests.joined()
    }
}

impl fmt::Display for Destinations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{code}'")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_station() {
        assert!(StationCode::parse("WAT").is_ok());
        assert!(StationCode::parse("KGX").is_ok());
        assert_eq!(StationCode::parse("PAD").unwrap().as_str(), "PAD");
    }

    #[test]
    fn reject_empty_station() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse_normalized("  ").is_err());
    }

    #[test]
    fn reject_unnormalized_station() {
        assert!(StationCode::parse("wat").is_err());
        assert!(StationCode::parse(" WAT").is_err());
        assert!(StationCode::parse("W AT").is_err());
    }

    #[test]
    fn parse_normalized_station() {
        let code = StationCode::parse_normalized(" wat ").unwrap();
        assert_eq!(code.as_str(), "WAT");
        assert_eq!(format!("{code}"), "WAT");
        assert_eq!(format!("{code:?}"), "StationCode(WAT)");
    }

    #[test]
    fn destinations_from_empty_string() {
        let dests = Destinations::parse("");
        assert!(dests.is_empty());
        assert_eq!(dests.len(), 0);
        assert_eq!(dests.joined(), "");
    }

    #[test]
    fn destinations_drop_empty_segments() {
        let dests = Destinations::parse("CHK,,VIC,");
        assert_eq!(dests.iter().collect::<Vec<_>>(), vec!["CHK", "VIC"]);
    }

    #[test]
    fn destinations_display_as_list() {
        assert_eq!(Destinations::parse("CHK,VIC").to_string(), "['CHK', 'VIC']");
        assert_eq!(Destinations::parse("CHK").to_string(), "['CHK']");
        assert_eq!(Destinations::none().to_string(), "[]");
    }

    #[test]
    fn destinations_serialize_as_joined_string() {
        let dests = Destinations::parse("CHK,VIC");
        assert_eq!(serde_json::to_string(&dests).unwrap(), "\"CHK,VIC\"");

        let empty: Destinations = serde_json::from_str("\"\"").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn station_deserialize_rejects_lowercase() {
        assert!(serde_json::from_str::<StationCode>("\"wat\"").is_err());
        let code: StationCode = serde_json::from_str("\"WAT\"").unwrap();
        assert_eq!(code.as_str(), "WAT");
    }
}
