//! Conversion from Darwin DTOs to the board returned by rail clients.

use std::collections::HashSet;

use super::types::{ServiceItemDto, StationBoardDto};

/// A departure board as seen by the setup wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Display name of the board station, when the service supplied one.
    pub station_name: Option<String>,

    /// Departures, in the order the service returned them.
    pub departures: Vec<Departure>,
}

/// One departure on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub service_id: String,
    pub scheduled: String,
    pub expected: Option<String>,
    pub platform: Option<String>,
    pub operator: Option<String>,
    pub destination: String,
    pub is_cancelled: bool,
}

impl Board {
    /// The station name, or `None` if it was missing or blank.
    pub fn display_name(&self) -> Option<&str> {
        self.station_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Combine two filtered boards for the same station.
    ///
    /// Departures already present (by service ID) are not repeated.
    pub fn merge(mut self, other: Board) -> Board {
        if self.display_name().is_none() {
            self.station_name = other.station_name;
        }

        let mut seen: HashSet<String> = self
            .departures
            .iter()
            .map(|d| d.service_id.clone())
            .collect();

        for dep in other.departures {
            if seen.insert(dep.service_id.clone()) {
                self.departures.push(dep);
            }
        }

        self
    }
}

/// Convert a Darwin station board.
///
/// Services without an ID or scheduled time can't be shown and are skipped.
pub fn convert_station_board(dto: StationBoardDto) -> Board {
    let departures = dto
        .train_services
        .into_iter()
        .flatten()
        .chain(dto.bus_services.into_iter().flatten())
        .filter_map(convert_service)
        .collect();

    Board {
        station_name: dto.location_name,
        departures,
    }
}

fn convert_service(item: ServiceItemDto) -> Option<Departure> {
    let service_id = item.service_id?;
    let scheduled = item.std?;

    let destination = item
        .destination
        .unwrap_or_default()
        .into_iter()
        .map(|loc| match loc.via {
            Some(via) => format!("{} {}", loc.location_name, via),
            None => loc.location_name,
        })
        .collect::<Vec<_>>()
        .join(" & ");

    let is_cancelled = item.is_cancelled.unwrap_or(false)
        || item.etd.as_deref() == Some("Cancelled");

    Some(Departure {
        service_id,
        scheduled,
        expected: item.etd,
        platform: item.platform,
        operator: item.operator,
        destination,
        is_cancelled,
    })
}
