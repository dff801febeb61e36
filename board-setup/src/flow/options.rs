//! The options editor: the `init` step.
//!
//! Changes the station and destinations of an existing entry. The token is
//! never asked for again; the stored token is used when there is one,
//! otherwise the entry's own.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::darwin::RailClient;
use crate::domain::{ApiToken, Destinations, StationCode};
use crate::store::{ConfigEntries, ConfigEntry, EntryData, EntryId, TokenStore};

use super::error::{ErrorTag, FlowError, ValidationError, error_chain};
use super::form::{Form, STATION_NAME, init_form};
use super::validate::{StationLookup, lookup_station_name, validate};

/// Raw input submitted on the `init` step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsInput {
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub destinations: Option<String>,
}

/// Where the options editor is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsState {
    AwaitingInput { error: Option<ErrorTag> },
    Validating,
    /// Terminal: the entry was updated and a reload requested.
    Updated(EntryId),
}

impl OptionsState {
    pub fn is_finished(&self) -> bool {
        matches!(self, OptionsState::Updated(_))
    }
}

/// What the host should do after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsStep {
    ShowForm(Form),
    Updated(ConfigEntry),
}

/// Transition out of `Validating`.
pub(crate) fn next_options_state(outcome: &Result<ConfigEntry, ErrorTag>) -> OptionsState {
    match outcome {
        Ok(entry) => OptionsState::Updated(entry.entry_id),
        Err(tag) => OptionsState::AwaitingInput { error: Some(*tag) },
    }
}

/// One run of the options editor for an entry.
pub struct OptionsFlow<'a, R, T, E> {
    client: &'a R,
    tokens: &'a T,
    entries: &'a E,
    entry: ConfigEntry,
    state: OptionsState,
}

impl<'a, R, T, E> OptionsFlow<'a, R, T, E>
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    pub fn new(client: &'a R, tokens: &'a T, entries: &'a E, entry: ConfigEntry) -> Self {
        Self {
            client,
            tokens,
            entries,
            entry,
            state: OptionsState::AwaitingInput { error: None },
        }
    }

    pub fn state(&self) -> &OptionsState {
        &self.state
    }

    /// The entry as last seen by this flow.
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    /// Handle the `init` step: show the form when there is no input,
    /// otherwise process the submission.
    pub async fn step_init(
        &mut self,
        input: Option<OptionsInput>,
    ) -> Result<OptionsStep, FlowError> {
        match input {
            None if self.state.is_finished() => Err(FlowError::AlreadyFinished),
            None => Ok(OptionsStep::ShowForm(self.show_form().await)),
            Some(input) => self.submit(input).await,
        }
    }

    /// The form for the current state, with the station's display name.
    pub async fn show_form(&self) -> Form {
        let lookup = self.station_lookup().await;
        let error = match &self.state {
            OptionsState::AwaitingInput { error } => *error,
            _ => None,
        };

        init_form(&self.entry.data)
            .with_error(error)
            .with_placeholder(STATION_NAME, lookup.display_name())
    }

    /// Best-effort display name of the entry's station.
    pub async fn station_lookup(&self) -> StationLookup {
        let station = &self.entry.data.station;
        match self.resolve_token().await {
            Some(token) => lookup_station_name(self.client, &token, station).await,
            None => StationLookup::Fallback {
                code: station.as_str().to_string(),
                reason: "no token available".to_string(),
            },
        }
    }

    /// Validate a submission, update the entry and request a reload.
    pub async fn submit(&mut self, input: OptionsInput) -> Result<OptionsStep, FlowError> {
        if self.state.is_finished() {
            return Err(FlowError::AlreadyFinished);
        }

        self.state = OptionsState::Validating;
        let outcome = self.update_entry(input).await;
        self.state = next_options_state(&outcome);

        match outcome {
            Ok(entry) => {
                self.entry = entry.clone();
                Ok(OptionsStep::Updated(entry))
            }
            Err(tag) => {
                let station = self.entry.data.station.as_str();
                let form = init_form(&self.entry.data)
                    .with_error(Some(tag))
                    .with_placeholder(STATION_NAME, station);
                Ok(OptionsStep::ShowForm(form))
            }
        }
    }

    async fn update_entry(&self, input: OptionsInput) -> Result<ConfigEntry, ErrorTag> {
        let station = StationCode::parse_normalized(&input.station).map_err(|e| {
            warn!(error = %e, "rejected station before validation");
            ErrorTag::InvalidInput
        })?;
        let destinations = Destinations::from_raw(input.destinations.as_deref());

        let Some(token) = self.resolve_token().await else {
            warn!(entry_id = %self.entry.entry_id, "no token for options update");
            return Err(ErrorTag::NoToken);
        };

        let info = validate(self.client, &token, &station, &destinations)
            .await
            .map_err(|e| {
                if let ValidationError::Unknown(_) = e {
                    error!(error = %error_chain(&e), "unexpected error during options update");
                }
                ErrorTag::from(&e)
            })?;

        let data = EntryData {
            token,
            station,
            destinations,
        };

        let id = self.entry.entry_id;
        let entry = self
            .entries
            .update(&id, info.title, data)
            .await
            .map_err(|e| {
                error!(entry_id = %id, error = %e, "failed to update config entry");
                ErrorTag::from(&e)
            })?;

        // The update is already stored; a failed reload only delays it.
        if let Err(e) = self.entries.reload(&id).await {
            warn!(entry_id = %id, error = %e, "failed to reload config entry");
        }

        info!(entry_id = %id, title = %entry.title, "updated config entry");
        Ok(entry)
    }

    /// Stored token first, then the entry's own.
    async fn resolve_token(&self) -> Option<ApiToken> {
        let stored = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not load stored token");
                None
            }
        };

        stored.or_else(|| ApiToken::new(self.entry.data.token.expose()))
    }
}
