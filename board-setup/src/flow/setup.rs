//! The setup wizard: the `user` step.
//!
//! ```text
//! AwaitingInput --submit--> Validating --ok--> EntryCreated
//!       ^                       |
//!       +-------- error --------+
//! ```

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::darwin::RailClient;
use crate::domain::{ApiToken, Destinations, StationCode};
use crate::store::{ConfigEntries, ConfigEntry, EntryData, EntryId, TokenStore};

use super::error::{ErrorTag, FlowError, ValidationError, error_chain};
use super::form::{Form, user_form};
use super::validate::validate;

/// Raw input submitted on the `user` step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    /// Blank or absent means "use the stored token".
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub destinations: Option<String>,
}

/// Where the setup wizard is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupState {
    /// Showing the form, possibly with an error from the last attempt.
    AwaitingInput { error: Option<ErrorTag> },
    /// A submission is being checked.
    Validating,
    /// Terminal: the entry exists.
    EntryCreated(EntryId),
}

impl SetupState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SetupState::EntryCreated(_))
    }
}

/// What the host should do after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStep {
    ShowForm(Form),
    EntryCreated(ConfigEntry),
}

/// Transition out of `Validating`.
pub(crate) fn next_setup_state(outcome: &Result<ConfigEntry, ErrorTag>) -> SetupState {
    match outcome {
        Ok(entry) => SetupState::EntryCreated(entry.entry_id),
        Err(tag) => SetupState::AwaitingInput { error: Some(*tag) },
    }
}

/// One run of the setup wizard.
pub struct SetupFlow<'a, R, T, E> {
    client: &'a R,
    tokens: &'a T,
    entries: &'a E,
    state: SetupState,
}

impl<'a, R, T, E> SetupFlow<'a, R, T, E>
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    pub fn new(client: &'a R, tokens: &'a T, entries: &'a E) -> Self {
        Self {
            client,
            tokens,
            entries,
            state: SetupState::AwaitingInput { error: None },
        }
    }

    pub fn state(&self) -> &SetupState {
        &self.state
    }

    /// Handle the `user` step: show the form when there is no input,
    /// otherwise process the submission.
    pub async fn step_user(&mut self, input: Option<UserInput>) -> Result<SetupStep, FlowError> {
        match input {
            None if self.state.is_finished() => Err(FlowError::AlreadyFinished),
            None => Ok(SetupStep::ShowForm(self.show_form().await)),
            Some(input) => self.submit(input).await,
        }
    }

    /// The form for the current state.
    pub async fn show_form(&self) -> Form {
        let stored = self.stored_token().await;
        let error = match &self.state {
            SetupState::AwaitingInput { error } => *error,
            _ => None,
        };
        user_form(stored.as_ref()).with_error(error)
    }

    /// Validate a submission and create the entry.
    pub async fn submit(&mut self, input: UserInput) -> Result<SetupStep, FlowError> {
        if self.state.is_finished() {
            return Err(FlowError::AlreadyFinished);
        }

        self.state = SetupState::Validating;
        let stored = self.stored_token().await;
        let outcome = self.create_entry(input, stored.as_ref()).await;
        self.state = next_setup_state(&outcome);

        Ok(match outcome {
            Ok(entry) => SetupStep::EntryCreated(entry),
            Err(tag) => SetupStep::ShowForm(user_form(stored.as_ref()).with_error(Some(tag))),
        })
    }

    async fn create_entry(
        &self,
        input: UserInput,
        stored: Option<&ApiToken>,
    ) -> Result<ConfigEntry, ErrorTag> {
        let station = StationCode::parse_normalized(&input.station).map_err(|e| {
            warn!(error = %e, "rejected station before validation");
            ErrorTag::InvalidInput
        })?;
        let destinations = Destinations::from_raw(input.destinations.as_deref());

        let token = input
            .token
            .as_deref()
            .and_then(ApiToken::new)
            .or_else(|| stored.cloned())
            .ok_or(ErrorTag::NoToken)?;

        let info = validate(self.client, &token, &station, &destinations)
            .await
            .map_err(|e| {
                if let ValidationError::Unknown(_) = e {
                    error!(error = %error_chain(&e), "unexpected error during setup");
                }
                ErrorTag::from(&e)
            })?;

        self.tokens.save(&token).await.map_err(|e| {
            error!(error = %e, "failed to save API token");
            ErrorTag::from(&e)
        })?;

        let data = EntryData {
            token,
            station,
            destinations,
        };

        let entry = self.entries.create(info.title, data).await.map_err(|e| {
            error!(error = %e, "failed to create config entry");
            ErrorTag::from(&e)
        })?;

        info!(entry_id = %entry.entry_id, title = %entry.title, "created config entry");
        Ok(entry)
    }

    /// The stored token; storage errors count as "none stored".
    async fn stored_token(&self) -> Option<ApiToken> {
        match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not load stored token");
                None
            }
        }
    }
}
