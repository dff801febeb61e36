//! Form schemas for the two flow steps.
//!
//! A [`Form`] describes what to render, not how: the web host turns it into
//! HTML or JSON, and tests inspect it directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ApiToken;
use crate::store::EntryData;

use super::error::ErrorTag;

/// Placeholder key for the saved-token hint on the `user` step.
pub const TOKEN_HINT: &str = "token_hint";

/// Placeholder key for the station display name on the `init` step.
pub const STATION_NAME: &str = "station_name";

/// Which step a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Initial setup.
    User,
    /// Options editing.
    Init,
}

/// Form field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Token,
    Station,
    Destinations,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Token => "token",
            FieldKey::Station => "station",
            FieldKey::Destinations => "destinations",
        }
    }
}

/// One input on a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub key: FieldKey,
    pub required: bool,
    pub default: Option<String>,
}

impl FormField {
    fn required(key: FieldKey) -> Self {
        Self {
            key,
            required: true,
            default: None,
        }
    }

    fn optional(key: FieldKey) -> Self {
        Self {
            key,
            required: false,
            default: None,
        }
    }

    fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A form to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub step_id: StepId,
    pub fields: Vec<FormField>,
    pub error: Option<ErrorTag>,
    pub description_placeholders: BTreeMap<String, String>,
}

impl Form {
    fn new(step_id: StepId, fields: Vec<FormField>) -> Self {
        Self {
            step_id,
            fields,
            error: None,
            description_placeholders: BTreeMap::new(),
        }
    }

    /// Attach a base-level error.
    pub fn with_error(mut self, error: Option<ErrorTag>) -> Self {
        self.error = error;
        self
    }

    pub(crate) fn with_placeholder(mut self, key: &str, value: impl Into<String>) -> Self {
        self.description_placeholders
            .insert(key.to_string(), value.into());
        self
    }

    /// Look up a field by key.
    pub fn field(&self, key: FieldKey) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Look up a description placeholder.
    pub fn placeholder(&self, key: &str) -> Option<&str> {
        self.description_placeholders.get(key).map(String::as_str)
    }
}

/// The `user` step: token, station, destinations.
///
/// With a stored token, the token field becomes optional and is pre-filled.
pub fn user_form(stored: Option<&ApiToken>) -> Form {
    let token = match stored {
        Some(token) => FormField::optional(FieldKey::Token).with_default(token.expose()),
        None => FormField::required(FieldKey::Token),
    };

    let form = Form::new(
        StepId::User,
        vec![
            token,
            FormField::required(FieldKey::Station),
            FormField::optional(FieldKey::Destinations),
        ],
    );

    match stored {
        Some(_) => form.with_placeholder(
            TOKEN_HINT,
            "A previously saved token is filled in. Leave it to reuse it.",
        ),
        None => form,
    }
}

/// The `init` step: station and destinations, defaulted from the entry.
pub fn init_form(data: &EntryData) -> Form {
    Form::new(
        StepId::Init,
        vec![
            FormField::required(FieldKey::Station).with_default(data.station.as_str()),
            FormField::optional(FieldKey::Destinations).with_default(data.destinations.joined()),
        ],
    )
}
