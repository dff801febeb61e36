//! Data transfer objects for web responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::flow::{ErrorTag, FieldKey, Form, FormField, StepId};
use crate::store::ConfigEntry;

/// A flow form. A stored token is reported, never sent back.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub step_id: StepId,
    pub fields: Vec<FormField>,
    pub error: Option<ErrorTag>,
    pub description_placeholders: BTreeMap<String, String>,
    pub has_stored_token: bool,
}

impl FormResponse {
    pub fn from_form(form: &Form) -> Self {
        let mut has_stored_token = false;
        let fields = form
            .fields
            .iter()
            .map(|field| {
                let mut field = field.clone();
                if field.key == FieldKey::Token && field.default.take().is_some() {
                    has_stored_token = true;
                }
                field
            })
            .collect();

        Self {
            step_id: form.step_id,
            fields,
            error: form.error,
            description_placeholders: form.description_placeholders.clone(),
            has_stored_token,
        }
    }
}

/// A configuration entry, without its token.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry_id: String,
    pub title: String,
    pub station: String,
    /// Comma-joined destination codes, empty for all destinations.
    pub destinations: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntryResponse {
    pub fn from_entry(entry: &ConfigEntry) -> Self {
        Self {
            entry_id: entry.entry_id.to_string(),
            title: entry.title.clone(),
            station: entry.data.station.as_str().to_string(),
            destinations: entry.data.destinations.joined(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// All configured entries.
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryResponse>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiToken, Destinations, StationCode};
    use crate::flow::{init_form, user_form};
    use crate::store::{ConfigEntries, EntryData, MemoryEntryStore};

    #[test]
    fn form_response_withholds_stored_token() {
        let stored = ApiToken::new("secret").unwrap();
        let response = FormResponse::from_form(&user_form(Some(&stored)));

        assert!(response.has_stored_token);
        assert_eq!(response.fields[0].key, FieldKey::Token);
        assert!(response.fields[0].default.is_none());
        assert!(!response.fields[0].required);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn form_response_keeps_other_defaults() {
        let data = EntryData {
            token: ApiToken::new("secret").unwrap(),
            station: StationCode::parse("WAT").unwrap(),
            destinations: Destinations::parse("CHK"),
        };
        let response = FormResponse::from_form(&init_form(&data));

        assert!(!response.has_stored_token);
        assert_eq!(response.fields[0].default.as_deref(), Some("WAT"));
        assert_eq!(response.fields[1].default.as_deref(), Some("CHK"));

        let response = FormResponse::from_form(&user_form(None));
        assert!(!response.has_stored_token);
    }

    #[tokio::test]
    async fn entry_response_omits_token() {
        let store = MemoryEntryStore::new();
        let entry = store
            .create(
                "Train Schedule London Waterloo -> ['CHK']".into(),
                EntryData {
                    token: ApiToken::new("secret").unwrap(),
                    station: StationCode::parse("WAT").unwrap(),
                    destinations: Destinations::parse("CHK"),
                },
            )
            .await
            .unwrap();

        let response = EntryResponse::from_entry(&entry);
        assert_eq!(response.station, "WAT");
        assert_eq!(response.destinations, "CHK");

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("token"));
    }
}
