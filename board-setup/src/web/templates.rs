//! Askama templates for the setup pages.

use askama::Template;

use crate::flow::{FieldKey, Form, STATION_NAME, StepId, TOKEN_HINT};
use crate::store::ConfigEntry;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// A flow step rendered as an HTML form.
#[derive(Template)]
#[template(path = "form.html")]
pub struct FormTemplate {
    pub form: FormView,
}

/// Entry created or updated.
#[derive(Template)]
#[template(path = "entry.html")]
pub struct EntryTemplate {
    pub heading: String,
    pub entry: EntryView,
}

/// All configured entries.
#[derive(Template)]
#[template(path = "entries.html")]
pub struct EntriesTemplate {
    pub entries: Vec<EntryView>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Form view model.
#[derive(Debug, Clone)]
pub struct FormView {
    pub heading: String,
    pub action: String,
    pub fields: Vec<FieldView>,
    pub error_message: Option<String>,
    pub hint: Option<String>,
}

impl FormView {
    /// Create from a flow form, posting back to `action`.
    pub fn from_form(form: &Form, action: impl Into<String>) -> Self {
        let heading = match form.step_id {
            StepId::User => "Set up a departure board".to_string(),
            StepId::Init => "Change stations".to_string(),
        };

        let hint = match form.step_id {
            StepId::User => form.placeholder(TOKEN_HINT).map(str::to_string),
            StepId::Init => form
                .placeholder(STATION_NAME)
                .map(|name| format!("Current home station: {name}")),
        };

        Self {
            heading,
            action: action.into(),
            fields: form.fields.iter().map(FieldView::from_field).collect(),
            error_message: form.error.map(|tag| tag.message().to_string()),
            hint,
        }
    }
}

/// One input of a form view.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub input_type: String,
    pub required: bool,
    pub value: String,
}

impl FieldView {
    fn from_field(field: &crate::flow::FormField) -> Self {
        let (label, input_type) = match field.key {
            FieldKey::Token => ("API token", "password"),
            FieldKey::Station => ("Home station code", "text"),
            FieldKey::Destinations => ("Destination codes (comma separated)", "text"),
        };

        Self {
            name: field.key.as_str().to_string(),
            label: label.to_string(),
            input_type: input_type.to_string(),
            required: field.required,
            value: field.default.clone().unwrap_or_default(),
        }
    }
}

/// Entry view model.
#[derive(Debug, Clone)]
pub struct EntryView {
    pub title: String,
    pub station: String,
    pub destinations: String,
    pub options_url: String,
}

impl EntryView {
    pub fn from_entry(entry: &ConfigEntry) -> Self {
        let destinations = if entry.data.destinations.is_empty() {
            "All destinations".to_string()
        } else {
            entry.data.destinations.iter().collect::<Vec<_>>().join(", ")
        };

        Self {
            title: entry.title.clone(),
            station: entry.data.station.as_str().to_string(),
            destinations,
            options_url: format!("/entries/{}/options", entry.entry_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiToken;
    use crate::flow::{ErrorTag, user_form};

    #[test]
    fn user_form_view() {
        let form = user_form(None).with_error(Some(ErrorTag::InvalidToken));
        let view = FormView::from_form(&form, "/setup");

        assert_eq!(view.action, "/setup");
        assert_eq!(view.fields.len(), 3);
        assert_eq!(view.fields[0].name, "token");
        assert_eq!(view.fields[0].input_type, "password");
        assert!(view.fields[0].required);
        assert_eq!(
            view.error_message.as_deref(),
            Some(ErrorTag::InvalidToken.message())
        );
        assert!(view.hint.is_none());
    }

    #[test]
    fn user_form_view_with_stored_token() {
        let stored = ApiToken::new("saved").unwrap();
        let view = FormView::from_form(&user_form(Some(&stored)), "/setup");

        assert_eq!(view.fields[0].value, "saved");
        assert!(!view.fields[0].required);
        assert!(view.hint.is_some());
    }

    #[test]
    fn form_template_renders_fields_and_error() {
        let form = user_form(None).with_error(Some(ErrorTag::InvalidInput));
        let html = FormTemplate {
            form: FormView::from_form(&form, "/setup"),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"action="/setup""#));
        assert!(html.contains(r#"name="station""#));
        assert!(html.contains(r#"name="destinations""#));
        assert!(html.contains("not recognised"));
    }

    #[test]
    fn error_template_escapes_message() {
        let html = ErrorTemplate {
            title: "Not found".into(),
            message: "<script>".into(),
        }
        .render()
        .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
