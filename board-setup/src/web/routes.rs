//! HTTP route handlers.

use askama::Template;
use axum::{
    Form as FormBody, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::darwin::RailClient;
use crate::flow::{
    FlowError, Form, OptionsFlow, OptionsInput, OptionsStep, SetupFlow, SetupStep, UserInput,
};
use crate::store::{ConfigEntries, ConfigEntry, EntryId, StoreError, TokenStore};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router<R, T, E>(state: AppState<R, T, E>) -> Router
where
    R: RailClient + 'static,
    T: TokenStore + 'static,
    E: ConfigEntries + 'static,
{
    Router::new()
        .route("/", get(|| async { Redirect::to("/setup") }))
        .route("/health", get(health))
        .route("/setup", get(setup_page::<R, T, E>).post(submit_setup::<R, T, E>))
        .route("/entries", get(list_entries::<R, T, E>))
        .route(
            "/entries/:id/options",
            get(options_page::<R, T, E>).post(submit_options::<R, T, E>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Show the `user` step of the setup wizard.
async fn setup_page<R, T, E>(
    State(state): State<AppState<R, T, E>>,
    headers: HeaderMap,
) -> Response
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    run_setup(&state, &headers, None)
        .await
        .unwrap_or_else(|e| e.respond(&headers))
}

/// Submit the setup wizard.
async fn submit_setup<R, T, E>(
    State(state): State<AppState<R, T, E>>,
    headers: HeaderMap,
    FormBody(input): FormBody<UserInput>,
) -> Response
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    run_setup(&state, &headers, Some(input))
        .await
        .unwrap_or_else(|e| e.respond(&headers))
}

/// List configured entries.
async fn list_entries<R, T, E>(
    State(state): State<AppState<R, T, E>>,
    headers: HeaderMap,
) -> Response
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    let entries = match state.entries.list().await {
        Ok(entries) => entries,
        Err(e) => return AppError::from(e).respond(&headers),
    };

    if accepts_html(&headers) {
        let template = EntriesTemplate {
            entries: entries.iter().map(EntryView::from_entry).collect(),
        };
        render_html(&template, StatusCode::OK).unwrap_or_else(|e| e.respond(&headers))
    } else {
        let entries = entries.iter().map(EntryResponse::from_entry).collect();
        Json(EntryListResponse { entries }).into_response()
    }
}

/// Show the `init` step of the options editor.
async fn options_page<R, T, E>(
    State(state): State<AppState<R, T, E>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    run_options(&state, &headers, &id, None)
        .await
        .unwrap_or_else(|e| e.respond(&headers))
}

/// Submit the options editor.
async fn submit_options<R, T, E>(
    State(state): State<AppState<R, T, E>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    FormBody(input): FormBody<OptionsInput>,
) -> Response
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    run_options(&state, &headers, &id, Some(input))
        .await
        .unwrap_or_else(|e| e.respond(&headers))
}

/// Run one step of a fresh setup wizard.
async fn run_setup<R, T, E>(
    state: &AppState<R, T, E>,
    headers: &HeaderMap,
    input: Option<UserInput>,
) -> Result<Response, AppError>
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    let mut flow = SetupFlow::new(&*state.rail, &*state.tokens, &*state.entries);
    match flow.step_user(input).await? {
        SetupStep::ShowForm(form) => render_form(headers, &form, "/setup"),
        SetupStep::EntryCreated(entry) => render_entry(headers, &entry, StatusCode::CREATED),
    }
}

/// Run one step of a fresh options editor for entry `id`.
async fn run_options<R, T, E>(
    state: &AppState<R, T, E>,
    headers: &HeaderMap,
    id: &str,
    input: Option<OptionsInput>,
) -> Result<Response, AppError>
where
    R: RailClient,
    T: TokenStore,
    E: ConfigEntries,
{
    let entry = find_entry(&*state.entries, id).await?;
    let action = format!("/entries/{}/options", entry.entry_id);

    let mut flow = OptionsFlow::new(&*state.rail, &*state.tokens, &*state.entries, entry);
    match flow.step_init(input).await? {
        OptionsStep::ShowForm(form) => render_form(headers, &form, &action),
        OptionsStep::Updated(entry) => render_entry(headers, &entry, StatusCode::OK),
    }
}

async fn find_entry<E: ConfigEntries>(entries: &E, id: &str) -> Result<ConfigEntry, AppError> {
    let not_found = || AppError::NotFound {
        message: format!("No entry with id {id}"),
    };

    let entry_id = EntryId::parse(id).ok_or_else(not_found)?;
    entries.get(&entry_id).await?.ok_or_else(not_found)
}

fn render_html<P: Template>(page: &P, status: StatusCode) -> Result<Response, AppError> {
    let html = page.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok((status, Html(html)).into_response())
}

fn render_form(headers: &HeaderMap, form: &Form, action: &str) -> Result<Response, AppError> {
    if accepts_html(headers) {
        let template = FormTemplate {
            form: FormView::from_form(form, action),
        };
        render_html(&template, StatusCode::OK)
    } else {
        Ok(Json(FormResponse::from_form(form)).into_response())
    }
}

fn render_entry(
    headers: &HeaderMap,
    entry: &ConfigEntry,
    status: StatusCode,
) -> Result<Response, AppError> {
    if accepts_html(headers) {
        let heading = if status == StatusCode::CREATED {
            "Board created"
        } else {
            "Board updated"
        };
        let template = EntryTemplate {
            heading: heading.to_string(),
            entry: EntryView::from_entry(entry),
        };
        render_html(&template, status)
    } else {
        Ok((status, Json(EntryResponse::from_entry(entry))).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EntryNotFound(id) => AppError::NotFound {
                message: format!("No entry with id {id}"),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<FlowError> for AppError {
    fn from(e: FlowError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        }
    }

    /// Render as an error page for browsers, JSON otherwise.
    pub fn respond(self, headers: &HeaderMap) -> Response {
        if !accepts_html(headers) {
            return self.into_response();
        }

        let status = self.status();
        log_failure(status, self.message());

        let title = status.canonical_reason().unwrap_or("Error").to_string();
        let page = ErrorTemplate {
            title,
            message: self.message().to_string(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "failed to render error page");
                (status, self.message().to_string()).into_response()
            }
        }
    }
}

fn log_failure(status: StatusCode, message: &str) {
    if status.is_server_error() {
        error!(%status, %message, "request failed");
    } else {
        warn!(%status, %message, "request rejected");
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message().to_string();

        log_failure(status, &message);

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::darwin::MockRailClient;
    use crate::domain::{ApiToken, Destinations, StationCode};
    use crate::store::{EntryData, MemoryEntryStore, MemoryTokenStore};

    type TestState = AppState<MockRailClient, MemoryTokenStore, MemoryEntryStore>;

    fn test_state() -> TestState {
        AppState::new(
            MockRailClient::sample().with_tokens(["good"]),
            MemoryTokenStore::new(),
            MemoryEntryStore::new(),
        )
    }

    async fn seed(state: &TestState) -> ConfigEntry {
        state
            .entries
            .create(
                "Train Schedule London Waterloo -> ['CHK']".into(),
                EntryData {
                    token: ApiToken::new("good").unwrap(),
                    station: StationCode::parse("WAT").unwrap(),
                    destinations: Destinations::parse("CHK"),
                },
            )
            .await
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn root_redirects_to_setup() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/setup");
    }

    #[tokio::test]
    async fn setup_form_as_json() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/setup").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["step_id"], "user");
        assert!(json["error"].is_null());
        assert_eq!(json["fields"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn setup_form_json_withholds_stored_token() {
        let state = AppState::new(
            MockRailClient::sample(),
            MemoryTokenStore::with_token(ApiToken::new("saved-secret").unwrap()),
            MemoryEntryStore::new(),
        );
        let app = create_router(state);
        let response = app
            .oneshot(Request::get("/setup").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(!text.contains("saved-secret"));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["has_stored_token"], true);
        assert!(json["fields"][0]["default"].is_null());
        assert_eq!(json["fields"][0]["required"], false);
    }

    #[tokio::test]
    async fn setup_form_as_html() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::get("/setup")
                    .header(header::ACCEPT, "text/html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<form"));
        assert!(html.contains(r#"name="token""#));
    }

    #[tokio::test]
    async fn setup_creates_entry() {
        let state = test_state();
        let app = create_router(state.clone());
        let response = app
            .oneshot(post_form("/setup", "token=good&station=wat&destinations=chk%2C+vic"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(
            json["title"],
            "Train Schedule London Waterloo -> ['CHK', 'VIC']"
        );
        assert_eq!(json["station"], "WAT");
        assert_eq!(json["destinations"], "CHK,VIC");
        assert!(json.get("token").is_none());

        assert_eq!(state.entries.list().await.unwrap().len(), 1);
        assert_eq!(
            state.tokens.load().await.unwrap().map(|t| t.expose().to_string()),
            Some("good".to_string())
        );
    }

    #[tokio::test]
    async fn setup_rejected_token_redisplays_form() {
        let state = test_state();
        let app = create_router(state.clone());
        let response = app
            .oneshot(post_form("/setup", "token=bad&station=WAT"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_token");
        assert!(state.entries.list().await.unwrap().is_empty());
        assert_eq!(state.tokens.save_count(), 0);
    }

    #[tokio::test]
    async fn setup_unknown_station_redisplays_form_as_html() {
        let app = create_router(test_state());
        let mut request = post_form("/setup", "token=good&station=ZZZ");
        request
            .headers_mut()
            .insert(header::ACCEPT, "text/html".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("not recognised"));
    }

    #[tokio::test]
    async fn setup_without_any_token() {
        let app = create_router(test_state());
        let response = app
            .oneshot(post_form("/setup", "token=&station=WAT"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["error"], "no_token");
    }

    #[tokio::test]
    async fn list_entries_json() {
        let state = test_state();
        let entry = seed(&state).await;
        let app = create_router(state);

        let response = app
            .oneshot(Request::get("/entries").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["entry_id"], entry.entry_id.to_string());
    }

    #[tokio::test]
    async fn options_form_shows_station_name() {
        let state = test_state();
        let entry = seed(&state).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::get(format!("/entries/{}/options", entry.entry_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["step_id"], "init");
        assert_eq!(
            json["description_placeholders"]["station_name"],
            "London Waterloo"
        );
    }

    #[tokio::test]
    async fn options_update_entry() {
        let state = test_state();
        let entry = seed(&state).await;
        let app = create_router(state.clone());

        let response = app
            .oneshot(post_form(
                &format!("/entries/{}/options", entry.entry_id),
                "station=clj&destinations=",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["title"], "Train Schedule Clapham Junction (All Destinations)");
        assert_eq!(json["station"], "CLJ");
        assert_eq!(json["destinations"], "");
        assert_eq!(state.entries.reloads().await, vec![entry.entry_id]);
    }

    #[tokio::test]
    async fn options_unknown_entry() {
        let app = create_router(test_state());

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/entries/{}/options", EntryId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::get("/entries/not-a-uuid/options")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("not-a-uuid"));
    }

    #[tokio::test]
    async fn unknown_entry_as_html() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::get(format!("/entries/{}/options", EntryId::new()))
                    .header(header::ACCEPT, "text/html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Not Found"));
        assert!(html.contains("No entry with id"));
    }

    #[tokio::test]
    async fn created_entry_as_html() {
        let app = create_router(test_state());
        let mut request = post_form("/setup", "token=good&station=PAD&destinations=RDG");
        request
            .headers_mut()
            .insert(header::ACCEPT, "text/html".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let html = body_text(response).await;
        assert!(html.contains("Board created"));
        assert!(html.contains("Train Schedule London Paddington"));
    }
}
