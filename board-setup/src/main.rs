use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use board_setup::config::ServerConfig;
use board_setup::darwin::{DarwinClient, MockRailClient, RailBackend};
use board_setup::store::{JsonEntryStore, JsonTokenStore};
use board_setup::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("board_setup=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");

    let rail = if config.mock {
        warn!("BOARD_SETUP_MOCK is set; validating against the built-in mock");
        RailBackend::Mock(MockRailClient::sample())
    } else {
        let client = DarwinClient::new(config.darwin()).expect("Failed to create Darwin client");
        RailBackend::Darwin(client)
    };

    let tokens = JsonTokenStore::in_dir(&config.data_dir);
    let entries = JsonEntryStore::open(config.entries_path())
        .await
        .expect("Failed to open entry store");
    info!(
        data_dir = %config.data_dir.display(),
        "loaded stores"
    );

    let state = AppState::new(rail, tokens, entries);
    let app = create_router(state);

    let addr = config.addr;
    info!("Departure board setup listening on http://{addr}");
    info!("Open http://{addr}/setup in your browser to add a board");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
