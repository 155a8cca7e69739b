use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recall_deck::config::AppConfig;
use recall_deck::db::SqliteStore;
use recall_deck::handlers;
use recall_deck::state::AppState;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "recall_deck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = AppConfig::load();

  let store = SqliteStore::open(&config.database_path).unwrap_or_else(|e| {
    panic!("Failed to open database at {}: {}", config.database_path.display(), e)
  });
  tracing::info!("Using database {}", config.database_path.display());

  let app = handlers::router(AppState::new(store));

  let bind_addr = config.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config.server_port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
