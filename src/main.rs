use std::sync::Arc;

use lexcase_api::services::{HttpBlobStore, HttpPaymentGateway, StubDraftGenerator};
use lexcase_api::store::PgStore;
use lexcase_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, secrets, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = lexcase_api::config::config();
    tracing::info!("Starting lexcase API in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = PgStore::connect(&database_url)
        .await
        .unwrap_or_else(|e| panic!("database connection failed: {}", e));
    store
        .migrate()
        .await
        .unwrap_or_else(|e| panic!("migrations failed: {}", e));

    let state = Arc::new(AppState::new(
        Arc::new(store),
        Arc::new(HttpBlobStore::new()),
        Arc::new(HttpPaymentGateway::new()),
        Arc::new(StubDraftGenerator),
    ));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("lexcase API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}
