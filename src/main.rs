use std::sync::Arc;

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use chatbot_relay::config::RelayConfig;
use chatbot_relay::routes;
use chatbot_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = RelayConfig::from_env();
    info!(upstream = %config.upstream_url, "starting chatbot relay");

    let state = Arc::new(AppState::new(config.clone()));

    if state.upstream.health().await {
        info!("upstream query server reachable");
    } else {
        warn!(upstream = %config.upstream_url, "upstream query server not reachable yet");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = routes::create_router().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
