// src/routes/mod.rs
pub mod chat;
pub mod proxy;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;
use chat::chat_handler;
use proxy::{
    ejemplos_handler, health_handler, schema_handler, service_info_handler, tables_handler,
};

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(service_info_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .route("/api/schema", get(schema_handler))
        .route("/api/tables", get(tables_handler))
        .route("/api/ejemplos", get(ejemplos_handler))
        .layer(TraceLayer::new_for_http())
}
