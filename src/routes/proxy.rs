use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};

use crate::message::{ComponentStatus, HealthResponse};
use crate::state::SharedState;

pub async fn health_handler(
    State(state): State<SharedState>,
) -> (StatusCode, Json<HealthResponse>) {
    let upstream_ok = state.upstream.health().await;

    let body = HealthResponse {
        status: if upstream_ok { "ok" } else { "degraded" }.to_string(),
        components: ComponentStatus {
            relay: "ok".to_string(),
            upstream: if upstream_ok { "ok" } else { "unavailable" }.to_string(),
        },
        upstream_url: state.upstream.base_url().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };

    let status = if upstream_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

pub async fn schema_handler(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    proxy_get(&state, "/api/schema", "No se pudo obtener el schema").await
}

pub async fn tables_handler(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    proxy_get(&state, "/api/tables", "No se pudo listar tablas").await
}

pub async fn ejemplos_handler(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    proxy_get(&state, "/api/ejemplos", "No se pudo obtener ejemplos").await
}

// Forwards one upstream GET verbatim; any fault collapses to the flat
// `{error, status}` shape these endpoints have always reported.
async fn proxy_get(state: &SharedState, path: &str, context: &str) -> (StatusCode, Json<Value>) {
    match state.upstream.fetch_json(path).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => {
            tracing::warn!(error = %err, path, "upstream proxy request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("{context}: {err}"),
                    "status": "error",
                })),
            )
        }
    }
}

pub async fn service_info_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "nombre": "Chatbot Relay - Ventas",
        "version": env!("CARGO_PKG_VERSION"),
        "upstream": state.upstream.base_url(),
        "endpoints": {
            "chat": "POST /api/chat",
            "health": "GET /api/health",
            "schema": "GET /api/schema",
            "tables": "GET /api/tables",
            "ejemplos": "GET /api/ejemplos",
        },
        "ejemplo_salida": {
            "exito": true,
            "session_id": "uuid",
            "mensaje": "texto explicativo",
            "sql_generado": "SELECT...",
            "datos": [{}],
            "columnas": ["col1", "col2"],
            "total_filas": 1,
            "tipo_grafica": "bar",
            "tiene_grafica": true,
            "grafica_base64": "data:image/png;base64,...",
        },
    }))
}
