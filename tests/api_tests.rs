use chatbot_relay::config::RelayConfig;
use chatbot_relay::message::ChatResponse;
use chatbot_relay::routes::create_router;
use chatbot_relay::state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::util::ServiceExt;

/// Nothing listens on the discard port, so connections are refused fast.
const DEAD_UPSTREAM: &str = "http://127.0.0.1:9";

fn test_config(upstream_url: &str) -> RelayConfig {
    RelayConfig {
        upstream_url: upstream_url.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        query_timeout: Duration::from_secs(5),
        proxy_timeout: Duration::from_secs(5),
        health_timeout: Duration::from_secs(2),
    }
}

fn relay_app(upstream_url: &str) -> Router {
    let state = Arc::new(AppState::new(test_config(upstream_url)));
    create_router().with_state(state)
}

/// Spawns a stand-in for the query-processing server on an ephemeral port.
async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, ChatResponse) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn empty_message_is_rejected_with_contract_body() {
    let app = relay_app(DEAD_UPSTREAM);

    let (status, body) = post_chat(app, r#"{"message": "   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.exito);
    assert!(!body.session_id.is_empty());
    assert!(body.mensaje.contains("obligatorio"));
    assert_eq!(body.total_filas, 0);
    assert!(body.tipo_grafica.is_none());
    assert!(!body.tiene_grafica);
}

#[tokio::test]
async fn missing_message_keeps_caller_session_id() {
    let app = relay_app(DEAD_UPSTREAM);

    let (status, body) = post_chat(app, r#"{"session_id": "sess-42"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.exito);
    assert_eq!(body.session_id, "sess-42");
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let app = relay_app(DEAD_UPSTREAM);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "text/plain")
                .body(Body::from("hola"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: ChatResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(!body.exito);
    assert!(!body.session_id.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_is_a_business_failure_not_an_http_error() {
    let app = relay_app(DEAD_UPSTREAM);

    let (status, body) =
        post_chat(app, r#"{"message": "ventas por mes", "session_id": "sess-1"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.exito);
    assert_eq!(body.session_id, "sess-1");
    assert!(!body.mensaje.is_empty());
    assert_eq!(body.total_filas, 0);
    assert!(body.grafica_base64.is_none());
}

#[tokio::test]
async fn fresh_session_ids_are_distinct() {
    let app = relay_app(DEAD_UPSTREAM);

    let (_, first) = post_chat(app.clone(), r#"{"message": "hola"}"#).await;
    let (_, second) = post_chat(app, r#"{"message": "hola"}"#).await;

    assert!(!first.session_id.is_empty());
    assert!(!second.session_id.is_empty());
    assert_ne!(first.session_id, second.session_id);
}

#[tokio::test]
async fn chat_forwards_query_and_infers_chart() {
    let upstream = Router::new().route(
        "/api/query",
        post(|Json(body): Json<Value>| async move {
            let mensaje = format!(
                "{}|{}|{}",
                body["pregunta"].as_str().unwrap_or_default(),
                body["usuario_id"].as_str().unwrap_or_default(),
                body["rol"].as_str().unwrap_or_default()
            );
            Json(json!({
                "exito": true,
                "tipo": "tabla",
                "mensaje": mensaje,
                "datos": [
                    {"producto": "Laptop", "total": 5000},
                    {"producto": "Mouse", "total": 1200},
                    {"producto": "Teclado", "total": 900},
                ],
                "columnas": ["producto", "total"],
                "sql_generado": "SELECT producto, SUM(total) FROM ventas GROUP BY producto",
            }))
        }),
    );
    let url = spawn_upstream(upstream).await;
    let app = relay_app(&url);

    let (status, body) = post_chat(app, r#"{"message": "hola", "session_id": "sess-7"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.exito);
    assert_eq!(body.session_id, "sess-7");
    // The upstream stub echoes what it was sent, defaults included.
    assert_eq!(body.mensaje, "hola|anonimo|ventas");
    assert_eq!(body.total_filas, 3);
    assert_eq!(body.columnas, vec!["producto", "total"]);
    assert_eq!(body.tipo_grafica.as_deref(), Some("pie"));
    assert!(!body.tiene_grafica);
    assert!(body.grafica_base64.is_none());
    assert!(body.sql_generado.unwrap().starts_with("SELECT"));
}

#[tokio::test]
async fn attached_upstream_image_is_forwarded_verbatim() {
    let upstream = Router::new().route(
        "/api/query",
        post(|| async {
            Json(json!({
                "exito": true,
                "tipo": "grafico",
                "mensaje": "aquí tienes",
                "datos": [],
                "columnas": [],
                "grafico": {"tipo": "column", "base64": "data:image/png;base64,QUJD"},
            }))
        }),
    );
    let url = spawn_upstream(upstream).await;
    let app = relay_app(&url);

    let (status, body) = post_chat(app, r#"{"message": "grafica de ventas"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.tiene_grafica);
    assert_eq!(body.tipo_grafica.as_deref(), Some("column"));
    assert_eq!(
        body.grafica_base64.as_deref(),
        Some("data:image/png;base64,QUJD")
    );
}

#[tokio::test]
async fn health_reports_ok_when_upstream_answers() {
    let upstream = Router::new().route("/health", get(|| async { Json(json!({"status": "ok"})) }));
    let url = spawn_upstream(upstream).await;
    let app = relay_app(&url);

    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["relay"], "ok");
    assert_eq!(body["components"]["upstream"], "ok");
    assert_eq!(body["upstream_url"], url);
    assert!(!body["timestamp"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn health_degrades_when_upstream_is_down() {
    let app = relay_app(DEAD_UPSTREAM);

    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["relay"], "ok");
    assert_eq!(body["components"]["upstream"], "unavailable");
}

#[tokio::test]
async fn schema_proxy_returns_upstream_body_verbatim() {
    let upstream = Router::new().route(
        "/api/schema",
        get(|| async {
            Json(json!({
                "tablas": {"ventas": ["id", "producto", "total"]},
            }))
        }),
    );
    let url = spawn_upstream(upstream).await;
    let app = relay_app(&url);

    let (status, body) = get_json(app, "/api/schema").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tablas"]["ventas"][1], "producto");
}

#[tokio::test]
async fn proxy_failure_collapses_to_error_shape() {
    let app = relay_app(DEAD_UPSTREAM);

    for uri in ["/api/schema", "/api/tables", "/api/ejemplos"] {
        let (status, body) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["status"], "error", "{uri}");
        assert!(!body["error"].as_str().unwrap().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn root_describes_the_service() {
    let app = relay_app(DEAD_UPSTREAM);

    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Chatbot Relay - Ventas");
    assert_eq!(body["endpoints"]["chat"], "POST /api/chat");
    assert!(body["ejemplo_salida"]["tipo_grafica"].is_string());
}
