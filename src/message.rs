// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_usuario() -> String {
    "anonimo".to_string()
}

fn default_rol() -> String {
    "ventas".to_string()
}

/// Inbound body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
    #[serde(default = "default_usuario")]
    pub usuario_id: String,
    #[serde(default = "default_rol")]
    pub rol: String,
}

/// Outbound body for `POST {upstream}/api/query`.
#[derive(Debug, Serialize)]
pub struct UpstreamQuery {
    pub pregunta: String,
    pub usuario_id: String,
    pub rol: String,
}

/// Answer category reported by the upstream server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    #[default]
    Texto,
    Tabla,
    Numero,
    Grafico,
}

/// Chart image the upstream may attach to an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grafico {
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub base64: Option<String>,
}

/// Whatever the upstream answered. Every field carries a default so an
/// absent or null field degrades instead of failing the decode; row contents
/// are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamResponse {
    #[serde(default)]
    pub exito: bool,
    #[serde(default)]
    pub tipo: ResponseKind,
    #[serde(default)]
    pub mensaje: String,
    #[serde(default)]
    pub datos: Vec<Value>,
    #[serde(default)]
    pub columnas: Vec<String>,
    #[serde(default)]
    pub sql_generado: Option<String>,
    #[serde(default)]
    pub grafico: Option<Grafico>,
}

impl UpstreamResponse {
    /// Failure payload shaped like a regular answer, so callers never have
    /// to branch on transport faults.
    pub fn failure(mensaje: impl Into<String>) -> Self {
        Self {
            exito: false,
            tipo: ResponseKind::Texto,
            mensaje: mensaje.into(),
            datos: Vec::new(),
            columnas: Vec::new(),
            sql_generado: None,
            grafico: None,
        }
    }
}

/// The one response contract the frontend consumes. Every chat-shaped reply,
/// error paths included, carries all of these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub exito: bool,
    pub session_id: String,
    pub mensaje: String,
    pub sql_generado: Option<String>,
    pub datos: Vec<Value>,
    pub columnas: Vec<String>,
    pub total_filas: usize,
    pub tipo_grafica: Option<String>,
    pub tiene_grafica: bool,
    pub grafica_base64: Option<String>,
}

impl ChatResponse {
    pub fn failure(session_id: impl Into<String>, mensaje: impl Into<String>) -> Self {
        Self {
            exito: false,
            session_id: session_id.into(),
            mensaje: mensaje.into(),
            sql_generado: None,
            datos: Vec::new(),
            columnas: Vec::new(),
            total_filas: 0,
            tipo_grafica: None,
            tiene_grafica: false,
            grafica_base64: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub relay: String,
    pub upstream: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: ComponentStatus,
    pub upstream_url: String,
    pub timestamp: String,
}
