// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::message::ChatResponse;

pub const MSG_BODY_NOT_JSON: &str = "Content-Type debe ser application/json";
pub const MSG_EMPTY_MESSAGE: &str =
    "El campo 'message' es obligatorio y no puede estar vacío";
pub const MSG_INTERNAL: &str =
    "Lo siento, hubo un error inesperado al procesar tu consulta.";

/// Chat-endpoint failure that still honors the frontend contract: the body
/// is a fully populated `ChatResponse`, never a bare error string.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub session_id: String,
    pub mensaje: String,
}

impl ApiError {
    pub fn bad_request(session_id: impl Into<String>, mensaje: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            session_id: session_id.into(),
            mensaje: mensaje.into(),
        }
    }

    pub fn internal(session_id: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            session_id: session_id.into(),
            mensaje: MSG_INTERNAL.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ChatResponse::failure(self.session_id, self.mensaje);
        (self.status, Json(body)).into_response()
    }
}
