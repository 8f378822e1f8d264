use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;

use crate::error::{ApiError, MSG_BODY_NOT_JSON, MSG_EMPTY_MESSAGE};
use crate::message::{ChatRequest, ChatResponse};
use crate::services::normalizer::normalize;
use crate::state::{AppState, SharedState};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(%rejection, "rejected chat body");
        ApiError::bad_request(Uuid::new_v4().to_string(), MSG_BODY_NOT_JSON)
    })?;

    let session_id = match payload.session_id.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    let mensaje = payload.message.trim();
    if mensaje.is_empty() {
        return Err(ApiError::bad_request(session_id, MSG_EMPTY_MESSAGE));
    }

    tracing::info!(
        session_id = %session_id,
        usuario_id = %payload.usuario_id,
        rol = %payload.rol,
        "new chat request"
    );

    let respuesta = process_chat(&state, &session_id, mensaje, &payload.usuario_id, &payload.rol)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, session_id = %session_id, "unexpected failure handling chat");
            ApiError::internal(session_id.clone())
        })?;

    tracing::info!(
        session_id = %session_id,
        exito = respuesta.exito,
        total_filas = respuesta.total_filas,
        tiene_grafica = respuesta.tiene_grafica,
        "chat response ready"
    );

    Ok(Json(respuesta))
}

// The fault boundary for the chat pipeline. The client already swallows
// transport faults, so today nothing in here returns Err; the seam keeps
// any future fallible step behind the generic 500.
async fn process_chat(
    state: &AppState,
    session_id: &str,
    mensaje: &str,
    usuario_id: &str,
    rol: &str,
) -> anyhow::Result<ChatResponse> {
    let upstream = state.upstream.query(mensaje, usuario_id, rol).await;
    Ok(normalize(upstream, session_id.to_string()))
}
