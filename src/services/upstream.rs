use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::RelayConfig;
use crate::message::{UpstreamQuery, UpstreamResponse};

/// Transport-level failure talking to the query-processing server.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream query timed out")]
    Timeout,
    #[error("upstream server unreachable")]
    Unavailable,
    #[error("upstream request failed: {0}")]
    Other(String),
}

impl UpstreamError {
    /// User-facing text for the frontend contract.
    pub fn mensaje(&self) -> String {
        match self {
            Self::Timeout => {
                "La consulta tardó demasiado. Intenta simplificar tu pregunta.".to_string()
            }
            Self::Unavailable => {
                "El servidor de procesamiento no está disponible. Intenta de nuevo más tarde."
                    .to_string()
            }
            Self::Other(detail) => format!("Error al procesar la consulta: {detail}"),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unavailable
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// HTTP client for the upstream query-processing server. Cheap to clone;
/// carries only the connection pool and the read-only config.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    config: RelayConfig,
}

impl UpstreamClient {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.upstream_url
    }

    /// Forwards one natural-language query to the upstream `/api/query`
    /// endpoint. Single attempt, no retries. Transport faults never escape:
    /// they come back as a failure payload with the same shape a successful
    /// answer has, so the caller treats every outcome uniformly.
    pub async fn query(&self, pregunta: &str, usuario_id: &str, rol: &str) -> UpstreamResponse {
        let body = UpstreamQuery {
            pregunta: pregunta.to_string(),
            usuario_id: usuario_id.to_string(),
            rol: rol.to_string(),
        };

        tracing::info!(pregunta = %body.pregunta, "forwarding query upstream");

        match self.send_query(&body).await {
            Ok(respuesta) => {
                tracing::info!(tipo = ?respuesta.tipo, exito = respuesta.exito, "upstream answered");
                respuesta
            }
            Err(err) => {
                tracing::warn!(error = %err, "upstream query failed");
                UpstreamResponse::failure(err.mensaje())
            }
        }
    }

    async fn send_query(&self, body: &UpstreamQuery) -> Result<UpstreamResponse, UpstreamError> {
        let respuesta = self
            .http
            .post(self.endpoint("/api/query"))
            .timeout(self.config.query_timeout)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<UpstreamResponse>()
            .await?;
        Ok(respuesta)
    }

    /// Liveness probe against the upstream `/health` endpoint.
    pub async fn health(&self) -> bool {
        let result = self
            .http
            .get(self.endpoint("/health"))
            .timeout(self.config.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<Value>().await {
                    Ok(body) => body["status"] == "ok",
                    Err(_) => false,
                }
            }
            Ok(_) => false,
            Err(err) => {
                tracing::warn!(error = %err, "upstream health probe failed");
                false
            }
        }
    }

    /// Fetches an upstream endpoint verbatim, for the pass-through proxies.
    pub async fn fetch_json(&self, path: &str) -> Result<Value, UpstreamError> {
        let body = self
            .http
            .get(self.endpoint(path))
            .timeout(self.config.proxy_timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(body)
    }

    fn endpoint(&self, path: &str) -> String {
        self.config.upstream_endpoint(path)
    }
}
