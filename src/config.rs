// src/config.rs
use std::time::Duration;

/// Process-wide settings, read once in `main` and shared read-only after.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Base URL of the query-processing server.
    pub upstream_url: String,
    /// Address the relay itself listens on.
    pub bind_addr: String,
    pub query_timeout: Duration,
    pub proxy_timeout: Duration,
    pub health_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream_url: "http://localhost:3000".to_string(),
            bind_addr: "0.0.0.0:5000".to_string(),
            query_timeout: Duration::from_secs(60),
            proxy_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(5),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("UPSTREAM_URL") {
            config.upstream_url = url;
        }
        if let Ok(addr) = std::env::var("RELAY_ADDR") {
            config.bind_addr = addr;
        }
        config
    }

    /// Joins a path onto the upstream base, tolerating a trailing slash.
    pub fn upstream_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.upstream_url.trim_end_matches('/'), path)
    }
}
