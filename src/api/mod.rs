//! HTTP client for the customer registry API.
//!
//! `ApiClient` is built from an [`ApiConfig`] and injected where needed, so
//! tests can point it at a local mock server. The agent is configured with
//! `http_status_as_error(false)`: non-2xx responses come back as normal
//! responses and are mapped to [`ApiError::Server`], carrying the message
//! from the server's `{"error": "..."}` body when present.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error};

use crate::model::{Client, ClientPayload};

/// Connection settings for the registry API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Errors from registry API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid request body: {0}")]
    Encode(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("{message}")]
    Server { status: u16, message: String },
}

/// Synchronous client for the `/clientes` endpoints.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /clientes`, optionally with a `search` term the server filters by.
    pub fn list(&self, search: Option<&str>) -> Result<Vec<Client>, ApiError> {
        let url = format!("{}/clientes", self.base_url);
        debug!(%url, search = search.unwrap_or(""), "listing clients");
        let mut request = self.agent.get(&url);
        if let Some(term) = search {
            request = request.query("search", term);
        }
        let mut response = request.call().map_err(transport)?;
        let (status, body) = read_response(&mut response)?;
        expect_success(status, &body)?;
        serde_json::from_str(&body).map_err(decode)
    }

    /// `GET /clientes/{id}`.
    pub fn get(&self, id: i64) -> Result<Client, ApiError> {
        let url = format!("{}/clientes/{id}", self.base_url);
        debug!(%url, "fetching client");
        let mut response = self.agent.get(&url).call().map_err(transport)?;
        let (status, body) = read_response(&mut response)?;
        expect_success(status, &body)?;
        serde_json::from_str(&body).map_err(decode)
    }

    /// `POST /clientes`.
    pub fn create(&self, payload: &ClientPayload) -> Result<Client, ApiError> {
        let url = format!("{}/clientes", self.base_url);
        debug!(%url, name = %payload.name, "creating client");
        let body = serde_json::to_string(payload).map_err(encode)?;
        let mut response = self
            .agent
            .post(&url)
            .content_type("application/json")
            .send(body.as_bytes())
            .map_err(transport)?;
        let (status, body) = read_response(&mut response)?;
        expect_success(status, &body)?;
        serde_json::from_str(&body).map_err(decode)
    }

    /// `PUT /clientes/{id}`.
    pub fn update(&self, id: i64, payload: &ClientPayload) -> Result<Client, ApiError> {
        let url = format!("{}/clientes/{id}", self.base_url);
        debug!(%url, name = %payload.name, "updating client");
        let body = serde_json::to_string(payload).map_err(encode)?;
        let mut response = self
            .agent
            .put(&url)
            .content_type("application/json")
            .send(body.as_bytes())
            .map_err(transport)?;
        let (status, body) = read_response(&mut response)?;
        expect_success(status, &body)?;
        serde_json::from_str(&body).map_err(decode)
    }

    /// `DELETE /clientes/{id}`.
    pub fn remove(&self, id: i64) -> Result<(), ApiError> {
        let url = format!("{}/clientes/{id}", self.base_url);
        debug!(%url, "deleting client");
        let mut response = self.agent.delete(&url).call().map_err(transport)?;
        let (status, body) = read_response(&mut response)?;
        expect_success(status, &body)
    }
}

fn transport(e: ureq::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

fn encode(e: serde_json::Error) -> ApiError {
    ApiError::Encode(e.to_string())
}

fn decode(e: serde_json::Error) -> ApiError {
    ApiError::Decode(e.to_string())
}

fn read_response(
    response: &mut ureq::http::Response<ureq::Body>,
) -> Result<(u16, String), ApiError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok((status, body))
}

/// Any 2xx counts as success; everything else becomes `ApiError::Server`.
fn expect_success(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = error_message(body, status);
    error!(status, %message, "server rejected request");
    Err(ApiError::Server { status, message })
}

fn error_message(body: &str, status: u16) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("server returned status {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_the_whole_2xx_range() {
        assert!(expect_success(200, "").is_ok());
        assert!(expect_success(201, "{}").is_ok());
        assert!(expect_success(204, "").is_ok());
        assert!(expect_success(299, "").is_ok());
        assert!(expect_success(199, "").is_err());
        assert!(expect_success(301, "").is_err());
    }

    #[test]
    fn server_error_message_comes_from_error_body() {
        let err = expect_success(409, r#"{"error": "CPF already registered"}"#).unwrap_err();
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "CPF already registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_error_falls_back_to_raw_body_or_status() {
        assert_eq!(error_message("plain failure", 500), "plain failure");
        assert_eq!(error_message("  ", 502), "server returned status 502");
        assert_eq!(error_message("", 404), "server returned status 404");
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new(ApiConfig {
            base_url: "http://localhost:3000/".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
