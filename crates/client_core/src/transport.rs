//! reqwest-backed client for the chat and document-analysis endpoints.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde_json::Value;
use shared::{
    domain::FileHandle,
    protocol::{ChatRequest, HealthResponse, ANALYZE_PATH, CHAT_PATH, HEALTH_PATH, UPLOAD_FIELD},
};
use tracing::debug;
use url::Url;

use crate::{
    config::{parse_base_url, ClientSettings},
    error::ClientError,
    AssistantClient,
};

const CHAT_ENDPOINT: &str = "chat endpoint";
const ANALYZE_ENDPOINT: &str = "document-analysis endpoint";
const HEALTH_ENDPOINT: &str = "health endpoint";

#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    http: Client,
    base_url: Url,
}

impl HttpAssistantClient {
    /// `base_url` is expected to come from [`parse_base_url`].
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let base_url = parse_base_url(&settings.base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self::new(http, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &'static str, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl { endpoint, source })
    }
}

const UNREADABLE_BODY: &str = "<unreadable body>";

fn error_body(text: Result<String, reqwest::Error>) -> String {
    text.unwrap_or_else(|err| {
        debug!(error = %err, "failed to read error response body");
        UNREADABLE_BODY.to_string()
    })
}

async fn read_json_object(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<Value, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = error_body(response.text().await);
        return Err(ClientError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { endpoint, source })?;
    let body: Value =
        serde_json::from_slice(&bytes).map_err(|err| ClientError::MalformedBody {
            endpoint,
            reason: err.to_string(),
        })?;
    if !body.is_object() {
        return Err(ClientError::MalformedBody {
            endpoint,
            reason: "expected a JSON object".into(),
        });
    }
    Ok(body)
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn chat(&self, query: &str) -> Result<Value, ClientError> {
        let url = self.endpoint_url(CHAT_ENDPOINT, CHAT_PATH)?;
        debug!(%url, "posting chat query");
        let response = self
            .http
            .post(url)
            .json(&ChatRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: CHAT_ENDPOINT,
                source,
            })?;
        read_json_object(CHAT_ENDPOINT, response).await
    }

    async fn analyze_document(&self, file: &FileHandle) -> Result<Value, ClientError> {
        let url = self.endpoint_url(ANALYZE_ENDPOINT, ANALYZE_PATH)?;
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| ClientError::LocalFile {
                path: file.path.clone(),
                source,
            })?;
        let mime = mime_guess::from_path(&file.path).first_or_octet_stream();
        debug!(%url, file = %file.name, size = bytes.len(), mime = %mime, "uploading document");

        let part = multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(mime.essence_str())
            .map_err(|source| ClientError::Transport {
                endpoint: ANALYZE_ENDPOINT,
                source,
            })?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: ANALYZE_ENDPOINT,
                source,
            })?;
        read_json_object(ANALYZE_ENDPOINT, response).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint_url(HEALTH_ENDPOINT, HEALTH_PATH)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: HEALTH_ENDPOINT,
                source,
            })?;
        let body = read_json_object(HEALTH_ENDPOINT, response).await?;
        serde_json::from_value(body).map_err(|err| ClientError::MalformedBody {
            endpoint: HEALTH_ENDPOINT,
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
