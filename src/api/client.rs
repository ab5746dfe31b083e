use crate::api::models::{ModelList, RequestBody};
use crate::config::{normalize_api_base, Config};
use crate::error::{Result, WeatherbotError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Client for an OpenAI-compatible chat-completions server.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_base: String,
}

impl ChatClient {
    pub fn new(endpoint: &str, api_key: Option<&str>, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                    WeatherbotError::Config(format!("Invalid authorization header: {}", e))
                })?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: normalize_api_base(endpoint),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base,
            config.api_key.as_deref(),
            config.request_timeout,
        )
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// POST `/chat/completions` and return the decoded response body.
    pub async fn chat(&self, request_body: &RequestBody) -> Result<Value> {
        let url = format!("{}/chat/completions", self.api_base);
        let response = self.http.post(&url).json(request_body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WeatherbotError::Api { status, message });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET `/models` and return the served model ids.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.api_base);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WeatherbotError::Api { status, message });
        }

        let models: ModelList = response.json().await?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}
