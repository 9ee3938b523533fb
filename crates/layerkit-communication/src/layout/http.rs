use super::{LayoutError, LayoutService};
use async_trait::async_trait;
use layerkit_designer::arrangement::{ArrangeRequest, ArrangeResponse};
use reqwest::Client;
use std::time::Duration;

/// Connection settings for [`HttpLayoutService`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpLayoutConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub auth_token: Option<String>,
}

impl Default for HttpLayoutConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:57988/api/canvas/arrange".to_string(),
            timeout: Duration::from_millis(120_000),
            auth_token: None,
        }
    }
}

/// JSON-over-HTTP layout service client.
#[derive(Debug, Clone)]
pub struct HttpLayoutService {
    client: Client,
    config: HttpLayoutConfig,
}

impl HttpLayoutService {
    pub fn new(config: HttpLayoutConfig) -> Result<Self, LayoutError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5).min(config.timeout))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpLayoutConfig {
        &self.config
    }
}

#[async_trait]
impl LayoutService for HttpLayoutService {
    fn name(&self) -> &str {
        &self.config.endpoint
    }

    async fn arrange(&self, request: &ArrangeRequest) -> Result<ArrangeResponse, LayoutError> {
        tracing::debug!(
            "POST {} ({} elements)",
            self.config.endpoint,
            request.selected_elements.len()
        );

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(token) = self.config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            tracing::warn!("Layout service answered {}", status);
            return Err(LayoutError::Status {
                code: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Err(LayoutError::Decode("empty response".to_string()));
        }

        serde_json::from_str(&body).map_err(|e| LayoutError::Decode(e.to_string()))
    }
}

impl HttpLayoutService {
    fn classify(&self, err: reqwest::Error) -> LayoutError {
        if err.is_timeout() {
            LayoutError::Timeout(self.config.timeout)
        } else if err.is_connect() {
            LayoutError::Unavailable(err.to_string())
        } else {
            LayoutError::Http(err)
        }
    }
}
