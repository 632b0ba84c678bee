//! HTTP client for the analysis service endpoints.

use super::ClientError;
use crate::models::{AnalyzeRequest, Business, CategoryInfo, HealthStatus, HistoryResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for the analysis service.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 180,
        }
    }
}

/// Endpoints exposed by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    History,
    MockAnalysis,
    HistoryByCategory(String),
    Categories,
    Health,
    Analyze,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::History => "/history".to_string(),
            Endpoint::MockAnalysis => "/mock-analysis".to_string(),
            Endpoint::HistoryByCategory(id) => format!("/history/category/{}", id),
            Endpoint::Categories => "/categories".to_string(),
            Endpoint::Health => "/health".to_string(),
            Endpoint::Analyze => "/analyze".to_string(),
        }
    }
}

/// Submits URLs for analysis.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Business, ClientError>;
}

/// Client for the analysis service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiClientConfig,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ClientError> {
        debug!(
            "Creating API client for {} (timeout {}s)",
            config.base_url, config.timeout_seconds
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Absolute URL of an endpoint.
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }

    /// `GET /history/category/{id}`
    pub async fn history_by_category(&self, category_id: &str) -> Result<Vec<Business>, ClientError> {
        self.fetch_businesses(&Endpoint::HistoryByCategory(category_id.to_string()))
            .await
    }

    /// `GET /categories`
    pub async fn categories(&self) -> Result<Vec<CategoryInfo>, ClientError> {
        self.get_json(&Endpoint::Categories).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json(&Endpoint::Health).await
    }

    /// `POST /analyze`
    pub async fn submit_analysis(&self, request: &AnalyzeRequest) -> Result<Business, ClientError> {
        let endpoint = Endpoint::Analyze;
        info!("Submitting {} for analysis", request.url);

        let builder = self.http_client.post(self.url(&endpoint)).json(request);
        let body = self.send(builder).await?;
        decode(&endpoint, &body)
    }

    /// Fetch an endpoint that answers with a `{ businesses: [...] }` envelope,
    /// such as `GET /history` or `GET /mock-analysis`.
    pub async fn fetch_businesses(&self, endpoint: &Endpoint) -> Result<Vec<Business>, ClientError> {
        let history: HistoryResponse = self.get_json(endpoint).await?;
        debug!(
            "{} returned {} businesses",
            endpoint.path(),
            history.businesses.len()
        );
        Ok(history.businesses)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ClientError> {
        debug!("GET {}", self.url(endpoint));
        let body = self.send(self.http_client.get(self.url(endpoint))).await?;
        decode(endpoint, &body)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, ClientError> {
        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(self.config.timeout_seconds)
        } else if error.is_connect() {
            ClientError::Connect(self.config.base_url.clone())
        } else {
            ClientError::Transport(error)
        }
    }
}

#[async_trait]
impl AnalysisService for ApiClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Business, ClientError> {
        self.submit_analysis(request).await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &Endpoint, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode {
        endpoint: endpoint.path(),
        source,
    })
}
