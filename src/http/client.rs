use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{ApiError, MutationGateway, WorkflowTransport};
use crate::config::ApiConfig;
use crate::observability::api_metrics;
use crate::workflows::{ListParams, ResultPage};

/// Rate-limited HTTP client for the workflow admin API
#[derive(Debug, Clone)]
pub struct HttpWorkflowClient {
    http: Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    api_root: Url,
}

impl HttpWorkflowClient {
    /// Create a new client from the `[api]` configuration section
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let api_root = Url::parse(&config.root)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ApiError::InvalidConfig {
                message: format!("API root must be an http(s) URL, got '{}'", config.root),
            })?;

        let per_second = NonZeroU32::new(config.rate_limit.requests_per_second).ok_or_else(|| {
            ApiError::InvalidConfig {
                message: "rate_limit.requests_per_second must be greater than zero".to_string(),
            }
        })?;
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).unwrap_or(per_second);
        let rate_limiter = Arc::new(RateLimiter::direct(
            Quota::per_second(per_second).allow_burst(burst),
        ));

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ApiError::InvalidConfig {
                    message: "API token contains characters not allowed in a header".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .map_err(|e| ApiError::InvalidConfig {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            rate_limiter,
            api_root,
        })
    }

    pub fn api_root(&self) -> &str {
        self.api_root.as_str()
    }

    /// `{api_root}/segment/...` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidConfig {
                message: format!("API root '{}' cannot carry a path", self.api_root),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Wait for rate limit permission before touching the network
    async fn throttle(&self) {
        if self.rate_limiter.check().is_err() {
            api_metrics().record_rate_limit_wait();
            debug!("Rate limit reached, waiting for permit");
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
                .await;
        }
        api_metrics().record_request();
    }

    /// Turn a non-2xx response into an error carrying the raw body
    async fn error_for_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        api_metrics().record_error();
        warn!(status = status.as_u16(), body = %body, "Workflow API returned an error");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl WorkflowTransport for HttpWorkflowClient {
    async fn list_workflows(&self, params: &ListParams) -> Result<ResultPage, ApiError> {
        self.throttle().await;
        let url = self.endpoint(&["workflow"])?;
        debug!(url = %url, query = ?params.query_pairs(), "GET workflows");

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .inspect_err(|_| api_metrics().record_error())?;
        let response = Self::error_for_status(response).await?;

        let bytes = response.bytes().await?;
        serde_json::from_slice::<ResultPage>(&bytes).map_err(|e| {
            api_metrics().record_error();
            ApiError::Decode {
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl MutationGateway for HttpWorkflowClient {
    async fn delete_workflow(&self, id: &str) -> Result<(), ApiError> {
        self.throttle().await;
        let url = self.endpoint(&["workflow", id])?;
        debug!(url = %url, "DELETE workflow");

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .inspect_err(|_| api_metrics().record_error())?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}
