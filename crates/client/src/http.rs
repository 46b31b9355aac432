//! reqwest-backed implementation of [`CampaignApi`].

use crate::api::CampaignApi;
use async_trait::async_trait;
use campaign_core::config::ApiConfig;
use campaign_core::types::{
    Campaign, CampaignListResponse, CampaignResponse, CreateCampaignRequest, PublishResponse,
};
use campaign_core::{ApiErrorEnvelope, CampaignError, CampaignResult};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// JSON-over-HTTP client for the campaign API.
#[derive(Clone)]
pub struct HttpCampaignApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCampaignApi {
    pub fn new(config: &ApiConfig) -> CampaignResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CampaignError::Config(format!("invalid API base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(CampaignError::Config(format!(
                "API base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| CampaignError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended; ids are percent-encoded as path segments.
    fn endpoint(&self, segments: &[&str]) -> CampaignResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                CampaignError::Config(format!("API base URL {} cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&CreateCampaignRequest>,
    ) -> CampaignResult<T> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "Campaign API request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, url = %url, error = %e, "Campaign API unreachable");
            CampaignError::Transport(e.to_string())
        })?;

        decode(response).await
    }
}

/// Map a response into `T`, or into the formatted error envelope on non-2xx.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> CampaignResult<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| CampaignError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = match serde_json::from_slice::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => envelope.format(),
            Err(_) => format!("Request failed with status {}", status.as_u16()),
        };
        debug!(status = status.as_u16(), message = %message, "Campaign API error response");
        return Err(CampaignError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| CampaignError::Protocol(e.to_string()))
}

#[async_trait]
impl CampaignApi for HttpCampaignApi {
    async fn list_campaigns(&self) -> CampaignResult<Vec<Campaign>> {
        let resp: CampaignListResponse = self.call(Method::GET, &["campaigns"], None).await?;
        Ok(resp.campaigns)
    }

    async fn get_campaign(&self, id: &str) -> CampaignResult<Campaign> {
        self.call(Method::GET, &["campaigns", id], None).await
    }

    async fn create_campaign(&self, request: &CreateCampaignRequest) -> CampaignResult<Campaign> {
        let resp: CampaignResponse = self
            .call(Method::POST, &["campaigns"], Some(request))
            .await?;
        Ok(resp.campaign)
    }

    async fn publish_campaign(&self, id: &str) -> CampaignResult<PublishResponse> {
        self.call(Method::POST, &["campaigns", id, "publish"], None).await
    }

    async fn enable_campaign(&self, id: &str) -> CampaignResult<Campaign> {
        let resp: CampaignResponse = self
            .call(Method::PUT, &["campaigns", id, "enable"], None)
            .await?;
        Ok(resp.campaign)
    }

    async fn pause_campaign(&self, id: &str) -> CampaignResult<Campaign> {
        let resp: CampaignResponse = self
            .call(Method::PUT, &["campaigns", id, "pause"], None)
            .await?;
        Ok(resp.campaign)
    }
}
