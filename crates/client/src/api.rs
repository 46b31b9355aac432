//! The campaign API seam. [`crate::HttpCampaignApi`] talks to a real backend;
//! tests substitute a mock.

use async_trait::async_trait;
use campaign_core::types::{Campaign, CreateCampaignRequest, PublishResponse};
use campaign_core::CampaignResult;

/// Remote system of record for campaigns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignApi: Send + Sync {
    /// `GET /campaigns`
    async fn list_campaigns(&self) -> CampaignResult<Vec<Campaign>>;

    /// `GET /campaigns/{id}`
    async fn get_campaign(&self, id: &str) -> CampaignResult<Campaign>;

    /// `POST /campaigns`
    async fn create_campaign(&self, request: &CreateCampaignRequest) -> CampaignResult<Campaign>;

    /// `POST /campaigns/{id}/publish`
    async fn publish_campaign(&self, id: &str) -> CampaignResult<PublishResponse>;

    /// `PUT /campaigns/{id}/enable`
    async fn enable_campaign(&self, id: &str) -> CampaignResult<Campaign>;

    /// `PUT /campaigns/{id}/pause`
    async fn pause_campaign(&self, id: &str) -> CampaignResult<Campaign>;
}
