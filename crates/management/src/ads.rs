//! Ads platform gateway: the remote system campaigns are provisioned on.
//!
//! The real Google Ads integration is out of scope; [`SimulatedAdsGateway`]
//! mirrors its observable behavior: numeric campaign ids, new campaigns
//! created paused, every campaign served on the Search channel, and non-fatal
//! warnings for whatever it could not honor.

use async_trait::async_trait;
use campaign_core::types::{Campaign, CampaignType};
use dashmap::DashMap;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

/// Media types the platform can attach to an ad.
const SUPPORTED_ASSET_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "mp4", "mov", "webm"];

#[derive(Debug, Error)]
pub enum AdsError {
    #[error("Google Ads API error: campaign {0} not found")]
    UnknownCampaign(String),

    #[error("Google Ads API error: {0}")]
    Rejected(String),
}

/// A campaign created on the ads platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub google_campaign_id: String,
    pub warnings: Vec<String>,
}

/// Remote-side serving status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Paused,
    Enabled,
}

#[async_trait]
pub trait AdsGateway: Send + Sync {
    /// Create budget, campaign and ad on the platform. The remote campaign
    /// starts paused so nothing is billed until it is enabled.
    async fn provision(&self, campaign: &Campaign, customer_id: &str) -> Result<Provisioned, AdsError>;

    /// Start serving (and billing).
    async fn enable(&self, google_campaign_id: &str, customer_id: &str) -> Result<(), AdsError>;

    /// Stop serving.
    async fn pause(&self, google_campaign_id: &str, customer_id: &str) -> Result<(), AdsError>;
}

/// In-process stand-in for the ads platform.
pub struct SimulatedAdsGateway {
    /// google_campaign_id -> serving status
    campaigns: DashMap<String, RemoteStatus>,
}

impl SimulatedAdsGateway {
    pub fn new() -> Self {
        Self {
            campaigns: DashMap::new(),
        }
    }

    #[cfg(test)]
    fn remote_status(&self, google_campaign_id: &str) -> Option<RemoteStatus> {
        self.campaigns.get(google_campaign_id).map(|s| *s)
    }

    fn set_status(&self, google_campaign_id: &str, status: RemoteStatus) -> Result<(), AdsError> {
        let mut entry = self
            .campaigns
            .get_mut(google_campaign_id)
            .ok_or_else(|| AdsError::UnknownCampaign(google_campaign_id.to_string()))?;
        *entry = status;
        Ok(())
    }
}

impl Default for SimulatedAdsGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Only Search campaigns are created as requested; other types fall back to it.
fn channel_warnings(campaign: &Campaign) -> Vec<String> {
    if campaign.campaign_type == CampaignType::Search {
        Vec::new()
    } else {
        vec![format!(
            "Campaign type '{}' is not supported yet; provisioned as Search",
            campaign.campaign_type
        )]
    }
}

/// Warnings for assets that cannot be attached; the campaign is still created.
fn asset_warnings(campaign: &Campaign) -> Vec<String> {
    let Some(url) = campaign.asset_url.as_deref() else {
        return Vec::new();
    };
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.contains('/'));

    match extension {
        Some(ext) if SUPPORTED_ASSET_EXTENSIONS.contains(&ext.as_str()) => Vec::new(),
        Some(ext) => vec![format!("Asset {url} was not attached: unsupported media type '.{ext}'")],
        None => vec![format!("Asset {url} was not attached: media type could not be determined")],
    }
}

#[async_trait]
impl AdsGateway for SimulatedAdsGateway {
    async fn provision(&self, campaign: &Campaign, customer_id: &str) -> Result<Provisioned, AdsError> {
        if campaign.daily_budget <= 0 {
            return Err(AdsError::Rejected("budget amount must be positive".into()));
        }

        let google_campaign_id = loop {
            let candidate = rand::thread_rng().gen_range(10_000_000_000u64..100_000_000_000u64).to_string();
            if !self.campaigns.contains_key(&candidate) {
                break candidate;
            }
        };
        self.campaigns.insert(google_campaign_id.clone(), RemoteStatus::Paused);

        let mut warnings = channel_warnings(campaign);
        warnings.extend(asset_warnings(campaign));
        for w in &warnings {
            warn!(campaign_id = %campaign.id, warning = %w, "Provisioned with warning");
        }
        info!(
            campaign_id = %campaign.id,
            customer_id,
            google_campaign_id = %google_campaign_id,
            "Campaign provisioned (paused)"
        );

        Ok(Provisioned {
            google_campaign_id,
            warnings,
        })
    }

    async fn enable(&self, google_campaign_id: &str, customer_id: &str) -> Result<(), AdsError> {
        self.set_status(google_campaign_id, RemoteStatus::Enabled)?;
        info!(customer_id, google_campaign_id, "Remote campaign enabled");
        Ok(())
    }

    async fn pause(&self, google_campaign_id: &str, customer_id: &str) -> Result<(), AdsError> {
        self.set_status(google_campaign_id, RemoteStatus::Paused)?;
        info!(customer_id, google_campaign_id, "Remote campaign paused");
        Ok(())
    }
}
