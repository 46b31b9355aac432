//! In-memory campaign store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing.

use campaign_core::types::{Campaign, CampaignStatus, CreateCampaignRequest};
use campaign_core::LifecycleAction;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Campaign not found")]
    NotFound,

    #[error("Campaign status changed to {current} while the request was in progress")]
    Conflict { current: CampaignStatus },

    #[error("Campaign is busy: {action} already in progress")]
    Busy { action: LifecycleAction },
}

/// Thread-safe in-memory store for campaigns.
pub struct CampaignStore {
    campaigns: DashMap<String, Campaign>,
    /// campaign_id -> lifecycle action currently talking to the ads platform
    in_progress: DashMap<String, LifecycleAction>,
}

impl CampaignStore {
    pub fn new() -> Self {
        info!("Campaign store initialized (in-memory, development mode)");
        Self {
            campaigns: DashMap::new(),
            in_progress: DashMap::new(),
        }
    }

    /// Newest first, optionally filtered by status.
    pub fn list_campaigns(&self, status: Option<CampaignStatus>) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|r| status.map_or(true, |s| r.value().status == s))
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }

    pub fn get_campaign(&self, id: &str) -> Option<Campaign> {
        self.campaigns.get(id).map(|r| r.value().clone())
    }

    /// Store a validated request as a new draft.
    pub fn create_campaign(&self, req: CreateCampaignRequest) -> Campaign {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            objective: req.objective,
            campaign_type: req.campaign_type,
            daily_budget: req.daily_budget,
            start_date: req.start_date,
            end_date: req.end_date,
            status: CampaignStatus::Draft,
            ad_group_name: req.ad_group_name,
            ad_headline: req.ad_headline,
            ad_description: req.ad_description,
            final_url: req.final_url,
            asset_url: req.asset_url,
            google_campaign_id: None,
            created_at: now,
            updated_at: now,
        };
        self.campaigns.insert(campaign.id.clone(), campaign.clone());
        info!(campaign_id = %campaign.id, name = %campaign.name, "Campaign stored");
        campaign
    }

    /// Move a campaign from `from` to `to`, failing if its status is no longer
    /// `from`. A remote id, once given, is never cleared.
    pub fn apply_transition(
        &self,
        id: &str,
        from: CampaignStatus,
        to: CampaignStatus,
        google_campaign_id: Option<String>,
    ) -> Result<Campaign, StoreError> {
        let mut entry = self.campaigns.get_mut(id).ok_or(StoreError::NotFound)?;
        let c = entry.value_mut();
        if c.status != from {
            return Err(StoreError::Conflict { current: c.status });
        }
        c.status = to;
        if let Some(google_id) = google_campaign_id {
            c.google_campaign_id = Some(google_id);
        }
        c.updated_at = Utc::now();
        Ok(c.clone())
    }

    /// Claim `id` for one lifecycle action. Held across the ads platform call
    /// so two requests never provision or toggle the same campaign at once.
    pub fn begin_transition(&self, id: &str, action: LifecycleAction) -> Result<TransitionGuard<'_>, StoreError> {
        match self.in_progress.entry(id.to_string()) {
            Entry::Occupied(current) => {
                debug!(campaign_id = id, requested = %action, in_progress = %current.get(), "Transition refused");
                Err(StoreError::Busy { action: *current.get() })
            }
            Entry::Vacant(slot) => {
                slot.insert(action);
                Ok(TransitionGuard {
                    store: self,
                    id: id.to_string(),
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

/// Releases the campaign claimed by [`CampaignStore::begin_transition`].
pub struct TransitionGuard<'a> {
    store: &'a CampaignStore,
    id: String,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.store.in_progress.remove(&self.id);
    }
}

impl Default for CampaignStore {
    fn default() -> Self {
        Self::new()
    }
}
