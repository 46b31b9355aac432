//! Campaign Lifecycle Client: local cache, transition checks and
//! synchronization with the campaign API.

use crate::api::CampaignApi;
use crate::cache::CampaignCache;
use crate::inflight::{InFlight, InFlightGuard};
use campaign_core::lifecycle::{self, LifecycleAction};
use campaign_core::types::{
    Campaign, CampaignStatus, CreateCampaignRequest, MINIMUM_DAILY_BUDGET_MICROS,
};
use campaign_core::validation::validate_create;
use campaign_core::{CampaignError, CampaignResult};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Result of a successful publish. Warnings are non-fatal remote notes; the
/// campaign has already been merged into the cache.
#[derive(Debug, Clone)]
pub struct Published {
    pub campaign: Campaign,
    pub warnings: Vec<String>,
}

/// Holds the local campaign table and drives lifecycle actions against `A`.
///
/// Every successful operation replaces the affected record with the server's
/// copy; a failed one leaves the table as it was. Lifecycle actions on one
/// campaign never overlap.
pub struct LifecycleClient<A> {
    api: A,
    cache: CampaignCache,
    inflight: InFlight,
    minimum_daily_budget: i64,
}

impl<A: CampaignApi> LifecycleClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: CampaignCache::new(),
            inflight: InFlight::new(),
            minimum_daily_budget: MINIMUM_DAILY_BUDGET_MICROS,
        }
    }

    pub fn with_minimum_daily_budget(mut self, micros: i64) -> Self {
        self.minimum_daily_budget = micros;
        self
    }

    // ─── Operations ────────────────────────────────────────────────────────

    /// Validate and submit a new campaign. Invalid requests never reach the API.
    pub async fn create(&self, request: CreateCampaignRequest) -> CampaignResult<Campaign> {
        let request = request.normalized();
        if let Err(e) = validate_create(&request, self.minimum_daily_budget) {
            debug!(name = %request.name, error = %e, "Create rejected by local validation");
            metrics::counter!("client.create.rejected").increment(1);
            return Err(e);
        }

        let campaign = self.api.create_campaign(&request).await?;
        if campaign.status != CampaignStatus::Draft {
            warn!(campaign_id = %campaign.id, status = %campaign.status, "New campaign is not a draft");
        }

        info!(campaign_id = %campaign.id, name = %campaign.name, "Campaign created");
        self.cache.upsert(campaign.clone());
        Ok(campaign)
    }

    /// Fetch every campaign and replace the local table with the result.
    pub async fn list(&self) -> CampaignResult<Vec<Campaign>> {
        let campaigns = self.api.list_campaigns().await?;
        let received = campaigns.len();
        self.cache.replace_all(campaigns);
        debug!(received, cached = self.cache.len(), "Campaign list loaded");
        Ok(self.cache.snapshot(None))
    }

    /// Fetch one campaign and merge it.
    pub async fn refresh(&self, id: &str) -> CampaignResult<Campaign> {
        let campaign = self.api.get_campaign(id).await?;
        ensure_same_id(id, &campaign)?;
        self.cache.upsert(campaign.clone());
        Ok(campaign)
    }

    /// DRAFT -> PUBLISHED.
    pub async fn publish(&self, id: &str) -> CampaignResult<Published> {
        let (_guard, target) = self.begin(id, LifecycleAction::Publish)?;
        let response = self.api.publish_campaign(id).await?;
        let campaign = self.merge(id, target, response.campaign)?;

        if response.warnings.is_empty() {
            info!(campaign_id = id, google_campaign_id = ?campaign.google_campaign_id, "Campaign published");
        } else {
            warn!(campaign_id = id, warnings = ?response.warnings, "Campaign published with warnings");
        }

        Ok(Published {
            campaign,
            warnings: response.warnings,
        })
    }

    /// PUBLISHED | PAUSED -> ENABLED. Billing starts on the ads platform.
    pub async fn enable(&self, id: &str) -> CampaignResult<Campaign> {
        let (_guard, target) = self.begin(id, LifecycleAction::Enable)?;
        let campaign = self.api.enable_campaign(id).await?;
        let campaign = self.merge(id, target, campaign)?;
        info!(campaign_id = id, "Campaign enabled");
        Ok(campaign)
    }

    /// ENABLED -> PAUSED.
    pub async fn disable(&self, id: &str) -> CampaignResult<Campaign> {
        let (_guard, target) = self.begin(id, LifecycleAction::Disable)?;
        let campaign = self.api.pause_campaign(id).await?;
        let campaign = self.merge(id, target, campaign)?;
        info!(campaign_id = id, "Campaign disabled");
        Ok(campaign)
    }

    // ─── Cached views ──────────────────────────────────────────────────────

    pub fn campaign(&self, id: &str) -> Option<Campaign> {
        self.cache.get(id)
    }

    /// Cached campaigns, newest first, optionally filtered by status.
    pub fn campaigns(&self, status: Option<CampaignStatus>) -> Vec<Campaign> {
        self.cache.snapshot(status)
    }

    pub fn status_counts(&self) -> BTreeMap<CampaignStatus, usize> {
        self.cache.status_counts()
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.inflight.current(id).is_some()
    }

    // ─── Internals ─────────────────────────────────────────────────────────

    /// Claim the busy flag, then check the transition against the cached
    /// record. Nothing here touches the network.
    fn begin(
        &self,
        id: &str,
        action: LifecycleAction,
    ) -> CampaignResult<(InFlightGuard<'_>, CampaignStatus)> {
        let result = self.inflight.try_acquire(id, action).and_then(|guard| {
            let campaign = self
                .cache
                .get(id)
                .ok_or_else(|| CampaignError::NotFound(id.to_string()))?;
            let target = lifecycle::check(&campaign, action)?;
            Ok((guard, target))
        });

        if let Err(e) = &result {
            debug!(campaign_id = id, action = %action, error = %e, "Lifecycle action rejected");
            metrics::counter!("client.lifecycle.rejected", "action" => action.as_str()).increment(1);
        }
        result
    }

    /// Replace the cached record with the server's copy.
    fn merge(&self, id: &str, target: CampaignStatus, campaign: Campaign) -> CampaignResult<Campaign> {
        ensure_same_id(id, &campaign)?;
        if campaign.status != target {
            warn!(
                campaign_id = id,
                expected = %target,
                actual = %campaign.status,
                "Server returned an unexpected status; keeping the server's copy"
            );
        }
        self.cache.upsert(campaign.clone());
        Ok(campaign)
    }
}

fn ensure_same_id(requested: &str, campaign: &Campaign) -> CampaignResult<()> {
    if campaign.id == requested {
        Ok(())
    } else {
        Err(CampaignError::Protocol(format!(
            "asked for campaign {requested} but received {}",
            campaign.id
        )))
    }
}
