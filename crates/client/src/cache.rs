//! Local campaign table keyed by id. Only the lifecycle client writes to it.

use campaign_core::types::{Campaign, CampaignStatus};
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Last-known-good copy of the remote campaign records.
#[derive(Default)]
pub(crate) struct CampaignCache {
    store: DashMap<String, Campaign>,
}

impl CampaignCache {
    pub(crate) fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Swap the whole table for `campaigns`. Duplicate ids collapse to the last one.
    pub(crate) fn replace_all(&self, campaigns: Vec<Campaign>) {
        self.store.clear();
        for campaign in campaigns {
            self.store.insert(campaign.id.clone(), campaign);
        }
    }

    /// Insert or replace the record with the same id.
    pub(crate) fn upsert(&self, campaign: Campaign) {
        self.store.insert(campaign.id.clone(), campaign);
    }

    pub(crate) fn get(&self, id: &str) -> Option<Campaign> {
        self.store.get(id).map(|r| r.value().clone())
    }

    /// Newest first, optionally restricted to one status.
    pub(crate) fn snapshot(&self, status: Option<CampaignStatus>) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .store
            .iter()
            .filter(|r| status.map_or(true, |s| r.value().status == s))
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        campaigns
    }

    /// Count per status; every status is present, possibly with zero.
    pub(crate) fn status_counts(&self) -> BTreeMap<CampaignStatus, usize> {
        let mut counts: BTreeMap<CampaignStatus, usize> =
            CampaignStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for entry in self.store.iter() {
            *counts.entry(entry.value().status).or_default() += 1;
        }
        counts
    }

    pub(crate) fn len(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn campaign(id: &str, status: CampaignStatus, age_mins: i64) -> Campaign {
        let at = Utc::now() - Duration::minutes(age_mins);
        Campaign {
            id: id.into(),
            name: format!("Campaign {id}"),
            objective: Default::default(),
            campaign_type: Default::default(),
            daily_budget: 1_000_000,
            start_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            end_date: None,
            status,
            ad_group_name: "g".into(),
            ad_headline: "h".into(),
            ad_description: "d".into(),
            final_url: "https://example.com".into(),
            asset_url: None,
            google_campaign_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_replace_all_drops_stale_records() {
        let cache = CampaignCache::new();
        cache.upsert(campaign("old", CampaignStatus::Draft, 10));
        cache.replace_all(vec![
            campaign("a", CampaignStatus::Draft, 5),
            campaign("b", CampaignStatus::Paused, 1),
        ]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("old").is_none());
    }

    #[test]
    fn test_replace_all_collapses_duplicate_ids() {
        let cache = CampaignCache::new();
        cache.replace_all(vec![
            campaign("a", CampaignStatus::Draft, 5),
            campaign("a", CampaignStatus::Published, 5),
        ]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().status, CampaignStatus::Published);
    }

    #[test]
    fn test_snapshot_newest_first_and_filtered() {
        let cache = CampaignCache::new();
        cache.replace_all(vec![
            campaign("oldest", CampaignStatus::Draft, 30),
            campaign("newest", CampaignStatus::Draft, 1),
            campaign("paused", CampaignStatus::Paused, 10),
        ]);
        let ids: Vec<String> = cache.snapshot(None).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["newest", "paused", "oldest"]);

        let drafts = cache.snapshot(Some(CampaignStatus::Draft));
        assert_eq!(drafts.len(), 2);
        assert!(cache.snapshot(Some(CampaignStatus::Enabled)).is_empty());
    }

    #[test]
    fn test_status_counts_include_zeroes() {
        let cache = CampaignCache::new();
        cache.replace_all(vec![
            campaign("a", CampaignStatus::Draft, 3),
            campaign("b", CampaignStatus::Draft, 2),
            campaign("c", CampaignStatus::Enabled, 1),
        ]);
        let counts = cache.status_counts();
        assert_eq!(counts[&CampaignStatus::Draft], 2);
        assert_eq!(counts[&CampaignStatus::Enabled], 1);
        assert_eq!(counts[&CampaignStatus::Published], 0);
        assert_eq!(counts[&CampaignStatus::Paused], 0);
    }
}
