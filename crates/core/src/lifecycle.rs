//! Campaign lifecycle transitions.
//!
//! The whole state machine lives in [`TRANSITIONS`]; every check in the client
//! and the backend goes through [`transition`] so there is one place to read
//! which moves are legal.

use crate::error::{CampaignError, CampaignResult};
use crate::types::{Campaign, CampaignStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operator action that moves a campaign between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Draft -> Published (first remote provisioning)
    Publish,
    /// Published | Paused -> Enabled
    Enable,
    /// Enabled -> Paused
    Disable,
}

impl LifecycleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleAction::Publish => "publish",
            LifecycleAction::Enable => "enable",
            LifecycleAction::Disable => "disable",
        }
    }

    /// Actions that address the remote campaign need its remote id.
    pub fn requires_provisioning(self) -> bool {
        !matches!(self, LifecycleAction::Publish)
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(from, action, to)`. Anything not listed is rejected.
pub const TRANSITIONS: [(CampaignStatus, LifecycleAction, CampaignStatus); 4] = [
    (CampaignStatus::Draft, LifecycleAction::Publish, CampaignStatus::Published),
    (CampaignStatus::Published, LifecycleAction::Enable, CampaignStatus::Enabled),
    (CampaignStatus::Paused, LifecycleAction::Enable, CampaignStatus::Enabled),
    (CampaignStatus::Enabled, LifecycleAction::Disable, CampaignStatus::Paused),
];

/// Target status of `action` from `from`, if the move is legal.
pub fn transition(from: CampaignStatus, action: LifecycleAction) -> Option<CampaignStatus> {
    TRANSITIONS
        .iter()
        .find(|(f, a, _)| *f == from && *a == action)
        .map(|(_, _, to)| *to)
}

/// Actions that may be offered for a campaign in `status`.
pub fn allowed_actions(status: CampaignStatus) -> Vec<LifecycleAction> {
    TRANSITIONS
        .iter()
        .filter(|(f, _, _)| *f == status)
        .map(|(_, a, _)| *a)
        .collect()
}

/// Validate `action` against the campaign's current status and provisioning
/// state, returning the status the campaign should end up in.
pub fn check(campaign: &Campaign, action: LifecycleAction) -> CampaignResult<CampaignStatus> {
    let to = transition(campaign.status, action).ok_or_else(|| CampaignError::InvalidTransition {
        id: campaign.id.clone(),
        action,
        status: campaign.status,
    })?;
    if action.requires_provisioning() && !campaign.is_provisioned() {
        return Err(CampaignError::NotProvisioned {
            id: campaign.id.clone(),
            action,
        });
    }
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    const ACTIONS: [LifecycleAction; 3] = [
        LifecycleAction::Publish,
        LifecycleAction::Enable,
        LifecycleAction::Disable,
    ];

    fn campaign(status: CampaignStatus, google_id: Option<&str>) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: "c-1".into(),
            name: "Summer Sale".into(),
            objective: Default::default(),
            campaign_type: Default::default(),
            daily_budget: 5_000_000,
            start_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            end_date: None,
            status,
            ad_group_name: "g".into(),
            ad_headline: "h".into(),
            ad_description: "d".into(),
            final_url: "https://example.com".into(),
            asset_url: None,
            google_campaign_id: google_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_only_table_moves_are_legal() {
        let mut legal = 0;
        for from in CampaignStatus::ALL {
            for action in ACTIONS {
                if let Some(to) = transition(from, action) {
                    legal += 1;
                    assert!(TRANSITIONS.contains(&(from, action, to)));
                }
            }
        }
        assert_eq!(legal, TRANSITIONS.len());
    }

    #[test]
    fn test_nothing_returns_to_draft() {
        assert!(TRANSITIONS.iter().all(|(_, _, to)| *to != CampaignStatus::Draft));
    }

    #[test]
    fn test_published_only_reachable_from_draft() {
        for (from, _, to) in TRANSITIONS {
            if to == CampaignStatus::Published {
                assert_eq!(from, CampaignStatus::Draft);
            }
        }
        assert_eq!(
            allowed_actions(CampaignStatus::Published),
            vec![LifecycleAction::Enable]
        );
    }

    #[test]
    fn test_allowed_actions() {
        assert_eq!(allowed_actions(CampaignStatus::Draft), vec![LifecycleAction::Publish]);
        assert_eq!(allowed_actions(CampaignStatus::Enabled), vec![LifecycleAction::Disable]);
        assert_eq!(allowed_actions(CampaignStatus::Paused), vec![LifecycleAction::Enable]);
    }

    #[test]
    fn test_check_rejects_enable_on_draft() {
        let err = check(&campaign(CampaignStatus::Draft, None), LifecycleAction::Enable).unwrap_err();
        assert!(matches!(
            err,
            CampaignError::InvalidTransition {
                status: CampaignStatus::Draft,
                action: LifecycleAction::Enable,
                ..
            }
        ));
    }

    #[test]
    fn test_check_requires_provisioning_for_enable() {
        let err = check(&campaign(CampaignStatus::Published, None), LifecycleAction::Enable)
            .unwrap_err();
        assert!(matches!(err, CampaignError::NotProvisioned { .. }));

        let to = check(
            &campaign(CampaignStatus::Published, Some("123")),
            LifecycleAction::Enable,
        )
        .unwrap();
        assert_eq!(to, CampaignStatus::Enabled);
    }

    #[test]
    fn test_check_publish_needs_no_remote_id() {
        let to = check(&campaign(CampaignStatus::Draft, None), LifecycleAction::Publish).unwrap();
        assert_eq!(to, CampaignStatus::Published);
    }
}
