//! Per-campaign busy flag for lifecycle actions.

use campaign_core::{CampaignError, CampaignResult, LifecycleAction};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

/// campaign_id -> action currently in flight.
#[derive(Default)]
pub(crate) struct InFlight {
    actions: DashMap<String, LifecycleAction>,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self {
            actions: DashMap::new(),
        }
    }

    /// Mark `id` busy for `action`. Fails if any action is already in flight
    /// for the same id; other ids are unaffected.
    pub(crate) fn try_acquire(&self, id: &str, action: LifecycleAction) -> CampaignResult<InFlightGuard<'_>> {
        match self.actions.entry(id.to_string()) {
            Entry::Occupied(current) => {
                debug!(campaign_id = id, requested = %action, in_flight = %current.get(), "Campaign busy");
                Err(CampaignError::Busy(id.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(action);
                Ok(InFlightGuard {
                    owner: self,
                    id: id.to_string(),
                })
            }
        }
    }

    pub(crate) fn current(&self, id: &str) -> Option<LifecycleAction> {
        self.actions.get(id).map(|a| *a)
    }
}

/// Clears the busy flag when dropped, whichever way the action ended.
pub(crate) struct InFlightGuard<'a> {
    owner: &'a InFlight,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.actions.remove(&self.id);
    }
}
