//! Outcome classification for operator feedback.
//!
//! Each client operation ends in exactly one [`Notice`]. Publish warnings get
//! their own kind so they are never shown as a plain success or as an error.

use crate::lifecycle::Published;
use campaign_core::CampaignError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// The client operation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Refresh,
    Publish,
    Enable,
    Disable,
}

impl Operation {
    /// Message used when the failure carries nothing worth showing, e.g. a
    /// network error.
    fn generic_failure(self) -> &'static str {
        match self {
            Operation::Create => "Failed to create campaign",
            Operation::List => "Failed to load campaigns",
            Operation::Refresh => "Failed to load campaign",
            Operation::Publish => "Failed to publish campaign",
            Operation::Enable => "Failed to enable campaign",
            Operation::Disable => "Failed to disable campaign",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn created() -> Self {
        Self::new(NoticeKind::Success, "Campaign created successfully!")
    }

    pub fn published(outcome: &Published) -> Self {
        if outcome.warnings.is_empty() {
            Self::new(
                NoticeKind::Success,
                "Campaign published to Google Ads successfully!",
            )
        } else {
            Self::new(
                NoticeKind::Warning,
                format!(
                    "Campaign published with warnings: {}",
                    outcome.warnings.join("; ")
                ),
            )
        }
    }

    /// Enabling always starts billing, whether the campaign was freshly
    /// published or paused.
    pub fn enabled() -> Self {
        Self::new(
            NoticeKind::Success,
            "Campaign enabled successfully! Billing is now active.",
        )
    }

    pub fn disabled() -> Self {
        Self::new(NoticeKind::Success, "Campaign disabled successfully!")
    }

    pub fn failure(operation: Operation, error: &CampaignError) -> Self {
        let message = match error {
            CampaignError::Transport(_)
            | CampaignError::Protocol(_)
            | CampaignError::Serialization(_)
            | CampaignError::Io(_)
            | CampaignError::Internal(_) => operation.generic_failure().to_string(),
            other => other.to_string(),
        };
        Self::new(NoticeKind::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}
