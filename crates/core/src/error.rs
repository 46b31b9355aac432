use crate::envelope::{format_api_error, FieldErrors, VALIDATION_ERROR};
use crate::lifecycle::LifecycleAction;
use crate::types::CampaignStatus;
use thiserror::Error;

pub type CampaignResult<T> = Result<T, CampaignError>;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", format_api_error(VALIDATION_ERROR, Some(.0)))]
    Validation(FieldErrors),

    #[error("Cannot {action} campaign {id} while it is {status}")]
    InvalidTransition {
        id: String,
        action: LifecycleAction,
        status: CampaignStatus,
    },

    #[error("Cannot {action} campaign {id}: it was never provisioned on the ads platform")]
    NotProvisioned { id: String, action: LifecycleAction },

    #[error("Campaign {0} not found")]
    NotFound(String),

    #[error("Campaign {0} already has an action in progress")]
    Busy(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
