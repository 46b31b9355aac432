//! Campaign data model, lifecycle rules and shared plumbing for the console,
//! the lifecycle client and the reference backend.

pub mod config;
pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod types;
pub mod validation;

pub use config::AppConfig;
pub use envelope::{ApiErrorEnvelope, FieldErrors};
pub use error::{CampaignError, CampaignResult};
pub use lifecycle::LifecycleAction;
pub use types::{Campaign, CampaignObjective, CampaignStatus, CampaignType, CreateCampaignRequest};
