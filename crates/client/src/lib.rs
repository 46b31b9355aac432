//! Campaign Lifecycle Client.
//!
//! Keeps a local copy of the campaign table, enforces the lifecycle transition
//! rules before anything is sent, serializes actions per campaign and turns
//! each outcome into an operator notice.

pub mod api;
mod cache;
pub mod http;
mod inflight;
pub mod lifecycle;
pub mod notice;

pub use api::CampaignApi;
pub use http::HttpCampaignApi;
pub use lifecycle::{LifecycleClient, Published};
pub use notice::{Notice, NoticeKind, Operation};
