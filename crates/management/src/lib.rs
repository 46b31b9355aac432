//! Reference campaign API, the HTTP system of record the console talks to.
//!
//! Data stored in DashMap (development); the ads platform is reached through
//! the [`AdsGateway`] trait.

pub mod ads;
pub mod handlers;
pub mod router;
pub mod server;
pub mod store;

pub use ads::{AdsGateway, SimulatedAdsGateway};
pub use handlers::ManagementState;
pub use router::management_router;
pub use server::ManagementServer;
pub use store::CampaignStore;
