//! Campaign API router. Mounts all campaign endpoints under /api/v1.

use crate::handlers::{self, ManagementState};
use axum::routing::{get, post, put};
use axum::Router;

/// Build the campaign router with all endpoints.
pub fn management_router(state: ManagementState) -> Router {
    Router::new()
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route("/api/v1/campaigns/:id", get(handlers::get_campaign))
        .route("/api/v1/campaigns/:id/publish", post(handlers::publish_campaign))
        .route("/api/v1/campaigns/:id/enable", put(handlers::enable_campaign))
        .route("/api/v1/campaigns/:id/pause", put(handlers::pause_campaign))
        // Operational
        .route("/api/v1", get(handlers::api_info))
        .route("/api/v1/health", get(handlers::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::{AdsError, AdsGateway, Provisioned, SimulatedAdsGateway};
    use crate::store::CampaignStore;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use campaign_core::types::{Campaign, CampaignStatus};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Semaphore;
    use tower::ServiceExt;

    fn state(customer_id: Option<&str>) -> ManagementState {
        ManagementState {
            store: Arc::new(CampaignStore::new()),
            ads: Arc::new(SimulatedAdsGateway::new()),
            customer_id: customer_id.map(str::to_string),
            minimum_daily_budget: 1_000_000,
        }
    }

    fn create_body(budget: i64, asset_url: Option<&str>) -> Value {
        let start = (Utc::now() + Duration::days(7)).date_naive();
        let mut body = json!({
            "name": "Summer Sale",
            "objective": "Sales",
            "campaign_type": "Search",
            "daily_budget": budget,
            "start_date": start.to_string(),
            "ad_group_name": "Main Ad Group",
            "ad_headline": "Get 50% Off Today!",
            "ad_description": "Limited time offer on all products",
            "final_url": "https://example.com/sale"
        });
        if let Some(url) = asset_url {
            body["asset_url"] = json!(url);
        }
        body
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, asset_url: Option<&str>) -> Campaign {
        create_from(app, create_body(5_000_000, asset_url)).await
    }

    async fn create_from(app: &Router, body: Value) -> Campaign {
        let (status, body) = send(app, Method::POST, "/api/v1/campaigns", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_value(body["campaign"].clone()).unwrap()
    }

    /// Ads gateway that parks every `provision` call until released.
    struct GatedAds {
        inner: SimulatedAdsGateway,
        entered: Semaphore,
        release: Semaphore,
        provisioned: AtomicUsize,
    }

    impl GatedAds {
        fn new() -> Self {
            Self {
                inner: SimulatedAdsGateway::new(),
                entered: Semaphore::new(0),
                release: Semaphore::new(0),
                provisioned: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AdsGateway for GatedAds {
        async fn provision(&self, campaign: &Campaign, customer_id: &str) -> Result<Provisioned, AdsError> {
            self.entered.add_permits(1);
            self.release.acquire().await.unwrap().forget();
            self.provisioned.fetch_add(1, Ordering::SeqCst);
            self.inner.provision(campaign, customer_id).await
        }

        async fn enable(&self, google_campaign_id: &str, customer_id: &str) -> Result<(), AdsError> {
            self.inner.enable(google_campaign_id, customer_id).await
        }

        async fn pause(&self, google_campaign_id: &str, customer_id: &str) -> Result<(), AdsError> {
            self.inner.pause(google_campaign_id, customer_id).await
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let app = management_router(state(Some("1234567890")));
        let campaign = create(&app, None).await;
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert!(campaign.google_campaign_id.is_none());

        let (status, body) = send(&app, Method::GET, "/api/v1/campaigns", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["campaigns"][0]["id"], campaign.id.as_str());

        let (status, body) = send(&app, Method::GET, "/api/v1/campaigns?status=PUBLISHED", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_create_validation_envelope() {
        let app = management_router(state(Some("1234567890")));
        let (status, body) = send(&app, Method::POST, "/api/v1/campaigns", Some(create_body(500_000, None))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation error");
        assert_eq!(body["messages"]["daily_budget"][0], "must be >= 1000000");
    }

    #[tokio::test]
    async fn test_create_rejects_past_start_date() {
        let app = management_router(state(Some("1234567890")));
        let mut body = create_body(5_000_000, None);
        body["start_date"] = json!("2000-01-01");
        let (status, body) = send(&app, Method::POST, "/api/v1/campaigns", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["messages"]["start_date"][0], "Start date cannot be in the past");
    }

    #[tokio::test]
    async fn test_create_rejects_unreadable_body() {
        let app = management_router(state(Some("1234567890")));
        let (status, body) = send(&app, Method::POST, "/api/v1/campaigns", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let app = management_router(state(Some("1234567890")));
        let mut request = create_body(5_000_000, Some("https://cdn.example.com/brochure.pdf"));
        request["campaign_type"] = json!("Demand Gen");
        let campaign = create_from(&app, request).await;
        let base = format!("/api/v1/campaigns/{}", campaign.id);

        let (status, body) = send(&app, Method::POST, &format!("{base}/publish"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campaign"]["status"], "PUBLISHED");
        assert!(body["campaign"]["google_campaign_id"].is_string());
        let warnings = body["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].as_str().unwrap().contains("provisioned as Search"));
        assert!(warnings[1].as_str().unwrap().contains(".pdf"));

        let (status, body) = send(&app, Method::PUT, &format!("{base}/enable"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campaign"]["status"], "ENABLED");
        assert!(body.get("warnings").is_none());

        let (status, body) = send(&app, Method::PUT, &format!("{base}/pause"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campaign"]["status"], "PAUSED");

        let (status, body) = send(&app, Method::PUT, &format!("{base}/enable"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campaign"]["status"], "ENABLED");
    }

    #[tokio::test]
    async fn test_publish_without_warnings_omits_field() {
        let app = management_router(state(Some("1234567890")));
        let campaign = create(&app, Some("https://cdn.example.com/banner.png")).await;
        let (status, body) = send(&app, Method::POST, &format!("/api/v1/campaigns/{}/publish", campaign.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("warnings").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_publish_provisions_once() {
        let ads = Arc::new(GatedAds::new());
        let mut shared = state(Some("1234567890"));
        shared.ads = ads.clone();
        let app = management_router(shared);
        let campaign = create(&app, None).await;
        let uri = format!("/api/v1/campaigns/{}/publish", campaign.id);

        let first = tokio::spawn({
            let app = app.clone();
            let uri = uri.clone();
            async move { send(&app, Method::POST, &uri, None).await }
        });
        ads.entered.acquire().await.unwrap().forget();

        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("busy"));

        ads.release.add_permits(1);
        let (status, body) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["campaign"]["status"], "PUBLISHED");
        assert_eq!(ads.provisioned.load(Ordering::SeqCst), 1);

        // The claim is released once the first publish finishes.
        let (status, _) = send(&app, Method::PUT, &format!("/api/v1/campaigns/{}/enable", campaign.id), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_transition_is_rejected() {
        let app = management_router(state(Some("1234567890")));
        let campaign = create(&app, None).await;
        let (status, body) = send(&app, Method::PUT, &format!("/api/v1/campaigns/{}/enable", campaign.id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("DRAFT"));

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/campaigns/{}", campaign.id), None).await;
        assert_eq!(body["status"], "DRAFT");
    }

    #[tokio::test]
    async fn test_missing_customer_id() {
        let app = management_router(state(None));
        let campaign = create(&app, None).await;
        let (status, body) = send(&app, Method::POST, &format!("/api/v1/campaigns/{}/publish", campaign.id), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Google Ads customer ID not configured");
    }

    #[tokio::test]
    async fn test_unknown_campaign() {
        let app = management_router(state(Some("1234567890")));
        let (status, body) = send(&app, Method::GET, "/api/v1/campaigns/does-not-exist", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Campaign not found");
    }

    #[tokio::test]
    async fn test_bad_status_filter() {
        let app = management_router(state(Some("1234567890")));
        let (status, body) = send(&app, Method::GET, "/api/v1/campaigns?status=ARCHIVED", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("archived"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = management_router(state(None));
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ads_account_configured"], false);
    }
}
