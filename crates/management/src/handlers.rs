//! Axum REST handlers for the campaign API.

use crate::ads::{AdsError, AdsGateway};
use crate::store::{CampaignStore, StoreError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use campaign_core::lifecycle::{self, LifecycleAction};
use campaign_core::types::{
    Campaign, CampaignListResponse, CampaignResponse, CampaignStatus, CreateCampaignRequest,
    PublishResponse,
};
use campaign_core::validation::{check_start_date, field_errors};
use campaign_core::ApiErrorEnvelope;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Shared campaign API state.
#[derive(Clone)]
pub struct ManagementState {
    pub store: Arc<CampaignStore>,
    pub ads: Arc<dyn AdsGateway>,
    /// Ads platform account; lifecycle calls are refused without it.
    pub customer_id: Option<String>,
    pub minimum_daily_budget: i64,
}

/// Non-2xx response carrying the `{ error, messages? }` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    envelope: ApiErrorEnvelope,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            envelope: ApiErrorEnvelope::new(error),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Campaign not found")
    }

    fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::not_found(),
            StoreError::Conflict { .. } | StoreError::Busy { .. } => {
                ApiError::new(StatusCode::CONFLICT, e.to_string())
            }
        }
    }
}

impl From<AdsError> for ApiError {
    fn from(e: AdsError) -> Self {
        ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
    }
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn list_campaigns(
    State(state): State<ManagementState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CampaignListResponse>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<CampaignStatus>().map_err(ApiError::bad_request)?),
        None => None,
    };
    let campaigns = state.store.list_campaigns(status);
    Ok(Json(CampaignListResponse {
        count: Some(campaigns.len()),
        campaigns,
    }))
}

pub async fn get_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    state
        .store
        .get_campaign(&id)
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn create_campaign(
    State(state): State<ManagementState>,
    body: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CampaignResponse>), ApiError> {
    let Json(req) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Unreadable create request");
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let req = req.normalized();

    let mut errors = field_errors(&req, state.minimum_daily_budget);
    check_start_date(&mut errors, &req, Utc::now().date_naive());
    if !errors.is_empty() {
        metrics::counter!("management.campaigns.invalid").increment(1);
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            envelope: ApiErrorEnvelope::validation(errors),
        });
    }

    let campaign = state.store.create_campaign(req);
    metrics::counter!("management.campaigns.created").increment(1);
    Ok((
        StatusCode::CREATED,
        Json(CampaignResponse {
            campaign,
            message: Some("Campaign created successfully".to_string()),
        }),
    ))
}

pub async fn publish_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> Result<Json<PublishResponse>, ApiError> {
    let (campaign, warnings) = run_transition(&state, &id, LifecycleAction::Publish).await?;
    metrics::counter!("management.campaigns.published").increment(1);
    Ok(Json(PublishResponse {
        campaign,
        warnings,
        message: Some("Campaign published successfully".to_string()),
    }))
}

pub async fn enable_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let (campaign, _) = run_transition(&state, &id, LifecycleAction::Enable).await?;
    metrics::counter!("management.campaigns.enabled").increment(1);
    Ok(Json(CampaignResponse {
        campaign,
        message: Some("Campaign enabled successfully".to_string()),
    }))
}

pub async fn pause_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let (campaign, _) = run_transition(&state, &id, LifecycleAction::Disable).await?;
    metrics::counter!("management.campaigns.paused").increment(1);
    Ok(Json(CampaignResponse {
        campaign,
        message: Some("Campaign paused successfully".to_string()),
    }))
}

/// Check the move, perform it on the ads platform, then record it locally.
/// The local record only changes after the remote call succeeded. The
/// campaign stays claimed for the whole exchange; a concurrent action on the
/// same id gets 409 before anything reaches the ads platform.
async fn run_transition(
    state: &ManagementState,
    id: &str,
    action: LifecycleAction,
) -> Result<(Campaign, Vec<String>), ApiError> {
    let customer_id = state.customer_id.as_deref().ok_or_else(|| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Google Ads customer ID not configured",
        )
    })?;

    let _guard = state.store.begin_transition(id, action)?;
    let campaign = state.store.get_campaign(id).ok_or_else(ApiError::not_found)?;
    let target = lifecycle::check(&campaign, action).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let (google_campaign_id, warnings) = match action {
        LifecycleAction::Publish => {
            let provisioned = state.ads.provision(&campaign, customer_id).await?;
            (Some(provisioned.google_campaign_id), provisioned.warnings)
        }
        LifecycleAction::Enable | LifecycleAction::Disable => {
            // check() already guaranteed the remote id is present.
            let google_id = campaign.google_campaign_id.as_deref().unwrap_or_default();
            if action == LifecycleAction::Enable {
                state.ads.enable(google_id, customer_id).await?;
            } else {
                state.ads.pause(google_id, customer_id).await?;
            }
            (None, Vec::new())
        }
    };

    let updated = state
        .store
        .apply_transition(id, campaign.status, target, google_campaign_id)
        .inspect_err(|e| {
            error!(campaign_id = id, action = %action, error = %e, "Remote call succeeded but local update failed");
        })?;
    Ok((updated, warnings))
}

// ─── Operational ───────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<ManagementState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "store": "healthy",
        "campaigns": state.store.len(),
        "ads_account_configured": state.customer_id.is_some(),
    }))
}

pub async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Campaign Console API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "campaigns": "/api/v1/campaigns",
            "health": "/api/v1/health"
        }
    }))
}
