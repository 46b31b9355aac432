//! Field validation for new campaigns.
//!
//! The client runs these checks before sending anything; the backend runs the
//! same checks plus the date-relative ones that need a clock.

use crate::envelope::FieldErrors;
use crate::error::{CampaignError, CampaignResult};
use crate::types::{CreateCampaignRequest, MAX_DESCRIPTION_LEN, MAX_HEADLINE_LEN, MAX_NAME_LEN};
use chrono::NaiveDate;
use url::Url;

/// Validate a (normalized) create request.
pub fn validate_create(req: &CreateCampaignRequest, minimum_daily_budget: i64) -> CampaignResult<()> {
    let errors = field_errors(req, minimum_daily_budget);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CampaignError::Validation(errors))
    }
}

/// Every field-level problem with `req`, keyed by field name.
pub fn field_errors(req: &CreateCampaignRequest, minimum_daily_budget: i64) -> FieldErrors {
    let mut errors = FieldErrors::new();

    check_text(&mut errors, "name", &req.name, MAX_NAME_LEN);
    check_text(&mut errors, "ad_group_name", &req.ad_group_name, MAX_NAME_LEN);
    check_text(&mut errors, "ad_headline", &req.ad_headline, MAX_HEADLINE_LEN);
    check_text(&mut errors, "ad_description", &req.ad_description, MAX_DESCRIPTION_LEN);

    if req.final_url.trim().is_empty() {
        push(&mut errors, "final_url", "is required".to_string());
    } else if !is_web_url(&req.final_url) {
        push(&mut errors, "final_url", "not a valid URL".to_string());
    }
    if let Some(asset) = req.asset_url.as_deref() {
        if !asset.trim().is_empty() && !is_web_url(asset) {
            push(&mut errors, "asset_url", "not a valid URL".to_string());
        }
    }

    if req.daily_budget < minimum_daily_budget {
        push(
            &mut errors,
            "daily_budget",
            format!("must be >= {minimum_daily_budget}"),
        );
    }

    if let Some(end) = req.end_date {
        if end < req.start_date {
            push(&mut errors, "end_date", "must not be before start_date".to_string());
        }
    }

    errors
}

/// Campaigns cannot be scheduled to start before `today`.
pub fn check_start_date(errors: &mut FieldErrors, req: &CreateCampaignRequest, today: NaiveDate) {
    if req.start_date < today {
        push(errors, "start_date", "Start date cannot be in the past".to_string());
    }
}

fn check_text(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        push(errors, field, "is required".to_string());
    } else if value.chars().count() > max_len {
        push(errors, field, format!("must be at most {max_len} characters"));
    }
}

fn is_web_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}
