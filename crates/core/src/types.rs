use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Micro-units per whole currency unit.
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Lowest daily budget the ads platform accepts ($1).
pub const MINIMUM_DAILY_BUDGET_MICROS: i64 = 1_000_000;

/// Budget pre-filled on a new campaign form ($5).
pub const DEFAULT_DAILY_BUDGET_MICROS: i64 = 5_000_000;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_HEADLINE_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ─── Campaign ──────────────────────────────────────────────────────────────

/// A campaign record as held by the system of record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub objective: CampaignObjective,
    pub campaign_type: CampaignType,
    pub daily_budget: i64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub ad_group_name: String,
    pub ad_headline: String,
    pub ad_description: String,
    pub final_url: String,
    #[serde(default)]
    pub asset_url: Option<String>,
    #[serde(default)]
    pub google_campaign_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Whether the campaign has a counterpart on the ads platform.
    pub fn is_provisioned(&self) -> bool {
        self.google_campaign_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum CampaignStatus {
    Draft,
    Published,
    Enabled,
    Paused,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Draft,
        CampaignStatus::Published,
        CampaignStatus::Enabled,
        CampaignStatus::Paused,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "DRAFT",
            CampaignStatus::Published => "PUBLISHED",
            CampaignStatus::Enabled => "ENABLED",
            CampaignStatus::Paused => "PAUSED",
        }
    }

    /// Operator-facing label. Paused campaigns are shown as "Disabled".
    pub fn label(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "Draft",
            CampaignStatus::Published => "Published",
            CampaignStatus::Enabled => "Enabled",
            CampaignStatus::Paused => "Disabled",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(CampaignStatus::Draft),
            "published" => Ok(CampaignStatus::Published),
            "enabled" => Ok(CampaignStatus::Enabled),
            "paused" | "disabled" => Ok(CampaignStatus::Paused),
            other => Err(format!("unknown campaign status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CampaignObjective {
    #[default]
    Sales,
    Leads,
    #[serde(rename = "Website Traffic")]
    WebsiteTraffic,
    #[serde(rename = "Brand Awareness")]
    BrandAwareness,
}

impl CampaignObjective {
    pub const ALL: [CampaignObjective; 4] = [
        CampaignObjective::Sales,
        CampaignObjective::Leads,
        CampaignObjective::WebsiteTraffic,
        CampaignObjective::BrandAwareness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignObjective::Sales => "Sales",
            CampaignObjective::Leads => "Leads",
            CampaignObjective::WebsiteTraffic => "Website Traffic",
            CampaignObjective::BrandAwareness => "Brand Awareness",
        }
    }
}

impl fmt::Display for CampaignObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignObjective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Self::ALL
            .into_iter()
            .find(|o| normalize_choice(o.as_str()) == wanted)
            .ok_or_else(|| format!("unknown campaign objective '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CampaignType {
    #[default]
    #[serde(rename = "Demand Gen")]
    DemandGen,
    Search,
    Display,
    Video,
    Shopping,
}

impl CampaignType {
    pub const ALL: [CampaignType; 5] = [
        CampaignType::DemandGen,
        CampaignType::Search,
        CampaignType::Display,
        CampaignType::Video,
        CampaignType::Shopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignType::DemandGen => "Demand Gen",
            CampaignType::Search => "Search",
            CampaignType::Display => "Display",
            CampaignType::Video => "Video",
            CampaignType::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Self::ALL
            .into_iter()
            .find(|t| normalize_choice(t.as_str()) == wanted)
            .ok_or_else(|| format!("unknown campaign type '{s}'"))
    }
}

/// "Website Traffic", "website-traffic" and "WEBSITE_TRAFFIC" all compare equal.
fn normalize_choice(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Render a micro-unit amount as dollars with two decimals, e.g. `$5.00`.
pub fn format_micros(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let cents = (micros.unsigned_abs() + 5_000) / 10_000;
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

// ─── API Request/Response types ────────────────────────────────────────────

/// Body of `POST /campaigns`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCampaignRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objective: CampaignObjective,
    #[serde(default)]
    pub campaign_type: CampaignType,
    #[serde(default)]
    pub daily_budget: i64,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub ad_group_name: String,
    #[serde(default)]
    pub ad_headline: String,
    #[serde(default)]
    pub ad_description: String,
    #[serde(default)]
    pub final_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
}

impl CreateCampaignRequest {
    /// A request pre-filled with the form defaults.
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            objective: CampaignObjective::default(),
            campaign_type: CampaignType::default(),
            daily_budget: DEFAULT_DAILY_BUDGET_MICROS,
            start_date,
            end_date: None,
            ad_group_name: String::new(),
            ad_headline: String::new(),
            ad_description: String::new(),
            final_url: String::new(),
            asset_url: None,
        }
    }

    /// Trim text fields and drop a blank `asset_url` so it is omitted from the
    /// payload instead of being sent as an empty string.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.ad_group_name = self.ad_group_name.trim().to_string();
        self.ad_headline = self.ad_headline.trim().to_string();
        self.ad_description = self.ad_description.trim().to_string();
        self.final_url = self.final_url.trim().to_string();
        self.asset_url = self
            .asset_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }
}

/// `GET /campaigns` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<Campaign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Response of create, enable and pause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignResponse {
    pub campaign: Campaign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /campaigns/{id}/publish` response. Warnings are non-fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub campaign: Campaign,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
