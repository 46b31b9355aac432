use crate::types::MINIMUM_DAILY_BUDGET_MICROS;
use serde::Deserialize;

/// Root application configuration. Loaded from an optional
/// `campaign-console.toml` and environment variables with the prefix
/// `CAMPAIGN_CONSOLE__`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
}

/// Where the console finds the campaign API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Reference backend listener and ads account.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Ads platform customer account; lifecycle calls fail without it.
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_minimum_daily_budget")]
    pub minimum_daily_budget_micros: i64,
}

// Default functions
fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8000
}
fn default_minimum_daily_budget() -> i64 {
    MINIMUM_DAILY_BUDGET_MICROS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            customer_id: None,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            minimum_daily_budget_micros: default_minimum_daily_budget(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("campaign-console").required(false))
            .add_source(
                config::Environment::with_prefix("CAMPAIGN_CONSOLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
