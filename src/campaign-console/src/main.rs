//! Campaign Console: create, publish, enable and disable ad campaigns from the
//! terminal, or run the reference campaign API.

use campaign_client::{HttpCampaignApi, LifecycleClient, Notice, Operation};
use campaign_core::config::AppConfig;
use campaign_core::lifecycle::allowed_actions;
use campaign_core::types::{format_micros, Campaign, CampaignObjective, CampaignStatus, CampaignType, CreateCampaignRequest};
use campaign_management::{ManagementServer, SimulatedAdsGateway};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-console")]
#[command(about = "Campaign lifecycle console for Google Ads style campaigns")]
#[command(version)]
struct Cli {
    /// Campaign API base URL (overrides config)
    #[arg(long, global = true, env = "CAMPAIGN_CONSOLE__API__BASE_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the reference campaign API
    Serve {
        /// Bind address (overrides config)
        #[arg(long, env = "CAMPAIGN_CONSOLE__SERVER__HOST")]
        host: Option<String>,

        /// HTTP port (overrides config)
        #[arg(long, env = "CAMPAIGN_CONSOLE__SERVER__HTTP_PORT")]
        port: Option<u16>,

        /// Ads platform customer ID
        #[arg(long, env = "CAMPAIGN_CONSOLE__SERVER__CUSTOMER_ID")]
        customer_id: Option<String>,
    },

    /// List campaigns, newest first
    List {
        /// Only show campaigns in this status (DRAFT, PUBLISHED, ENABLED, PAUSED)
        #[arg(short, long)]
        status: Option<CampaignStatus>,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show one campaign
    Show {
        /// Campaign ID
        id: String,
    },

    /// Create a DRAFT campaign
    Create {
        #[arg(long)]
        name: String,

        /// Sales, Leads, Website Traffic, Brand Awareness
        #[arg(long, default_value = "Sales")]
        objective: CampaignObjective,

        /// Demand Gen, Search, Display, Video, Shopping
        #[arg(long = "type", default_value = "Demand Gen")]
        campaign_type: CampaignType,

        /// Daily budget in micros (1,000,000 = 1.00)
        #[arg(long, default_value_t = campaign_core::types::DEFAULT_DAILY_BUDGET_MICROS)]
        daily_budget: i64,

        /// First day the campaign runs (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Last day the campaign runs (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        #[arg(long)]
        ad_group_name: String,

        #[arg(long)]
        headline: String,

        #[arg(long)]
        description: String,

        /// Landing page URL
        #[arg(long)]
        final_url: String,

        /// Image or video asset URL
        #[arg(long)]
        asset_url: Option<String>,
    },

    /// Publish a DRAFT campaign to the ads platform
    Publish { id: String },

    /// Start serving a published or paused campaign (billing becomes active)
    Enable { id: String },

    /// Pause an enabled campaign
    Disable { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Serve { .. }));

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            customer_id,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.http_port = port;
            }
            if customer_id.is_some() {
                config.server.customer_id = customer_id;
            }
            cmd_serve(config).await
        }
        command => {
            let api = HttpCampaignApi::new(&config.api)?;
            debug!(api_url = %api.base_url(), "Using campaign API");
            let client = LifecycleClient::new(api)
                .with_minimum_daily_budget(config.budget.minimum_daily_budget_micros);
            run_client_command(&client, command).await
        }
    }
}

/// JSON logs for the server, compact logs on stderr for interactive commands.
fn init_tracing(server: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "campaign_console=info,campaign_client=info,campaign_management=info,tower_http=info".into()
    });
    if server {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn cmd_serve(config: AppConfig) -> anyhow::Result<()> {
    info!(
        host = %config.server.host,
        http_port = config.server.http_port,
        "Configuration loaded"
    );
    let server = ManagementServer::new(config, Arc::new(SimulatedAdsGateway::new()));
    server.start_http().await
}

async fn run_client_command(
    client: &LifecycleClient<HttpCampaignApi>,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::List { status, json } => {
            let listed = client.list().await;
            if let Err(e) = &listed {
                return report(Notice::failure(Operation::List, e));
            }
            let campaigns = client.campaigns(status);
            if json {
                println!("{}", serde_json::to_string_pretty(&campaigns)?);
            } else {
                print_table(&campaigns);
                print_counts(client);
            }
            Ok(())
        }
        Commands::Show { id } => match client.refresh(&id).await {
            Ok(campaign) => {
                print_campaign(&campaign);
                Ok(())
            }
            Err(e) => report(Notice::failure(Operation::Refresh, &e)),
        },
        Commands::Create {
            name,
            objective,
            campaign_type,
            daily_budget,
            start_date,
            end_date,
            ad_group_name,
            headline,
            description,
            final_url,
            asset_url,
        } => {
            let request = CreateCampaignRequest {
                name,
                objective,
                campaign_type,
                daily_budget,
                start_date,
                end_date,
                ad_group_name,
                ad_headline: headline,
                ad_description: description,
                final_url,
                asset_url,
            };
            match client.create(request).await {
                Ok(campaign) => {
                    report(Notice::created())?;
                    print_campaign(&campaign);
                    Ok(())
                }
                Err(e) => report(Notice::failure(Operation::Create, &e)),
            }
        }
        Commands::Publish { id } => {
            load_table(client).await?;
            match client.publish(&id).await {
                Ok(published) => {
                    report(Notice::published(&published))?;
                    print_campaign(&published.campaign);
                    Ok(())
                }
                Err(e) => report(Notice::failure(Operation::Publish, &e)),
            }
        }
        Commands::Enable { id } => {
            load_table(client).await?;
            match client.enable(&id).await {
                Ok(campaign) => {
                    report(Notice::enabled())?;
                    print_campaign(&campaign);
                    Ok(())
                }
                Err(e) => report(Notice::failure(Operation::Enable, &e)),
            }
        }
        Commands::Disable { id } => {
            load_table(client).await?;
            match client.disable(&id).await {
                Ok(campaign) => {
                    report(Notice::disabled())?;
                    print_campaign(&campaign);
                    Ok(())
                }
                Err(e) => report(Notice::failure(Operation::Disable, &e)),
            }
        }
        Commands::Serve { .. } => anyhow::bail!("serve does not use the campaign client"),
    }
}

/// Lifecycle checks run against the local table, so it has to be loaded first.
async fn load_table(client: &LifecycleClient<HttpCampaignApi>) -> anyhow::Result<()> {
    match client.list().await {
        Ok(_) => Ok(()),
        Err(e) => report(Notice::failure(Operation::List, &e)),
    }
}

/// Print the notice; error notices also fail the process.
fn report(notice: Notice) -> anyhow::Result<()> {
    if notice.is_error() {
        eprintln!("{notice}");
        anyhow::bail!("campaign command failed: {}", notice.message);
    }
    println!("{notice}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn print_table(campaigns: &[Campaign]) {
    if campaigns.is_empty() {
        println!("No campaigns yet.");
        return;
    }
    println!(
        "  {:<38} {:<24} {:<10} {:<12} {:>10} {:<12} Google ID",
        "ID", "Name", "Status", "Type", "Budget", "Start"
    );
    println!("  {}", "-".repeat(124));
    for c in campaigns {
        println!(
            "  {:<38} {:<24} {:<10} {:<12} {:>10} {:<12} {}",
            c.id,
            truncate(&c.name, 22),
            c.status.label(),
            truncate(c.campaign_type.as_str(), 12),
            format_micros(c.daily_budget),
            c.start_date.format("%Y-%m-%d"),
            c.google_campaign_id.as_deref().unwrap_or("-"),
        );
    }
}

fn print_counts(client: &LifecycleClient<HttpCampaignApi>) {
    let counts: Vec<String> = client
        .status_counts()
        .iter()
        .map(|(status, n)| format!("{}: {n}", status.label()))
        .collect();
    println!();
    println!("  {}", counts.join("  "));
}

fn print_campaign(c: &Campaign) {
    println!("  ID:           {}", c.id);
    println!("  Name:         {}", c.name);
    println!("  Status:       {}", c.status.label());
    println!("  Objective:    {}", c.objective);
    println!("  Type:         {}", c.campaign_type);
    println!("  Daily budget: {}", format_micros(c.daily_budget));
    println!("  Start date:   {}", c.start_date.format("%Y-%m-%d"));
    if let Some(end) = c.end_date {
        println!("  End date:     {}", end.format("%Y-%m-%d"));
    }
    println!("  Ad group:     {}", c.ad_group_name);
    println!("  Headline:     {}", c.ad_headline);
    println!("  Description:  {}", c.ad_description);
    println!("  Final URL:    {}", c.final_url);
    if let Some(asset) = &c.asset_url {
        println!("  Asset URL:    {asset}");
    }
    println!(
        "  Google ID:    {}",
        c.google_campaign_id.as_deref().unwrap_or("-")
    );
    println!(
        "  Updated:      {}",
        c.updated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let actions: Vec<&str> = allowed_actions(c.status).iter().map(|a| a.as_str()).collect();
    println!(
        "  Next actions: {}",
        if actions.is_empty() { "-".to_string() } else { actions.join(", ") }
    );
}

fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max {
        let truncated: String = s.chars().take(max.saturating_sub(2)).collect();
        format!("{truncated}..")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Summer Sale", 22), "Summer Sale");
        assert_eq!(truncate("Performance Max", 12), "Performanc..");
    }

    #[test]
    fn test_parse_create_defaults() {
        let cli = Cli::try_parse_from([
            "campaign-console",
            "create",
            "--name",
            "Summer Sale",
            "--start-date",
            "2030-06-01",
            "--ad-group-name",
            "Main Ad Group",
            "--headline",
            "Get 50% Off Today!",
            "--description",
            "Limited time offer",
            "--final-url",
            "https://example.com/sale",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                objective,
                campaign_type,
                daily_budget,
                end_date,
                ..
            } => {
                assert_eq!(objective, CampaignObjective::Sales);
                assert_eq!(campaign_type, CampaignType::DemandGen);
                assert_eq!(daily_budget, 5_000_000);
                assert!(end_date.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_status_filter() {
        let cli = Cli::try_parse_from(["campaign-console", "list", "--status", "disabled"]).unwrap();
        match cli.command {
            Commands::List { status, json } => {
                assert_eq!(status, Some(CampaignStatus::Paused));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_type_help_lists_only_parseable_types() {
        use clap::CommandFactory;

        let command = Cli::command();
        let create = command.find_subcommand("create").unwrap();
        let help = create
            .get_arguments()
            .find(|a| a.get_id() == "campaign_type")
            .and_then(|a| a.get_help())
            .unwrap()
            .to_string();
        let listed: Vec<&str> = help.split(", ").collect();
        assert_eq!(listed.len(), CampaignType::ALL.len());
        for name in listed {
            assert!(name.parse::<CampaignType>().is_ok(), "{name} should parse");
        }
        assert!("Performance Max".parse::<CampaignType>().is_err());
    }

    #[test]
    fn test_invalid_objective_is_rejected() {
        let result = Cli::try_parse_from([
            "campaign-console",
            "create",
            "--name",
            "x",
            "--objective",
            "World Domination",
            "--start-date",
            "2030-06-01",
            "--ad-group-name",
            "g",
            "--headline",
            "h",
            "--description",
            "d",
            "--final-url",
            "https://example.com",
        ]);
        assert!(result.is_err());
    }
}
