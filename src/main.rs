use clap::Parser;
use leadboard::application::snapshot_cache::SnapshotCache;
use leadboard::cli::commands::{Cli, Commands};
use leadboard::config::AppConfig;
use leadboard::domain::ports::stats_source::{StatsRequest, StatsSource};
use leadboard::domain::values::role::Role;
use leadboard::infrastructure::clock::SystemClock;
use leadboard::infrastructure::http::server::{self, ApiState};
use leadboard::infrastructure::http::stats_client::HttpStatsSource;
use leadboard::infrastructure::storage::json_file::JsonFileSnapshotStore;
use leadboard::LeadBoard;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading configuration: {e}");
            std::process::exit(1);
        }
    };

    let board = match LeadBoard::new(&config) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error initializing LeadBoard: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(board, &config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    board: LeadBoard,
    config: &AppConfig,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            server::serve(&bind, ApiState { stats: board.stats() }).await?;
        }
        Commands::Stats { user, role } => {
            let request = StatsRequest::new(user, parse_role(&role)?);
            let snapshot = board.dashboard_stats(&request)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Dashboard {
            user,
            role,
            refresh,
            background,
            invalidate,
        } => {
            let source: Arc<dyn StatsSource> = match &config.api_url {
                Some(url) => Arc::new(HttpStatsSource::new(url.clone())),
                None => board.stats(),
            };
            let cache = SnapshotCache::new(
                source,
                Arc::new(JsonFileSnapshotStore::new(config.cache_file.clone())),
                Arc::new(SystemClock),
            );
            if invalidate {
                cache.invalidate();
                println!("Snapshot cache cleared");
                return Ok(());
            }

            let request = StatsRequest::new(user, parse_role(&role)?);
            if background {
                let current = cache.cached().map(|c| c.snapshot);
                let pending = cache.refresh_in_background(request);
                match current {
                    Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                    None => println!("{{}}"),
                }
                pending.await?;
                return Ok(());
            }

            match cache.get(&request, refresh).await {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => {
                    println!("{{}}");
                    return Err("no dashboard data available".into());
                }
            }
        }
        Commands::UserAdd { json } => {
            let data: serde_json::Value = serde_json::from_str(&json)?;
            let name = data["name"]
                .as_str()
                .ok_or("Missing required field: name")?
                .to_string();
            let email = data["email"].as_str().map(String::from);
            let roles = data["roles"]
                .as_array()
                .map(|a| {
                    a.iter()
                        .filter_map(|v| v.as_str())
                        .map(parse_role)
                        .collect::<Result<Vec<_>, _>>()
                })
                .transpose()?
                .unwrap_or_else(|| vec![Role::Setter]);

            let user = board.add_user(name, email, roles)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Commands::Users => {
            let users = board.list_users()?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        Commands::LeadAdd { json } => {
            let data: serde_json::Value = serde_json::from_str(&json)?;
            let name = data["name"].as_str().unwrap_or_default().to_string();
            let email = data["email"].as_str().map(String::from);
            let phone = data["phone"].as_str().map(String::from);
            let source = data["source"].as_str().map(String::from);

            let lead = board.add_lead(name, email, phone, source)?;
            println!("{}", serde_json::to_string_pretty(&lead)?);
        }
        Commands::Contact {
            lead_id,
            outcome,
            date,
        } => {
            let date = parse_date(&date)?;
            let lead = board.record_contact(&lead_id, outcome.as_deref(), date)?;
            println!("{}", serde_json::to_string_pretty(&lead)?);
        }
        Commands::Assign { lead_id, user_id } => {
            let assignment = board.assign(&lead_id, &user_id)?;
            println!("{}", serde_json::to_string_pretty(&assignment)?);
        }
        Commands::Unassign { lead_id, user_id } => {
            board.unassign(&lead_id, &user_id)?;
            println!("Lead {lead_id} unassigned from {user_id}");
        }
        Commands::DealAdd { json } => {
            let data: serde_json::Value = serde_json::from_str(&json)?;
            let title = data["title"]
                .as_str()
                .ok_or("Missing required field: title")?
                .to_string();
            let setter_id = data["setter_id"].as_str().map(String::from);
            let closer_id = data["closer_id"].as_str().map(String::from);
            let consultation_at = data["consultation_at"]
                .as_str()
                .map(|s| {
                    chrono::DateTime::parse_from_rfc3339(s)
                        .map(|dt| dt.with_timezone(&chrono::Utc))
                        .map_err(|e| format!("Invalid consultation_at {s}: {e}"))
                })
                .transpose()?;

            let deal = board.add_deal(title, setter_id, closer_id, consultation_at)?;
            println!("{}", serde_json::to_string_pretty(&deal)?);
        }
        Commands::DealWin { id, date } => {
            let date = parse_date(&date)?;
            let deal = board.mark_deal_won(&id, date)?;
            println!("{}", serde_json::to_string_pretty(&deal)?);
        }
        Commands::Deals { limit } => {
            let deals = board.list_deals(limit)?;
            println!("{}", serde_json::to_string_pretty(&deals)?);
        }
    }
    Ok(())
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

fn parse_date(s: &Option<String>) -> Result<Option<chrono::NaiveDate>, String> {
    s.as_deref()
        .map(|s| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date format: {s}. Use YYYY-MM-DD"))
        })
        .transpose()
}
