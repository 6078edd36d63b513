use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ladder_stats::api::state::AppState;
use ladder_stats::calculate::round_to_tenth;
use ladder_stats::config::{default_config_path, AppConfig};
use ladder_stats::dataset::Dataset;
use ladder_stats::fetch::{Fetcher, Source};
use ladder_stats::models::Category;
use ladder_stats::roster::{RosterQuery, SortField, SortOrder};

#[derive(Parser)]
#[command(name = "ladder-stats")]
#[command(about = "Ladder statistics from a match table export")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match table source (file path or URL), overrides the config
    #[arg(long)]
    matches: Option<String>,

    /// Tier table source (file path or URL), overrides the config
    #[arg(long)]
    tiers: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the player roster
    Players {
        /// Filter by display name substring
        #[arg(long)]
        search: Option<String>,

        /// Only show players in this tier
        #[arg(long)]
        tier: Option<String>,

        /// Sort column (playerId, tier, mainRace, totalGames, wins, losses, winRate)
        #[arg(long, default_value = "totalGames")]
        sort: SortField,

        /// Sort direction (asc, desc)
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one player's statistics
    Player {
        /// Player identifier (case-insensitive)
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Show map x race matchup tables
    Maps {
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Log every HTTP request
        #[arg(long)]
        access_log: bool,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn load_dataset(config: &AppConfig, cli: &Cli) -> Result<Dataset> {
    let matches = match &cli.matches {
        Some(s) => Source::parse(s).context("Invalid --matches source")?,
        None => config.matches_source()?,
    };
    let tiers = match &cli.tiers {
        Some(s) => Source::parse(s).context("Invalid --tiers source")?,
        None => config.tiers_source()?,
    };

    let fetcher = Fetcher::new(config.fetcher_config())?;
    let dataset = Dataset::load(&fetcher, &matches, &tiers).await?;
    Ok(dataset)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!("Starting ladder-stats v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load_or_default(&default_config_path())?,
    };
    let catalog = config.map_catalog();
    let dataset = load_dataset(&config, &cli).await?;

    match cli.command {
        Commands::Players {
            search,
            tier,
            sort,
            order,
            json,
        } => {
            let query = RosterQuery {
                search,
                tier,
                sort,
                order,
            };
            let rows = query.apply(&dataset.player_summaries);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!(
                    "{:<20} {:<6} {:<4} {:>6} {:>5} {:>6} {:>7}",
                    "PLAYER", "TIER", "RACE", "GAMES", "WINS", "LOSSES", "WIN%"
                );
                for s in rows {
                    println!(
                        "{:<20} {:<6} {:<4} {:>6} {:>5} {:>6} {:>7.1}",
                        s.display_name,
                        s.tier,
                        s.main_race,
                        s.total_games,
                        s.wins,
                        s.losses,
                        round_to_tenth(s.win_rate)
                    );
                }
            }
        }
        Commands::Player { id, json } => {
            let stats = dataset
                .player(&id)
                .with_context(|| format!("Player '{}' not found", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(stats)?);
                return Ok(());
            }

            println!(
                "{} ({}): {}W {}L of {} games, {:.1}%",
                stats.display_name,
                stats.main_race().unwrap_or("?"),
                stats.wins,
                stats.losses,
                stats.total_games,
                round_to_tenth(stats.win_rate)
            );

            println!("\nCategories:");
            for category in Category::ALL {
                let r = stats.category(category);
                println!(
                    "  {:<12} {}W {}L / {} ({:.1}%)",
                    category.to_string(),
                    r.wins,
                    r.losses,
                    r.total,
                    round_to_tenth(r.win_rate)
                );
            }

            println!("\nRace matchups:");
            for m in &stats.race_matchup_stats {
                println!(
                    "  vs {:<3} {}W {}L / {} ({:.1}%)",
                    m.vs_race,
                    m.record.wins,
                    m.record.losses,
                    m.record.total,
                    round_to_tenth(m.record.win_rate)
                );
            }

            println!("\nMaps:");
            for m in &stats.map_stats {
                println!(
                    "  {:<20} {}W {}L / {} ({:.1}%)",
                    catalog.name_for(&m.map),
                    m.record.wins,
                    m.record.losses,
                    m.record.total,
                    round_to_tenth(m.record.win_rate)
                );
            }

            println!("\nOpponents:");
            for o in &stats.opponent_stats {
                println!(
                    "  {:<20} {}W {}L / {} ({:.1}%)",
                    o.opponent_display_name,
                    o.record.wins,
                    o.record.losses,
                    o.record.total,
                    round_to_tenth(o.record.win_rate)
                );
            }

            println!("\nRecent matches:");
            for r in &stats.recent_matches {
                let outcome = r
                    .outcome_for(&stats.player_id)
                    .map(|o| format!("{:?}", o))
                    .unwrap_or_default();
                println!(
                    "  {} {:<20} {:<8} {} vs {}",
                    r.date,
                    catalog.name_for(&r.map),
                    outcome,
                    r.first.display_name,
                    r.second.display_name
                );
            }
        }
        Commands::Maps { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&dataset.map_statistics)?);
                return Ok(());
            }
            for map in &dataset.map_statistics {
                println!("{} ({} games)", catalog.name_for(&map.map), map.total_games);
                for m in &map.matchups {
                    println!(
                        "  {:<4} {:>4}-{:<4} {:.1}%",
                        m.matchup,
                        m.wins,
                        m.losses,
                        round_to_tenth(m.win_rate)
                    );
                }
            }
        }
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let mut state = AppState::new(dataset, catalog);
            state.cors_origin = config.server.cors_origin.clone();
            state.access_log = access_log;

            let app = ladder_stats::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_stats::models::MapCatalog;

    #[test]
    fn test_cli_parses_players_flags() {
        let cli = Cli::try_parse_from([
            "ladder-stats",
            "--matches",
            "./m.csv",
            "players",
            "--sort",
            "winRate",
            "--order",
            "asc",
        ])
        .unwrap();
        assert_eq!(cli.matches.as_deref(), Some("./m.csv"));
        match cli.command {
            Commands::Players { sort, order, .. } => {
                assert_eq!(sort, SortField::WinRate);
                assert_eq!(order, SortOrder::Asc);
            }
            _ => panic!("expected players command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["ladder-stats", "players", "--sort", "elo"]).is_err());
    }

    #[test]
    fn test_catalog_default_used_without_config() {
        let config = AppConfig::default();
        assert_eq!(config.map_catalog(), MapCatalog::default());
    }
}
