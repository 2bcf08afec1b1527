mod db;
mod dogs;
mod home;
mod nearby;
mod schedules;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::{
    db::DbCommands, dogs::DogsCommands, home::HomeCommands, schedules::SchedulesCommands,
};

#[derive(Debug, Parser)]
#[command(name = "pawwalk-cli")]
#[command(about = "pawwalk command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// List dogs near a user, closest first
    Nearby {
        /// User whose anchor the search is measured from
        #[arg(long)]
        user: Uuid,
        /// Case-insensitive breed filter
        #[arg(long)]
        search: Option<String>,
        /// Search radius in meters (defaults to PAWWALK_SEARCH_RADIUS_METERS)
        #[arg(long)]
        radius_m: Option<f64>,
    },
    /// Inspect or set a user's home location
    Home {
        #[command(subcommand)]
        command: HomeCommands,
    },
    /// Inspect a user's dogs
    Dogs {
        #[command(subcommand)]
        command: DogsCommands,
    },
    /// Inspect a user's walk schedules
    Schedules {
        #[command(subcommand)]
        command: SchedulesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("pawwalk-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = pawwalk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = pawwalk_db::PoolConfig::from_app_config(&config);
    let pool = pawwalk_db::connect_pool(&config.database_url, pool_config).await?;
    tracing::debug!(env = %config.env, "cli connected");

    match command {
        Commands::Db { command } => db::run_db(&pool, &config, command).await,
        Commands::Nearby {
            user,
            search,
            radius_m,
        } => {
            let radius = radius_m.unwrap_or(config.search_radius_meters);
            nearby::run_nearby(&pool, user, search, radius).await
        }
        Commands::Home { command } => home::run_home(&pool, command).await,
        Commands::Dogs { command } => dogs::run_dogs(&pool, command).await,
        Commands::Schedules { command } => schedules::run_schedules(&pool, command).await,
    }
}

/// Format an optional value for a table cell, returning `"—"` when `None`.
fn cell<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| v.to_string())
}
