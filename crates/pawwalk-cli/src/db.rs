use std::path::PathBuf;

use clap::Subcommand;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load homes and dogs from a YAML fixtures file
    Seed {
        /// Fixtures file (defaults to PAWWALK_FIXTURES_PATH)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub(crate) async fn run_db(
    pool: &sqlx::PgPool,
    config: &pawwalk_core::AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            pawwalk_db::health_check(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = pawwalk_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { path } => {
            let path = path.unwrap_or_else(|| config.fixtures_path.clone());
            run_seed(pool, &path).await?;
        }
    }
    Ok(())
}

/// Validate and load a fixtures file, then upsert it.
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, or if any write fails.
/// Nothing is written unless the whole file seeds cleanly.
async fn run_seed(pool: &sqlx::PgPool, path: &std::path::Path) -> anyhow::Result<()> {
    let fixtures = pawwalk_core::load_fixtures(path)?;
    tracing::debug!(
        path = %path.display(),
        homes = fixtures.homes.len(),
        dogs = fixtures.dogs.len(),
        "fixtures loaded"
    );
    let summary = pawwalk_db::seed_fixtures(pool, &fixtures).await?;
    println!(
        "seeded {} home(s), {} new dog(s), {} updated dog(s) from {}",
        summary.homes,
        summary.dogs_inserted,
        summary.dogs_updated,
        path.display()
    );
    Ok(())
}
