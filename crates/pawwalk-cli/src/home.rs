use clap::Subcommand;
use pawwalk_core::Coordinate;
use uuid::Uuid;

/// Sub-commands available under `home`.
#[derive(Debug, Subcommand)]
pub enum HomeCommands {
    /// Show a user's home location
    Show {
        #[arg(long)]
        user: Uuid,
    },
    /// Set or replace a user's home location
    Set {
        #[arg(long)]
        user: Uuid,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

pub(crate) async fn run_home(pool: &sqlx::PgPool, command: HomeCommands) -> anyhow::Result<()> {
    match command {
        HomeCommands::Show { user } => match pawwalk_db::get_home_location(pool, user).await? {
            Some(home) => println!(
                "{user}: ({:.6}, {:.6}) updated {}",
                home.latitude,
                home.longitude,
                home.updated_at.format("%Y-%m-%d %H:%M")
            ),
            None => println!("{user} has no home location"),
        },
        HomeCommands::Set { user, lat, lng } => {
            let coordinate = Coordinate::new(lat, lng).ok_or_else(|| {
                anyhow::anyhow!("({lat}, {lng}) is not a valid latitude/longitude pair")
            })?;
            pawwalk_db::upsert_home_location(pool, user, coordinate).await?;
            println!("home for {user} set to ({lat:.6}, {lng:.6})");
        }
    }
    Ok(())
}
