use clap::Subcommand;
use uuid::Uuid;

use crate::cell;

/// Sub-commands available under `dogs`.
#[derive(Debug, Subcommand)]
pub enum DogsCommands {
    /// List a user's dogs, newest first
    List {
        #[arg(long)]
        user: Uuid,
    },
}

pub(crate) async fn run_dogs(pool: &sqlx::PgPool, command: DogsCommands) -> anyhow::Result<()> {
    match command {
        DogsCommands::List { user } => {
            let dogs = pawwalk_db::list_dogs_by_owner(pool, user).await?;
            tracing::debug!(user_id = %user, count = dogs.len(), "dogs loaded");
            if dogs.is_empty() {
                println!("{user} has no dogs");
                return Ok(());
            }

            println!(
                "{:<38}{:<20}{:<20}{:<6}{:<10}CREATED",
                "ID", "NAME", "BREED", "AGE", "GENDER"
            );
            for dog in &dogs {
                println!(
                    "{:<38}{:<20}{:<20}{:<6}{:<10}{}",
                    dog.id,
                    dog.name,
                    cell(dog.breed.as_deref()),
                    cell(dog.age),
                    cell(dog.gender.as_deref()),
                    dog.created_at.format("%Y-%m-%d"),
                );
            }
        }
    }
    Ok(())
}
