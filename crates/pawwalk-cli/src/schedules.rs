use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use crate::cell;

/// Sub-commands available under `schedules`.
#[derive(Debug, Subcommand)]
pub enum SchedulesCommands {
    /// List a user's walk schedules in time order
    List {
        #[arg(long)]
        user: Uuid,
    },
}

pub(crate) async fn run_schedules(
    pool: &sqlx::PgPool,
    command: SchedulesCommands,
) -> anyhow::Result<()> {
    match command {
        SchedulesCommands::List { user } => {
            let schedules = pawwalk_db::list_schedules_for_user(pool, user).await?;
            tracing::debug!(user_id = %user, count = schedules.len(), "schedules loaded");
            if schedules.is_empty() {
                println!("{user} has no walk schedules");
                return Ok(());
            }

            let now = Utc::now();
            println!("{:<38}{:<30}{:<11}MEMO", "ID", "WHEN", "STATUS");
            for schedule in &schedules {
                println!(
                    "{:<38}{:<30}{:<11}{}",
                    schedule.id,
                    describe_when(schedule.scheduled_at, now),
                    schedule.status,
                    cell(schedule.memo.as_deref()),
                );
            }
        }
    }
    Ok(())
}

/// Absolute time plus a coarse offset from `now`, e.g. `2025-05-01 09:00 (in 3h)`.
pub(crate) fn describe_when(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = at - now;
    let upcoming = delta >= chrono::Duration::zero();
    let span = if upcoming { delta } else { -delta };

    let offset = if span.num_days() > 0 {
        format!("{}d", span.num_days())
    } else if span.num_hours() > 0 {
        format!("{}h", span.num_hours())
    } else {
        format!("{}m", span.num_minutes())
    };

    let stamp = at.format("%Y-%m-%d %H:%M");
    if upcoming {
        format!("{stamp} (in {offset})")
    } else {
        format!("{stamp} ({offset} ago)")
    }
}
