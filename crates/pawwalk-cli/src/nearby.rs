use pawwalk_core::{rank_candidates, resolve_anchor, RankOptions};
use pawwalk_db::{DogLocationRow, PgAnchorLookup};
use uuid::Uuid;

use crate::cell;

/// Print the anchor and a table of dogs within `radius_m` of it.
///
/// # Errors
///
/// Returns an error if the radius is invalid or the candidate query fails.
/// Anchor lookup failures are not errors; they surface as a `none` anchor.
pub(crate) async fn run_nearby(
    pool: &sqlx::PgPool,
    user: Uuid,
    search: Option<String>,
    radius_m: f64,
) -> anyhow::Result<()> {
    let options = RankOptions::with_radius(radius_m)?.search(search);
    let user_key = user.to_string();

    let anchor = resolve_anchor(&PgAnchorLookup::new(pool.clone()), &user_key).await;
    let rows = pawwalk_db::list_candidate_locations(pool, Some(user)).await?;
    let ranked = rank_candidates(
        &anchor,
        rows.into_iter().map(DogLocationRow::into_candidate),
        &user_key,
        &options,
    );

    tracing::debug!(
        user_id = %user,
        anchor = %anchor,
        matches = ranked.len(),
        "nearby search ranked"
    );

    println!("anchor: {anchor}");
    if anchor.coordinate().is_some() {
        println!("radius: {:.0} m", options.radius_meters);
    }

    if ranked.is_empty() {
        println!("no dogs found");
        return Ok(());
    }

    println!("{:<12}{:<20}{:<20}{:<6}DOG ID", "DISTANCE", "NAME", "BREED", "AGE");
    for entry in &ranked {
        let distance = if entry.distance_meters.is_finite() {
            format!("{:.0} m", entry.distance_meters)
        } else {
            "\u{2014}".to_string()
        };
        let dog = &entry.candidate;
        println!(
            "{:<12}{:<20}{:<20}{:<6}{}",
            distance,
            cell(dog.dog_name.as_deref()),
            cell(dog.breed.as_deref()),
            cell(dog.age.as_deref()),
            cell(dog.dog_id.as_deref()),
        );
    }

    Ok(())
}
