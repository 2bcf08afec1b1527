//! Live integration tests for pawwalk-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/pawwalk-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, NaiveDate, Utc};
use pawwalk_core::{
    rank_candidates, resolve_anchor, AnchorSource, Coordinate, DogFixture, FixturesFile,
    HomeFixture, NewDogHistory, NewDogProfile, NewWalkSchedule, RankOptions, ScheduleStatus,
    WalkRequestStatus,
};
use pawwalk_db::{
    create_walk_request, delete_dog_history, delete_dog_profile, delete_walk_schedule,
    get_dog_history, get_dog_location, get_dog_profile, get_home_location,
    get_most_recent_dog_for_owner, get_walk_request, get_walk_schedule, insert_dog_history,
    insert_dog_profile, insert_walk_schedule, list_candidate_locations, list_dogs_by_owner,
    list_histories_for_dog, list_pending_requests_for_user, list_schedules_for_user,
    respond_to_walk_request, seed_fixtures, update_dog_history, update_dog_profile,
    update_walk_schedule, upsert_dog_location, upsert_home_location, DbError, NewWalkRequest,
    PgAnchorLookup,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seoul() -> Coordinate {
    Coordinate::new(37.5665, 126.9780).expect("valid coordinate")
}

fn profile(name: &str, breed: &str) -> NewDogProfile {
    NewDogProfile {
        name: name.to_string(),
        breed: breed.to_string(),
        age: 3,
        gender: "female".to_string(),
        image_url: None,
    }
}

fn walk_in(hours: i64, dog_id: Option<Uuid>) -> NewWalkSchedule {
    NewWalkSchedule {
        dog_id,
        target_dog_id: None,
        memo: Some("river loop".to_string()),
        scheduled_at: Utc::now() + Duration::hours(hours),
        status: ScheduleStatus::Scheduled,
    }
}

fn diary_entry(day: u32, tags: &[&str]) -> NewDogHistory {
    NewDogHistory {
        entry_date: NaiveDate::from_ymd_opt(2025, 4, day).expect("valid date"),
        memo: Some("sunny".to_string()),
        hashtags: tags.iter().map(ToString::to_string).collect(),
        image_urls: vec!["https://cdn.example/walk.jpg".to_string()],
    }
}

async fn owner_with_home(pool: &sqlx::PgPool, at: Coordinate) -> Uuid {
    let owner = Uuid::new_v4();
    upsert_home_location(pool, owner, at)
        .await
        .expect("upsert_home_location failed");
    owner
}

// ---------------------------------------------------------------------------
// Section 1: Dog profiles and their location rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_dog_requires_home(pool: sqlx::PgPool) {
    let err = insert_dog_profile(&pool, Uuid::new_v4(), &profile("Bori", "Jindo"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::HomeLocationRequired));
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_dog_seeds_location_from_home(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;

    let dog = insert_dog_profile(&pool, owner, &profile("Bori", "Poodle Mix"))
        .await
        .expect("insert_dog_profile failed");

    let location = get_dog_location(&pool, dog.id)
        .await
        .expect("get_dog_location failed")
        .expect("location row exists");
    assert!(location.is_home);
    assert_eq!(location.owner_id, owner);
    assert_eq!(location.coordinate(), Some(seoul()));
    assert_eq!(location.dog_name.as_deref(), Some("Bori"));
    assert_eq!(location.age.as_deref(), Some("3"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_dog_rejects_invalid_profile(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    let err = insert_dog_profile(&pool, owner, &profile("Bori", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Core(_)));
    assert!(list_dogs_by_owner(&pool, owner).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_dog_propagates_to_location(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, owner, &profile("Bori", "Poodle"))
        .await
        .unwrap();

    let mut edited = profile("Bori", "Poodle Mix");
    edited.age = 4;
    let updated = update_dog_profile(&pool, dog.id, &edited).await.unwrap();
    assert_eq!(updated.breed.as_deref(), Some("Poodle Mix"));

    let location = get_dog_location(&pool, dog.id).await.unwrap().unwrap();
    assert_eq!(location.breed.as_deref(), Some("Poodle Mix"));
    assert_eq!(location.age.as_deref(), Some("4"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_missing_dog_is_not_found(pool: sqlx::PgPool) {
    let err = update_dog_profile(&pool, Uuid::new_v4(), &profile("Bori", "Jindo"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn most_recent_dog_is_last_registered(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    insert_dog_profile(&pool, owner, &profile("First", "Jindo"))
        .await
        .unwrap();
    let second = insert_dog_profile(&pool, owner, &profile("Second", "Shiba"))
        .await
        .unwrap();

    let recent = get_most_recent_dog_for_owner(&pool, owner)
        .await
        .unwrap()
        .expect("owner has dogs");
    assert_eq!(recent.id, second.id);

    let listed = list_dogs_by_owner(&pool, owner).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_location_clears_home_flag(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, owner, &profile("Bori", "Jindo"))
        .await
        .unwrap();

    let park = Coordinate::new(37.57, 126.98).unwrap();
    let location = upsert_dog_location(&pool, dog.id, park).await.unwrap();
    assert!(!location.is_home);
    assert_eq!(location.coordinate(), Some(park));

    let err = upsert_dog_location(&pool, Uuid::new_v4(), park)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// Section 2: Homes, candidates and anchor resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn home_upsert_replaces_coordinate(pool: sqlx::PgPool) {
    let user = owner_with_home(&pool, seoul()).await;
    let moved = Coordinate::new(35.1796, 129.0756).unwrap();
    upsert_home_location(&pool, user, moved).await.unwrap();

    let home = get_home_location(&pool, user).await.unwrap().unwrap();
    assert_eq!(home.coordinate(), Some(moved));
    assert!(get_home_location(&pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn candidate_listing_excludes_owner(pool: sqlx::PgPool) {
    let me = owner_with_home(&pool, seoul()).await;
    let other = owner_with_home(&pool, seoul()).await;
    insert_dog_profile(&pool, me, &profile("Mine", "Jindo"))
        .await
        .unwrap();
    let theirs = insert_dog_profile(&pool, other, &profile("Theirs", "Shiba"))
        .await
        .unwrap();

    let rows = list_candidate_locations(&pool, Some(me)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].dog_id, theirs.id);

    let all = list_candidate_locations(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn anchor_prefers_dog_location_over_home(pool: sqlx::PgPool) {
    let user = owner_with_home(&pool, seoul()).await;
    let lookup = PgAnchorLookup::new(pool.clone());

    assert_eq!(
        resolve_anchor(&lookup, &user.to_string()).await,
        AnchorSource::Home(seoul())
    );

    let dog = insert_dog_profile(&pool, user, &profile("Bori", "Jindo"))
        .await
        .unwrap();
    let walk = Coordinate::new(37.5700, 126.9800).unwrap();
    upsert_dog_location(&pool, dog.id, walk).await.unwrap();

    assert_eq!(
        resolve_anchor(&lookup, &user.to_string()).await,
        AnchorSource::Dog(walk)
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn anchor_for_unknown_or_malformed_user_is_absent(pool: sqlx::PgPool) {
    let lookup = PgAnchorLookup::new(pool);
    assert_eq!(
        resolve_anchor(&lookup, &Uuid::new_v4().to_string()).await,
        AnchorSource::Absent
    );
    assert_eq!(resolve_anchor(&lookup, "not-a-uuid").await, AnchorSource::Absent);
}

#[sqlx::test(migrations = "../../migrations")]
async fn nearby_end_to_end(pool: sqlx::PgPool) {
    let me = owner_with_home(&pool, seoul()).await;
    let near_owner = owner_with_home(&pool, Coordinate::new(37.5675, 126.9780).unwrap()).await;
    let far_owner = owner_with_home(&pool, Coordinate::new(37.6665, 126.9780).unwrap()).await;
    insert_dog_profile(&pool, me, &profile("Mine", "Jindo"))
        .await
        .unwrap();
    let near = insert_dog_profile(&pool, near_owner, &profile("Near", "Poodle"))
        .await
        .unwrap();
    insert_dog_profile(&pool, far_owner, &profile("Far", "Poodle"))
        .await
        .unwrap();

    let lookup = PgAnchorLookup::new(pool.clone());
    let anchor = resolve_anchor(&lookup, &me.to_string()).await;
    let candidates = list_candidate_locations(&pool, Some(me))
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.into_candidate());
    let ranked = rank_candidates(&anchor, candidates, &me.to_string(), &RankOptions::default());

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].candidate.dog_id, Some(near.id.to_string()));
    assert!((ranked[0].distance_meters - 111.2).abs() < 1.0);
}

// ---------------------------------------------------------------------------
// Section 3: Walk requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn walk_request_replaces_pending_duplicate(pool: sqlx::PgPool) {
    let requester = owner_with_home(&pool, seoul()).await;
    let recipient = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, requester, &profile("Bori", "Jindo"))
        .await
        .unwrap();

    let request = NewWalkRequest {
        from_user_id: requester,
        to_user_id: recipient,
        dog_id: None,
    };
    let first = create_walk_request(&pool, &request).await.unwrap();
    let second = create_walk_request(&pool, &request).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.dog_id, dog.id);

    let pending = list_pending_requests_for_user(&pool, recipient).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);
    assert_eq!(pending[0].dog_name, "Bori");
    assert!(get_walk_request(&pool, first.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_duplicate_requests_leave_one_pending(pool: sqlx::PgPool) {
    let requester = owner_with_home(&pool, seoul()).await;
    let recipient = Uuid::new_v4();
    insert_dog_profile(&pool, requester, &profile("Bori", "Jindo"))
        .await
        .unwrap();

    let request = NewWalkRequest {
        from_user_id: requester,
        to_user_id: recipient,
        dog_id: None,
    };
    let (a, b) = tokio::join!(
        create_walk_request(&pool, &request),
        create_walk_request(&pool, &request)
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.id, b.id);

    let pending = list_pending_requests_for_user(&pool, recipient).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].id == a.id || pending[0].id == b.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn walk_request_needs_requester_dog(pool: sqlx::PgPool) {
    let err = create_walk_request(
        &pool,
        &NewWalkRequest {
            from_user_id: Uuid::new_v4(),
            to_user_id: Uuid::new_v4(),
            dog_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DbError::Core(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn walk_request_to_self_is_rejected(pool: sqlx::PgPool) {
    let user = owner_with_home(&pool, seoul()).await;
    let err = create_walk_request(
        &pool,
        &NewWalkRequest {
            from_user_id: user,
            to_user_id: user,
            dog_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DbError::Core(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn walk_request_answer_is_final(pool: sqlx::PgPool) {
    let requester = owner_with_home(&pool, seoul()).await;
    let recipient = Uuid::new_v4();
    insert_dog_profile(&pool, requester, &profile("Bori", "Jindo"))
        .await
        .unwrap();
    let request = create_walk_request(
        &pool,
        &NewWalkRequest {
            from_user_id: requester,
            to_user_id: recipient,
            dog_id: None,
        },
    )
    .await
    .unwrap();

    let accepted = respond_to_walk_request(&pool, request.id, WalkRequestStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(accepted.status, "accepted");
    assert!(accepted.responded_at.is_some());
    assert!(list_pending_requests_for_user(&pool, recipient)
        .await
        .unwrap()
        .is_empty());

    let err = respond_to_walk_request(&pool, request.id, WalkRequestStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Core(_)));

    let missing = respond_to_walk_request(&pool, Uuid::new_v4(), WalkRequestStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(missing, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// Section 4: Dog deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn delete_dog_removes_location_and_diary(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, owner, &profile("Bori", "Jindo"))
        .await
        .unwrap();
    let entry = insert_dog_history(&pool, dog.id, &diary_entry(1, &[]))
        .await
        .unwrap();
    let schedule = insert_walk_schedule(&pool, owner, &walk_in(2, Some(dog.id)))
        .await
        .unwrap();

    delete_dog_profile(&pool, dog.id).await.unwrap();

    assert!(get_dog_profile(&pool, dog.id).await.unwrap().is_none());
    assert!(get_dog_location(&pool, dog.id).await.unwrap().is_none());
    assert!(get_dog_history(&pool, entry.id).await.unwrap().is_none());
    let schedule = get_walk_schedule(&pool, schedule.id).await.unwrap().unwrap();
    assert!(schedule.dog_id.is_none());

    let lookup = PgAnchorLookup::new(pool.clone());
    assert_eq!(
        resolve_anchor(&lookup, &owner.to_string()).await,
        AnchorSource::Home(seoul())
    );

    let again = delete_dog_profile(&pool, dog.id).await.unwrap_err();
    assert!(matches!(again, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// Section 5: Walk schedules and diary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn schedule_create_update_delete(pool: sqlx::PgPool) {
    let user = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, user, &profile("Bori", "Jindo"))
        .await
        .unwrap();

    let created = insert_walk_schedule(&pool, user, &walk_in(3, Some(dog.id)))
        .await
        .unwrap();
    assert_eq!(created.status().unwrap(), ScheduleStatus::Scheduled);
    assert_eq!(created.memo.as_deref(), Some("river loop"));

    let mut edit = walk_in(5, Some(dog.id));
    edit.memo = Some("  ".to_string());
    let updated = update_walk_schedule(&pool, created.id, &edit).await.unwrap();
    assert!(updated.memo.is_none());
    assert!(updated.scheduled_at > created.scheduled_at);

    delete_walk_schedule(&pool, created.id).await.unwrap();
    assert!(matches!(
        delete_walk_schedule(&pool, created.id).await.unwrap_err(),
        DbError::NotFound
    ));
    assert!(matches!(
        update_walk_schedule(&pool, created.id, &edit).await.unwrap_err(),
        DbError::NotFound
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn schedule_rejects_someone_elses_dog(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, owner, &profile("Bori", "Jindo"))
        .await
        .unwrap();

    let err = insert_walk_schedule(&pool, Uuid::new_v4(), &walk_in(1, Some(dog.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Core(_)));

    let mut with_friend = walk_in(1, None);
    with_friend.target_dog_id = Some(dog.id);
    assert!(insert_walk_schedule(&pool, Uuid::new_v4(), &with_friend)
        .await
        .is_ok());
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_marks_overdue_schedules_done(pool: sqlx::PgPool) {
    let user = Uuid::new_v4();
    let later = insert_walk_schedule(&pool, user, &walk_in(4, None))
        .await
        .unwrap();
    let soon = insert_walk_schedule(&pool, user, &walk_in(1, None))
        .await
        .unwrap();

    sqlx::query("UPDATE walk_schedules SET scheduled_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(soon.id)
        .execute(&pool)
        .await
        .unwrap();

    let listed = list_schedules_for_user(&pool, user).await.unwrap();
    assert_eq!(
        listed.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![soon.id, later.id]
    );
    assert_eq!(listed[0].status().unwrap(), ScheduleStatus::Done);
    assert_eq!(listed[1].status().unwrap(), ScheduleStatus::Scheduled);
}

#[sqlx::test(migrations = "../../migrations")]
async fn diary_entries_crud_and_order(pool: sqlx::PgPool) {
    let owner = owner_with_home(&pool, seoul()).await;
    let dog = insert_dog_profile(&pool, owner, &profile("Bori", "Jindo"))
        .await
        .unwrap();

    let older = insert_dog_history(&pool, dog.id, &diary_entry(2, &["#park", "Park"]))
        .await
        .unwrap();
    assert_eq!(older.hashtags, vec!["park"]);
    let newer = insert_dog_history(&pool, dog.id, &diary_entry(9, &[]))
        .await
        .unwrap();

    let listed = list_histories_for_dog(&pool, dog.id).await.unwrap();
    assert_eq!(
        listed.iter().map(|h| h.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );

    let edited = update_dog_history(&pool, older.id, &diary_entry(20, &["rain"]))
        .await
        .unwrap();
    assert_eq!(edited.hashtags, vec!["rain"]);
    assert_eq!(list_histories_for_dog(&pool, dog.id).await.unwrap()[0].id, older.id);

    delete_dog_history(&pool, newer.id).await.unwrap();
    assert!(get_dog_history(&pool, newer.id).await.unwrap().is_none());
    assert!(matches!(
        delete_dog_history(&pool, newer.id).await.unwrap_err(),
        DbError::NotFound
    ));

    let orphan = insert_dog_history(&pool, Uuid::new_v4(), &diary_entry(1, &[]))
        .await
        .unwrap_err();
    assert!(matches!(orphan, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// Section 6: Seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn seed_fixtures_is_idempotent(pool: sqlx::PgPool) {
    let owner = Uuid::new_v4();
    let park = Coordinate::new(37.57, 126.98).unwrap();
    let fixtures = FixturesFile {
        homes: vec![HomeFixture {
            user_id: owner,
            latitude: 37.5665,
            longitude: 126.9780,
        }],
        dogs: vec![
            DogFixture {
                owner_id: owner,
                profile: profile("Bori", "Poodle Mix"),
                location: None,
            },
            DogFixture {
                owner_id: owner,
                profile: profile("Choco", "Jindo"),
                location: Some(park),
            },
        ],
    };

    let first = seed_fixtures(&pool, &fixtures).await.unwrap();
    assert_eq!(first.homes, 1);
    assert_eq!(first.dogs_inserted, 2);

    let second = seed_fixtures(&pool, &fixtures).await.unwrap();
    assert_eq!(second.dogs_inserted, 0);
    assert_eq!(second.dogs_updated, 2);

    let dogs = list_dogs_by_owner(&pool, owner).await.unwrap();
    assert_eq!(dogs.len(), 2);
    let choco = dogs.iter().find(|d| d.name == "Choco").unwrap();
    let location = get_dog_location(&pool, choco.id).await.unwrap().unwrap();
    assert!(!location.is_home);
    assert_eq!(location.coordinate(), Some(park));
    assert!(get_dog_profile(&pool, choco.id).await.unwrap().is_some());
}
