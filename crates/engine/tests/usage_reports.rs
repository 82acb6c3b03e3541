use chrono::{TimeZone, Utc};
use engine::{CountEntry, Engine, EngineError, ItemDraft, MoneyCents, Session, TierCounts};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

/// An item counted directly in master units: unset factors default to 1, so
/// the tier-1 count is the normalized total and `price_cents` prices one
/// master unit.
async fn flat_item(engine: &Engine, nickname: &str, price_cents: i64) -> Uuid {
    engine
        .new_item(ItemDraft {
            nickname: nickname.to_string(),
            tier1_unit: Some("Each".to_string()),
            price: Some(MoneyCents::new(price_cents)),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn run_session(engine: &Engine, location_id: Uuid, entries: &[CountEntry]) -> Session {
    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, location_id, entries)
        .await
        .unwrap();
    engine.finalize_session(session.id).await.unwrap()
}

fn entry(item_id: Uuid, t1: i64) -> CountEntry {
    CountEntry {
        item_id,
        counts: TierCounts::new(t1, 0, 0),
    }
}

fn full_range() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap(),
    )
}

#[tokio::test]
async fn usage_is_earlier_minus_later() {
    let engine = engine_with_db().await;
    let location = engine.new_location("Walk-in").await.unwrap();
    let flour = flat_item(&engine, "Flour", 400).await;
    let oil = flat_item(&engine, "Oil", 400).await;
    for item in [flour, oil] {
        engine.assign_item(location, item).await.unwrap();
    }

    let first = run_session(&engine, location, &[entry(flour, 50)]).await;
    let second = run_session(&engine, location, &[entry(flour, 30), entry(oil, 5)]).await;

    let (start, end) = full_range();
    let report = engine.usage_report(start, end).await.unwrap();
    assert_eq!(report.earlier_session_id, first.id);
    assert_eq!(report.later_session_id, second.id);
    assert_eq!(report.rows.len(), 2);

    let flour_row = report.rows.iter().find(|r| r.item_id == flour).unwrap();
    assert_eq!(flour_row.used, 20.0);
    assert_eq!(flour_row.cost, MoneyCents::new(8_000));

    // Present only in the later session: a restock, reported as negative.
    let oil_row = report.rows.iter().find(|r| r.item_id == oil).unwrap();
    assert_eq!(oil_row.used, -5.0);
    assert_eq!(oil_row.cost, MoneyCents::new(-2_000));
}

#[tokio::test]
async fn zero_usage_items_are_filtered_out() {
    let engine = engine_with_db().await;
    let location = engine.new_location("Walk-in").await.unwrap();
    let salt = flat_item(&engine, "Salt", 100).await;
    engine.assign_item(location, salt).await.unwrap();

    run_session(&engine, location, &[entry(salt, 12)]).await;
    run_session(&engine, location, &[entry(salt, 12)]).await;

    let (start, end) = full_range();
    let report = engine.usage_report(start, end).await.unwrap();
    assert!(report.rows.is_empty());
}

#[tokio::test]
async fn one_session_is_insufficient_data() {
    let engine = engine_with_db().await;
    let location = engine.new_location("Walk-in").await.unwrap();
    let salt = flat_item(&engine, "Salt", 100).await;
    engine.assign_item(location, salt).await.unwrap();

    run_session(&engine, location, &[entry(salt, 12)]).await;

    let (start, end) = full_range();
    let err = engine.usage_report(start, end).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientData(_)));
}

#[tokio::test]
async fn intermediate_sessions_are_ignored() {
    let engine = engine_with_db().await;
    let location = engine.new_location("Walk-in").await.unwrap();
    let flour = flat_item(&engine, "Flour", 400).await;
    engine.assign_item(location, flour).await.unwrap();

    let first = run_session(&engine, location, &[entry(flour, 50)]).await;
    run_session(&engine, location, &[entry(flour, 40)]).await;
    let last = run_session(&engine, location, &[entry(flour, 30)]).await;

    let (start, end) = full_range();
    let report = engine.usage_report(start, end).await.unwrap();
    assert_eq!(report.earlier_session_id, first.id);
    assert_eq!(report.later_session_id, last.id);
    assert_eq!(report.rows[0].used, 20.0);
}

#[tokio::test]
async fn session_totals_sum_across_locations() {
    let engine = engine_with_db().await;
    let walk_in = engine.new_location("Walk-in").await.unwrap();
    let bar = engine.new_location("Bar").await.unwrap();
    let limes = flat_item(&engine, "Limes", 50).await;
    for loc in [walk_in, bar] {
        engine.assign_item(loc, limes).await.unwrap();
    }

    // First session counts the item in two locations (30 + 20 = 50).
    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, walk_in, &[entry(limes, 30)])
        .await
        .unwrap();
    engine
        .save_location_counts(session.id, bar, &[entry(limes, 20)])
        .await
        .unwrap();
    engine.finalize_session(session.id).await.unwrap();

    run_session(&engine, walk_in, &[entry(limes, 35)]).await;

    let (start, end) = full_range();
    let report = engine.usage_report(start, end).await.unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].used, 15.0);
    assert_eq!(report.rows[0].cost, MoneyCents::new(750));
}

#[tokio::test]
async fn deleted_items_report_under_their_raw_id() {
    let engine = engine_with_db().await;
    let location = engine.new_location("Walk-in").await.unwrap();
    let ghost = flat_item(&engine, "Discontinued", 400).await;
    let keeper = flat_item(&engine, "Flour", 400).await;
    for item in [ghost, keeper] {
        engine.assign_item(location, item).await.unwrap();
    }

    run_session(&engine, location, &[entry(ghost, 10), entry(keeper, 5)]).await;
    run_session(&engine, location, &[entry(keeper, 5), entry(ghost, 4)]).await;
    engine.delete_item(ghost).await.unwrap();

    let (start, end) = full_range();
    let report = engine.usage_report(start, end).await.unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].nickname, ghost.to_string());
    assert_eq!(report.rows[0].used, 6.0);
    // Price data went with the item; usage still reports, just unpriced.
    assert_eq!(report.rows[0].cost, MoneyCents::ZERO);
}
