use engine::{CountEntry, Engine, EngineError, ItemDraft, MoneyCents, TierCounts};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn cups_draft() -> ItemDraft {
    ItemDraft {
        nickname: "Sample Cups".to_string(),
        tier1_unit: Some("Case".to_string()),
        tier1_factor: Some(20.0),
        tier2_unit: Some("Each".to_string()),
        tier2_factor: Some(1.0),
        master_unit: Some("Cup".to_string()),
        last_purchase_cost: Some(MoneyCents::new(4_000)),
        ..Default::default()
    }
}

async fn seed_item_and_location(engine: &Engine) -> (Uuid, Uuid) {
    let item_id = engine.new_item(cups_draft()).await.unwrap();
    let location_id = engine.new_location("Walk-in").await.unwrap();
    engine.assign_item(location_id, item_id).await.unwrap();
    (item_id, location_id)
}

fn entry(item_id: Uuid, t1: i64, t2: i64, t3: i64) -> CountEntry {
    CountEntry {
        item_id,
        counts: TierCounts::new(t1, t2, t3),
    }
}

#[tokio::test]
async fn saving_counts_values_and_persists() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();

    // 2 cases of 20 plus 3 each at $2.00 per cup.
    let records = engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 2, 3, 0)])
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total, 43.0);
    assert_eq!(records[0].value, MoneyCents::new(8_600));

    let read_back = engine
        .location_counts(session.id, location_id)
        .await
        .unwrap();
    assert_eq!(read_back.len(), 1);
    assert_eq!(read_back[0].total, 43.0);
    assert_eq!(read_back[0].counts, TierCounts::new(2, 3, 0));
}

#[tokio::test]
async fn zero_total_entries_are_not_recorded() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();

    let records = engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 0, 0, 0)])
        .await
        .unwrap();
    assert!(records.is_empty());
    assert!(
        engine
            .location_counts(session.id, location_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn resaving_replaces_the_location_set() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();

    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();

    // Same item saved again: one record with the latest values, not two.
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 2, 1, 0)])
        .await
        .unwrap();
    let records = engine
        .location_counts(session.id, location_id)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total, 41.0);

    // Zeroed on the next save: the stale record goes away with it.
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 0, 0, 0)])
        .await
        .unwrap();
    assert!(
        engine
            .location_counts(session.id, location_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn duplicate_entries_in_one_save_are_rejected() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();

    let err = engine
        .save_location_counts(
            session.id,
            location_id,
            &[entry(item_id, 1, 0, 0), entry(item_id, 2, 0, 0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn unknown_items_cannot_be_counted() {
    let engine = engine_with_db().await;
    let (_, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();

    let err = engine
        .save_location_counts(session.id, location_id, &[entry(Uuid::new_v4(), 1, 0, 0)])
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("item not exists".to_string()));
}

#[tokio::test]
async fn only_one_session_may_be_in_progress() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;

    let session = engine.start_session("Weekly").await.unwrap();
    let err = engine.start_session("Daily").await.unwrap_err();
    assert!(matches!(err, EngineError::SessionConflict(_)));

    // Finalizing the open session frees the slot.
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();
    engine.finalize_session(session.id).await.unwrap();
    engine.start_session("Daily").await.unwrap();
}

#[tokio::test]
async fn finalize_requires_counts_and_happens_once() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Monthly").await.unwrap();

    let err = engine.finalize_session(session.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();
    let finalized = engine.finalize_session(session.id).await.unwrap();
    assert!(!finalized.is_in_progress());
    assert!(finalized.ended_at.is_some());
    assert!(engine.current_session().await.unwrap().is_none());

    let err = engine.finalize_session(session.id).await.unwrap_err();
    assert!(matches!(err, EngineError::SessionConflict(_)));
}

#[tokio::test]
async fn counts_cannot_target_finalized_sessions() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();
    engine.finalize_session(session.id).await.unwrap();

    let err = engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 2, 0, 0)])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionConflict(_)));
}

#[tokio::test]
async fn completion_is_scoped_to_the_location() {
    let engine = engine_with_db().await;
    let (counted_item, location_id) = seed_item_and_location(&engine).await;

    let mut draft = cups_draft();
    draft.nickname = "Napkins".to_string();
    let other_item = engine.new_item(draft).await.unwrap();
    engine.assign_item(location_id, other_item).await.unwrap();

    // A second location with nothing assigned stays at 0 regardless of the
    // global item count.
    let empty_location = engine.new_location("Dry Storage").await.unwrap();

    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, location_id, &[entry(counted_item, 1, 0, 0)])
        .await
        .unwrap();

    let percent = engine
        .location_completion(session.id, location_id)
        .await
        .unwrap();
    assert_eq!(percent, 50.0);

    let percent = engine
        .location_completion(session.id, empty_location)
        .await
        .unwrap();
    assert_eq!(percent, 0.0);
}

#[tokio::test]
async fn deleting_a_session_removes_its_counts() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();

    engine.delete_session(session.id).await.unwrap();
    let err = engine.session(session.id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("session not exists".to_string())
    );

    // The open slot is free again.
    engine.start_session("Weekly").await.unwrap();
}

#[tokio::test]
async fn deleting_an_item_keeps_count_history() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();

    engine.delete_item(item_id).await.unwrap();
    assert!(engine.list_items().await.unwrap().is_empty());

    let records = engine.session_counts(session.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].item_id, item_id);
}

#[tokio::test]
async fn erase_all_counts_wipes_history() {
    let engine = engine_with_db().await;
    let (item_id, location_id) = seed_item_and_location(&engine).await;
    let session = engine.start_session("Weekly").await.unwrap();
    engine
        .save_location_counts(session.id, location_id, &[entry(item_id, 1, 0, 0)])
        .await
        .unwrap();

    let (count_rows, session_rows) = engine.erase_all_counts().await.unwrap();
    assert_eq!(count_rows, 1);
    assert_eq!(session_rows, 1);
    assert!(engine.current_session().await.unwrap().is_none());
    assert!(engine.list_finalized_sessions().await.unwrap().is_empty());
}
