use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Item, ResultEngine, Session, TierCounts, ValuedCount, counts, items,
    location_map, valuation,
};

use super::{Engine, with_tx};

/// One item's tiered counts as submitted for a location save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountEntry {
    pub item_id: Uuid,
    pub counts: TierCounts,
}

impl Engine {
    /// Saves the counts for one location of an in-progress session.
    ///
    /// The save is a full replace-set for the (session, location) pair: all
    /// prior records for the pair are deleted and the current non-zero set is
    /// inserted, inside one transaction. Items whose normalized total is 0
    /// are dropped, not recorded as zero, so omitting or zeroing an item
    /// removes it from the set. Returns the persisted records.
    pub async fn save_location_counts(
        &self,
        session_id: Uuid,
        location_id: Uuid,
        entries: &[CountEntry],
    ) -> ResultEngine<Vec<ValuedCount>> {
        let counted_at = Utc::now();

        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.item_id) {
                return Err(EngineError::InvalidInput(format!(
                    "duplicate count entry for item {}",
                    entry.item_id
                )));
            }
        }

        with_tx!(self, |db_tx| {
            let session = Session::try_from(self.require_session(&db_tx, session_id).await?)?;
            if !session.is_in_progress() {
                return Err(EngineError::SessionConflict(
                    "cannot record counts against a finalized session".to_string(),
                ));
            }
            self.require_location(&db_tx, location_id).await?;

            let ids: Vec<String> = entries.iter().map(|e| e.item_id.to_string()).collect();
            let item_map: HashMap<Uuid, Item> = items::Entity::find()
                .filter(items::Column::Id.is_in(ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| Item::try_from(model).map(|item| (item.id, item)))
                .collect::<ResultEngine<_>>()?;

            let mut records = Vec::with_capacity(entries.len());
            for entry in entries {
                let item = item_map
                    .get(&entry.item_id)
                    .ok_or_else(|| EngineError::KeyNotFound("item not exists".to_string()))?;
                let valuation::Valuation { total, value } =
                    valuation::appraise(item, entry.counts);
                if total > 0.0 {
                    records.push(ValuedCount {
                        session_id,
                        location_id,
                        item_id: entry.item_id,
                        total,
                        value,
                        counts: entry.counts,
                        counted_at,
                    });
                }
            }

            counts::Entity::delete_many()
                .filter(counts::Column::SessionId.eq(session_id.to_string()))
                .filter(counts::Column::LocationId.eq(location_id.to_string()))
                .exec(&db_tx)
                .await?;

            for record in &records {
                let model: counts::ActiveModel = record.into();
                model.insert(&db_tx).await?;
            }

            Ok(records)
        })
    }

    /// Reads back the saved counts for one location of a session.
    pub async fn location_counts(
        &self,
        session_id: Uuid,
        location_id: Uuid,
    ) -> ResultEngine<Vec<ValuedCount>> {
        with_tx!(self, |db_tx| {
            self.require_session(&db_tx, session_id).await?;
            let models = counts::Entity::find()
                .filter(counts::Column::SessionId.eq(session_id.to_string()))
                .filter(counts::Column::LocationId.eq(location_id.to_string()))
                .order_by_asc(counts::Column::ItemId)
                .all(&db_tx)
                .await?;
            models.into_iter().map(ValuedCount::try_from).collect()
        })
    }

    /// All count records of a session, for review and history views.
    ///
    /// Records are ordered by location then item so callers can group them
    /// per location without re-sorting.
    pub async fn session_counts(&self, session_id: Uuid) -> ResultEngine<Vec<ValuedCount>> {
        with_tx!(self, |db_tx| {
            self.require_session(&db_tx, session_id).await?;
            let models = counts::Entity::find()
                .filter(counts::Column::SessionId.eq(session_id.to_string()))
                .order_by_asc(counts::Column::LocationId)
                .order_by_asc(counts::Column::ItemId)
                .all(&db_tx)
                .await?;
            models.into_iter().map(ValuedCount::try_from).collect()
        })
    }

    /// Completion percentage for one location of a session.
    ///
    /// Counted and assigned item totals are both scoped to the location.
    /// Display-only; finalization does not consult it.
    pub async fn location_completion(
        &self,
        session_id: Uuid,
        location_id: Uuid,
    ) -> ResultEngine<f64> {
        with_tx!(self, |db_tx| {
            self.require_session(&db_tx, session_id).await?;
            self.require_location(&db_tx, location_id).await?;

            let counted = counts::Entity::find()
                .filter(counts::Column::SessionId.eq(session_id.to_string()))
                .filter(counts::Column::LocationId.eq(location_id.to_string()))
                .count(&db_tx)
                .await?;
            let assigned = location_map::Entity::find()
                .filter(location_map::Column::LocationId.eq(location_id.to_string()))
                .count(&db_tx)
                .await?;

            Ok(valuation::completion_percent(
                counted as usize,
                assigned as usize,
            ))
        })
    }
}
