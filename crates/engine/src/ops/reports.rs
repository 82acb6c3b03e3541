use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Item, ResultEngine, Session, SessionStatus, counts, items, sessions, usage,
    usage::UsageReport,
};

use super::{Engine, with_tx};

impl Engine {
    /// Generates a usage report for the given date range.
    ///
    /// The report compares the chronologically first and last sessions whose
    /// end timestamp falls inside the range; fewer than two finalized
    /// sessions in range is an insufficient-data error. Per item,
    /// `used = earlier - later` (negative = restock) and zero-usage rows are
    /// dropped.
    pub async fn usage_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ResultEngine<UsageReport> {
        if start > end {
            return Err(EngineError::InvalidInput(
                "start date must not be after end date".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let in_range: Vec<Session> = sessions::Entity::find()
                .filter(sessions::Column::Status.eq(SessionStatus::Finalized.as_str()))
                .filter(sessions::Column::EndedAt.gte(start))
                .filter(sessions::Column::EndedAt.lte(end))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Session::try_from)
                .collect::<ResultEngine<_>>()?;

            let (earlier, later) = usage::select_bracket(in_range)?;

            let earlier_totals = self.session_totals(&db_tx, earlier.id).await?;
            let later_totals = self.session_totals(&db_tx, later.id).await?;

            let item_map: HashMap<Uuid, Item> = items::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| Item::try_from(model).map(|item| (item.id, item)))
                .collect::<ResultEngine<_>>()?;

            Ok(UsageReport {
                earlier_session_id: earlier.id,
                later_session_id: later.id,
                rows: usage::usage_rows(&earlier_totals, &later_totals, &item_map),
            })
        })
    }

    /// Per-item normalized totals of one session, summed across locations.
    async fn session_totals(
        &self,
        db_tx: &DatabaseTransaction,
        session_id: Uuid,
    ) -> ResultEngine<HashMap<Uuid, f64>> {
        let models = counts::Entity::find()
            .filter(counts::Column::SessionId.eq(session_id.to_string()))
            .all(db_tx)
            .await?;

        let mut totals: HashMap<Uuid, f64> = HashMap::new();
        for model in models {
            let item_id = Uuid::parse_str(&model.item_id)
                .map_err(|_| EngineError::InvalidInput("invalid item id".to_string()))?;
            *totals.entry(item_id).or_insert(0.0) += model.count;
        }
        Ok(totals)
    }
}
