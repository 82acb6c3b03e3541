use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Session, SessionStatus, counts, sessions,
    sessions::OPEN_MARKER,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub(crate) async fn require_session(
        &self,
        db_tx: &DatabaseTransaction,
        session_id: Uuid,
    ) -> ResultEngine<sessions::Model> {
        sessions::Entity::find_by_id(session_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("session not exists".to_string()))
    }

    /// Starts a new counting session.
    ///
    /// At most one session may be in progress at a time. The check runs
    /// inside the transaction and the unique index on the open marker column
    /// backstops concurrent starts at the store layer.
    pub async fn start_session(&self, count_type: &str) -> ResultEngine<Session> {
        let count_type = normalize_required_name(count_type, "count type")?;
        let session = Session::new(count_type, Utc::now());
        with_tx!(self, |db_tx| {
            let open = sessions::Entity::find()
                .filter(sessions::Column::OpenMarker.eq(OPEN_MARKER))
                .one(&db_tx)
                .await?;
            if open.is_some() {
                return Err(EngineError::SessionConflict(
                    "another count is already in progress".to_string(),
                ));
            }

            let model: sessions::ActiveModel = (&session).into();
            model.insert(&db_tx).await?;
            Ok(session.clone())
        })
    }

    /// The in-progress session, if any.
    pub async fn current_session(&self) -> ResultEngine<Option<Session>> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::OpenMarker.eq(OPEN_MARKER))
            .one(&self.database)
            .await?;
        model.map(Session::try_from).transpose()
    }

    /// Return a session snapshot from DB.
    pub async fn session(&self, session_id: Uuid) -> ResultEngine<Session> {
        let model = sessions::Entity::find_by_id(session_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("session not exists".to_string()))?;
        Session::try_from(model)
    }

    /// Lists finalized sessions, newest first.
    pub async fn list_finalized_sessions(&self) -> ResultEngine<Vec<Session>> {
        let models = sessions::Entity::find()
            .filter(sessions::Column::Status.eq(SessionStatus::Finalized.as_str()))
            .order_by_desc(sessions::Column::EndedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Session::try_from).collect()
    }

    /// Finalizes an in-progress session.
    ///
    /// The transition is irreversible: status moves to `finalized`,
    /// `ended_at` is stamped and the open marker clears so a new session can
    /// start. A session with no count records cannot be finalized.
    pub async fn finalize_session(&self, session_id: Uuid) -> ResultEngine<Session> {
        let ended_at = Utc::now();
        with_tx!(self, |db_tx| {
            let model = self.require_session(&db_tx, session_id).await?;
            let session = Session::try_from(model)?;
            if !session.is_in_progress() {
                return Err(EngineError::SessionConflict(
                    "session is already finalized".to_string(),
                ));
            }

            let recorded = counts::Entity::find()
                .filter(counts::Column::SessionId.eq(session_id.to_string()))
                .count(&db_tx)
                .await?;
            if recorded == 0 {
                return Err(EngineError::InvalidInput(
                    "no counts entered for this session".to_string(),
                ));
            }

            let active = sessions::ActiveModel {
                id: ActiveValue::Set(session_id.to_string()),
                status: ActiveValue::Set(SessionStatus::Finalized.as_str().to_string()),
                ended_at: ActiveValue::Set(Some(ended_at)),
                open_marker: ActiveValue::Set(None),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Session::try_from(updated)
        })
    }

    /// Deletes a session and all of its count records.
    pub async fn delete_session(&self, session_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_session(&db_tx, session_id).await?;
            counts::Entity::delete_many()
                .filter(counts::Column::SessionId.eq(session_id.to_string()))
                .exec(&db_tx)
                .await?;
            sessions::Entity::delete_by_id(session_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Wipes every count record and session.
    ///
    /// Destructive maintenance for admin tooling; returns the number of
    /// deleted (count records, sessions).
    pub async fn erase_all_counts(&self) -> ResultEngine<(u64, u64)> {
        with_tx!(self, |db_tx| {
            let counts_deleted = counts::Entity::delete_many().exec(&db_tx).await?;
            let sessions_deleted = sessions::Entity::delete_many().exec(&db_tx).await?;
            Ok((counts_deleted.rows_affected, sessions_deleted.rows_affected))
        })
    }
}
