//! The module contains the `Session` struct and its status lifecycle.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Marker value stored in the `open_marker` column while a session is in
/// progress. The column is NULL once the session is finalized, and a unique
/// index over it enforces at most one open session at a time (NULLs are
/// exempt from uniqueness).
pub(crate) const OPEN_MARKER: &str = "open";

/// Lifecycle status of an inventory session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Finalized,
}

impl SessionStatus {
    /// Returns the canonical status string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Finalized => "finalized",
        }
    }
}

impl TryFrom<&str> for SessionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in_progress" => Ok(Self::InProgress),
            "finalized" => Ok(Self::Finalized),
            other => Err(EngineError::InvalidInput(format!(
                "unknown session status '{other}'"
            ))),
        }
    }
}

/// One bounded inventory-counting exercise.
///
/// A session is created `in_progress`, accumulates count records location by
/// location, and transitions to `finalized` exactly once. Finalized sessions
/// feed history views and usage reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    /// Count-type/frequency label chosen at start (e.g. "Weekly").
    pub count_type: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(count_type: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            count_type,
            status: SessionStatus::InProgress,
            started_at,
            ended_at: None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "inventory_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub count_type: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub open_marker: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::counts::Entity")]
    Counts,
}

impl Related<super::counts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Session> for ActiveModel {
    fn from(value: &Session) -> Self {
        let open_marker = value
            .is_in_progress()
            .then(|| OPEN_MARKER.to_string());
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            count_type: ActiveValue::Set(value.count_type.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            started_at: ActiveValue::Set(value.started_at),
            ended_at: ActiveValue::Set(value.ended_at),
            open_marker: ActiveValue::Set(open_marker),
        }
    }
}

impl TryFrom<Model> for Session {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidInput("invalid session id".to_string()))?;
        Ok(Session {
            id,
            count_type: model.count_type,
            status: SessionStatus::try_from(model.status.as_str())?,
            started_at: model.started_at,
            ended_at: model.ended_at,
        })
    }
}
