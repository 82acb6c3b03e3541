//! The module contains the `Location` struct and its implementation.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// A storage location.
///
/// A location is a physical place where items are kept and counted: a walk-in
/// cooler, a dry-storage shelf, the bar. Items are mapped to locations and a
/// count session walks location by location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Stable identifier for this location.
    ///
    /// This is a UUID generated once and persisted in the database, so the
    /// location can be renamed without breaking references.
    pub id: Uuid,
    pub name: String,
}

impl Location {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::location_map::Entity")]
    LocationMap,
}

impl Related<super::location_map::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationMap.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Location> for ActiveModel {
    fn from(value: &Location) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
        }
    }
}

impl TryFrom<Model> for Location {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidInput("invalid location id".to_string()))?;
        Ok(Location {
            id,
            name: model.name,
        })
    }
}
