use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, Location, ResultEngine, location_map, locations};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub(crate) async fn require_location(
        &self,
        db_tx: &DatabaseTransaction,
        location_id: Uuid,
    ) -> ResultEngine<locations::Model> {
        locations::Entity::find_by_id(location_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("location not exists".to_string()))
    }

    async fn require_unique_location_name(
        &self,
        db_tx: &DatabaseTransaction,
        name: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query =
            locations::Entity::find().filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()));
        if let Some(id) = exclude {
            query = query.filter(locations::Column::Id.ne(id.to_string()));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }

    /// Adds a new storage location.
    pub async fn new_location(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "location")?;
        with_tx!(self, |db_tx| {
            self.require_unique_location_name(&db_tx, &name, None)
                .await?;
            let location = Location::new(name);
            let model: locations::ActiveModel = (&location).into();
            model.insert(&db_tx).await?;
            Ok(location.id)
        })
    }

    /// Renames an existing location.
    pub async fn rename_location(&self, location_id: Uuid, new_name: &str) -> ResultEngine<()> {
        let new_name = normalize_required_name(new_name, "location")?;
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            self.require_unique_location_name(&db_tx, &new_name, Some(location_id))
                .await?;
            let active = locations::ActiveModel {
                id: ActiveValue::Set(location_id.to_string()),
                name: ActiveValue::Set(new_name),
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a location and its item assignments.
    ///
    /// Historical count records reference locations by bare id and survive
    /// the deletion.
    pub async fn delete_location(&self, location_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            location_map::Entity::delete_many()
                .filter(location_map::Column::LocationId.eq(location_id.to_string()))
                .exec(&db_tx)
                .await?;
            locations::Entity::delete_by_id(location_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Return a location snapshot from DB.
    pub async fn location(&self, location_id: Uuid) -> ResultEngine<Location> {
        let model = locations::Entity::find_by_id(location_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("location not exists".to_string()))?;
        Location::try_from(model)
    }

    /// Lists all locations ordered by name.
    pub async fn list_locations(&self) -> ResultEngine<Vec<Location>> {
        let models = locations::Entity::find()
            .order_by_asc(locations::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Location::try_from).collect()
    }
}
