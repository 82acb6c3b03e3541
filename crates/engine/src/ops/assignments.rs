use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Item, ResultEngine, items, location_map};

use super::{Engine, with_tx};

impl Engine {
    /// Assigns an item to a location for counting.
    ///
    /// Assigning the same pair twice is a conflict, mirroring the toggle
    /// semantics of the assignment screen.
    pub async fn assign_item(&self, location_id: Uuid, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            self.require_item(&db_tx, item_id).await?;

            let exists = location_map::Entity::find_by_id((
                location_id.to_string(),
                item_id.to_string(),
            ))
            .one(&db_tx)
            .await?
            .is_some();
            if exists {
                return Err(EngineError::ExistingKey(format!(
                    "item already assigned to location {location_id}"
                )));
            }

            let assignment = location_map::ActiveModel {
                location_id: ActiveValue::Set(location_id.to_string()),
                item_id: ActiveValue::Set(item_id.to_string()),
            };
            assignment.insert(&db_tx).await?;
            Ok(())
        })
    }

    /// Removes an item's assignment from a location.
    pub async fn unassign_item(&self, location_id: Uuid, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;
            self.require_item(&db_tx, item_id).await?;

            let result = location_map::Entity::delete_by_id((
                location_id.to_string(),
                item_id.to_string(),
            ))
            .exec(&db_tx)
            .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "item not assigned to location".to_string(),
                ));
            }
            Ok(())
        })
    }

    /// Lists the items assigned to a location, ordered by nickname.
    pub async fn items_for_location(&self, location_id: Uuid) -> ResultEngine<Vec<Item>> {
        with_tx!(self, |db_tx| {
            self.require_location(&db_tx, location_id).await?;

            let item_ids: Vec<String> = location_map::Entity::find()
                .filter(location_map::Column::LocationId.eq(location_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|m| m.item_id)
                .collect();

            let models = items::Entity::find()
                .filter(items::Column::Id.is_in(item_ids))
                .order_by_asc(items::Column::Nickname)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Item::try_from).collect()
        })
    }
}
