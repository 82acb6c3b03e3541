use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, Item, MoneyCents, ResultEngine, items, location_map};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

/// Input for creating or fully updating an item.
///
/// Updates replace the whole attribute set: management screens submit every
/// column, so partial patches are not modeled.
#[derive(Clone, Debug, Default)]
pub struct ItemDraft {
    pub nickname: String,
    pub category: Option<String>,
    pub vendor: Option<String>,
    pub purchase_unit: Option<String>,
    pub tier1_unit: Option<String>,
    pub tier1_factor: Option<f64>,
    pub tier2_unit: Option<String>,
    pub tier2_factor: Option<f64>,
    pub tier3_unit: Option<String>,
    pub tier3_factor: Option<f64>,
    pub master_unit: Option<String>,
    pub price: Option<MoneyCents>,
    pub last_purchase_cost: Option<MoneyCents>,
    pub par_level: Option<f64>,
}

impl ItemDraft {
    /// Validates and normalizes the draft into a domain `Item` with the given
    /// id.
    fn into_item(self, id: Uuid) -> ResultEngine<Item> {
        let nickname = normalize_required_name(&self.nickname, "item")?;

        for (label, factor) in [
            ("tier1", self.tier1_factor),
            ("tier2", self.tier2_factor),
            ("tier3", self.tier3_factor),
        ] {
            if let Some(f) = factor {
                if !f.is_finite() || f <= 0.0 {
                    return Err(EngineError::InvalidInput(format!(
                        "{label} factor must be a positive number"
                    )));
                }
            }
        }

        for (label, amount) in [("price", self.price), ("last cost", self.last_purchase_cost)] {
            if amount.is_some_and(MoneyCents::is_negative) {
                return Err(EngineError::InvalidInput(format!(
                    "{label} must not be negative"
                )));
            }
        }

        if let Some(par) = self.par_level {
            if !par.is_finite() || par < 0.0 {
                return Err(EngineError::InvalidInput(
                    "par level must be a non-negative number".to_string(),
                ));
            }
        }

        Ok(Item {
            id,
            nickname,
            category: normalize_optional_text(self.category.as_deref()),
            vendor: normalize_optional_text(self.vendor.as_deref()),
            purchase_unit: normalize_optional_text(self.purchase_unit.as_deref()),
            tier1_unit: normalize_optional_text(self.tier1_unit.as_deref()),
            tier1_factor: self.tier1_factor,
            tier2_unit: normalize_optional_text(self.tier2_unit.as_deref()),
            tier2_factor: self.tier2_factor,
            tier3_unit: normalize_optional_text(self.tier3_unit.as_deref()),
            tier3_factor: self.tier3_factor,
            master_unit: normalize_optional_text(self.master_unit.as_deref()),
            price: self.price,
            last_purchase_cost: self.last_purchase_cost,
            par_level: self.par_level,
        })
    }
}

impl Engine {
    pub(crate) async fn require_item(
        &self,
        db_tx: &DatabaseTransaction,
        item_id: Uuid,
    ) -> ResultEngine<items::Model> {
        items::Entity::find_by_id(item_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("item not exists".to_string()))
    }

    async fn require_unique_nickname(
        &self,
        db_tx: &DatabaseTransaction,
        nickname: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = items::Entity::find()
            .filter(Expr::cust("LOWER(nickname)").eq(nickname.to_lowercase()));
        if let Some(id) = exclude {
            query = query.filter(items::Column::Id.ne(id.to_string()));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::ExistingKey(nickname.to_string()));
        }
        Ok(())
    }

    /// Registers a new item.
    ///
    /// Nicknames are unique case-insensitively so lookups by name stay
    /// unambiguous.
    pub async fn new_item(&self, draft: ItemDraft) -> ResultEngine<Uuid> {
        let item = draft.into_item(Uuid::new_v4())?;
        with_tx!(self, |db_tx| {
            self.require_unique_nickname(&db_tx, &item.nickname, None)
                .await?;
            let model: items::ActiveModel = (&item).into();
            model.insert(&db_tx).await?;
            Ok(item.id)
        })
    }

    /// Replaces an item's attributes with the draft.
    pub async fn update_item(&self, item_id: Uuid, draft: ItemDraft) -> ResultEngine<()> {
        let item = draft.into_item(item_id)?;
        with_tx!(self, |db_tx| {
            self.require_item(&db_tx, item_id).await?;
            self.require_unique_nickname(&db_tx, &item.nickname, Some(item_id))
                .await?;
            let model: items::ActiveModel = (&item).into();
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes an item and its location assignments.
    ///
    /// Historical count records reference items by bare id and survive the
    /// deletion.
    pub async fn delete_item(&self, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_item(&db_tx, item_id).await?;
            location_map::Entity::delete_many()
                .filter(location_map::Column::ItemId.eq(item_id.to_string()))
                .exec(&db_tx)
                .await?;
            items::Entity::delete_by_id(item_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Return an item snapshot from DB.
    pub async fn item(&self, item_id: Uuid) -> ResultEngine<Item> {
        let model = items::Entity::find_by_id(item_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("item not exists".to_string()))?;
        Item::try_from(model)
    }

    /// Lists all items ordered by nickname.
    pub async fn list_items(&self) -> ResultEngine<Vec<Item>> {
        let models = items::Entity::find()
            .order_by_asc(items::Column::Nickname)
            .all(&self.database)
            .await?;
        models.into_iter().map(Item::try_from).collect()
    }
}
