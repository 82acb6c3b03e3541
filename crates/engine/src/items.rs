//! The module contains the `Item` struct and its implementation.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

/// A countable inventory item.
///
/// An item carries up to three optional counting tiers (e.g. case, sleeve,
/// each). Each active tier has a unit label and a conversion factor that
/// turns one tier unit into master inventory units. Stock totals and values
/// are always expressed in master units.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Stable identifier for this item.
    ///
    /// This is a UUID generated once and persisted in the database, so the
    /// item can be renamed without breaking references.
    pub id: Uuid,
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

impl Item {
    pub fn new(nickname: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname,
            category: None,
            vendor: None,
            purchase_unit: None,
            tier1_unit: None,
            tier1_factor: None,
            tier2_unit: None,
            tier2_factor: None,
            tier3_unit: None,
            tier3_factor: None,
            master_unit: None,
            price: None,
            last_purchase_cost: None,
            par_level: None,
        }
    }

    /// Conversion factors for the three tier slots, in order.
    ///
    /// An unset or non-positive factor falls back to 1, so a bare tier counts
    /// one master unit per tier unit.
    pub fn tier_factors(&self) -> [f64; 3] {
        [
            effective_factor(self.tier1_factor),
            effective_factor(self.tier2_factor),
            effective_factor(self.tier3_factor),
        ]
    }

    /// Returns `true` if the tier slot (1-based) has a unit label.
    ///
    /// Counting screens only render active tiers; inactive slots are simply
    /// unused and their counts stay 0.
    pub fn is_tier_active(&self, slot: usize) -> bool {
        let unit = match slot {
            1 => &self.tier1_unit,
            2 => &self.tier2_unit,
            3 => &self.tier3_unit,
            _ => &None,
        };
        unit.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Reference price per one master inventory unit, in fractional cents.
    ///
    /// Derived as `(last_purchase_cost or price or 0) / (tier1_factor or 1)`.
    /// Absent price data is valid and yields 0; this never errors.
    pub fn price_per_master_unit(&self) -> f64 {
        let reference = self
            .last_purchase_cost
            .or(self.price)
            .unwrap_or(MoneyCents::ZERO);
        reference.cents() as f64 / effective_factor(self.tier1_factor)
    }
}

fn effective_factor(factor: Option<f64>) -> f64 {
    match factor {
        Some(f) if f > 0.0 && f.is_finite() => f,
        _ => 1.0,
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
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
    pub price_cents: Option<i64>,
    pub last_cost_cents: Option<i64>,
    pub par_level: Option<f64>,
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

impl From<&Item> for ActiveModel {
    fn from(value: &Item) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            nickname: ActiveValue::Set(value.nickname.clone()),
            category: ActiveValue::Set(value.category.clone()),
            vendor: ActiveValue::Set(value.vendor.clone()),
            purchase_unit: ActiveValue::Set(value.purchase_unit.clone()),
            tier1_unit: ActiveValue::Set(value.tier1_unit.clone()),
            tier1_factor: ActiveValue::Set(value.tier1_factor),
            tier2_unit: ActiveValue::Set(value.tier2_unit.clone()),
            tier2_factor: ActiveValue::Set(value.tier2_factor),
            tier3_unit: ActiveValue::Set(value.tier3_unit.clone()),
            tier3_factor: ActiveValue::Set(value.tier3_factor),
            master_unit: ActiveValue::Set(value.master_unit.clone()),
            price_cents: ActiveValue::Set(value.price.map(MoneyCents::cents)),
            last_cost_cents: ActiveValue::Set(value.last_purchase_cost.map(MoneyCents::cents)),
            par_level: ActiveValue::Set(value.par_level),
        }
    }
}

impl TryFrom<Model> for Item {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidInput("invalid item id".to_string()))?;
        Ok(Item {
            id,
            nickname: model.nickname,
            category: model.category,
            vendor: model.vendor,
            purchase_unit: model.purchase_unit,
            tier1_unit: model.tier1_unit,
            tier1_factor: model.tier1_factor,
            tier2_unit: model.tier2_unit,
            tier2_factor: model.tier2_factor,
            tier3_unit: model.tier3_unit,
            tier3_factor: model.tier3_factor,
            master_unit: model.master_unit,
            price: model.price_cents.map(MoneyCents::new),
            last_purchase_cost: model.last_cost_cents.map(MoneyCents::new),
            par_level: model.par_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cups() -> Item {
        let mut item = Item::new("Sample Cups".to_string());
        item.tier1_unit = Some("Case".to_string());
        item.tier1_factor = Some(50.0);
        item.tier2_unit = Some("Sleeve".to_string());
        item.tier2_factor = Some(20.0);
        item.master_unit = Some("Cup".to_string());
        item.price = Some(MoneyCents::new(10_000));
        item
    }

    #[test]
    fn unset_factors_default_to_one() {
        let item = Item::new("Napkins".to_string());
        assert_eq!(item.tier_factors(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_factor_is_treated_as_unset() {
        let mut item = cups();
        item.tier2_factor = Some(0.0);
        assert_eq!(item.tier_factors()[1], 1.0);
    }

    #[test]
    fn active_tiers_require_a_unit_label() {
        let item = cups();
        assert!(item.is_tier_active(1));
        assert!(item.is_tier_active(2));
        assert!(!item.is_tier_active(3));
    }

    #[test]
    fn price_per_master_unit_divides_by_tier1_factor() {
        let item = cups();
        // $100.00 per case of 50 cups -> $2.00 per cup.
        assert_eq!(item.price_per_master_unit(), 200.0);
    }

    #[test]
    fn last_purchase_cost_wins_over_price() {
        let mut item = cups();
        item.last_purchase_cost = Some(MoneyCents::new(12_500));
        assert_eq!(item.price_per_master_unit(), 250.0);
    }

    #[test]
    fn missing_price_data_is_worthless_not_an_error() {
        let item = Item::new("Donated Stock".to_string());
        assert_eq!(item.price_per_master_unit(), 0.0);
    }
}
