//! Tiered count entries and the persisted valued count records.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

/// One of the three tier slots on a counting screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierSlot {
    Tier1,
    Tier2,
    Tier3,
}

/// Transient tiered count input for one item.
///
/// Counts are non-negative integers, one per tier slot; slots the item does
/// not use simply stay 0. All mutation paths clamp at 0, matching the
/// counting screen's `-`/`+`/direct-edit controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TierCounts {
    t1: i64,
    t2: i64,
    t3: i64,
}

impl TierCounts {
    pub const ZERO: TierCounts = TierCounts { t1: 0, t2: 0, t3: 0 };

    /// Builds an entry, clamping negative inputs to 0.
    pub fn new(t1: i64, t2: i64, t3: i64) -> Self {
        Self {
            t1: t1.max(0),
            t2: t2.max(0),
            t3: t3.max(0),
        }
    }

    pub fn get(&self, slot: TierSlot) -> i64 {
        match slot {
            TierSlot::Tier1 => self.t1,
            TierSlot::Tier2 => self.t2,
            TierSlot::Tier3 => self.t3,
        }
    }

    /// Direct edit of one slot; negative values clamp to 0.
    pub fn set(&mut self, slot: TierSlot, value: i64) {
        let value = value.max(0);
        match slot {
            TierSlot::Tier1 => self.t1 = value,
            TierSlot::Tier2 => self.t2 = value,
            TierSlot::Tier3 => self.t3 = value,
        }
    }

    pub fn add_one(&mut self, slot: TierSlot) {
        self.set(slot, self.get(slot).saturating_add(1));
    }

    /// Decrement saturates at 0 instead of going negative.
    pub fn subtract_one(&mut self, slot: TierSlot) {
        self.set(slot, self.get(slot) - 1);
    }

    pub fn as_array(&self) -> [i64; 3] {
        [self.t1, self.t2, self.t3]
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// The persisted, priced outcome of counting one item in one location within
/// one session.
///
/// Identity is the (session, location, item) triple; saving a location again
/// replaces the whole record set for that (session, location) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuedCount {
    pub session_id: Uuid,
    pub location_id: Uuid,
    pub item_id: Uuid,
    /// Normalized total quantity in master inventory units.
    pub total: f64,
    /// Monetary value of the counted stock.
    pub value: MoneyCents,
    /// Raw tier counts as entered, kept for audit/review.
    pub counts: TierCounts,
    pub counted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "session_counts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub location_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: String,
    pub count: f64,
    pub value_cents: i64,
    pub tier1_count: i64,
    pub tier2_count: i64,
    pub tier3_count: i64,
    pub counted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Count records are historical snapshots: they reference items and
    // locations by bare id so deleting either keeps the history readable.
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Sessions,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ValuedCount> for ActiveModel {
    fn from(value: &ValuedCount) -> Self {
        let [t1, t2, t3] = value.counts.as_array();
        Self {
            session_id: ActiveValue::Set(value.session_id.to_string()),
            location_id: ActiveValue::Set(value.location_id.to_string()),
            item_id: ActiveValue::Set(value.item_id.to_string()),
            count: ActiveValue::Set(value.total),
            value_cents: ActiveValue::Set(value.value.cents()),
            tier1_count: ActiveValue::Set(t1),
            tier2_count: ActiveValue::Set(t2),
            tier3_count: ActiveValue::Set(t3),
            counted_at: ActiveValue::Set(value.counted_at),
        }
    }
}

impl TryFrom<Model> for ValuedCount {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |value: &str, label: &str| {
            Uuid::parse_str(value)
                .map_err(|_| EngineError::InvalidInput(format!("invalid {label} id")))
        };
        Ok(ValuedCount {
            session_id: parse(&model.session_id, "session")?,
            location_id: parse(&model.location_id, "location")?,
            item_id: parse(&model.item_id, "item")?,
            total: model.count,
            value: MoneyCents::new(model.value_cents),
            counts: TierCounts::new(model.tier1_count, model.tier2_count, model.tier3_count),
            counted_at: model.counted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_inputs_clamp_to_zero() {
        let counts = TierCounts::new(-3, 2, 0);
        assert_eq!(counts.as_array(), [0, 2, 0]);

        let mut counts = TierCounts::ZERO;
        counts.set(TierSlot::Tier1, -10);
        assert_eq!(counts.get(TierSlot::Tier1), 0);
    }

    #[test]
    fn subtract_saturates_at_zero() {
        let mut counts = TierCounts::new(1, 0, 0);
        counts.subtract_one(TierSlot::Tier1);
        counts.subtract_one(TierSlot::Tier1);
        assert_eq!(counts.get(TierSlot::Tier1), 0);

        counts.subtract_one(TierSlot::Tier3);
        assert_eq!(counts.get(TierSlot::Tier3), 0);
    }

    #[test]
    fn add_and_edit_track_the_screen_controls() {
        let mut counts = TierCounts::ZERO;
        counts.add_one(TierSlot::Tier2);
        counts.add_one(TierSlot::Tier2);
        counts.set(TierSlot::Tier3, 7);
        assert_eq!(counts.as_array(), [0, 2, 7]);
        assert!(!counts.is_zero());
    }
}
