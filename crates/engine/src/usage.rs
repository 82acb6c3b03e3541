//! Pure usage-delta computation between two finalized session snapshots.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{EngineError, Item, MoneyCents, Session};

/// Per-item consumption between the two bracketing sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageRow {
    pub item_id: Uuid,
    /// Item nickname at report time; falls back to the raw id when the item
    /// has since been deleted (count records outlive items).
    pub nickname: String,
    /// `earlier - later` in master units. Negative means a net restock.
    pub used: f64,
    pub cost: MoneyCents,
}

/// A generated usage report plus the sessions it compared.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageReport {
    pub earlier_session_id: Uuid,
    pub later_session_id: Uuid,
    pub rows: Vec<UsageRow>,
}

/// Picks the chronologically first and last finalized sessions by end
/// timestamp.
///
/// Intermediate sessions in the range are deliberately ignored; usage is a
/// single first-to-last delta, not a chained sum.
pub fn select_bracket(mut sessions: Vec<Session>) -> Result<(Session, Session), EngineError> {
    if sessions.len() < 2 {
        return Err(EngineError::InsufficientData(
            "need at least two finalized sessions to calculate usage".to_string(),
        ));
    }
    sessions.sort_by_key(|s| s.ended_at);
    let later = sessions.pop().ok_or_else(|| {
        EngineError::InsufficientData("need at least two finalized sessions".to_string())
    })?;
    let earlier = sessions.swap_remove(0);
    Ok((earlier, later))
}

/// Computes usage rows over the union of both snapshots.
///
/// Absent entries count as 0, so an item counted only in the later snapshot
/// shows up as a negative usage (restock). Rows with zero usage are dropped.
/// Output is sorted by nickname for stable display.
pub fn usage_rows(
    earlier: &HashMap<Uuid, f64>,
    later: &HashMap<Uuid, f64>,
    items: &HashMap<Uuid, Item>,
) -> Vec<UsageRow> {
    let mut rows: Vec<UsageRow> = earlier
        .keys()
        .chain(later.keys().filter(|id| !earlier.contains_key(id)))
        .filter_map(|id| {
            let before = earlier.get(id).copied().unwrap_or(0.0);
            let after = later.get(id).copied().unwrap_or(0.0);
            let used = before - after;
            if used == 0.0 {
                return None;
            }

            let (nickname, price) = match items.get(id) {
                Some(item) => (item.nickname.clone(), item.price_per_master_unit()),
                None => (id.to_string(), 0.0),
            };
            Some(UsageRow {
                item_id: *id,
                nickname,
                used,
                cost: MoneyCents::from_fractional(used * price),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.nickname
            .to_lowercase()
            .cmp(&b.nickname.to_lowercase())
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    rows
}
