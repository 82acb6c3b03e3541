//! Pure count valuation: tiered counts to normalized totals and values.
//!
//! Everything here is side-effect free; the counting screen calls it on every
//! keystroke for live display and the save path calls it again to build the
//! persisted records.

use crate::{Item, MoneyCents, TierCounts};

/// The valued outcome of one tiered count entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Valuation {
    /// Total quantity in master inventory units.
    pub total: f64,
    /// Monetary value, rounded to whole cents.
    pub value: MoneyCents,
}

/// Normalized total quantity: the tier-weighted sum `t1*f1 + t2*f2 + t3*f3`.
///
/// Missing factors default to 1, so the result is defined for every item and
/// is 0 exactly when every tier count is 0.
pub fn normalized_total(item: &Item, counts: TierCounts) -> f64 {
    let [f1, f2, f3] = item.tier_factors();
    let [t1, t2, t3] = counts.as_array();
    t1 as f64 * f1 + t2 as f64 * f2 + t3 as f64 * f3
}

/// Values one entry: normalized total plus `total * price_per_master_unit`.
///
/// Degrades instead of failing: missing factors count as 1, missing price as
/// 0, so the result is never negative and never an error.
pub fn appraise(item: &Item, counts: TierCounts) -> Valuation {
    let total = normalized_total(item, counts);
    let value = MoneyCents::from_fractional(total * item.price_per_master_unit());
    Valuation { total, value }
}

/// 0-100% completion indicator for one location within a session.
///
/// `counted` is the number of items with a saved non-zero count, `assigned`
/// the number of items mapped to the location. Display-only; it never gates
/// finalization.
pub fn completion_percent(counted: usize, assigned: usize) -> f64 {
    if assigned == 0 {
        return 0.0;
    }
    counted as f64 / assigned as f64 * 100.0
}
