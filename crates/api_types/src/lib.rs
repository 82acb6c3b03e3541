use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod item {
    use super::*;

    /// Request body for creating or updating an item.
    ///
    /// Updates replace the whole attribute set; management screens always
    /// submit every column.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemPayload {
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
        /// Reference price in integer cents.
        pub price_cents: Option<i64>,
        /// Last purchase cost in integer cents; wins over `price_cents` when
        /// deriving the per-master-unit price.
        pub last_cost_cents: Option<i64>,
        pub par_level: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
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
        pub price_cents: Option<i64>,
        pub last_cost_cents: Option<i64>,
        pub par_level: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemsResponse {
        pub items: Vec<ItemView>,
    }
}

pub mod location {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationsResponse {
        pub locations: Vec<LocationView>,
    }

    /// Items assigned to one location, in counting-screen order.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationItemsResponse {
        pub items: Vec<super::item::ItemView>,
    }
}

pub mod session {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SessionStatus {
        InProgress,
        Finalized,
    }

    impl SessionStatus {
        /// Returns the canonical status string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::InProgress => "in_progress",
                Self::Finalized => "finalized",
            }
        }
    }

    /// Request body for starting a count session.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionStart {
        /// Count-type/frequency label (e.g. "Daily", "Weekly", "Monthly").
        pub count_type: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionView {
        pub id: Uuid,
        pub count_type: String,
        pub status: SessionStatus,
        pub started_at: DateTime<FixedOffset>,
        pub ended_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionsResponse {
        pub sessions: Vec<SessionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrentSessionResponse {
        pub session: Option<SessionView>,
    }
}

pub mod count {
    use super::*;

    /// One item's raw tier counts as entered on the counting screen.
    ///
    /// Negative values are clamped to 0 server-side rather than rejected.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CountEntryNew {
        pub item_id: Uuid,
        #[serde(default)]
        pub t1: i64,
        #[serde(default)]
        pub t2: i64,
        #[serde(default)]
        pub t3: i64,
    }

    /// Request body for saving one location's counts.
    ///
    /// The save replaces the whole record set for the (session, location)
    /// pair; zero-total entries are dropped.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CountsSave {
        pub entries: Vec<CountEntryNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CountRowView {
        pub item_id: Uuid,
        /// Normalized total in master inventory units.
        pub total: f64,
        pub value_cents: i64,
        pub t1: i64,
        pub t2: i64,
        pub t3: i64,
        pub counted_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CountsResponse {
        pub counts: Vec<CountRowView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompletionResponse {
        /// 0-100, display-only.
        pub percent: f64,
    }

    /// One location's slice of the review screen.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationReview {
        pub location_id: Uuid,
        /// Resolved name; falls back to the raw id when the location has
        /// since been deleted.
        pub location_name: String,
        pub rows: Vec<ReviewRow>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReviewRow {
        pub item_id: Uuid,
        /// Resolved nickname; falls back to the raw id when the item has
        /// since been deleted.
        pub nickname: String,
        pub total: f64,
        pub value_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReviewResponse {
        pub session: super::session::SessionView,
        pub locations: Vec<LocationReview>,
    }
}

pub mod report {
    use super::*;

    /// Query parameters for the usage report.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageQuery {
        pub start: DateTime<FixedOffset>,
        pub end: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageRowView {
        pub item_id: Uuid,
        pub nickname: String,
        /// `earlier - later` in master units; negative means a net restock.
        pub used: f64,
        pub usage_cost_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsageReportResponse {
        pub earlier_session_id: Uuid,
        pub later_session_id: Uuid,
        pub rows: Vec<UsageRowView>,
    }
}
