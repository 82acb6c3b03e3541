pub use counts::{TierCounts, TierSlot, ValuedCount};
pub use error::EngineError;
pub use items::Item;
pub use locations::Location;
pub use money::MoneyCents;
pub use ops::{CountEntry, Engine, EngineBuilder, ItemDraft};
pub use sessions::{Session, SessionStatus};
pub use usage::{UsageReport, UsageRow};
pub use valuation::Valuation;

mod counts;
mod error;
mod items;
mod location_map;
mod locations;
mod money;
mod ops;
mod sessions;
pub mod usage;
pub mod valuation;

type ResultEngine<T> = Result<T, EngineError>;
