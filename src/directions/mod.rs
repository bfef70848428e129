//! Direction assembly: placement onto cities, deduplication and enrichment.

pub mod bankomat;
pub mod enrich;
pub mod expand;
pub mod merge;
pub mod schedule;

pub use bankomat::{BankomatAvailability, BankomatContext};
pub use enrich::{EnrichContext, EnrichedDirection, enrich, numbered, sort_by_rate};
pub use expand::{PlacedDirection, expand_country_direction, place_in_city, serves_city};
pub use merge::{MergeKey, exchange_key, location_key, merge};
pub use schedule::{ScheduleInfo, WorkingDays};
