//! Rate canonicalisation and tier selection.

pub mod normalize;
pub mod tier;

pub use normalize::{NormalizedRate, normalize};
pub use tier::{RateEntry, TierSelection, compare_rates, resolve_rates, select_best};
