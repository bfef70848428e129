//! First-seen-wins deduplication of city-level and country-level results.

use super::expand::PlacedDirection;
use std::collections::HashSet;
use std::hash::Hash;

/// Identity a result is deduplicated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MergeKey {
    /// One result per exchange (pair lookup).
    Exchange(u64),
    /// One result per exchange, pair and city (location catalog).
    Location {
        exchange_id: u64,
        valute_from: String,
        valute_to: String,
        city: Option<String>,
    },
}

pub fn exchange_key(placed: &PlacedDirection<'_>) -> MergeKey {
    MergeKey::Exchange(placed.record.exchange.id)
}

pub fn location_key(placed: &PlacedDirection<'_>) -> MergeKey {
    let direction = &placed.record.direction;
    MergeKey::Location {
        exchange_id: placed.record.exchange.id,
        valute_from: direction.valute_from.clone(),
        valute_to: direction.valute_to.clone(),
        city: placed.city_code().map(str::to_string),
    }
}

/// Concatenates `city_level` then `country_level`, keeping only the first
/// item seen for each key. Input order is preserved.
pub fn merge<T, K, F>(
    city_level: impl IntoIterator<Item = T>,
    country_level: impl IntoIterator<Item = T>,
    key: F,
) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let (_, merged) = city_level.into_iter().chain(country_level).fold(
        (HashSet::new(), Vec::new()),
        |(mut seen, mut merged), item| {
            if seen.insert(key(&item)) {
                merged.push(item);
            }
            (seen, merged)
        },
    );
    merged
}
