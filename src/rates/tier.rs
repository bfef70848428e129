//! Picks the best-paying entry among a direction's base rate and its
//! volume-tier overrides.

use super::normalize::normalize;
use crate::core::model::{Direction, RateTier};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// One row of a direction's tier table.
///
/// `min_limit`/`max_limit` bound the transaction volume the rate applies to.
/// The base rate carries `coefficient = None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateEntry {
    pub in_count: Decimal,
    pub out_count: Decimal,
    pub min_limit: Option<f64>,
    pub max_limit: Option<f64>,
    pub coefficient: Option<Decimal>,
}

impl RateEntry {
    /// Synthesises an entry from the direction's own rate and amount bounds.
    pub fn base(direction: &Direction) -> Self {
        Self {
            in_count: direction.in_count,
            out_count: direction.out_count,
            min_limit: direction.min_amount,
            max_limit: direction.max_amount,
            coefficient: None,
        }
    }

    pub fn from_tier(tier: &RateTier) -> Self {
        Self {
            in_count: tier.in_count,
            out_count: tier.out_count,
            min_limit: Some(tier.min_rate_limit),
            max_limit: tier.max_rate_limit,
            coefficient: tier.rate_coefficient,
        }
    }

    /// Returns a copy with the rate pair in canonical form; limits and
    /// coefficient are carried over untouched.
    pub fn normalized(&self) -> Result<Self> {
        let rate = normalize(self.in_count, self.out_count)?;
        Ok(Self {
            in_count: rate.in_count,
            out_count: rate.out_count,
            ..self.clone()
        })
    }
}

/// Ranking order on `(in_count, out_count)` pairs: most received first,
/// least given as tiebreak.
pub fn compare_rates(a: (Decimal, Decimal), b: (Decimal, Decimal)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

fn rank(a: &RateEntry, b: &RateEntry) -> Ordering {
    compare_rates((a.in_count, a.out_count), (b.in_count, b.out_count))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierSelection {
    pub chosen: RateEntry,
    /// Full ranked table, `None` when the direction has no overrides.
    pub ranked: Option<Vec<RateEntry>>,
}

impl TierSelection {
    pub fn normalized(&self) -> Result<Self> {
        let chosen = self.chosen.normalized()?;
        let ranked = match &self.ranked {
            Some(entries) => Some(
                entries
                    .iter()
                    .map(RateEntry::normalized)
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };
        Ok(Self { chosen, ranked })
    }
}

/// Ranks the tiers together with the base entry and picks the first.
///
/// Comparison is on the stored `out_count`/`in_count` fields as entered, not
/// on per-unit values. The sort is stable, so fully tied entries keep their
/// input order with overrides ahead of the base rate.
pub fn select_best(base: RateEntry, tiers: &[RateEntry]) -> TierSelection {
    if tiers.is_empty() {
        return TierSelection {
            chosen: base,
            ranked: None,
        };
    }

    let mut ranked: Vec<RateEntry> = tiers.iter().cloned().chain(Some(base)).collect();
    ranked.sort_by(rank);

    TierSelection {
        chosen: ranked[0].clone(),
        ranked: Some(ranked),
    }
}

/// Selects and normalizes the rate table of a direction.
pub fn resolve_rates(direction: &Direction, tiers: &[RateTier]) -> Result<TierSelection> {
    let entries: Vec<RateEntry> = tiers.iter().map(RateEntry::from_tier).collect();
    select_best(RateEntry::base(direction), &entries).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(in_count: &str, out_count: &str, min: f64, max: Option<f64>) -> RateEntry {
        RateEntry {
            in_count: d(in_count),
            out_count: d(out_count),
            min_limit: Some(min),
            max_limit: max,
            coefficient: Some(d("0.5")),
        }
    }

    fn direction(in_count: &str, out_count: &str) -> Direction {
        Direction {
            id: 1,
            location_id: 1,
            valute_from: "USD".to_string(),
            valute_to: "RUB".to_string(),
            in_count: d(in_count),
            out_count: d(out_count),
            min_amount: Some(100.0),
            max_amount: Some(900.0),
            is_active: true,
            time_update: Utc::now(),
        }
    }

    #[test]
    fn test_no_tiers_returns_base_without_table() {
        let base = RateEntry::base(&direction("1", "90"));
        let selection = select_best(base.clone(), &[]);
        assert_eq!(selection.chosen, base);
        assert!(selection.ranked.is_none());
    }

    #[test]
    fn test_compares_stored_out_count() {
        // Base gives 10 for 2 (5 per unit) yet still outranks tier A (6 for 1)
        let base = RateEntry::base(&direction("2", "10"));
        let tier_a = entry("1", "6", 1000.0, Some(5000.0));
        let tier_b = entry("1", "5", 5001.0, None);

        let selection = select_best(base.clone(), &[tier_a.clone(), tier_b.clone()]);
        assert_eq!(selection.chosen, base);
        assert_eq!(selection.ranked, Some(vec![base, tier_a, tier_b]));

        let normalized = selection.normalized().unwrap();
        assert_eq!(normalized.chosen.in_count, d("1"));
        assert_eq!(normalized.chosen.out_count, d("5"));
        assert_eq!(normalized.chosen.min_limit, Some(100.0));
        assert_eq!(normalized.chosen.max_limit, Some(900.0));
        assert!(normalized.chosen.coefficient.is_none());
    }

    #[test]
    fn test_tiebreak_prefers_smaller_in_count() {
        let base = RateEntry::base(&direction("3", "100"));
        let tier = entry("2", "100", 500.0, None);

        let selection = select_best(base.clone(), &[tier.clone()]);
        assert_eq!(selection.chosen, tier);
        assert_eq!(selection.ranked, Some(vec![tier, base]));
    }

    #[test]
    fn test_ranking_order_and_determinism() {
        let base = RateEntry::base(&direction("1", "91"));
        let tiers = vec![
            entry("1", "92", 1000.0, Some(4999.0)),
            entry("2", "93", 5000.0, Some(9999.0)),
            entry("1", "93", 10000.0, None),
        ];

        let first = select_best(base.clone(), &tiers);
        let second = select_best(base.clone(), &tiers);
        assert_eq!(first, second);

        let ranked = first.ranked.unwrap();
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].out_count >= pair[1].out_count);
            if pair[0].out_count == pair[1].out_count {
                assert!(pair[0].in_count <= pair[1].in_count);
            }
        }
        assert_eq!(first.chosen.in_count, d("1"));
        assert_eq!(first.chosen.out_count, d("93"));
    }

    #[test]
    fn test_resolve_rates_normalizes_every_row() {
        let direction = direction("1", "0.5");
        let tiers = vec![RateTier {
            id: 7,
            direction_id: 1,
            in_count: d("1"),
            out_count: d("0.25"),
            min_rate_limit: 1000.0,
            max_rate_limit: None,
            rate_coefficient: None,
        }];

        let selection = resolve_rates(&direction, &tiers).unwrap();
        assert_eq!(selection.chosen.in_count, d("2"));
        assert_eq!(selection.chosen.out_count, d("1"));

        let ranked = selection.ranked.unwrap();
        assert_eq!(ranked[1].in_count, d("4"));
        assert_eq!(ranked[1].out_count, d("1"));
        assert_eq!(ranked[1].min_limit, Some(1000.0));
    }

    #[test]
    fn test_resolve_rates_fails_on_corrupt_tier() {
        let direction = direction("1", "90");
        let tiers = vec![RateTier {
            id: 7,
            direction_id: 1,
            in_count: Decimal::ZERO,
            out_count: d("95"),
            min_rate_limit: 1000.0,
            max_rate_limit: None,
            rate_coefficient: None,
        }];

        assert!(resolve_rates(&direction, &tiers).is_err());
    }
}
