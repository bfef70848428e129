//! Data store collaborators consumed by the aggregator.
//!
//! Implementations are expected to batch their reads: the aggregator calls
//! each of these at most once or twice per request and never per direction.

use crate::core::model::{BankomatEntry, BankomatSelection, City, DirectionRecord, Valute};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Filter for a direction lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionQuery {
    pub valute_from: String,
    pub valute_to: String,
    /// Restrict to a single city code. Country-level results are then limited
    /// to the country containing that city.
    pub city: Option<String>,
}

/// Active directions for a pair, split by publication scope.
#[derive(Debug, Clone, Default)]
pub struct DirectionBatch {
    pub city_level: Vec<DirectionRecord>,
    pub country_level: Vec<DirectionRecord>,
}

#[async_trait]
pub trait DirectionSource: Send + Sync {
    async fn fetch_directions(&self, query: &DirectionQuery) -> Result<DirectionBatch>;
}

#[async_trait]
pub trait ValuteCatalog: Send + Sync {
    async fn get_valute(&self, code: &str) -> Result<Option<Valute>>;
}

#[async_trait]
pub trait LocationCatalog: Send + Sync {
    async fn get_city(&self, code: &str) -> Result<Option<City>>;

    /// Cities of every requested country, keyed by country code.
    async fn cities_by_country(&self, countries: &[String]) -> Result<HashMap<String, Vec<City>>>;
}

#[async_trait]
pub trait BankomatSource: Send + Sync {
    /// Catalog entries able to dispense `valute`.
    async fn bankomats_for_valute(&self, valute: &str) -> Result<Vec<BankomatEntry>>;

    /// Every partner's selection for `valute`.
    async fn selections_for_valute(&self, valute: &str) -> Result<Vec<BankomatSelection>>;
}
