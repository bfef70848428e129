use crate::core::model::{
    BankomatEntry, BankomatSelection, City, Country, Direction, DirectionRecord, Exchange,
    PartnerCity, PartnerCountry, PartnerLocation, RateTier, Valute,
};
use crate::core::source::{
    BankomatSource, DirectionBatch, DirectionQuery, DirectionSource, LocationCatalog,
    ValuteCatalog,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialized form of every record the store serves.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub valutes: Vec<Valute>,
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    #[serde(default)]
    pub partner_cities: Vec<PartnerCity>,
    #[serde(default)]
    pub partner_countries: Vec<PartnerCountry>,
    #[serde(default)]
    pub city_directions: Vec<Direction>,
    #[serde(default)]
    pub country_directions: Vec<Direction>,
    #[serde(default)]
    pub city_direction_rates: Vec<RateTier>,
    #[serde(default)]
    pub country_direction_rates: Vec<RateTier>,
    #[serde(default)]
    pub bankomats: Vec<BankomatEntry>,
    #[serde(default)]
    pub bankomat_selections: Vec<BankomatSelection>,
}

fn group_tiers(tiers: &[RateTier]) -> HashMap<u64, Vec<RateTier>> {
    tiers.iter().fold(HashMap::new(), |mut grouped, tier| {
        grouped
            .entry(tier.direction_id)
            .or_insert_with(Vec::new)
            .push(tier.clone());
        grouped
    })
}

/// Read-only store over a [`Dataset`] held in memory.
pub struct MemoryStore {
    dataset: Dataset,
    city_tiers: HashMap<u64, Vec<RateTier>>,
    country_tiers: HashMap<u64, Vec<RateTier>>,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        let city_tiers = group_tiers(&dataset.city_direction_rates);
        let country_tiers = group_tiers(&dataset.country_direction_rates);
        Self {
            dataset,
            city_tiers,
            country_tiers,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let dataset: Dataset = serde_yaml::from_str(yaml).context("Failed to parse dataset")?;
        Ok(Self::new(dataset))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
        let dataset: Dataset = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;
        debug!(
            exchanges = dataset.exchanges.len(),
            city_directions = dataset.city_directions.len(),
            country_directions = dataset.country_directions.len(),
            "Loaded dataset from {}",
            path.display()
        );
        Ok(Self::new(dataset))
    }

    fn exchange(&self, id: u64) -> Option<&Exchange> {
        self.dataset.exchanges.iter().find(|e| e.id == id)
    }

    fn city(&self, code: &str) -> Option<&City> {
        self.dataset.cities.iter().find(|c| c.code_name == code)
    }

    fn country(&self, code: &str) -> Option<&Country> {
        self.dataset.countries.iter().find(|c| c.code_name == code)
    }

    fn matches_pair(direction: &Direction, query: &DirectionQuery) -> bool {
        direction.is_active
            && direction.valute_from == query.valute_from
            && direction.valute_to == query.valute_to
    }

    fn exchange_for(&self, direction: &Direction, exchange_id: u64) -> Result<&Exchange> {
        self.exchange(exchange_id).with_context(|| {
            format!(
                "Direction {} references unknown exchange {exchange_id}",
                direction.id
            )
        })
    }

    fn join_city_direction(&self, direction: &Direction) -> Result<DirectionRecord> {
        let partner = self
            .dataset
            .partner_cities
            .iter()
            .find(|p| p.id == direction.location_id)
            .with_context(|| {
                format!(
                    "Direction {} references unknown location {}",
                    direction.id, direction.location_id
                )
            })?;
        let city = self.city(&partner.city).with_context(|| {
            format!(
                "Partner city {} references unknown city {}",
                partner.id, partner.city
            )
        })?;
        let country = self.country(&city.country).with_context(|| {
            format!(
                "City {} references unknown country {}",
                city.code_name, city.country
            )
        })?;
        let exchange = self.exchange_for(direction, partner.exchange_id)?;

        Ok(DirectionRecord {
            direction: direction.clone(),
            exchange: exchange.clone(),
            location: PartnerLocation::City {
                partner: partner.clone(),
                city: city.clone(),
                country: country.clone(),
            },
            tiers: self
                .city_tiers
                .get(&direction.id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    fn join_country_direction(&self, direction: &Direction) -> Result<DirectionRecord> {
        let partner = self
            .dataset
            .partner_countries
            .iter()
            .find(|p| p.id == direction.location_id)
            .with_context(|| {
                format!(
                    "Direction {} references unknown location {}",
                    direction.id, direction.location_id
                )
            })?;
        let country = self.country(&partner.country).with_context(|| {
            format!(
                "Partner country {} references unknown country {}",
                partner.id, partner.country
            )
        })?;
        let exchange = self.exchange_for(direction, partner.exchange_id)?;

        Ok(DirectionRecord {
            direction: direction.clone(),
            exchange: exchange.clone(),
            location: PartnerLocation::Country {
                partner: partner.clone(),
                country: country.clone(),
            },
            tiers: self
                .country_tiers
                .get(&direction.id)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl DirectionSource for MemoryStore {
    async fn fetch_directions(&self, query: &DirectionQuery) -> Result<DirectionBatch> {
        let city = match &query.city {
            Some(code) => match self.city(code) {
                Some(city) => Some(city),
                None => return Ok(DirectionBatch::default()),
            },
            None => None,
        };

        let city_level = self
            .dataset
            .city_directions
            .iter()
            .filter(|d| Self::matches_pair(d, query))
            .map(|d| self.join_city_direction(d))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|record| record.exchange.is_active)
            .filter(|record| match (city, &record.location) {
                (Some(city), PartnerLocation::City { city: own, .. }) => {
                    own.code_name == city.code_name
                }
                _ => true,
            })
            .collect();

        let country_level = self
            .dataset
            .country_directions
            .iter()
            .filter(|d| Self::matches_pair(d, query))
            .map(|d| self.join_country_direction(d))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|record| record.exchange.is_active)
            .filter(|record| {
                city.is_none_or(|city| record.location.country().code_name == city.country)
            })
            .collect();

        Ok(DirectionBatch {
            city_level,
            country_level,
        })
    }
}

#[async_trait]
impl ValuteCatalog for MemoryStore {
    async fn get_valute(&self, code: &str) -> Result<Option<Valute>> {
        Ok(self
            .dataset
            .valutes
            .iter()
            .find(|v| v.code_name == code)
            .cloned())
    }
}

#[async_trait]
impl LocationCatalog for MemoryStore {
    async fn get_city(&self, code: &str) -> Result<Option<City>> {
        Ok(self.city(code).cloned())
    }

    async fn cities_by_country(&self, countries: &[String]) -> Result<HashMap<String, Vec<City>>> {
        Ok(self
            .dataset
            .cities
            .iter()
            .filter(|city| countries.contains(&city.country))
            .fold(HashMap::new(), |mut grouped, city| {
                grouped
                    .entry(city.country.clone())
                    .or_insert_with(Vec::new)
                    .push(city.clone());
                grouped
            }))
    }
}

#[async_trait]
impl BankomatSource for MemoryStore {
    async fn bankomats_for_valute(&self, valute: &str) -> Result<Vec<BankomatEntry>> {
        Ok(self
            .dataset
            .bankomats
            .iter()
            .filter(|b| b.valute == valute)
            .cloned()
            .collect())
    }

    async fn selections_for_valute(&self, valute: &str) -> Result<Vec<BankomatSelection>> {
        Ok(self
            .dataset
            .bankomat_selections
            .iter()
            .filter(|s| s.valute == valute)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DirectionScope, ValuteType};

    const DATASET: &str = include_str!("../../docs/example_dataset.yaml");

    fn store() -> MemoryStore {
        MemoryStore::from_yaml(DATASET).expect("Example dataset should parse")
    }

    fn query(from: &str, to: &str, city: Option<&str>) -> DirectionQuery {
        DirectionQuery {
            valute_from: from.to_string(),
            valute_to: to.to_string(),
            city: city.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_fetch_directions_for_pair() {
        let batch = store()
            .fetch_directions(&query("CASHUSD", "CASHRUB", None))
            .await
            .unwrap();

        assert!(!batch.city_level.is_empty());
        assert!(!batch.country_level.is_empty());
        assert!(
            batch
                .city_level
                .iter()
                .all(|r| r.scope() == DirectionScope::City && r.direction.is_active)
        );
        assert!(
            batch
                .country_level
                .iter()
                .all(|r| r.scope() == DirectionScope::Country)
        );
    }

    #[tokio::test]
    async fn test_fetch_directions_for_city() {
        let batch = store()
            .fetch_directions(&query("CASHUSD", "CASHRUB", Some("SPB")))
            .await
            .unwrap();

        for record in &batch.city_level {
            match &record.location {
                PartnerLocation::City { city, .. } => assert_eq!(city.code_name, "SPB"),
                PartnerLocation::Country { .. } => panic!("Expected a city location"),
            }
        }
        assert!(
            batch
                .country_level
                .iter()
                .all(|r| r.location.country().code_name == "RU")
        );

        let unknown = store()
            .fetch_directions(&query("CASHUSD", "CASHRUB", Some("NOWHERE")))
            .await
            .unwrap();
        assert!(unknown.city_level.is_empty() && unknown.country_level.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_directions_are_skipped() {
        let mut dataset: Dataset = serde_yaml::from_str(DATASET).unwrap();
        for direction in &mut dataset.city_directions {
            direction.is_active = false;
        }
        let store = MemoryStore::new(dataset);

        let batch = store
            .fetch_directions(&query("CASHUSD", "CASHRUB", None))
            .await
            .unwrap();
        assert!(batch.city_level.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_exchanges_are_skipped() {
        let mut dataset: Dataset = serde_yaml::from_str(DATASET).unwrap();
        for exchange in dataset.exchanges.iter_mut().filter(|e| e.id == 3) {
            exchange.is_active = false;
        }
        let store = MemoryStore::new(dataset);

        let batch = store
            .fetch_directions(&query("CASHUSD", "CASHRUB", None))
            .await
            .unwrap();
        let exchanges: Vec<u64> = batch
            .city_level
            .iter()
            .chain(&batch.country_level)
            .map(|r| r.exchange.id)
            .collect();
        assert!(!exchanges.is_empty());
        assert!(!exchanges.contains(&3));
    }

    #[tokio::test]
    async fn test_dangling_location_fails() {
        let mut dataset: Dataset = serde_yaml::from_str(DATASET).unwrap();
        dataset.city_directions[0].location_id = 999;
        let store = MemoryStore::new(dataset);

        let err = store
            .fetch_directions(&query("CASHUSD", "CASHRUB", None))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Direction 1 references unknown location 999"
        );
    }

    #[tokio::test]
    async fn test_dangling_exchange_fails() {
        let mut dataset: Dataset = serde_yaml::from_str(DATASET).unwrap();
        dataset.partner_countries[0].exchange_id = 42;
        let store = MemoryStore::new(dataset);

        let err = store
            .fetch_directions(&query("CASHUSD", "CASHRUB", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown exchange 42"));
    }

    #[tokio::test]
    async fn test_tiers_are_joined() {
        let batch = store()
            .fetch_directions(&query("CASHUSD", "CASHRUB", Some("MSK")))
            .await
            .unwrap();
        let with_tiers = batch
            .city_level
            .iter()
            .find(|r| !r.tiers.is_empty())
            .expect("Example dataset has a tiered direction in MSK");
        assert!(
            with_tiers
                .tiers
                .iter()
                .all(|t| t.direction_id == with_tiers.direction.id)
        );
    }

    #[tokio::test]
    async fn test_catalog_lookups() {
        let store = store();

        let valute = store.get_valute("ATMUSD").await.unwrap().unwrap();
        assert_eq!(valute.type_valute, ValuteType::AtmQr);
        assert!(store.get_valute("NOPE").await.unwrap().is_none());

        let cities = store
            .cities_by_country(&["KZ".to_string()])
            .await
            .unwrap();
        assert_eq!(cities.len(), 1);
        assert!(cities["KZ"].iter().all(|c| c.country == "KZ"));

        assert!(!store.bankomats_for_valute("ATMUSD").await.unwrap().is_empty());
        assert!(store.bankomats_for_valute("CASHRUB").await.unwrap().is_empty());
        assert!(
            store
                .selections_for_valute("ATMUSD")
                .await
                .unwrap()
                .iter()
                .all(|s| s.valute == "ATMUSD")
        );
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = MemoryStore::load_from_path("/nonexistent/dataset.yaml")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to read dataset file"));
    }
}
