//! Request-level entry points.
//!
//! Every collaborator read happens up front and in batches; the fetched
//! records are then handed to the pure placement, merge, enrichment and ranking
//! steps.

use crate::core::icons::IconResolver;
use crate::core::model::{City, DirectionRecord, Valute};
use crate::core::source::{
    BankomatSource, DirectionQuery, DirectionSource, LocationCatalog, ValuteCatalog,
};
use crate::directions::{
    BankomatContext, EnrichContext, EnrichedDirection, PlacedDirection, enrich,
    exchange_key, expand_country_direction, location_key, merge, numbered, place_in_city,
    sort_by_rate,
};
use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

pub struct DirectionAggregator {
    directions: Arc<dyn DirectionSource>,
    valutes: Arc<dyn ValuteCatalog>,
    locations: Arc<dyn LocationCatalog>,
    bankomats: Arc<dyn BankomatSource>,
    icons: Arc<dyn IconResolver>,
    only_active_bankomats: bool,
}

impl DirectionAggregator {
    pub fn new(
        directions: Arc<dyn DirectionSource>,
        valutes: Arc<dyn ValuteCatalog>,
        locations: Arc<dyn LocationCatalog>,
        bankomats: Arc<dyn BankomatSource>,
        icons: Arc<dyn IconResolver>,
    ) -> Self {
        Self {
            directions,
            valutes,
            locations,
            bankomats,
            icons,
            only_active_bankomats: false,
        }
    }

    /// Uses one store for every collaborator role.
    pub fn from_store<S>(store: Arc<S>, icons: Arc<dyn IconResolver>) -> Self
    where
        S: DirectionSource + ValuteCatalog + LocationCatalog + BankomatSource + 'static,
    {
        Self::new(
            Arc::clone(&store) as Arc<dyn DirectionSource>,
            Arc::clone(&store) as Arc<dyn ValuteCatalog>,
            Arc::clone(&store) as Arc<dyn LocationCatalog>,
            store as Arc<dyn BankomatSource>,
            icons,
        )
    }

    pub fn with_only_active_bankomats(mut self, only_active: bool) -> Self {
        self.only_active_bankomats = only_active;
        self
    }

    /// Best offering per exchange for a currency pair, optionally limited to
    /// the exchanges serving `city`.
    pub async fn get_best_direction_for_pair(
        &self,
        valute_from: &str,
        valute_to: &str,
        city: Option<&str>,
    ) -> Result<Vec<EnrichedDirection>> {
        info!(valute_from, valute_to, ?city, "Resolving best directions for pair");
        let (from, to) = self.resolve_pair(valute_from, valute_to).await?;

        let requested_city = match city {
            Some(code) => match self.locations.get_city(code).await? {
                Some(city) => Some(city),
                None => {
                    debug!("Unknown city {code}, no directions to show");
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        let batch = self
            .directions
            .fetch_directions(&DirectionQuery {
                valute_from: valute_from.to_string(),
                valute_to: valute_to.to_string(),
                city: city.map(str::to_string),
            })
            .await?;
        debug!(
            city_level = batch.city_level.len(),
            country_level = batch.country_level.len(),
            "Fetched directions"
        );

        let bankomats = self.bankomat_context(&to).await?;
        let valutes = index_pair(from, to);

        let merged = merge(
            place_all(&batch.city_level, requested_city.as_ref()),
            place_all(&batch.country_level, requested_city.as_ref()),
            exchange_key,
        );

        let ctx = EnrichContext {
            valutes: &valutes,
            bankomats: bankomats.as_ref(),
            only_active_bankomats: self.only_active_bankomats,
            with_location: false,
            icons: self.icons.as_ref(),
        };
        let enriched = merged
            .iter()
            .map(|placed| enrich(placed, &ctx))
            .collect::<Result<Vec<_>>>()?;

        info!(count = enriched.len(), "Resolved best directions");
        Ok(numbered(sort_by_rate(enriched)))
    }

    /// Every exchange offering for a pair, one record per served city.
    /// Country-level directions are expanded onto their country's cities.
    pub async fn get_directions_for_location_catalog(
        &self,
        valute_from: &str,
        valute_to: &str,
    ) -> Result<Vec<EnrichedDirection>> {
        info!(valute_from, valute_to, "Building location catalog");
        let (from, to) = self.resolve_pair(valute_from, valute_to).await?;

        let batch = self
            .directions
            .fetch_directions(&DirectionQuery {
                valute_from: valute_from.to_string(),
                valute_to: valute_to.to_string(),
                city: None,
            })
            .await?;

        let countries: Vec<String> = batch
            .country_level
            .iter()
            .map(|record| record.location.country().code_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let cities = self.locations.cities_by_country(&countries).await?;
        debug!(
            countries = countries.len(),
            city_level = batch.city_level.len(),
            country_level = batch.country_level.len(),
            "Fetched catalog inputs"
        );

        let bankomats = self.bankomat_context(&to).await?;
        let valutes = index_pair(from, to);

        let city_level: Vec<_> = batch
            .city_level
            .iter()
            .flat_map(|record| expand_country_direction(record, &[]))
            .collect();
        let country_level: Vec<_> = batch
            .country_level
            .iter()
            .flat_map(|record| {
                let in_country = cities
                    .get(&record.location.country().code_name)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                expand_country_direction(record, in_country)
            })
            .collect();
        let merged = merge(city_level, country_level, location_key);

        let ctx = EnrichContext {
            valutes: &valutes,
            bankomats: bankomats.as_ref(),
            only_active_bankomats: self.only_active_bankomats,
            with_location: true,
            icons: self.icons.as_ref(),
        };
        let enriched = merged
            .iter()
            .map(|placed| enrich(placed, &ctx))
            .collect::<Result<Vec<_>>>()?;

        info!(count = enriched.len(), "Built location catalog");
        Ok(numbered(sort_by_rate(enriched)))
    }

    async fn resolve_pair(&self, valute_from: &str, valute_to: &str) -> Result<(Valute, Valute)> {
        let (from, to) = futures::try_join!(
            self.valutes.get_valute(valute_from),
            self.valutes.get_valute(valute_to)
        )?;
        let from = from.ok_or_else(|| Error::NotFound(valute_from.to_string()))?;
        let to = to.ok_or_else(|| Error::NotFound(valute_to.to_string()))?;
        Ok((from, to))
    }

    /// Loads the catalog and partner selections once for the whole request.
    async fn bankomat_context(&self, payout: &Valute) -> Result<Option<BankomatContext>> {
        if !payout.type_valute.is_bankomat_dispensed() {
            return Ok(None);
        }

        let code = payout.code_name.as_str();
        let (catalog, selections) = futures::try_join!(
            self.bankomats.bankomats_for_valute(code),
            self.bankomats.selections_for_valute(code)
        )?;
        debug!(
            catalog = catalog.len(),
            selections = selections.len(),
            "Loaded bankomats for {code}"
        );
        Ok(Some(BankomatContext::new(code, catalog, &selections)))
    }
}

fn index_pair(from: Valute, to: Valute) -> HashMap<String, Valute> {
    HashMap::from([(from.code_name.clone(), from), (to.code_name.clone(), to)])
}

fn place_all<'a>(
    records: &'a [DirectionRecord],
    city: Option<&'a City>,
) -> Vec<PlacedDirection<'a>> {
    match city {
        Some(city) => records
            .iter()
            .filter_map(|record| place_in_city(record, city))
            .collect(),
        None => records.iter().map(PlacedDirection::unplaced).collect(),
    }
}
