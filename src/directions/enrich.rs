//! Builds presentation-ready direction records.

use super::bankomat::{BankomatAvailability, BankomatContext};
use super::expand::PlacedDirection;
use super::schedule::ScheduleInfo;
use crate::core::icons::IconResolver;
use crate::core::model::{City, Country, DirectionScope, Valute, ValuteType};
use crate::error::{Error, Result};
use crate::rates::{RateEntry, compare_rates, resolve_rates};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryInfo {
    pub code_name: String,
    pub name: String,
    pub en_name: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInfo {
    pub code_name: String,
    pub name: String,
    pub en_name: Option<String>,
    pub country: CountryInfo,
}

impl LocationInfo {
    fn new(city: &City, country: &Country, icons: &dyn IconResolver) -> Self {
        Self {
            code_name: city.code_name.clone(),
            name: city.name.clone(),
            en_name: city.en_name.clone(),
            country: CountryInfo {
                code_name: country.code_name.clone(),
                name: country.name.clone(),
                en_name: country.en_name.clone(),
                icon_url: icons.icon_url(country.icon_path.as_deref()),
            },
        }
    }
}

/// A direction as surfaced to the comparison service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedDirection {
    /// Position in the result list, 1-based. Zero until numbered.
    pub id: usize,
    pub direction_id: u64,
    pub scope: DirectionScope,
    pub exchange_id: u64,
    pub name: String,
    pub en_name: Option<String>,
    pub partner_link: Option<String>,
    pub high_aml: bool,
    pub valute_from: String,
    pub icon_valute_from: Option<String>,
    pub type_valute_from: ValuteType,
    pub valute_to: String,
    pub icon_valute_to: Option<String>,
    pub type_valute_to: ValuteType,
    pub in_count: Decimal,
    pub out_count: Decimal,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub exchange_rates: Option<Vec<RateEntry>>,
    pub info: ScheduleInfo,
    pub bankomats: Option<Vec<BankomatAvailability>>,
    pub location: Option<LocationInfo>,
}

/// Request-scoped inputs shared by every direction being enriched.
pub struct EnrichContext<'a> {
    /// Currencies of the requested pair, keyed by code.
    pub valutes: &'a HashMap<String, Valute>,
    pub bankomats: Option<&'a BankomatContext>,
    pub only_active_bankomats: bool,
    /// Attach the target city and its country to each record.
    pub with_location: bool,
    pub icons: &'a dyn IconResolver,
}

impl EnrichContext<'_> {
    fn valute(&self, code: &str) -> Result<&Valute> {
        self.valutes
            .get(code)
            .ok_or_else(|| Error::NotFound(code.to_string()))
    }
}

/// Amount bounds are shown as whole numbers.
fn amount_label(amount: Option<f64>) -> Option<String> {
    amount
        .filter(|value| value.is_finite())
        .map(|value| format!("{:.0}", value.trunc()))
}

fn partner_link(base: Option<&str>, from: &str, to: &str, city: Option<&str>) -> Option<String> {
    base.map(|link| {
        let mut link = format!("{link}&cur_from={from}&cur_to={to}");
        if let Some(city) = city {
            link.push_str(&format!("&city={city}"));
        }
        link
    })
}

/// Enriches one placed direction. Fails when either currency of the pair is
/// unknown or when a stored rate is not strictly positive.
pub fn enrich(placed: &PlacedDirection<'_>, ctx: &EnrichContext<'_>) -> Result<EnrichedDirection> {
    let record = placed.record;
    let direction = &record.direction;
    let exchange = &record.exchange;

    let valute_from = ctx.valute(&direction.valute_from)?;
    let valute_to = ctx.valute(&direction.valute_to)?;

    let rates = resolve_rates(direction, &record.tiers)?;
    let terms = record.location.terms();

    let bankomats = valute_to.type_valute.is_bankomat_dispensed().then(|| {
        ctx.bankomats
            .map(|context| context.resolve(exchange.id, ctx.only_active_bankomats, ctx.icons))
            .unwrap_or_default()
    });

    let location = match (ctx.with_location, placed.city) {
        (true, Some(city)) => Some(LocationInfo::new(
            city,
            record.location.country(),
            ctx.icons,
        )),
        _ => None,
    };

    Ok(EnrichedDirection {
        id: 0,
        direction_id: direction.id,
        scope: record.scope(),
        exchange_id: exchange.id,
        name: exchange.name.clone(),
        en_name: exchange.en_name.clone(),
        partner_link: partner_link(
            exchange.partner_link.as_deref(),
            &valute_from.code_name,
            &valute_to.code_name,
            placed.city_code(),
        ),
        high_aml: exchange.high_aml,
        valute_from: valute_from.code_name.clone(),
        icon_valute_from: ctx.icons.icon_url(valute_from.icon_path.as_deref()),
        type_valute_from: valute_from.type_valute,
        valute_to: valute_to.code_name.clone(),
        icon_valute_to: ctx.icons.icon_url(valute_to.icon_path.as_deref()),
        type_valute_to: valute_to.type_valute,
        in_count: rates.chosen.in_count,
        out_count: rates.chosen.out_count,
        min_amount: amount_label(terms.min_amount),
        max_amount: amount_label(terms.max_amount),
        exchange_rates: rates.ranked,
        info: ScheduleInfo::from_terms(terms),
        bankomats,
        location,
    })
}

/// Orders results best rate first. Rates are compared in normalized form,
/// so offers entered as "1 -> N" and "N -> 1" rank against each other. The
/// sort is stable and keeps merge order among equal rates.
pub fn sort_by_rate(mut directions: Vec<EnrichedDirection>) -> Vec<EnrichedDirection> {
    directions.sort_by(|a, b| {
        compare_rates((a.in_count, a.out_count), (b.in_count, b.out_count))
    });
    directions
}

/// Assigns 1-based positions in list order.
pub fn numbered(directions: Vec<EnrichedDirection>) -> Vec<EnrichedDirection> {
    directions
        .into_iter()
        .enumerate()
        .map(|(i, direction)| EnrichedDirection { id: i + 1, ..direction })
        .collect()
}
