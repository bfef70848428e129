//! Places directions onto concrete cities.
//!
//! City-level directions already belong to one city. A country-level
//! direction applies to every city of its country except the ones listed in
//! the country's exclusion set.

use crate::core::model::{City, DirectionRecord, PartnerLocation};

/// A direction together with the city it is being presented for.
///
/// `city` is `None` for pair lookups that are not city-granular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedDirection<'a> {
    pub record: &'a DirectionRecord,
    pub city: Option<&'a City>,
}

impl<'a> PlacedDirection<'a> {
    pub fn unplaced(record: &'a DirectionRecord) -> Self {
        Self { record, city: None }
    }

    pub fn city_code(&self) -> Option<&'a str> {
        self.city.map(|city| city.code_name.as_str())
    }
}

/// Whether `record` may be surfaced for `city`.
pub fn serves_city(record: &DirectionRecord, city: &City) -> bool {
    match &record.location {
        PartnerLocation::City { city: own, .. } => own.code_name == city.code_name,
        PartnerLocation::Country { partner, .. } => {
            partner.country == city.country && !partner.excludes(&city.code_name)
        }
    }
}

/// Pins a direction to a single requested city, if it serves that city.
pub fn place_in_city<'a>(
    record: &'a DirectionRecord,
    city: &'a City,
) -> Option<PlacedDirection<'a>> {
    serves_city(record, city).then_some(PlacedDirection {
        record,
        city: Some(city),
    })
}

/// Duplicates a country-level direction once per eligible city of
/// `cities_in_country`, in the given city order. A city-level direction is
/// returned once, placed on its own city.
pub fn expand_country_direction<'a>(
    record: &'a DirectionRecord,
    cities_in_country: &'a [City],
) -> Vec<PlacedDirection<'a>> {
    match &record.location {
        PartnerLocation::City { city, .. } => vec![PlacedDirection {
            record,
            city: Some(city),
        }],
        PartnerLocation::Country { .. } => cities_in_country
            .iter()
            .filter_map(|city| place_in_city(record, city))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::test_support::{city, city_record, country_record};

    #[test]
    fn test_expansion_skips_excluded_cities() {
        let record = country_record(1, 10, "KZ", &["CITYX"]);
        let cities = vec![city("CITYX", "KZ"), city("CITYY", "KZ")];

        let placed = expand_country_direction(&record, &cities);
        let codes: Vec<_> = placed.iter().filter_map(|p| p.city_code()).collect();
        assert_eq!(codes, vec!["CITYY"]);
    }

    #[test]
    fn test_expansion_ignores_foreign_cities() {
        let record = country_record(1, 10, "KZ", &[]);
        let cities = vec![city("ALA", "KZ"), city("MSK", "RU"), city("AST", "KZ")];

        let placed = expand_country_direction(&record, &cities);
        let codes: Vec<_> = placed.iter().filter_map(|p| p.city_code()).collect();
        assert_eq!(codes, vec!["ALA", "AST"]);
        assert!(placed.iter().all(|p| std::ptr::eq(p.record, &record)));
    }

    #[test]
    fn test_city_direction_is_placed_on_its_city() {
        let record = city_record(1, 10, "MSK", "RU");
        let placed = expand_country_direction(&record, &[]);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].city_code(), Some("MSK"));
    }

    #[test]
    fn test_excluded_city_is_not_served() {
        let country = country_record(1, 10, "KZ", &["CITYX"]);
        let sibling = city_record(2, 10, "CITYX", "KZ");
        let requested = city("CITYX", "KZ");

        assert!(place_in_city(&country, &requested).is_none());
        assert!(place_in_city(&sibling, &requested).is_some());
        assert!(serves_city(&country, &city("CITYY", "KZ")));
    }
}
