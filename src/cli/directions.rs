use super::ui;
use crate::aggregator::DirectionAggregator;
use crate::directions::EnrichedDirection;
use anyhow::Result;
use comfy_table::Cell;

fn tier_summary(direction: &EnrichedDirection) -> String {
    match &direction.exchange_rates {
        Some(rates) => rates
            .iter()
            .map(|rate| {
                let band = match (rate.min_limit, rate.max_limit) {
                    (Some(min), Some(max)) => format!("{min}-{max}"),
                    (Some(min), None) => format!("{min}+"),
                    (None, Some(max)) => format!("<{max}"),
                    (None, None) => "any".to_string(),
                };
                format!("{} -> {} ({band})", rate.in_count, rate.out_count)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => "-".to_string(),
    }
}

fn bankomat_summary(direction: &EnrichedDirection) -> Option<String> {
    direction.bankomats.as_ref().map(|bankomats| {
        let available: Vec<&str> = bankomats
            .iter()
            .filter(|b| b.available)
            .map(|b| b.name.as_str())
            .collect();
        if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        }
    })
}

fn city_label(direction: &EnrichedDirection) -> Option<String> {
    direction.location.as_ref().map(|location| {
        let country = location.country.en_name.as_deref().unwrap_or(&location.country.name);
        format!("{} ({country})", location.en_name.as_deref().unwrap_or(&location.name))
    })
}

/// Renders a result list as a table under a pair title.
pub fn display_as_table(title: &str, directions: &[EnrichedDirection]) -> String {
    let mut output = format!("{}\n\n", ui::style_text(title, ui::StyleType::Title));

    if directions.is_empty() {
        output.push_str(&ui::style_text(
            "No active directions found.",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let with_location = directions.iter().any(|d| d.location.is_some());
    let with_bankomats = directions.iter().any(|d| d.bankomats.is_some());

    let mut header = vec![
        ui::header_cell("#"),
        ui::header_cell("Exchange"),
        ui::header_cell("Scope"),
    ];
    if with_location {
        header.push(ui::header_cell("City"));
    }
    header.extend([
        ui::header_cell("Give"),
        ui::header_cell("Get"),
        ui::header_cell("Min"),
        ui::header_cell("Max"),
        ui::header_cell("Tiers"),
    ]);
    if with_bankomats {
        header.push(ui::header_cell("Bankomats"));
    }
    header.push(ui::header_cell("AML"));

    let mut table = ui::new_styled_table();
    table.set_header(header);

    for direction in directions {
        let name = direction.en_name.as_deref().unwrap_or(&direction.name);

        let mut row = vec![
            Cell::new(direction.id),
            Cell::new(name),
            ui::scope_cell(direction.scope),
        ];
        if with_location {
            row.push(ui::text_or_dash(city_label(direction)));
        }
        row.extend([
            ui::rate_cell(direction.in_count, &direction.valute_from),
            ui::rate_cell(direction.out_count, &direction.valute_to),
            ui::amount_cell(direction.min_amount.as_deref()),
            ui::amount_cell(direction.max_amount.as_deref()),
            Cell::new(tier_summary(direction)),
        ]);
        if with_bankomats {
            row.push(ui::text_or_dash(bankomat_summary(direction)));
        }
        row.push(ui::aml_cell(direction.high_aml));
        table.add_row(row);
    }

    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(&ui::style_text(
        &format!("{} offers, best rate first", directions.len()),
        ui::StyleType::Subtle,
    ));
    output
}

fn print_results(title: &str, directions: &[EnrichedDirection], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(directions)?);
    } else {
        println!("{}", display_as_table(title, directions));
    }
    Ok(())
}

pub async fn run_best(
    aggregator: &DirectionAggregator,
    valute_from: &str,
    valute_to: &str,
    city: Option<&str>,
    json: bool,
) -> Result<()> {
    let directions = aggregator
        .get_best_direction_for_pair(valute_from, valute_to, city)
        .await?;

    let title = match city {
        Some(city) => format!("{valute_from} -> {valute_to} in {city}"),
        None => format!("{valute_from} -> {valute_to}"),
    };
    print_results(&title, &directions, json)
}

pub async fn run_catalog(
    aggregator: &DirectionAggregator,
    valute_from: &str,
    valute_to: &str,
    json: bool,
) -> Result<()> {
    let directions = aggregator
        .get_directions_for_location_catalog(valute_from, valute_to)
        .await?;

    print_results(
        &format!("{valute_from} -> {valute_to} by city"),
        &directions,
        json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::test_support::TestIcons;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    const DATASET: &str = include_str!("../../docs/example_dataset.yaml");

    fn aggregator() -> DirectionAggregator {
        let store = Arc::new(MemoryStore::from_yaml(DATASET).unwrap());
        DirectionAggregator::from_store(store, Arc::new(TestIcons))
    }

    #[tokio::test]
    async fn test_table_lists_every_exchange() {
        let directions = aggregator()
            .get_best_direction_for_pair("CASHUSD", "CASHRUB", None)
            .await
            .unwrap();

        let table = display_as_table("CASHUSD -> CASHRUB", &directions);
        assert!(table.contains("Alfa Cash"));
        assert!(table.contains("Beta Exchange"));
        assert!(table.contains("Gamma"));
        assert!(table.contains("HIGH"));
        assert!(!table.contains("Bankomats"));
        assert!(table.contains("3 offers, best rate first"));
    }

    #[tokio::test]
    async fn test_table_shows_cities_and_bankomats() {
        let catalog = aggregator()
            .get_directions_for_location_catalog("USDT", "ATMUSD")
            .await
            .unwrap();

        let table = display_as_table("USDT -> ATMUSD by city", &catalog);
        assert!(table.contains("City"));
        assert!(table.contains("Almaty"));
        assert!(table.contains("Kaspi, Forte"));
    }

    #[test]
    fn test_empty_result() {
        let table = display_as_table("A -> B", &[]);
        assert!(table.contains("No active directions found."));
    }
}
