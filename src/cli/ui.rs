use crate::core::model::DirectionScope;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use rust_decimal::Decimal;

pub enum StyleType {
    Title,
    Subtle,
}

pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Dim "-" for missing values.
pub fn text_or_dash(value: Option<String>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Right-aligned amount bound, dim "-" when unbounded.
pub fn amount_cell(amount: Option<&str>) -> Cell {
    match amount {
        Some(amount) => Cell::new(amount).set_alignment(CellAlignment::Right),
        None => Cell::new("-")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

/// One side of the headline rate, e.g. `92.5 CASHRUB`.
pub fn rate_cell(count: Decimal, valute: &str) -> Cell {
    Cell::new(format!("{count} {valute}"))
        .add_attribute(Attribute::Bold)
        .fg(Color::Green)
        .set_alignment(CellAlignment::Right)
}

pub fn scope_cell(scope: DirectionScope) -> Cell {
    match scope {
        DirectionScope::City => Cell::new("city"),
        DirectionScope::Country => Cell::new("country").fg(Color::Yellow),
    }
}

/// Red "HIGH" for elevated AML risk, dim "-" otherwise.
pub fn aml_cell(high_aml: bool) -> Cell {
    if high_aml {
        Cell::new("HIGH")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("-").fg(Color::DarkGrey)
    }
}
