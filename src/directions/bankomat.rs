//! Per-partner availability of cash machines for a payout currency.

use crate::core::icons::IconResolver;
use crate::core::model::{BankomatEntry, BankomatSelection};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankomatAvailability {
    pub id: u64,
    pub name: String,
    pub available: bool,
    pub icon: Option<String>,
}

/// Enabled machine ids, keyed by partner (exchange) id.
pub type SelectionIndex = HashMap<u64, HashSet<u64>>;

/// Indexes selection rows by partner so lookups stay O(1) per direction.
/// Rows for other currencies than `valute` are skipped.
pub fn index_selections(valute: &str, selections: &[BankomatSelection]) -> SelectionIndex {
    selections
        .iter()
        .filter(|selection| selection.valute == valute)
        .fold(SelectionIndex::new(), |mut index, selection| {
            index
                .entry(selection.exchange_id)
                .or_default()
                .extend(selection.bankomats.iter().copied());
            index
        })
}

/// Catalog and selection index for one payout currency, computed once per
/// request and shared by every direction in it.
#[derive(Debug, Clone, Default)]
pub struct BankomatContext {
    pub catalog: Vec<BankomatEntry>,
    pub selections: SelectionIndex,
}

impl BankomatContext {
    pub fn new(
        valute: &str,
        catalog: Vec<BankomatEntry>,
        selections: &[BankomatSelection],
    ) -> Self {
        Self {
            catalog,
            selections: index_selections(valute, selections),
        }
    }

    pub fn resolve(
        &self,
        partner_id: u64,
        only_active: bool,
        icons: &dyn IconResolver,
    ) -> Vec<BankomatAvailability> {
        resolve(partner_id, &self.catalog, &self.selections, only_active, icons)
    }
}

/// Marks each catalog entry available when the partner selected it. A
/// partner without a selection row gets every entry unavailable.
pub fn resolve(
    partner_id: u64,
    catalog: &[BankomatEntry],
    selections: &SelectionIndex,
    only_active: bool,
    icons: &dyn IconResolver,
) -> Vec<BankomatAvailability> {
    let selected = selections.get(&partner_id);

    catalog
        .iter()
        .map(|entry| BankomatAvailability {
            id: entry.id,
            name: entry.name.clone(),
            available: selected.is_some_and(|ids| ids.contains(&entry.id)),
            icon: icons.icon_url(entry.icon_path.as_deref()),
        })
        .filter(|bankomat| !only_active || bankomat.available)
        .collect()
}
