//! Domain records as read from the data store.
//!
//! Everything here is plain data: the aggregation core only ever reads these
//! values and builds new result records from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Currency classification. Deserialises from both the native and the
/// English labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuteType {
    #[serde(rename = "Cryptocurrency", alias = "Криптовалюта")]
    Cryptocurrency,
    #[serde(rename = "Digital currencies", alias = "Эл. деньги")]
    DigitalCurrency,
    #[serde(rename = "Crypto exchange balances", alias = "Балансы криптобирж")]
    CryptoExchangeBalance,
    #[serde(rename = "Online banking", alias = "Банкинг")]
    OnlineBanking,
    #[serde(rename = "Money transfers", alias = "Денежные переводы")]
    MoneyTransfer,
    #[serde(rename = "Cash", alias = "Наличные")]
    Cash,
    #[serde(rename = "ATM QR")]
    AtmQr,
}

impl ValuteType {
    /// Payout currencies of this kind are dispensed by cash machines.
    pub fn is_bankomat_dispensed(&self) -> bool {
        matches!(self, ValuteType::AtmQr)
    }
}

impl Display for ValuteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ValuteType::Cryptocurrency => "Cryptocurrency",
                ValuteType::DigitalCurrency => "Digital currencies",
                ValuteType::CryptoExchangeBalance => "Crypto exchange balances",
                ValuteType::OnlineBanking => "Online banking",
                ValuteType::MoneyTransfer => "Money transfers",
                ValuteType::Cash => "Cash",
                ValuteType::AtmQr => "ATM QR",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valute {
    pub code_name: String,
    pub name: String,
    #[serde(default)]
    pub en_name: Option<String>,
    pub type_valute: ValuteType,
    #[serde(default)]
    pub icon_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code_name: String,
    pub name: String,
    #[serde(default)]
    pub en_name: Option<String>,
    #[serde(default)]
    pub icon_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub code_name: String,
    pub name: String,
    #[serde(default)]
    pub en_name: Option<String>,
    pub country: String,
}

/// A partner exchange operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub en_name: Option<String>,
    #[serde(default)]
    pub partner_link: Option<String>,
    #[serde(default)]
    pub high_aml: bool,
    /// Directions of inactive exchanges are never surfaced.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Operating terms shared by city and country scoped partner locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationTerms {
    #[serde(default)]
    pub has_delivery: bool,
    #[serde(default)]
    pub has_office: bool,
    /// Native day abbreviations, e.g. `Пн`, `Сб`.
    #[serde(default)]
    pub working_days: Vec<String>,
    #[serde(default)]
    pub time_from: Option<String>,
    #[serde(default)]
    pub time_to: Option<String>,
    #[serde(default)]
    pub weekend_time_from: Option<String>,
    #[serde(default)]
    pub weekend_time_to: Option<String>,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerCity {
    pub id: u64,
    pub exchange_id: u64,
    pub city: String,
    #[serde(flatten)]
    pub terms: LocationTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerCountry {
    pub id: u64,
    pub exchange_id: u64,
    pub country: String,
    /// City codes that must not inherit this country's directions.
    #[serde(default)]
    pub exclude_cities: Vec<String>,
    #[serde(flatten)]
    pub terms: LocationTerms,
}

impl PartnerCountry {
    pub fn excludes(&self, city_code: &str) -> bool {
        self.exclude_cities.iter().any(|code| code == city_code)
    }
}

/// Publication granularity of a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionScope {
    City,
    Country,
}

/// A partner location joined with the geography it refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum PartnerLocation {
    City {
        partner: PartnerCity,
        city: City,
        country: Country,
    },
    Country {
        partner: PartnerCountry,
        country: Country,
    },
}

impl PartnerLocation {
    pub fn scope(&self) -> DirectionScope {
        match self {
            PartnerLocation::City { .. } => DirectionScope::City,
            PartnerLocation::Country { .. } => DirectionScope::Country,
        }
    }

    pub fn terms(&self) -> &LocationTerms {
        match self {
            PartnerLocation::City { partner, .. } => &partner.terms,
            PartnerLocation::Country { partner, .. } => &partner.terms,
        }
    }

    pub fn country(&self) -> &Country {
        match self {
            PartnerLocation::City { country, .. } | PartnerLocation::Country { country, .. } => {
                country
            }
        }
    }
}

/// A published currency pair with its base rate ("give `in_count`, receive
/// `out_count`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub id: u64,
    /// Id of the owning partner city or partner country, depending on scope.
    pub location_id: u64,
    pub valute_from: String,
    pub valute_to: String,
    pub in_count: Decimal,
    pub out_count: Decimal,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub time_update: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// A volume-banded override of a direction's base rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub id: u64,
    pub direction_id: u64,
    pub in_count: Decimal,
    pub out_count: Decimal,
    pub min_rate_limit: f64,
    #[serde(default)]
    pub max_rate_limit: Option<f64>,
    #[serde(default)]
    pub rate_coefficient: Option<Decimal>,
}

/// A direction with every related record the core needs, as returned by the
/// direction lookup collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionRecord {
    pub direction: Direction,
    pub exchange: Exchange,
    pub location: PartnerLocation,
    pub tiers: Vec<RateTier>,
}

impl DirectionRecord {
    pub fn scope(&self) -> DirectionScope {
        self.location.scope()
    }
}

/// A physical cash machine able to dispense `valute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankomatEntry {
    pub id: u64,
    pub name: String,
    pub valute: String,
    #[serde(default)]
    pub icon_path: Option<String>,
}

/// The subset of cash machines a partner enables for a payout currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankomatSelection {
    pub exchange_id: u64,
    pub valute: String,
    #[serde(default)]
    pub bankomats: Vec<u64>,
}
