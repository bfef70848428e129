//! Configuration, logging, domain records and collaborator abstractions

pub mod config;
pub mod icons;
pub mod log;
pub mod model;
pub mod source;

// Re-export main types for cleaner imports
pub use icons::{IconResolver, SiteIconResolver};
pub use source::{
    BankomatSource, DirectionBatch, DirectionQuery, DirectionSource, LocationCatalog,
    ValuteCatalog,
};
