//! Error taxonomy of the aggregation core.

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A requested currency code is unknown to the catalog.
    #[error("Currency '{0}' not found")]
    NotFound(String),

    /// A zero or negative rate operand; indicates corrupted upstream data.
    #[error("Invalid rate {in_count} -> {out_count}: both operands must be positive")]
    InvalidRate {
        in_count: Decimal,
        out_count: Decimal,
    },

    /// A data store collaborator failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
