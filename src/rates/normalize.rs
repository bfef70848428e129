//! Canonical form for `(in_count, out_count)` rate pairs.
//!
//! Partners enter rates either as "give 1, get N" or as "give N, get 1". The
//! canonical form always has one side equal to 1 and the other side `>= 1`,
//! which makes rates of different partners directly comparable.

use crate::error::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Decimal places kept on both sides of a normalized rate.
pub const RATE_PRECISION: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedRate {
    pub in_count: Decimal,
    pub out_count: Decimal,
}

/// Converts a strictly positive rate pair into canonical form.
///
/// The pair is first rescaled to `in_count = 1`. If that leaves less than one
/// unit on the receiving side, it is inverted to `out_count = 1`. Both sides
/// are rounded to [`RATE_PRECISION`] places.
pub fn normalize(in_count: Decimal, out_count: Decimal) -> Result<NormalizedRate> {
    let invalid = || Error::InvalidRate {
        in_count,
        out_count,
    };

    if in_count <= Decimal::ZERO || out_count <= Decimal::ZERO {
        return Err(invalid());
    }

    let (mut in_rate, mut out_rate) = (in_count, out_count);

    if in_rate != Decimal::ONE {
        out_rate = out_rate.checked_div(in_rate).ok_or_else(invalid)?;
        in_rate = Decimal::ONE;
    }

    if out_rate < Decimal::ONE {
        in_rate = Decimal::ONE.checked_div(out_rate).ok_or_else(invalid)?;
        out_rate = Decimal::ONE;
    }

    Ok(NormalizedRate {
        in_count: round_rate(in_rate),
        out_count: round_rate(out_rate),
    })
}

fn round_rate(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(RATE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
