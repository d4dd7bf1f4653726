//! Year-range projections used to fill amount maps
//!
//! These back the default seeding and the builder's growth helpers. Every
//! value is rounded to one decimal like the amounts a user would type.

use crate::model::{YearMap, round1};

/// `base` grown by `growth_rate` (%) per year from `from` through `to`.
///
/// Each amount is at most `max_amount` when one is given. An empty map is
/// returned when `to < from`.
pub fn autofill_amounts(
    base: f64,
    growth_rate: f64,
    from: i32,
    to: i32,
    max_amount: Option<f64>,
) -> YearMap {
    (from..=to)
        .map(|year| {
            let grown = round1(base * (1.0 + growth_rate / 100.0).powi(year - from));
            let amount = match max_amount {
                Some(max) => grown.min(max),
                None => grown,
            };
            (year, amount)
        })
        .collect()
}

/// The same amount in every year from `from` through `to`
pub fn constant_amounts(amount: f64, from: i32, to: i32) -> YearMap {
    (from..=to).map(|year| (year, amount)).collect()
}

/// Apply `f` to every amount, keeping the years
pub fn map_amounts(amounts: &YearMap, mut f: impl FnMut(i32, f64) -> f64) -> YearMap {
    amounts
        .iter()
        .map(|(&year, &amount)| (year, f(year, amount)))
        .collect()
}
