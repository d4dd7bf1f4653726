//! Asset accumulation
//!
//! Ordinary assets compound on their previous balance and take whatever the
//! user typed for a later year as new principal. Income-linked assets are
//! sinking funds: each year they receive a share of a designated income
//! stream, but only when the book can afford it.

use crate::model::{AssetItem, IncomeItem};

/// Balance of an asset after one year and the growth it earned
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssetStep {
    pub balance: f64,
    pub investment_income: f64,
}

/// Advance an ordinary (not income-linked) asset.
///
/// `previous` is `None` in the start year, where the opening amount is the
/// balance.
pub fn advance_ordinary(
    asset: &AssetItem,
    previous: Option<f64>,
    year: i32,
    fallback_return: f64,
) -> AssetStep {
    let manual = asset.amounts.get(&year).copied();
    let Some(previous) = previous else {
        return AssetStep {
            balance: manual.unwrap_or(0.0),
            investment_income: 0.0,
        };
    };

    if !asset.is_investment {
        return AssetStep {
            balance: manual.unwrap_or(previous),
            investment_income: 0.0,
        };
    }

    // A manual amount on an empty asset is a fresh deposit; growth starts next year
    if previous == 0.0
        && let Some(deposit) = manual
    {
        return AssetStep {
            balance: deposit,
            investment_income: 0.0,
        };
    }

    let growth = previous * asset.return_rate(fallback_return) / 100.0;
    AssetStep {
        balance: previous + growth + manual.unwrap_or(0.0),
        investment_income: growth,
    }
}

/// Balance, growth and new principal of an income-linked asset for one year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeLinkedStep {
    pub balance: f64,
    pub investment_income: f64,
    pub contribution: f64,
}

/// Share of the linked income earmarked for the asset in `year`.
///
/// The asset's own ratio and cap win; the linked income item's settings are
/// the fallback.
pub fn planned_contribution(asset: &AssetItem, linked: &IncomeItem, year: i32) -> f64 {
    let ratio = asset.investment_ratio.unwrap_or(linked.investment_ratio);
    let cap = asset
        .max_investment_amount
        .or(linked.max_investment_amount)
        .unwrap_or(f64::INFINITY);
    (linked.amount(year) * ratio / 100.0).min(cap).max(0.0)
}

/// Advance an income-linked asset.
///
/// `trial_balance` receives this year's growth of the asset and returns the
/// book's balance before the contribution; the contribution is made only when
/// that balance is positive. A dangling link (`linked` is `None`) still grows.
pub fn advance_income_linked(
    asset: &AssetItem,
    previous: f64,
    is_start_year: bool,
    fallback_return: f64,
    linked: Option<&IncomeItem>,
    year: i32,
    trial_balance: impl FnOnce(f64) -> f64,
) -> IncomeLinkedStep {
    let investment_income = if previous > 0.0 && !is_start_year {
        previous * asset.return_rate(fallback_return) / 100.0
    } else {
        0.0
    };

    let contribution = match linked {
        Some(linked) => {
            let planned = planned_contribution(asset, linked, year);
            if planned > 0.0 && trial_balance(investment_income) > 0.0 {
                planned
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    IncomeLinkedStep {
        balance: previous + investment_income + contribution,
        investment_income,
        contribution,
    }
}
