//! Revenue-proportional corporate cost
//!
//! A corporate expense with category `cost` and cost settings is derived from
//! revenue every pass: the ratio escalates linearly by `cost_increase_rate`
//! percentage points per elapsed year and the result is optionally capped.

use crate::model::{CostSettings, IncomeItem};

/// Revenue the cost applies to: the targeted items when any are listed,
/// otherwise every corporate income item. Unknown target ids contribute zero.
pub fn target_revenue(settings: &CostSettings, corporate_income: &[IncomeItem], year: i32) -> f64 {
    if settings.target_income_ids.is_empty() {
        return corporate_income.iter().map(|item| item.amount(year)).sum();
    }
    settings
        .target_income_ids
        .iter()
        .filter_map(|id| corporate_income.iter().find(|item| &item.id == id))
        .map(|item| item.amount(year))
        .sum()
}

/// Cost ratio (%) in effect `years_since_start` years after the start year
pub fn effective_ratio(settings: &CostSettings, years_since_start: i32) -> f64 {
    settings.cost_ratio + settings.cost_increase_rate * years_since_start as f64
}

/// Cost for `year`, floored to a whole unit
pub fn revenue_proportional_cost(
    settings: &CostSettings,
    corporate_income: &[IncomeItem],
    year: i32,
    start_year: i32,
) -> f64 {
    let revenue = target_revenue(settings, corporate_income, year);
    if revenue == 0.0 {
        return 0.0;
    }

    let mut cost = revenue * effective_ratio(settings, year - start_year) / 100.0;
    if let Some(max) = settings.max_cost_amount
        && cost > max
    {
        cost = max;
    }
    cost.floor()
}
