//! Year-by-year cash-flow synthesis
//!
//! [`synthesize`] regenerates the whole table from a scenario snapshot. It
//! never mutates the scenario: values the engine derives (linked salary
//! expenses, resolved social-insurance flags, revenue-proportional costs,
//! asset balances, loan schedules) are returned in [`DerivedView`].
//!
//! Each year runs a fixed sequence of named stages over a fresh
//! [`YearContext`]; asset balances and running totals carry from one year to
//! the next, so the horizon is always computed from the start year forward.

mod context;
mod stages;

pub use context::{CorporateFlows, PersonalFlows, YearContext};
pub use stages::spouse_supplement;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::formulas::FormulaLibrary;
use crate::loans::LoanSchedule;
use crate::model::{CashFlowTable, ExpenseItem, ItemId, Scenario, Section, YearFlags, YearMap};

use stages::{SECTIONS, STAGES, Working};

/// Derived values of one book
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    /// Balance of every asset per year
    pub asset_balances: BTreeMap<ItemId, YearMap>,
    pub loan_schedules: BTreeMap<ItemId, LoanSchedule>,
}

/// Values synthesis derived alongside the table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    /// Corporate expense items mirroring corporate salaries
    pub linked_expenses: Vec<ExpenseItem>,
    /// Salary income id to linked expense id
    pub linked_expense_ids: BTreeMap<ItemId, ItemId>,
    pub social_insurance: BTreeMap<ItemId, YearFlags>,
    /// Part-time auto-switch decisions, to be stored on the salary items
    pub switched_social_insurance: BTreeMap<ItemId, YearFlags>,
    pub director_net_income: BTreeMap<ItemId, YearMap>,
    pub pension_amounts: BTreeMap<ItemId, YearMap>,
    pub revenue_costs: BTreeMap<ItemId, YearMap>,
    pub personal: BookView,
    pub corporate: BookView,
}

impl DerivedView {
    pub fn book(&self, section: Section) -> &BookView {
        match section {
            Section::Personal => &self.personal,
            Section::Corporate => &self.corporate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub table: CashFlowTable,
    pub derived: DerivedView,
}

/// Project the full horizon of `scenario`.
///
/// Identical inputs give identical tables.
pub fn synthesize(scenario: &Scenario, formulas: &dyn FormulaLibrary) -> Result<Projection> {
    let mut working = Working::prepare(scenario, formulas)?;
    let info = &scenario.basic_info;

    let mut table = CashFlowTable::default();
    for year in info.years() {
        let mut ctx = YearContext::new(year, info.start_year);
        for (_, stage) in STAGES {
            stage(&mut working, &mut ctx);
        }
        table.records.push(stages::emit(&working, &ctx)?);
    }

    let derived = derived_view(scenario, working);
    Ok(Projection { table, derived })
}

fn derived_view(scenario: &Scenario, working: Working<'_>) -> DerivedView {
    let books = SECTIONS.map(|section| {
        let loan_schedules = scenario
            .book(section)
            .liabilities
            .iter()
            .filter_map(|liability| {
                working
                    .plan
                    .schedule(section, &liability.id)
                    .map(|schedule| (liability.id.clone(), schedule.clone()))
            })
            .collect();
        BookView {
            asset_balances: working.ledger.by_id(scenario, section),
            loan_schedules,
        }
    });
    let [personal, corporate] = books;

    let linked_expenses = working
        .corporate_expense
        .iter()
        .filter(|expense| expense.is_salary_link())
        .cloned()
        .collect();

    DerivedView {
        linked_expenses,
        linked_expense_ids: working.linkage.linked_expense_ids,
        social_insurance: working.linkage.social_insurance,
        switched_social_insurance: working.linkage.switched,
        director_net_income: working.director_net_income,
        pension_amounts: working.pension_amounts,
        revenue_costs: working.revenue_costs,
        personal,
        corporate,
    }
}
