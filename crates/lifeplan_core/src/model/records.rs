//! Cash-flow records produced by synthesis
//!
//! A `CashFlowRecord` is entirely derived from a scenario snapshot. The table
//! holds exactly one record per simulated year, in ascending year order.

use serde::{Deserialize, Serialize};

/// Result of the corporate-tax formula for one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateTaxBreakdown {
    pub pretax_profit: f64,
    pub corporate_tax: f64,
    pub local_corporate_tax: f64,
    pub resident_tax_equal: f64,
    pub resident_tax_proportional: f64,
    pub total_tax: f64,
    pub aftertax_profit: f64,
    /// Total tax over pretax profit (%), 0 when there is no profit
    pub effective_tax_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalCashFlow {
    pub main_income: f64,
    pub side_income: f64,
    pub spouse_income: f64,
    pub pension_income: f64,
    pub spouse_pension_income: f64,
    pub other_income: f64,
    pub investment_income: f64,
    pub life_event_income: f64,
    pub total_income: f64,

    pub living_expense: f64,
    pub housing_expense: f64,
    pub education_expense: f64,
    pub other_expense: f64,
    pub life_event_expense: f64,
    pub loan_repayment: f64,
    pub investment_contribution: f64,
    pub total_expense: f64,

    pub balance: f64,
    pub total_assets: f64,
    pub liability_total: f64,
    pub net_assets: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateCashFlow {
    pub revenue: f64,
    pub other_income: f64,
    pub investment_income: f64,
    pub life_event_income: f64,
    pub total_income: f64,

    pub business_expense: f64,
    pub other_expense: f64,
    pub cost_expense: f64,
    pub investment_contribution: f64,
    pub life_event_expense: f64,
    pub loan_repayment: f64,
    pub total_expense: f64,

    /// Kept at the tax formula's native precision
    pub tax: CorporateTaxBreakdown,

    pub balance: f64,
    pub total_assets: f64,
    pub liability_total: f64,
    pub net_assets: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRecord {
    pub year: i32,
    pub age: i32,
    pub personal: PersonalCashFlow,
    pub corporate: CorporateCashFlow,
}

/// Year-ordered cash-flow table for a whole horizon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowTable {
    pub records: Vec<CashFlowRecord>,
}

impl CashFlowTable {
    pub fn record(&self, year: i32) -> Option<&CashFlowRecord> {
        let first = self.records.first()?.year;
        let index = usize::try_from(year - first).ok()?;
        self.records.get(index).filter(|r| r.year == year)
    }

    pub fn record_mut(&mut self, year: i32) -> Option<&mut CashFlowRecord> {
        let first = self.records.first()?.year;
        let index = usize::try_from(year - first).ok()?;
        self.records.get_mut(index).filter(|r| r.year == year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.iter().map(|r| r.year)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&CashFlowRecord> {
        self.records.last()
    }
}

/// Round to one decimal place, the precision of every displayed amount
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
