//! Per-year working context
//!
//! Every stage of a year reads and writes one `YearContext`. Flows are kept
//! unrounded until the record is emitted.

use crate::formulas::FormulaLibrary;
use crate::model::{CorporateTaxBreakdown, CorporateTaxSettings, Section};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersonalFlows {
    pub main_income: f64,
    pub side_income: f64,
    pub spouse_income: f64,
    pub pension_income: f64,
    pub spouse_pension_income: f64,
    pub other_income: f64,
    pub investment_income: f64,
    pub life_event_income: f64,

    pub living_expense: f64,
    pub housing_expense: f64,
    pub education_expense: f64,
    pub other_expense: f64,
    pub life_event_expense: f64,
    pub loan_repayment: f64,
    pub investment_contribution: f64,
}

impl PersonalFlows {
    pub fn total_income(&self) -> f64 {
        self.main_income
            + self.side_income
            + self.spouse_income
            + self.pension_income
            + self.spouse_pension_income
            + self.other_income
            + self.investment_income
            + self.life_event_income
    }

    /// Includes loan repayments and investment contributions
    pub fn total_expense(&self) -> f64 {
        self.living_expense
            + self.housing_expense
            + self.education_expense
            + self.other_expense
            + self.life_event_expense
            + self.loan_repayment
            + self.investment_contribution
    }

    pub fn balance(&self) -> f64 {
        self.total_income() - self.total_expense()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorporateFlows {
    pub revenue: f64,
    pub other_income: f64,
    pub investment_income: f64,
    pub life_event_income: f64,

    pub business_expense: f64,
    pub other_expense: f64,
    pub cost_expense: f64,
    pub investment_contribution: f64,
    pub life_event_expense: f64,
    pub loan_repayment: f64,
}

impl CorporateFlows {
    pub fn total_income(&self) -> f64 {
        self.revenue + self.other_income + self.investment_income + self.life_event_income
    }

    pub fn total_expense(&self) -> f64 {
        self.business_expense
            + self.other_expense
            + self.cost_expense
            + self.investment_contribution
            + self.life_event_expense
            + self.loan_repayment
    }

    pub fn pretax_profit(&self) -> f64 {
        self.total_income() - self.total_expense()
    }
}

/// Everything known about one simulated year while its stages run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearContext {
    pub year: i32,
    pub is_start_year: bool,
    pub personal: PersonalFlows,
    pub corporate: CorporateFlows,
    /// Growth of tracked assets already counted as investment income
    pub personal_tracked_growth: f64,
    pub corporate_tracked_growth: f64,
    pub personal_liabilities: f64,
    pub corporate_liabilities: f64,
    pub tax: CorporateTaxBreakdown,
    pub personal_balance: f64,
    pub corporate_balance: f64,
    pub personal_total_assets: f64,
    pub corporate_total_assets: f64,
}

impl YearContext {
    pub fn new(year: i32, start_year: i32) -> Self {
        Self {
            year,
            is_start_year: year == start_year,
            ..Self::default()
        }
    }

    /// Record growth of a tracked asset as investment income of its book
    pub fn add_asset_growth(&mut self, section: Section, growth: f64) {
        match section {
            Section::Personal => {
                self.personal.investment_income += growth;
                self.personal_tracked_growth += growth;
            }
            Section::Corporate => {
                self.corporate.investment_income += growth;
                self.corporate_tracked_growth += growth;
            }
        }
    }

    pub fn add_investment_contribution(&mut self, section: Section, amount: f64) {
        match section {
            Section::Personal => self.personal.investment_contribution += amount,
            Section::Corporate => self.corporate.investment_contribution += amount,
        }
    }

    /// Balance of `section` so far, with `extra_income` added.
    ///
    /// The corporate trial balance is after tax when `taxed` is set.
    pub fn trial_balance(
        &self,
        section: Section,
        extra_income: f64,
        taxed: bool,
        formulas: &dyn FormulaLibrary,
        settings: &CorporateTaxSettings,
    ) -> f64 {
        match section {
            Section::Personal => self.personal.balance() + extra_income,
            Section::Corporate => {
                let pretax = self.corporate.pretax_profit() + extra_income;
                if taxed {
                    formulas.corporate_tax(pretax, settings).aftertax_profit
                } else {
                    pretax
                }
            }
        }
    }
}
