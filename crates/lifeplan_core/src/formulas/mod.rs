//! Formula library contract
//!
//! The engine consumes tax, social-insurance, housing and pension rules only
//! through [`FormulaLibrary`]. Every function is total over its documented
//! domain: in-domain input never fails. [`StandardFormulas`] is the bundled
//! implementation; callers may substitute their own tables.

mod brackets;
mod standard;

pub use brackets::{INCOME_TAX_BRACKETS, TaxBracket, progressive_tax};
pub use standard::StandardFormulas;

use serde::{Deserialize, Serialize};

use crate::model::{
    BasicInfo, CorporateTaxBreakdown, CorporateTaxSettings, Housing, IncomeItem, Occupation,
};

/// Components withheld from a gross salary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithholdingBreakdown {
    pub social_insurance: f64,
    pub income_tax: f64,
    pub resident_tax: f64,
}

impl WithholdingBreakdown {
    pub fn total(&self) -> f64 {
        self.social_insurance + self.income_tax + self.resident_tax
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetIncome {
    pub net_income: f64,
    pub breakdown: WithholdingBreakdown,
}

pub trait FormulaLibrary {
    /// Take-home pay for ordinary employment or self-employment income
    fn net_income_from_gross_salary(&self, gross: f64, occupation: Occupation) -> NetIncome;

    /// Take-home pay of a company director (no employment insurance)
    fn net_income_for_director(&self, gross_salary: f64, has_social_insurance: bool)
    -> NetIncome;

    /// Employer-side cost of paying `gross_salary`, salary included
    fn employer_cost_for_salary(&self, gross_salary: f64, has_social_insurance: bool) -> f64;

    /// Cash housing cost in `year`
    fn housing_expense_for_year(&self, housing: &Housing, year: i32, start_year: i32) -> f64;

    fn corporate_tax(
        &self,
        pretax_profit: f64,
        settings: &CorporateTaxSettings,
    ) -> CorporateTaxBreakdown;

    fn pension_benefit_for_year(&self, info: &BasicInfo, income: &[IncomeItem], year: i32) -> f64;

    fn spouse_pension_benefit_for_year(
        &self,
        info: &BasicInfo,
        income: &[IncomeItem],
        year: i32,
    ) -> f64;
}
