//! Scenario-wide economic assumptions

use serde::{Deserialize, Serialize};

fn default_inflation_rate() -> f64 {
    1.0
}

fn default_education_cost_increase_rate() -> f64 {
    1.0
}

fn default_investment_return() -> f64 {
    3.0
}

/// Global knobs shared by every book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    /// Yearly inflation (%)
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,
    /// Yearly education cost escalation (%)
    #[serde(default = "default_education_cost_increase_rate")]
    pub education_cost_increase_rate: f64,
    /// Return (%) for investment assets without their own rate
    #[serde(default = "default_investment_return")]
    pub investment_return: f64,
    #[serde(default)]
    pub corporate_tax_settings: CorporateTaxSettings,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            inflation_rate: default_inflation_rate(),
            education_cost_increase_rate: default_education_cost_increase_rate(),
            investment_return: default_investment_return(),
            corporate_tax_settings: CorporateTaxSettings::default(),
        }
    }
}

/// Corporate tax table used by the corporate-tax formula.
///
/// Rates are percentages. The default mirrors a small company: a reduced rate
/// on the first `reduced_rate_threshold` of profit and the standard rate above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorporateTaxSettings {
    pub reduced_rate_threshold: f64,
    pub reduced_rate: f64,
    pub standard_rate: f64,
    /// Local corporate tax as a share of corporate tax
    pub local_corporate_tax_rate: f64,
    /// Proportional resident tax as a share of corporate tax
    pub resident_tax_rate: f64,
    /// Flat per-capita resident levy, due even at a loss
    pub resident_tax_equal: f64,
}

impl Default for CorporateTaxSettings {
    fn default() -> Self {
        Self {
            reduced_rate_threshold: 800.0,
            reduced_rate: 15.0,
            standard_rate: 23.2,
            local_corporate_tax_rate: 10.3,
            resident_tax_rate: 7.0,
            resident_tax_equal: 7.0,
        }
    }
}

impl CorporateTaxSettings {
    /// Settings that levy no tax at all
    pub fn exempt() -> Self {
        Self {
            reduced_rate_threshold: 0.0,
            reduced_rate: 0.0,
            standard_rate: 0.0,
            local_corporate_tax_rate: 0.0,
            resident_tax_rate: 0.0,
            resident_tax_equal: 0.0,
        }
    }
}
