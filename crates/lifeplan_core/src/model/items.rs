//! Income, expense, asset and liability line items plus life events
//!
//! Amount maps are keyed by absolute calendar year. Monetary values are in the
//! scenario's currency unit and rates are percentages (`5.0` means 5%).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::ItemId;

/// Per-year amounts keyed by calendar year
pub type YearMap = BTreeMap<i32, f64>;

/// Per-year boolean flags keyed by calendar year
pub type YearFlags = BTreeMap<i32, bool>;

/// Expense category of the synthetic items generated for corporate salaries
pub const EMPLOYEE_SALARY_CATEGORY: &str = "employee_salary";

/// Expense category of corporate items derived from revenue
pub const COST_CATEGORY: &str = "cost";

/// Which book an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Corporate,
}

// ============================================================================
// Income
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    Wage,
    Profit,
    Side,
}

/// Semantic bucket of an income line, independent of its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeRole {
    PrimaryWage,
    SideBusiness,
    SpouseWage,
    Pension,
    SpousePension,
    Other,
    /// Corporate sales
    Revenue,
    /// Corporate non-operating income
    OtherRevenue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorporateSalaryType {
    #[serde(rename = "full-time")]
    FullTime,
    #[serde(rename = "part-time")]
    PartTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeItem {
    pub id: ItemId,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: IncomeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<IncomeRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Take-home amounts (after withholding when withholding applies)
    #[serde(default)]
    pub amounts: YearMap,
    /// Face amounts before withholding
    #[serde(default, skip_serializing_if = "YearMap::is_empty")]
    pub original_amounts: YearMap,
    #[serde(default)]
    pub investment_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_investment_amount: Option<f64>,
    #[serde(default)]
    pub is_auto_calculated: bool,
    #[serde(default)]
    pub is_corporate_salary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporate_salary_type: Option<CorporateSalaryType>,
    #[serde(default, skip_serializing_if = "YearFlags::is_empty")]
    pub social_insurance_by_year: YearFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_expense_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auto_switch_income_ids: Vec<ItemId>,
    #[serde(default)]
    pub auto_switch_enabled: bool,
    #[serde(default, skip_serializing_if = "YearFlags::is_empty")]
    pub manual_override_years: YearFlags,
}

impl IncomeItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, kind: IncomeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            role: None,
            category: None,
            amounts: YearMap::new(),
            original_amounts: YearMap::new(),
            investment_ratio: 0.0,
            max_investment_amount: None,
            is_auto_calculated: false,
            is_corporate_salary: false,
            corporate_salary_type: None,
            social_insurance_by_year: YearFlags::new(),
            linked_expense_id: None,
            auto_switch_income_ids: Vec::new(),
            auto_switch_enabled: false,
            manual_override_years: YearFlags::new(),
        }
    }

    /// Take-home amount for a year (0 when absent)
    pub fn amount(&self, year: i32) -> f64 {
        self.amounts.get(&year).copied().unwrap_or(0.0)
    }

    /// Face amount before withholding, falling back to the take-home amount
    pub fn face_amount(&self, year: i32) -> f64 {
        self.original_amounts
            .get(&year)
            .or_else(|| self.amounts.get(&year))
            .copied()
            .unwrap_or(0.0)
    }

    /// Bucket this item is aggregated into for the given book.
    ///
    /// An explicit role wins when it belongs to the book; otherwise the role
    /// is inferred from the item kind.
    pub fn bucket(&self, section: Section) -> IncomeRole {
        match (section, self.role) {
            (Section::Personal, Some(role)) if !role.is_corporate() => role,
            (Section::Corporate, Some(role)) if role.is_corporate() => role,
            (Section::Personal, _) => match self.kind {
                IncomeKind::Wage => IncomeRole::PrimaryWage,
                IncomeKind::Profit | IncomeKind::Side => IncomeRole::SideBusiness,
            },
            (Section::Corporate, _) => match self.kind {
                IncomeKind::Side => IncomeRole::OtherRevenue,
                IncomeKind::Wage | IncomeKind::Profit => IncomeRole::Revenue,
            },
        }
    }

    /// Salary type of a corporate salary; full-time when unspecified
    pub fn salary_type(&self) -> CorporateSalaryType {
        self.corporate_salary_type
            .unwrap_or(CorporateSalaryType::FullTime)
    }

    /// Stored social-insurance flag: full-time salaries are insured unless
    /// switched off for the year, part-time salaries only when switched on
    pub fn stored_social_insurance(&self, year: i32) -> bool {
        let default = self.salary_type() == CorporateSalaryType::FullTime;
        self.social_insurance_by_year
            .get(&year)
            .copied()
            .unwrap_or(default)
    }

    pub fn is_manually_overridden(&self, year: i32) -> bool {
        self.manual_override_years
            .get(&year)
            .copied()
            .unwrap_or(false)
    }
}

impl IncomeRole {
    pub fn is_corporate(self) -> bool {
        matches!(self, IncomeRole::Revenue | IncomeRole::OtherRevenue)
    }
}

// ============================================================================
// Expense
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Living,
    Housing,
    Education,
    /// Operating expense of the corporate book
    Business,
    Other,
}

/// Settings of a corporate expense derived from revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSettings {
    /// Cost as a percentage of revenue in the start year
    pub cost_ratio: f64,
    /// Percentage points added to the ratio per elapsed year
    #[serde(default)]
    pub cost_increase_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_amount: Option<f64>,
    /// Revenue items the cost applies to; empty means all corporate income
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_income_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub id: ItemId,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: ExpenseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub amounts: YearMap,
    /// Amounts before inflation
    #[serde(default, skip_serializing_if = "YearMap::is_empty")]
    pub raw_amounts: YearMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_settings: Option<CostSettings>,
    #[serde(default)]
    pub is_linked_from_income: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_income_id: Option<ItemId>,
}

impl ExpenseItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, kind: ExpenseKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            category: None,
            amounts: YearMap::new(),
            raw_amounts: YearMap::new(),
            cost_settings: None,
            is_linked_from_income: false,
            linked_income_id: None,
        }
    }

    pub fn amount(&self, year: i32) -> f64 {
        self.amounts.get(&year).copied().unwrap_or(0.0)
    }

    /// Revenue-proportional settings when this item is a derived cost line
    pub fn revenue_cost_settings(&self) -> Option<&CostSettings> {
        if self.category.as_deref() == Some(COST_CATEGORY) {
            self.cost_settings.as_ref()
        } else {
            None
        }
    }

    /// True for the synthetic expense mirroring a corporate salary
    pub fn is_salary_link(&self) -> bool {
        self.linked_income_id.is_some()
    }
}

// ============================================================================
// Asset
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Cash,
    Investment,
    Property,
    IncomeInvestment,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetItem {
    pub id: ItemId,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: AssetKind,
    /// Opening balance in the start year; later years hold manual contributions
    #[serde(default)]
    pub amounts: YearMap,
    #[serde(default)]
    pub is_investment: bool,
    /// Annual return (%); the scenario default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_return: Option<f64>,
    #[serde(default)]
    pub is_income_investment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_income_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_income_type: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_investment_amount: Option<f64>,
}

impl AssetItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            amounts: YearMap::new(),
            is_investment: matches!(kind, AssetKind::Investment),
            investment_return: None,
            is_income_investment: matches!(kind, AssetKind::IncomeInvestment),
            linked_income_id: None,
            linked_income_type: None,
            investment_ratio: None,
            max_investment_amount: None,
        }
    }

    /// Funded from a linked income stream rather than manual contributions
    pub fn is_income_linked(&self) -> bool {
        self.is_income_investment || self.kind == AssetKind::IncomeInvestment
    }

    pub fn return_rate(&self, fallback: f64) -> f64 {
        self.investment_return.unwrap_or(fallback)
    }
}

// ============================================================================
// Liability
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityKind {
    Loan,
    Credit,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentType {
    EqualPrincipal,
    #[default]
    EqualPayment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityItem {
    pub id: ItemId,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: LiabilityKind,
    #[serde(default)]
    pub amounts: YearMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub repayment_type: RepaymentType,
    #[serde(default)]
    pub auto_calculate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    /// Repayments are already part of the housing expense
    #[serde(default)]
    pub covered_by_housing_expense: bool,
}

impl LiabilityItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, kind: LiabilityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            amounts: YearMap::new(),
            interest_rate: None,
            term_years: None,
            start_year: None,
            repayment_type: RepaymentType::default(),
            auto_calculate: false,
            original_amount: None,
            covered_by_housing_expense: false,
        }
    }

    pub fn amount(&self, year: i32) -> f64 {
        self.amounts.get(&year).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// Life events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventSource {
    Personal,
    Corporate,
    PersonalInvestment,
    CorporateInvestment,
}

impl LifeEventSource {
    pub fn section(self) -> Section {
        match self {
            LifeEventSource::Personal | LifeEventSource::PersonalInvestment => Section::Personal,
            LifeEventSource::Corporate | LifeEventSource::CorporateInvestment => {
                Section::Corporate
            }
        }
    }
}

/// One-off income or expense in a given year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEvent {
    pub year: i32,
    pub description: String,
    #[serde(alias = "type")]
    pub kind: LifeEventKind,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    pub source: LifeEventSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_amount_prefers_original() {
        let mut item = IncomeItem::new("salary", "Salary", IncomeKind::Wage);
        item.amounts.insert(2025, 320.0);
        item.original_amounts.insert(2025, 400.0);
        item.amounts.insert(2026, 330.0);

        assert_eq!(item.face_amount(2025), 400.0);
        assert_eq!(item.face_amount(2026), 330.0);
        assert_eq!(item.face_amount(2027), 0.0);
    }

    #[test]
    fn test_bucket_ignores_role_from_other_book() {
        let mut item = IncomeItem::new("x", "Sales", IncomeKind::Profit);
        item.role = Some(IncomeRole::Revenue);
        assert_eq!(item.bucket(Section::Corporate), IncomeRole::Revenue);
        assert_eq!(item.bucket(Section::Personal), IncomeRole::SideBusiness);

        item.role = Some(IncomeRole::SpouseWage);
        assert_eq!(item.bucket(Section::Personal), IncomeRole::SpouseWage);
        assert_eq!(item.bucket(Section::Corporate), IncomeRole::Revenue);
    }

    #[test]
    fn test_cost_settings_require_cost_category() {
        let mut item = ExpenseItem::new("c", "Materials", ExpenseKind::Business);
        item.cost_settings = Some(CostSettings {
            cost_ratio: 30.0,
            cost_increase_rate: 0.0,
            max_cost_amount: None,
            target_income_ids: vec![],
        });
        assert!(item.revenue_cost_settings().is_none());

        item.category = Some(COST_CATEGORY.to_string());
        assert!(item.revenue_cost_settings().is_some());
    }

    #[test]
    fn test_legacy_type_field_is_accepted() {
        let json = r#"{"id":"a","name":"Cash","type":"cash","amounts":{"2025":100.0}}"#;
        let asset: AssetItem = serde_json::from_str(json).unwrap();
        assert_eq!(asset.kind, AssetKind::Cash);
        assert_eq!(asset.amounts.get(&2025), Some(&100.0));
        assert!(!asset.is_income_linked());
    }
}
