//! Item builders
//!
//! Fluent constructors for income, expense, asset and liability items. Amounts
//! may be given per year or as a projection that is resolved against the
//! scenario horizon when the scenario is built.
//!
//! ```ignore
//! let salary = IncomeBuilder::wage("Salary").growing(400.0, 2.0).capped_at(800.0);
//! let rent = ExpenseBuilder::housing("Rent").constant(120.0);
//! let fund = AssetBuilder::investment("Index fund", 300.0).returning(4.0);
//! let car = LiabilityBuilder::loan("Car", 240.0, 2.0, 5, 2025);
//! ```

use std::ops::RangeInclusive;

use crate::model::{
    AssetItem, AssetKind, COST_CATEGORY, CorporateSalaryType, CostSettings, ExpenseItem,
    ExpenseKind, IncomeItem, IncomeKind, IncomeRole, ItemId, LiabilityItem, LiabilityKind,
    RepaymentType, Section, YearMap,
};

use super::autofill::{autofill_amounts, constant_amounts};

/// How an item's amounts are filled
#[derive(Debug, Clone, Default)]
pub(crate) struct AmountSpec {
    explicit: YearMap,
    projection: Option<Projection>,
    from: Option<i32>,
    until: Option<i32>,
}

#[derive(Debug, Clone, Copy)]
struct Projection {
    base: f64,
    growth_rate: f64,
    max_amount: Option<f64>,
}

impl AmountSpec {
    /// Resolve against the horizon; explicit years override the projection
    pub(crate) fn resolve(&self, horizon: RangeInclusive<i32>) -> YearMap {
        let from = self.from.unwrap_or(*horizon.start()).max(*horizon.start());
        let to = self.until.unwrap_or(*horizon.end()).min(*horizon.end());
        let mut amounts = match self.projection {
            Some(p) if p.growth_rate == 0.0 && p.max_amount.is_none() => {
                constant_amounts(p.base, from, to)
            }
            Some(p) => autofill_amounts(p.base, p.growth_rate, from, to, p.max_amount),
            None => YearMap::new(),
        };
        amounts.extend(self.explicit.iter());
        amounts
    }

    fn project(&mut self, base: f64, growth_rate: f64) {
        self.projection = Some(Projection {
            base,
            growth_rate,
            max_amount: None,
        });
    }

    fn cap(&mut self, max: f64) {
        if let Some(p) = self.projection.as_mut() {
            p.max_amount = Some(max);
        }
    }
}

macro_rules! amount_methods {
    () => {
        /// Amount for a single year
        #[must_use]
        pub fn amount(mut self, year: i32, amount: f64) -> Self {
            self.amounts.explicit.insert(year, amount);
            self
        }

        /// Same amount every year of the horizon
        #[must_use]
        pub fn constant(mut self, amount: f64) -> Self {
            self.amounts.project(amount, 0.0);
            self
        }

        /// `base` in the first year, growing by `rate` (%) per year
        #[must_use]
        pub fn growing(mut self, base: f64, rate: f64) -> Self {
            self.amounts.project(base, rate);
            self
        }

        /// Upper bound of a projected amount
        #[must_use]
        pub fn capped_at(mut self, max: f64) -> Self {
            self.amounts.cap(max);
            self
        }

        /// First projected year
        #[must_use]
        pub fn from_year(mut self, year: i32) -> Self {
            self.amounts.from = Some(year);
            self
        }

        /// Last projected year
        #[must_use]
        pub fn until_year(mut self, year: i32) -> Self {
            self.amounts.until = Some(year);
            self
        }

        #[must_use]
        pub fn id(mut self, id: impl Into<ItemId>) -> Self {
            self.id = Some(id.into());
            self
        }
    };
}

// ============================================================================
// Income
// ============================================================================

#[derive(Debug, Clone)]
pub struct IncomeBuilder {
    pub(crate) id: Option<ItemId>,
    pub(crate) name: String,
    pub(crate) amounts: AmountSpec,
    item: IncomeItem,
}

impl IncomeBuilder {
    fn with(name: &str, kind: IncomeKind, role: Option<IncomeRole>) -> Self {
        let mut item = IncomeItem::new(ItemId::new(""), name, kind);
        item.role = role;
        Self {
            id: None,
            name: name.to_string(),
            amounts: AmountSpec::default(),
            item,
        }
    }

    pub fn wage(name: &str) -> Self {
        Self::with(name, IncomeKind::Wage, Some(IncomeRole::PrimaryWage))
    }

    pub fn side(name: &str) -> Self {
        Self::with(name, IncomeKind::Side, Some(IncomeRole::SideBusiness))
    }

    pub fn spouse_wage(name: &str) -> Self {
        Self::with(name, IncomeKind::Wage, Some(IncomeRole::SpouseWage))
    }

    /// Pension computed by the formula library
    pub fn pension(name: &str) -> Self {
        let mut builder = Self::with(name, IncomeKind::Side, Some(IncomeRole::Pension));
        builder.item.is_auto_calculated = true;
        builder
    }

    pub fn spouse_pension(name: &str) -> Self {
        let mut builder = Self::with(name, IncomeKind::Side, Some(IncomeRole::SpousePension));
        builder.item.is_auto_calculated = true;
        builder
    }

    /// Corporate sales
    pub fn revenue(name: &str) -> Self {
        Self::with(name, IncomeKind::Profit, Some(IncomeRole::Revenue))
    }

    /// Corporate non-operating income
    pub fn other_revenue(name: &str) -> Self {
        Self::with(name, IncomeKind::Side, Some(IncomeRole::OtherRevenue))
    }

    amount_methods!();

    /// Paid by the corporation; amounts are face (pre-withholding) salary
    #[must_use]
    pub fn corporate_salary(mut self, salary_type: CorporateSalaryType) -> Self {
        self.item.is_corporate_salary = true;
        self.item.corporate_salary_type = Some(salary_type);
        self
    }

    /// Switch social insurance on when the salary exceeds the watched incomes
    #[must_use]
    pub fn auto_switch<I, T>(mut self, watched: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.item.auto_switch_enabled = true;
        self.item.auto_switch_income_ids = watched.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn social_insurance(mut self, year: i32, insured: bool, manual: bool) -> Self {
        self.item.social_insurance_by_year.insert(year, insured);
        if manual {
            self.item.manual_override_years.insert(year, true);
        }
        self
    }

    /// Share (%) of this income moved into linked assets, optionally capped
    #[must_use]
    pub fn invest(mut self, ratio: f64, max_amount: Option<f64>) -> Self {
        self.item.investment_ratio = ratio;
        self.item.max_investment_amount = max_amount;
        self
    }

    pub(crate) fn build(self, id: ItemId, horizon: RangeInclusive<i32>) -> IncomeItem {
        let mut item = self.item;
        item.id = id;
        let amounts = self.amounts.resolve(horizon);
        if item.is_corporate_salary {
            item.original_amounts = amounts.clone();
        }
        item.amounts = amounts;
        item
    }
}

// ============================================================================
// Expense
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExpenseBuilder {
    pub(crate) id: Option<ItemId>,
    pub(crate) name: String,
    pub(crate) amounts: AmountSpec,
    item: ExpenseItem,
}

impl ExpenseBuilder {
    fn with(name: &str, kind: ExpenseKind) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            amounts: AmountSpec::default(),
            item: ExpenseItem::new(ItemId::new(""), name, kind),
        }
    }

    pub fn living(name: &str) -> Self {
        Self::with(name, ExpenseKind::Living)
    }

    pub fn housing(name: &str) -> Self {
        Self::with(name, ExpenseKind::Housing)
    }

    pub fn education(name: &str) -> Self {
        Self::with(name, ExpenseKind::Education)
    }

    pub fn business(name: &str) -> Self {
        Self::with(name, ExpenseKind::Business)
    }

    pub fn other(name: &str) -> Self {
        Self::with(name, ExpenseKind::Other)
    }

    /// Corporate cost derived from revenue each year
    pub fn revenue_cost(name: &str, cost_ratio: f64) -> Self {
        let mut builder = Self::with(name, ExpenseKind::Business);
        builder.item.category = Some(COST_CATEGORY.to_string());
        builder.item.cost_settings = Some(CostSettings {
            cost_ratio,
            cost_increase_rate: 0.0,
            max_cost_amount: None,
            target_income_ids: Vec::new(),
        });
        builder
    }

    amount_methods!();

    /// Percentage points added to the cost ratio per year
    #[must_use]
    pub fn ratio_increase(mut self, rate: f64) -> Self {
        if let Some(settings) = self.item.cost_settings.as_mut() {
            settings.cost_increase_rate = rate;
        }
        self
    }

    #[must_use]
    pub fn max_cost(mut self, max: f64) -> Self {
        if let Some(settings) = self.item.cost_settings.as_mut() {
            settings.max_cost_amount = Some(max);
        }
        self
    }

    #[must_use]
    pub fn targets<I, T>(mut self, revenue_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        if let Some(settings) = self.item.cost_settings.as_mut() {
            settings.target_income_ids = revenue_ids.into_iter().map(Into::into).collect();
        }
        self
    }

    pub(crate) fn build(self, id: ItemId, horizon: RangeInclusive<i32>) -> ExpenseItem {
        let mut item = self.item;
        item.id = id;
        item.amounts = self.amounts.resolve(horizon);
        item
    }
}

// ============================================================================
// Asset
// ============================================================================

#[derive(Debug, Clone)]
pub struct AssetBuilder {
    pub(crate) id: Option<ItemId>,
    pub(crate) name: String,
    opening: f64,
    item: AssetItem,
}

impl AssetBuilder {
    fn with(name: &str, kind: AssetKind, opening: f64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            opening,
            item: AssetItem::new(ItemId::new(""), name, kind),
        }
    }

    pub fn cash(name: &str, opening: f64) -> Self {
        Self::with(name, AssetKind::Cash, opening)
    }

    pub fn property(name: &str, value: f64) -> Self {
        Self::with(name, AssetKind::Property, value)
    }

    /// Compounding investment; the scenario return applies unless overridden
    pub fn investment(name: &str, opening: f64) -> Self {
        Self::with(name, AssetKind::Investment, opening)
    }

    /// Sinking fund receiving `ratio` (%) of the income `linked_income_id`
    pub fn income_linked(name: &str, linked_income_id: impl Into<ItemId>, ratio: f64) -> Self {
        let mut builder = Self::with(name, AssetKind::IncomeInvestment, 0.0);
        builder.item.linked_income_id = Some(linked_income_id.into());
        builder.item.investment_ratio = Some(ratio);
        builder
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn returning(mut self, rate: f64) -> Self {
        self.item.investment_return = Some(rate);
        self
    }

    /// Manual amount for a later year (new principal for investments)
    #[must_use]
    pub fn deposit(mut self, year: i32, amount: f64) -> Self {
        self.item.amounts.insert(year, amount);
        self
    }

    /// Book of the linked income when it differs from the asset's own
    #[must_use]
    pub fn linked_to(mut self, section: Section) -> Self {
        self.item.linked_income_type = Some(section);
        self
    }

    #[must_use]
    pub fn max_contribution(mut self, max: f64) -> Self {
        self.item.max_investment_amount = Some(max);
        self
    }

    pub(crate) fn build(self, id: ItemId, start_year: i32) -> AssetItem {
        let mut item = self.item;
        item.id = id;
        if self.opening != 0.0 || !item.is_income_linked() {
            item.amounts.entry(start_year).or_insert(self.opening);
        }
        item
    }
}

// ============================================================================
// Liability
// ============================================================================

#[derive(Debug, Clone)]
pub struct LiabilityBuilder {
    pub(crate) id: Option<ItemId>,
    pub(crate) name: String,
    item: LiabilityItem,
}

impl LiabilityBuilder {
    /// Amortized loan (equal payment unless changed)
    pub fn loan(name: &str, principal: f64, interest_rate: f64, term_years: u32, start_year: i32) -> Self {
        let mut item = LiabilityItem::new(ItemId::new(""), name, LiabilityKind::Loan);
        item.auto_calculate = true;
        item.original_amount = Some(principal);
        item.interest_rate = Some(interest_rate);
        item.term_years = Some(term_years);
        item.start_year = Some(start_year);
        Self {
            id: None,
            name: name.to_string(),
            item,
        }
    }

    /// Liability whose balances are entered by hand
    pub fn manual(name: &str, kind: LiabilityKind) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            item: LiabilityItem::new(ItemId::new(""), name, kind),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn equal_principal(mut self) -> Self {
        self.item.repayment_type = RepaymentType::EqualPrincipal;
        self
    }

    /// Repayments are paid through the housing expense
    #[must_use]
    pub fn housing_covered(mut self) -> Self {
        self.item.covered_by_housing_expense = true;
        self
    }

    #[must_use]
    pub fn balance(mut self, year: i32, amount: f64) -> Self {
        self.item.amounts.insert(year, amount);
        self
    }

    pub(crate) fn build(self, id: ItemId) -> LiabilityItem {
        let mut item = self.item;
        item.id = id;
        item
    }
}
