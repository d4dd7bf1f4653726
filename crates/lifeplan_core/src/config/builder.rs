//! Scenario Builder
//!
//! The ScenarioBuilder provides a fluent API for creating scenarios with
//! automatic id assignment from item names.
//!
//! # Example
//!
//! ```ignore
//! use lifeplan_core::config::{ExpenseBuilder, IncomeBuilder, ScenarioBuilder};
//!
//! let scenario = ScenarioBuilder::new(2025, 30, 90)
//!     .inflation_rate(1.5)
//!     .personal_income(IncomeBuilder::wage("Salary").growing(400.0, 2.0).capped_at(700.0))
//!     .personal_expense(ExpenseBuilder::living("Living").growing(200.0, 1.5))
//!     .corporate_income(IncomeBuilder::revenue("Sales").constant(1000.0))
//!     .corporate_expense(ExpenseBuilder::revenue_cost("Materials", 30.0).max_cost(400.0))
//!     .build();
//! ```

use rustc_hash::FxHashSet;

use crate::model::{
    BasicInfo, CorporateTaxSettings, Housing, ItemId, LifeEvent, LifeEventKind, LifeEventSource,
    MaritalStatus, Occupation, Parameters, Scenario, Section, SpouseInfo,
};

use super::item_builder::{AssetBuilder, ExpenseBuilder, IncomeBuilder, LiabilityBuilder};

/// Builder for creating scenarios with automatic id assignment
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    basic_info: BasicInfo,
    parameters: Parameters,
    personal_income: Vec<IncomeBuilder>,
    corporate_income: Vec<IncomeBuilder>,
    personal_expense: Vec<ExpenseBuilder>,
    corporate_expense: Vec<ExpenseBuilder>,
    personal_assets: Vec<AssetBuilder>,
    corporate_assets: Vec<AssetBuilder>,
    personal_liabilities: Vec<LiabilityBuilder>,
    corporate_liabilities: Vec<LiabilityBuilder>,
    life_events: Vec<LifeEvent>,
}

/// Lowercase ASCII slug of an item name
fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug.to_string()
    }
}

/// Hands out unique ids within one scenario
#[derive(Default)]
struct IdAllocator {
    used: FxHashSet<ItemId>,
}

impl IdAllocator {
    fn claim(&mut self, explicit: Option<ItemId>, name: &str) -> ItemId {
        if let Some(id) = explicit {
            self.used.insert(id.clone());
            return id;
        }
        let base = slug(name);
        let mut candidate = ItemId::new(base.clone());
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = ItemId::new(format!("{base}_{n}"));
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

impl ScenarioBuilder {
    /// Scenario starting in `start_year` at `current_age`, ending at `death_age`
    #[must_use]
    pub fn new(start_year: i32, current_age: u32, death_age: u32) -> Self {
        Self {
            basic_info: BasicInfo::new(start_year, current_age, death_age),
            parameters: Parameters::default(),
            personal_income: Vec::new(),
            corporate_income: Vec::new(),
            personal_expense: Vec::new(),
            corporate_expense: Vec::new(),
            personal_assets: Vec::new(),
            corporate_assets: Vec::new(),
            personal_liabilities: Vec::new(),
            corporate_liabilities: Vec::new(),
            life_events: Vec::new(),
        }
    }

    // =========================================================================
    // Profile and parameters
    // =========================================================================

    #[must_use]
    pub fn basic_info(mut self, f: impl FnOnce(&mut BasicInfo)) -> Self {
        f(&mut self.basic_info);
        self
    }

    #[must_use]
    pub fn occupation(mut self, occupation: Occupation) -> Self {
        self.basic_info.occupation = occupation;
        self
    }

    #[must_use]
    pub fn married(mut self, spouse: SpouseInfo) -> Self {
        self.basic_info.marital_status = MaritalStatus::Married;
        self.basic_info.spouse = Some(spouse);
        self
    }

    #[must_use]
    pub fn housing(mut self, housing: Housing) -> Self {
        self.basic_info.housing = housing;
        self
    }

    #[must_use]
    pub fn pension_start_age(mut self, age: u32) -> Self {
        self.basic_info.pension_start_age = age;
        self
    }

    #[must_use]
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn inflation_rate(mut self, rate: f64) -> Self {
        self.parameters.inflation_rate = rate;
        self
    }

    /// Return of investments that do not set their own
    #[must_use]
    pub fn investment_return(mut self, rate: f64) -> Self {
        self.parameters.investment_return = rate;
        self
    }

    #[must_use]
    pub fn corporate_tax(mut self, settings: CorporateTaxSettings) -> Self {
        self.parameters.corporate_tax_settings = settings;
        self
    }

    // =========================================================================
    // Items
    // =========================================================================

    #[must_use]
    pub fn personal_income(mut self, income: IncomeBuilder) -> Self {
        self.personal_income.push(income);
        self
    }

    #[must_use]
    pub fn corporate_income(mut self, income: IncomeBuilder) -> Self {
        self.corporate_income.push(income);
        self
    }

    #[must_use]
    pub fn personal_expense(mut self, expense: ExpenseBuilder) -> Self {
        self.personal_expense.push(expense);
        self
    }

    #[must_use]
    pub fn corporate_expense(mut self, expense: ExpenseBuilder) -> Self {
        self.corporate_expense.push(expense);
        self
    }

    #[must_use]
    pub fn personal_asset(mut self, asset: AssetBuilder) -> Self {
        self.personal_assets.push(asset);
        self
    }

    #[must_use]
    pub fn corporate_asset(mut self, asset: AssetBuilder) -> Self {
        self.corporate_assets.push(asset);
        self
    }

    #[must_use]
    pub fn personal_liability(mut self, liability: LiabilityBuilder) -> Self {
        self.personal_liabilities.push(liability);
        self
    }

    #[must_use]
    pub fn corporate_liability(mut self, liability: LiabilityBuilder) -> Self {
        self.corporate_liabilities.push(liability);
        self
    }

    /// One-off income or expense
    #[must_use]
    pub fn event(
        mut self,
        year: i32,
        description: &str,
        kind: LifeEventKind,
        source: LifeEventSource,
        amount: f64,
    ) -> Self {
        self.life_events.push(LifeEvent {
            year,
            description: description.to_string(),
            kind,
            category: String::new(),
            amount,
            source,
        });
        self
    }

    /// Resolve projections against the horizon and assign ids
    #[must_use]
    pub fn build(self) -> Scenario {
        let horizon = self.basic_info.years();
        let start_year = self.basic_info.start_year;
        let mut scenario = Scenario::new(self.basic_info);
        scenario.parameters = self.parameters;
        scenario.life_events = self.life_events;

        for (section, income, expense, assets, liabilities) in [
            (
                Section::Personal,
                self.personal_income,
                self.personal_expense,
                self.personal_assets,
                self.personal_liabilities,
            ),
            (
                Section::Corporate,
                self.corporate_income,
                self.corporate_expense,
                self.corporate_assets,
                self.corporate_liabilities,
            ),
        ] {
            let mut ids = IdAllocator::default();
            let book = scenario.book_mut(section);
            for builder in income {
                let id = ids.claim(builder.id.clone(), &builder.name);
                book.income.push(builder.build(id, horizon.clone()));
            }
            for builder in expense {
                let id = ids.claim(builder.id.clone(), &builder.name);
                book.expense.push(builder.build(id, horizon.clone()));
            }
            for builder in assets {
                let id = ids.claim(builder.id.clone(), &builder.name);
                book.assets.push(builder.build(id, start_year));
            }
            for builder in liabilities {
                let id = ids.claim(builder.id.clone(), &builder.name);
                book.liabilities.push(builder.build(id));
            }
        }

        scenario
    }
}
