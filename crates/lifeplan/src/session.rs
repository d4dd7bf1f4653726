//! In-memory scenario session
//!
//! `ScenarioSession` owns the single mutable scenario. Every setter replaces
//! one collection wholesale and resynthesizes the full horizon. A pass that
//! fails is logged and leaves the previous table in place.

use lifeplan_core::model::{
    AssetItem, BasicInfo, CashFlowRecord, ExpenseItem, IncomeItem, LiabilityItem, LifeEvent,
    Parameters,
};
use lifeplan_core::{
    CashFlowTable, DerivedView, FormulaLibrary, Scenario, Section, StandardFormulas,
    SynthesisError, ValidationIssue, synthesize, validate,
};

pub struct ScenarioSession {
    scenario: Scenario,
    formulas: Box<dyn FormulaLibrary>,
    table: CashFlowTable,
    derived: DerivedView,
    last_error: Option<SynthesisError>,
}

impl ScenarioSession {
    /// Session over `scenario` using the standard formulas
    pub fn new(scenario: Scenario) -> Self {
        Self::with_formulas(scenario, Box::new(StandardFormulas))
    }

    pub fn with_formulas(scenario: Scenario, formulas: Box<dyn FormulaLibrary>) -> Self {
        let mut session = Self {
            scenario,
            formulas,
            table: CashFlowTable::default(),
            derived: DerivedView::default(),
            last_error: None,
        };
        session.recompute();
        session
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn into_scenario(self) -> Scenario {
        self.scenario
    }

    /// Table of the last successful pass
    pub fn table(&self) -> &CashFlowTable {
        &self.table
    }

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    /// Error of the most recent pass, cleared by the next successful one
    pub fn last_error(&self) -> Option<&SynthesisError> {
        self.last_error.as_ref()
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate(&self.scenario)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_income_data(&mut self, section: Section, income: Vec<IncomeItem>) {
        self.scenario.book_mut(section).income = income;
        self.recompute();
    }

    pub fn set_expense_data(&mut self, section: Section, expense: Vec<ExpenseItem>) {
        self.scenario.book_mut(section).expense = expense;
        self.recompute();
    }

    pub fn set_asset_data(&mut self, section: Section, assets: Vec<AssetItem>) {
        self.scenario.book_mut(section).assets = assets;
        self.recompute();
    }

    pub fn set_liability_data(&mut self, section: Section, liabilities: Vec<LiabilityItem>) {
        self.scenario.book_mut(section).liabilities = liabilities;
        self.scenario.normalize();
        self.recompute();
    }

    pub fn set_life_events(&mut self, events: Vec<LifeEvent>) {
        self.scenario.life_events = events;
        self.recompute();
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.scenario.parameters = parameters;
        self.recompute();
    }

    pub fn set_basic_info(&mut self, basic_info: BasicInfo) {
        self.scenario.basic_info = basic_info;
        self.recompute();
    }

    /// Replace one year's record by hand.
    ///
    /// The override lasts until the next recompute, which regenerates the
    /// whole table. Returns false when the year is outside the table.
    pub fn override_cash_flow(&mut self, record: CashFlowRecord) -> bool {
        match self.table.record_mut(record.year) {
            Some(slot) => {
                tracing::debug!(year = record.year, "Cash-flow record overridden");
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Run a full synthesis pass now.
    ///
    /// On success the table and derived view are replaced and auto-switch
    /// decisions and linked expense ids are stored on the salary items.
    pub fn recompute(&mut self) -> bool {
        match synthesize(&self.scenario, self.formulas.as_ref()) {
            Ok(projection) => {
                self.store_salary_decisions(&projection.derived);
                tracing::debug!(
                    years = projection.table.len(),
                    linked_expenses = projection.derived.linked_expenses.len(),
                    "Synthesis complete"
                );
                self.table = projection.table;
                self.derived = projection.derived;
                self.last_error = None;
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "Synthesis failed; keeping previous table");
                self.last_error = Some(error);
                false
            }
        }
    }

    fn store_salary_decisions(&mut self, derived: &DerivedView) {
        for item in &mut self.scenario.personal.income {
            if let Some(flags) = derived.switched_social_insurance.get(&item.id) {
                item.social_insurance_by_year.extend(flags.iter());
            }
            item.linked_expense_id = derived.linked_expense_ids.get(&item.id).cloned();
        }
    }
}

impl std::fmt::Debug for ScenarioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioSession")
            .field("start_year", &self.scenario.basic_info.start_year)
            .field("years", &self.table.len())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
