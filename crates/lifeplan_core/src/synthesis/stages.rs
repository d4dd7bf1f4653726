//! Named stages of a simulated year
//!
//! `Working` holds the per-pass copies of everything synthesis derives
//! (salary-linked income and expenses, pensions, asset balances, running
//! totals). The canonical scenario is only read.

use std::collections::BTreeMap;

use crate::assets::{advance_income_linked, advance_ordinary};
use crate::cost::revenue_proportional_cost;
use crate::error::{Result, SynthesisError};
use crate::formulas::FormulaLibrary;
use crate::loans::RepaymentPlan;
use crate::model::{
    BasicInfo, COST_CATEGORY, CashFlowRecord, CorporateCashFlow, CorporateTaxBreakdown,
    ExpenseItem, ExpenseKind, IncomeItem, IncomeRole, ItemId, LifeEventKind, Parameters,
    PersonalCashFlow, Scenario, Section, YearMap, round1,
};
use crate::salary_link::{SalaryLinkage, apply_director_withholding, link_corporate_salaries};

use super::context::YearContext;

pub(crate) const SECTIONS: [Section; 2] = [Section::Personal, Section::Corporate];

pub(crate) type Stage = fn(&mut Working<'_>, &mut YearContext);

/// Stages in execution order; each may read what earlier stages wrote
pub(crate) const STAGES: [(&str, Stage); 11] = [
    ("personal_income", personal_income),
    ("corporate_income", corporate_income),
    ("asset_growth", asset_growth),
    ("expenses", expenses),
    ("life_events", life_events),
    ("loan_repayment", loan_repayment),
    ("income_linked_investment", income_linked_investment),
    ("liabilities", liabilities),
    ("corporate_tax", corporate_tax),
    ("balances", balances),
    ("asset_totals", asset_totals),
];

/// Balance of every asset of both books, by position in its book
#[derive(Debug, Clone, Default)]
pub(crate) struct AssetLedger {
    personal: Vec<YearMap>,
    corporate: Vec<YearMap>,
}

impl AssetLedger {
    fn new(scenario: &Scenario) -> Self {
        Self {
            personal: vec![YearMap::new(); scenario.personal.assets.len()],
            corporate: vec![YearMap::new(); scenario.corporate.assets.len()],
        }
    }

    fn book(&self, section: Section) -> &[YearMap] {
        match section {
            Section::Personal => &self.personal,
            Section::Corporate => &self.corporate,
        }
    }

    fn balance(&self, section: Section, index: usize, year: i32) -> f64 {
        self.book(section)
            .get(index)
            .and_then(|balances| balances.get(&year))
            .copied()
            .unwrap_or(0.0)
    }

    fn record(&mut self, section: Section, index: usize, year: i32, balance: f64) {
        let book = match section {
            Section::Personal => &mut self.personal,
            Section::Corporate => &mut self.corporate,
        };
        if let Some(balances) = book.get_mut(index) {
            balances.insert(year, balance);
        }
    }

    /// Sum of every tracked balance of `section` in `year`
    fn tracked(&self, section: Section, year: i32) -> f64 {
        self.book(section)
            .iter()
            .filter_map(|balances| balances.get(&year))
            .sum()
    }

    /// Balances keyed by asset id
    pub(crate) fn by_id(&self, scenario: &Scenario, section: Section) -> BTreeMap<ItemId, YearMap> {
        scenario
            .book(section)
            .assets
            .iter()
            .zip(self.book(section))
            .map(|(asset, balances)| (asset.id.clone(), balances.clone()))
            .collect()
    }
}

/// Running total assets of one book and the tracked sum it was last
/// reconciled against
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunningAssets {
    total: f64,
    tracked: f64,
}

impl RunningAssets {
    fn opening(scenario: &Scenario, section: Section) -> Self {
        let start_year = scenario.basic_info.start_year;
        let tracked = scenario
            .book(section)
            .assets
            .iter()
            .filter(|asset| !asset.is_income_linked())
            .map(|asset| asset.amounts.get(&start_year).copied().unwrap_or(0.0))
            .sum();
        Self {
            total: tracked,
            tracked,
        }
    }
}

pub(crate) struct Working<'a> {
    pub(crate) scenario: &'a Scenario,
    pub(crate) formulas: &'a dyn FormulaLibrary,
    pub(crate) personal_income: Vec<IncomeItem>,
    pub(crate) corporate_expense: Vec<ExpenseItem>,
    pub(crate) linkage: SalaryLinkage,
    pub(crate) plan: RepaymentPlan,
    pub(crate) ledger: AssetLedger,
    /// Corporate tax is only due when the corporate book has any activity
    pub(crate) corporate_active: bool,
    personal_assets: RunningAssets,
    corporate_assets: RunningAssets,
    pub(crate) director_net_income: BTreeMap<ItemId, YearMap>,
    pub(crate) pension_amounts: BTreeMap<ItemId, YearMap>,
    pub(crate) revenue_costs: BTreeMap<ItemId, YearMap>,
}

impl<'a> Working<'a> {
    /// Everything computed once per pass, before the first year runs
    pub(crate) fn prepare(scenario: &'a Scenario, formulas: &'a dyn FormulaLibrary) -> Result<Self> {
        let info = &scenario.basic_info;
        if info.death_age < info.current_age {
            return Err(SynthesisError::InvalidHorizon {
                current_age: info.current_age,
                death_age: info.death_age,
            });
        }
        let years = info.years();

        let mut personal_income = scenario.personal.income.clone();
        let mut corporate_expense = scenario.corporate.expense.clone();
        let linkage = link_corporate_salaries(
            &mut personal_income,
            &mut corporate_expense,
            years.clone(),
            formulas,
        );
        let plan = RepaymentPlan::build(
            &scenario.personal.liabilities,
            &scenario.corporate.liabilities,
            years,
        )?;
        let pension_amounts = resolve_pensions(info, &mut personal_income, formulas);

        let corporate = &scenario.corporate;
        let corporate_active = !corporate.income.is_empty()
            || !corporate_expense.is_empty()
            || !corporate.assets.is_empty()
            || !corporate.liabilities.is_empty()
            || scenario
                .life_events
                .iter()
                .any(|event| event.source.section() == Section::Corporate);

        Ok(Self {
            scenario,
            formulas,
            personal_income,
            corporate_expense,
            linkage,
            plan,
            ledger: AssetLedger::new(scenario),
            corporate_active,
            personal_assets: RunningAssets::opening(scenario, Section::Personal),
            corporate_assets: RunningAssets::opening(scenario, Section::Corporate),
            director_net_income: BTreeMap::new(),
            pension_amounts,
            revenue_costs: BTreeMap::new(),
        })
    }

    fn running_assets(&mut self, section: Section) -> &mut RunningAssets {
        match section {
            Section::Personal => &mut self.personal_assets,
            Section::Corporate => &mut self.corporate_assets,
        }
    }
}

/// Fill auto-calculated pension items from the pension formula.
///
/// The formula sees a snapshot of the income list taken before any pension
/// amount is written.
fn resolve_pensions(
    info: &BasicInfo,
    personal_income: &mut [IncomeItem],
    formulas: &dyn FormulaLibrary,
) -> BTreeMap<ItemId, YearMap> {
    let snapshot = personal_income.to_vec();
    let mut resolved = BTreeMap::new();
    for item in personal_income.iter_mut().filter(|i| i.is_auto_calculated) {
        let spouse = match item.bucket(Section::Personal) {
            IncomeRole::Pension => false,
            IncomeRole::SpousePension => true,
            _ => continue,
        };
        let amounts: YearMap = info
            .years()
            .map(|year| {
                let benefit = if spouse {
                    formulas.spouse_pension_benefit_for_year(info, &snapshot, year)
                } else {
                    formulas.pension_benefit_for_year(info, &snapshot, year)
                };
                (year, benefit)
            })
            .collect();
        item.amounts = amounts.clone();
        resolved.insert(item.id.clone(), amounts);
    }
    resolved
}

/// Extra living cost of a spouse in `year`, inflated from start-year prices
pub fn spouse_supplement(info: &BasicInfo, parameters: &Parameters, year: i32) -> f64 {
    let (Some(marriage_year), Some(spouse)) = (info.marriage_year(), info.spouse.as_ref()) else {
        return 0.0;
    };
    if year < marriage_year {
        return 0.0;
    }
    let elapsed = year - info.start_year;
    spouse.additional_living_expense * (1.0 + parameters.inflation_rate / 100.0).powi(elapsed)
}

pub(crate) fn personal_income(w: &mut Working<'_>, ctx: &mut YearContext) {
    let year = ctx.year;
    for item in &mut w.personal_income {
        if item.is_corporate_salary {
            let insured = w.linkage.has_social_insurance(&item.id, year);
            let net = apply_director_withholding(item, year, insured, w.formulas);
            w.director_net_income
                .entry(item.id.clone())
                .or_default()
                .insert(year, net);
        }

        let amount = item.amount(year);
        let flows = &mut ctx.personal;
        match item.bucket(Section::Personal) {
            IncomeRole::PrimaryWage => flows.main_income += amount,
            IncomeRole::SideBusiness => flows.side_income += amount,
            IncomeRole::SpouseWage => flows.spouse_income += amount,
            IncomeRole::Pension => flows.pension_income += amount,
            IncomeRole::SpousePension => flows.spouse_pension_income += amount,
            IncomeRole::Other | IncomeRole::Revenue | IncomeRole::OtherRevenue => {
                flows.other_income += amount
            }
        }
    }
}

pub(crate) fn corporate_income(w: &mut Working<'_>, ctx: &mut YearContext) {
    for item in &w.scenario.corporate.income {
        let amount = item.amount(ctx.year);
        match item.bucket(Section::Corporate) {
            IncomeRole::Revenue => ctx.corporate.revenue += amount,
            _ => ctx.corporate.other_income += amount,
        }
    }
}

pub(crate) fn asset_growth(w: &mut Working<'_>, ctx: &mut YearContext) {
    let scenario = w.scenario;
    let fallback = scenario.parameters.investment_return;
    for section in SECTIONS {
        for (index, asset) in scenario.book(section).assets.iter().enumerate() {
            if asset.is_income_linked() {
                continue;
            }
            let previous = if ctx.is_start_year {
                None
            } else {
                Some(w.ledger.balance(section, index, ctx.year - 1))
            };
            let step = advance_ordinary(asset, previous, ctx.year, fallback);
            w.ledger.record(section, index, ctx.year, step.balance);
            ctx.add_asset_growth(section, step.investment_income);
        }
    }
}

pub(crate) fn expenses(w: &mut Working<'_>, ctx: &mut YearContext) {
    let scenario = w.scenario;
    let info = &scenario.basic_info;
    let year = ctx.year;

    for expense in &scenario.personal.expense {
        let amount = expense.amount(year);
        let flows = &mut ctx.personal;
        match expense.kind {
            ExpenseKind::Living => flows.living_expense += amount,
            ExpenseKind::Housing => flows.housing_expense += amount,
            ExpenseKind::Education => flows.education_expense += amount,
            ExpenseKind::Business | ExpenseKind::Other => flows.other_expense += amount,
        }
    }
    ctx.personal.living_expense += spouse_supplement(info, &scenario.parameters, year);

    for expense in &mut w.corporate_expense {
        let derived = expense.revenue_cost_settings().map(|settings| {
            revenue_proportional_cost(settings, &scenario.corporate.income, year, info.start_year)
        });
        if let Some(cost) = derived {
            expense.amounts.insert(year, cost);
            w.revenue_costs
                .entry(expense.id.clone())
                .or_default()
                .insert(year, cost);
            ctx.corporate.cost_expense += cost;
            continue;
        }

        let amount = expense.amount(year);
        if expense.kind == ExpenseKind::Other {
            ctx.corporate.other_expense += amount;
        } else if expense.category.as_deref() == Some(COST_CATEGORY) {
            ctx.corporate.cost_expense += amount;
        } else {
            ctx.corporate.business_expense += amount;
        }
    }
}

pub(crate) fn life_events(w: &mut Working<'_>, ctx: &mut YearContext) {
    let events = w
        .scenario
        .life_events
        .iter()
        .filter(|event| event.year == ctx.year);
    for event in events {
        match (event.source.section(), event.kind) {
            (Section::Personal, LifeEventKind::Income) => {
                ctx.personal.life_event_income += event.amount
            }
            (Section::Personal, LifeEventKind::Expense) => {
                ctx.personal.life_event_expense += event.amount
            }
            (Section::Corporate, LifeEventKind::Income) => {
                ctx.corporate.life_event_income += event.amount
            }
            (Section::Corporate, LifeEventKind::Expense) => {
                ctx.corporate.life_event_expense += event.amount
            }
        }
    }
}

pub(crate) fn loan_repayment(w: &mut Working<'_>, ctx: &mut YearContext) {
    ctx.personal.loan_repayment = w.plan.repayment(Section::Personal, ctx.year);
    ctx.corporate.loan_repayment = w.plan.repayment(Section::Corporate, ctx.year);
}

pub(crate) fn income_linked_investment(w: &mut Working<'_>, ctx: &mut YearContext) {
    let scenario = w.scenario;
    let formulas = w.formulas;
    let fallback = scenario.parameters.investment_return;
    let settings = &scenario.parameters.corporate_tax_settings;
    let taxed = w.corporate_active;
    let year = ctx.year;

    for section in SECTIONS {
        for (index, asset) in scenario.book(section).assets.iter().enumerate() {
            if !asset.is_income_linked() {
                continue;
            }
            let previous = if ctx.is_start_year {
                0.0
            } else {
                w.ledger.balance(section, index, year - 1)
            };
            let linked = asset.linked_income_id.as_ref().and_then(|id| {
                match asset.linked_income_type.unwrap_or(section) {
                    Section::Personal => w.personal_income.iter().find(|i| &i.id == id),
                    Section::Corporate => scenario.corporate.income.iter().find(|i| &i.id == id),
                }
            });

            let trial = *ctx;
            let step = advance_income_linked(
                asset,
                previous,
                ctx.is_start_year,
                fallback,
                linked,
                year,
                |growth| trial.trial_balance(section, growth, taxed, formulas, settings),
            );
            w.ledger.record(section, index, year, step.balance);
            ctx.add_asset_growth(section, step.investment_income);
            ctx.add_investment_contribution(section, step.contribution);
        }
    }
}

pub(crate) fn liabilities(w: &mut Working<'_>, ctx: &mut YearContext) {
    for section in SECTIONS {
        let total: f64 = w
            .scenario
            .book(section)
            .liabilities
            .iter()
            .map(|liability| match w.plan.schedule(section, &liability.id) {
                Some(schedule) => schedule.outstanding(ctx.year),
                None => liability.amount(ctx.year).abs(),
            })
            .sum();
        match section {
            Section::Personal => ctx.personal_liabilities = total,
            Section::Corporate => ctx.corporate_liabilities = total,
        }
    }
}

pub(crate) fn corporate_tax(w: &mut Working<'_>, ctx: &mut YearContext) {
    let pretax_profit = ctx.corporate.pretax_profit();
    ctx.tax = if w.corporate_active {
        w.formulas
            .corporate_tax(pretax_profit, &w.scenario.parameters.corporate_tax_settings)
    } else {
        CorporateTaxBreakdown {
            pretax_profit,
            aftertax_profit: pretax_profit,
            ..CorporateTaxBreakdown::default()
        }
    };
}

pub(crate) fn balances(_w: &mut Working<'_>, ctx: &mut YearContext) {
    ctx.personal_balance = ctx.personal.balance();
    ctx.corporate_balance = ctx.tax.aftertax_profit;
}

/// Accumulate the year's balance plus the change in tracked asset balances,
/// less the growth already counted as investment income
pub(crate) fn asset_totals(w: &mut Working<'_>, ctx: &mut YearContext) {
    for section in SECTIONS {
        let tracked = w.ledger.tracked(section, ctx.year);
        let (balance, growth) = match section {
            Section::Personal => (ctx.personal_balance, ctx.personal_tracked_growth),
            Section::Corporate => (ctx.corporate_balance, ctx.corporate_tracked_growth),
        };
        let running = w.running_assets(section);
        running.total += balance + (tracked - running.tracked) - growth;
        running.tracked = tracked;
        let total = running.total;
        match section {
            Section::Personal => ctx.personal_total_assets = total,
            Section::Corporate => ctx.corporate_total_assets = total,
        }
    }
}

fn ensure_finite(fields: &[(&'static str, f64)], year: i32) -> Result<()> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(field, _)) => Err(SynthesisError::NonFinite { field, year }),
        None => Ok(()),
    }
}

/// Build the year's record, rounding every amount except the tax breakdown
pub(crate) fn emit(w: &Working<'_>, ctx: &YearContext) -> Result<CashFlowRecord> {
    let p = &ctx.personal;
    let c = &ctx.corporate;
    ensure_finite(
        &[
            ("personal.total_income", p.total_income()),
            ("personal.total_expense", p.total_expense()),
            ("personal.total_assets", ctx.personal_total_assets),
            ("personal.liability_total", ctx.personal_liabilities),
            ("corporate.total_income", c.total_income()),
            ("corporate.total_expense", c.total_expense()),
            ("corporate.tax", ctx.tax.total_tax),
            ("corporate.total_assets", ctx.corporate_total_assets),
            ("corporate.liability_total", ctx.corporate_liabilities),
        ],
        ctx.year,
    )?;

    let personal = PersonalCashFlow {
        main_income: round1(p.main_income),
        side_income: round1(p.side_income),
        spouse_income: round1(p.spouse_income),
        pension_income: round1(p.pension_income),
        spouse_pension_income: round1(p.spouse_pension_income),
        other_income: round1(p.other_income),
        investment_income: round1(p.investment_income),
        life_event_income: round1(p.life_event_income),
        total_income: round1(p.total_income()),
        living_expense: round1(p.living_expense),
        housing_expense: round1(p.housing_expense),
        education_expense: round1(p.education_expense),
        other_expense: round1(p.other_expense),
        life_event_expense: round1(p.life_event_expense),
        loan_repayment: round1(p.loan_repayment),
        investment_contribution: round1(p.investment_contribution),
        total_expense: round1(p.total_expense()),
        balance: round1(ctx.personal_balance),
        total_assets: round1(ctx.personal_total_assets),
        liability_total: round1(ctx.personal_liabilities),
        net_assets: round1(ctx.personal_total_assets - ctx.personal_liabilities),
    };
    let corporate = CorporateCashFlow {
        revenue: round1(c.revenue),
        other_income: round1(c.other_income),
        investment_income: round1(c.investment_income),
        life_event_income: round1(c.life_event_income),
        total_income: round1(c.total_income()),
        business_expense: round1(c.business_expense),
        other_expense: round1(c.other_expense),
        cost_expense: round1(c.cost_expense),
        investment_contribution: round1(c.investment_contribution),
        life_event_expense: round1(c.life_event_expense),
        loan_repayment: round1(c.loan_repayment),
        total_expense: round1(c.total_expense()),
        tax: ctx.tax,
        balance: round1(ctx.corporate_balance),
        total_assets: round1(ctx.corporate_total_assets),
        liability_total: round1(ctx.corporate_liabilities),
        net_assets: round1(ctx.corporate_total_assets - ctx.corporate_liabilities),
    };

    Ok(CashFlowRecord {
        year: ctx.year,
        age: w.scenario.basic_info.age_in(ctx.year),
        personal,
        corporate,
    })
}
