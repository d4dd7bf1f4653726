//! Horizon coverage, determinism and the simple end-to-end scenario

use crate::config::{ExpenseBuilder, IncomeBuilder, ScenarioBuilder};
use crate::error::SynthesisError;
use crate::formulas::{FormulaLibrary, StandardFormulas};
use crate::model::{BasicInfo, CorporateTaxSettings, LifeEventKind, LifeEventSource, Scenario};
use crate::synthesis::synthesize;

fn wage_and_living(death_age: u32) -> Scenario {
    ScenarioBuilder::new(2025, 30, death_age)
        .personal_income(IncomeBuilder::wage("Salary").constant(400.0))
        .personal_expense(ExpenseBuilder::living("Living").constant(100.0))
        .build()
}

/// 400 in, 100 out, nothing else: 300 saved every year
#[test]
fn test_end_to_end_three_years() {
    let scenario = wage_and_living(32);
    let projection = synthesize(&scenario, &StandardFormulas).unwrap();
    let table = &projection.table;

    assert_eq!(table.len(), 3);
    let mut previous_total = 0.0;
    for record in &table.records {
        assert_eq!(record.personal.main_income, 400.0);
        assert_eq!(record.personal.living_expense, 100.0);
        assert_eq!(record.personal.balance, 300.0);
        assert_eq!(record.personal.total_assets - previous_total, 300.0);
        previous_total = record.personal.total_assets;
    }
    assert_eq!(table.records[0].age, 30);
    assert_eq!(table.records[2].age, 32);
    assert_eq!(table.records[2].personal.net_assets, 900.0);
}

/// No corporate items means no corporate tax and a zero corporate balance
#[test]
fn test_personal_only_scenario_has_quiet_corporate_book() {
    let projection = synthesize(&wage_and_living(35), &StandardFormulas).unwrap();
    for record in &projection.table.records {
        assert_eq!(record.corporate.balance, 0.0);
        assert_eq!(record.corporate.tax.total_tax, 0.0);
        assert_eq!(record.corporate.total_assets, 0.0);
    }
}

/// An empty corporate book skips the tax formula, which would otherwise
/// charge the per-capita levy on zero profit
#[test]
fn test_empty_corporate_book_skips_levy() {
    let levy = StandardFormulas.corporate_tax(0.0, &CorporateTaxSettings::default());
    assert!(levy.total_tax > 0.0);
    assert!(levy.aftertax_profit < 0.0);

    let projection = synthesize(&wage_and_living(31), &StandardFormulas).unwrap();
    let first = &projection.table.records[0];
    assert_eq!(first.corporate.tax.pretax_profit, 0.0);
    assert_eq!(first.corporate.tax.aftertax_profit, 0.0);
    assert_eq!(first.personal.total_assets, 300.0);
}

/// One record per year from the start year through the death age
#[test]
fn test_horizon_coverage() {
    for (current_age, death_age) in [(30, 30), (30, 31), (45, 90), (64, 100)] {
        let scenario = Scenario::new(BasicInfo::new(2030, current_age, death_age));
        let table = synthesize(&scenario, &StandardFormulas).unwrap().table;

        let expected = (death_age - current_age + 1) as usize;
        assert_eq!(table.len(), expected);
        let years: Vec<i32> = table.years().collect();
        assert_eq!(years.first(), Some(&2030));
        assert!(years.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(table.last().unwrap().age, death_age as i32);
    }
}

#[test]
fn test_inverted_horizon_fails() {
    let scenario = Scenario::new(BasicInfo::new(2030, 60, 59));
    let err = synthesize(&scenario, &StandardFormulas).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::InvalidHorizon {
            current_age: 60,
            death_age: 59
        }
    );
}

/// Identical snapshots give byte-identical tables
#[test]
fn test_determinism() {
    let scenario = ScenarioBuilder::new(2025, 40, 85)
        .inflation_rate(1.2)
        .personal_income(IncomeBuilder::wage("Salary").growing(520.0, 1.5).capped_at(800.0))
        .personal_expense(ExpenseBuilder::living("Living").growing(250.0, 1.2))
        .corporate_income(IncomeBuilder::revenue("Sales").growing(900.0, 3.0))
        .corporate_expense(ExpenseBuilder::revenue_cost("Materials", 25.0).ratio_increase(0.5))
        .build();

    let first = synthesize(&scenario, &StandardFormulas).unwrap();
    let second = synthesize(&scenario, &StandardFormulas).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.table).unwrap(),
        serde_json::to_string(&second.table).unwrap()
    );
}

/// Life events land in the year they happen and nowhere else
#[test]
fn test_life_event_hits_one_year() {
    let scenario = ScenarioBuilder::new(2025, 30, 33)
        .personal_income(IncomeBuilder::wage("Salary").constant(400.0))
        .event(2026, "Wedding", LifeEventKind::Expense, LifeEventSource::Personal, 250.0)
        .event(2027, "Gift", LifeEventKind::Income, LifeEventSource::Personal, 50.0)
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;

    let balances: Vec<f64> = table.records.iter().map(|r| r.personal.balance).collect();
    assert_eq!(balances, vec![400.0, 150.0, 450.0, 400.0]);
    assert_eq!(table.record(2026).unwrap().personal.life_event_expense, 250.0);
}

/// Every amount is rounded to one decimal place
#[test]
fn test_amounts_are_rounded() {
    let scenario = ScenarioBuilder::new(2025, 30, 31)
        .personal_income(IncomeBuilder::wage("Salary").constant(400.04))
        .personal_expense(ExpenseBuilder::living("Living").constant(100.02))
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    let record = &table.records[0];
    assert_eq!(record.personal.main_income, 400.0);
    assert_eq!(record.personal.living_expense, 100.0);
    assert_eq!(record.personal.balance, 300.0);
}
