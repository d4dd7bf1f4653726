//! Scenarios assembled with the builder DSL and the seeder

use crate::config::{
    AssetBuilder, ExpenseBuilder, IncomeBuilder, LiabilityBuilder, ScenarioBuilder, seed_scenario,
};
use crate::formulas::StandardFormulas;
use crate::model::{
    BasicInfo, CorporateSalaryType, ItemId, LiabilityKind, LifeEventKind, LifeEventSource,
    Occupation, Parameters, SpouseInfo,
};
use crate::synthesis::synthesize;
use crate::validation::{is_synthesizable, validate};

fn spouse(additional_living_expense: f64) -> SpouseInfo {
    SpouseInfo {
        current_age: 38,
        occupation: Occupation::default(),
        annual_income: 0.0,
        marriage_age: None,
        additional_living_expense,
        pension_start_age: 65,
    }
}

/// A seeded profile projects to the end of life with wage income until
/// retirement and pension after it
#[test]
fn test_seeded_scenario_projects() {
    let mut info = BasicInfo::new(2025, 35, 90);
    info.annual_income = 500.0;
    info.income_raise_rate = 1.0;
    info.retirement_age = 65;
    info.pension_start_age = 65;
    info.monthly_living_expense = 15.0;
    info.savings = 800.0;

    let scenario = seed_scenario(info, Parameters::default(), &StandardFormulas);
    assert!(is_synthesizable(&validate(&scenario)));
    let projection = synthesize(&scenario, &StandardFormulas).unwrap();
    let table = &projection.table;

    assert_eq!(table.len(), 56);
    assert_eq!(table.records[0].age, 35);
    assert!(table.record(2054).unwrap().personal.main_income > 0.0);
    assert_eq!(table.record(2055).unwrap().personal.main_income, 0.0);
    assert_eq!(table.record(2054).unwrap().personal.pension_income, 0.0);
    assert!(table.record(2055).unwrap().personal.pension_income >= 78.0);
    assert!(projection.derived.pension_amounts.contains_key(&ItemId::from("pension")));

    // Seeded savings open the personal asset total
    let first = &table.records[0];
    assert!((first.personal.total_assets - (800.0 + first.personal.balance)).abs() < 0.11);
}

/// A spouse adds inflated living cost from the marriage year
#[test]
fn test_spouse_supplement_in_living_cost() {
    let scenario = ScenarioBuilder::new(2025, 40, 42)
        .inflation_rate(10.0)
        .married(spouse(100.0))
        .personal_expense(ExpenseBuilder::living("Living").constant(200.0))
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    let living: Vec<f64> = table.records.iter().map(|r| r.personal.living_expense).collect();
    assert_eq!(living, [300.0, 310.0, 321.0]);
}

/// Synthesis leaves the scenario it was given untouched
#[test]
fn test_scenario_is_not_mutated() {
    let scenario = ScenarioBuilder::new(2025, 45, 50)
        .personal_income(
            IncomeBuilder::wage("Director")
                .constant(480.0)
                .corporate_salary(CorporateSalaryType::PartTime)
                .auto_switch(["rent"]),
        )
        .personal_income(IncomeBuilder::side("Rent").constant(100.0))
        .pension_start_age(46)
        .personal_income(IncomeBuilder::pension("Pension"))
        .corporate_income(IncomeBuilder::revenue("Sales").constant(1500.0))
        .corporate_expense(ExpenseBuilder::revenue_cost("Materials", 10.0))
        .build();
    let before = scenario.clone();

    let projection = synthesize(&scenario, &StandardFormulas).unwrap();
    assert_eq!(scenario, before);
    assert_eq!(projection.derived.linked_expenses.len(), 1);
    assert!(scenario.corporate.expense[0].amounts.is_empty());
    assert!(scenario.personal.income[2].amounts.is_empty());

    let again = synthesize(&scenario, &StandardFormulas).unwrap();
    assert_eq!(projection, again);
}

/// Warnings do not stop synthesis; dangling references contribute zero
#[test]
fn test_warnings_still_synthesize() {
    let scenario = ScenarioBuilder::new(2025, 40, 41)
        .corporate_income(IncomeBuilder::revenue("Sales").constant(500.0))
        .corporate_expense(ExpenseBuilder::revenue_cost("Materials", 10.0).targets(["missing"]))
        .personal_asset(AssetBuilder::income_linked("Plan", "missing", 10.0))
        .personal_liability(LiabilityBuilder::manual("Card", LiabilityKind::Credit))
        .build();

    let issues = validate(&scenario);
    assert_eq!(issues.len(), 2);
    assert!(is_synthesizable(&issues));

    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    assert_eq!(table.records[0].corporate.cost_expense, 0.0);
    assert_eq!(table.records[0].personal.investment_contribution, 0.0);
}

/// Corporate life events count in the corporate profit before tax
#[test]
fn test_corporate_event_is_taxed() {
    let scenario = ScenarioBuilder::new(2025, 40, 41)
        .event(
            2026,
            "Equipment sale",
            LifeEventKind::Income,
            LifeEventSource::Corporate,
            300.0,
        )
        .event(
            2026,
            "Fund withdrawal",
            LifeEventKind::Income,
            LifeEventSource::CorporateInvestment,
            100.0,
        )
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    let record = table.record(2026).unwrap();
    assert_eq!(record.corporate.life_event_income, 400.0);
    assert_eq!(record.corporate.tax.pretax_profit, 400.0);
    assert!(record.corporate.tax.total_tax > 0.0);
    assert!(record.corporate.balance < 400.0);

    // Before the event the corporate book still pays the flat resident tax
    assert!(table.record(2025).unwrap().corporate.balance < 0.0);
}
