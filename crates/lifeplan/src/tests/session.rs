//! Session behaviour across edits

use lifeplan_core::config::{ExpenseBuilder, IncomeBuilder, LiabilityBuilder, ScenarioBuilder};
use lifeplan_core::model::{
    CorporateSalaryType, IncomeItem, IncomeKind, ItemId, LifeEvent, LifeEventKind,
    LifeEventSource, Parameters,
};
use lifeplan_core::{Section, SynthesisError};

use crate::session::ScenarioSession;

fn base_session() -> ScenarioSession {
    let scenario = ScenarioBuilder::new(2025, 40, 44)
        .personal_income(IncomeBuilder::wage("Salary").constant(400.0))
        .personal_expense(ExpenseBuilder::living("Living").constant(100.0))
        .build();
    ScenarioSession::new(scenario)
}

/// A new session is synthesized immediately
#[test]
fn test_session_starts_computed() {
    let session = base_session();
    assert_eq!(session.table().len(), 5);
    assert_eq!(session.table().records[0].personal.balance, 300.0);
    assert!(session.last_error().is_none());
}

/// Each setter resynthesizes the table
#[test]
fn test_setters_resynthesize() {
    let mut session = base_session();

    let mut bonus = IncomeItem::new("bonus", "Bonus", IncomeKind::Side);
    bonus.amounts.insert(2026, 50.0);
    let mut income = session.scenario().personal.income.clone();
    income.push(bonus);
    session.set_income_data(Section::Personal, income);
    assert_eq!(session.table().record(2026).unwrap().personal.balance, 350.0);

    session.set_life_events(vec![LifeEvent {
        year: 2027,
        description: "Car".to_string(),
        kind: LifeEventKind::Expense,
        category: String::new(),
        amount: 200.0,
        source: LifeEventSource::Personal,
    }]);
    assert_eq!(session.table().record(2027).unwrap().personal.balance, 100.0);

    session.set_expense_data(Section::Personal, Vec::new());
    assert_eq!(session.table().record(2025).unwrap().personal.balance, 400.0);

    let mut info = session.scenario().basic_info.clone();
    info.death_age = 41;
    session.set_basic_info(info);
    assert_eq!(session.table().len(), 2);
}

/// A failing pass keeps the previous table and records the error
#[test]
fn test_failed_pass_keeps_previous_table() {
    let mut session = base_session();
    let before = session.table().clone();

    let broken = ScenarioBuilder::new(2025, 40, 44)
        .personal_liability(LiabilityBuilder::loan("Broken", 100.0, 1.0, 0, 2025))
        .build();
    session.set_liability_data(Section::Personal, broken.personal.liabilities);

    assert_eq!(session.table(), &before);
    assert!(matches!(
        session.last_error(),
        Some(SynthesisError::InvalidLoan { .. })
    ));
    assert_eq!(session.scenario().personal.liabilities.len(), 1);

    session.set_liability_data(Section::Personal, Vec::new());
    assert!(session.last_error().is_none());
}

/// Auto-switch decisions and linked expense ids are stored on the salary
#[test]
fn test_salary_decisions_are_stored() {
    let scenario = ScenarioBuilder::new(2025, 45, 46)
        .personal_income(
            IncomeBuilder::wage("Director")
                .constant(200.0)
                .corporate_salary(CorporateSalaryType::PartTime)
                .auto_switch(["rent"]),
        )
        .personal_income(IncomeBuilder::side("Rent").constant(100.0))
        .build();
    let session = ScenarioSession::new(scenario);

    let salary = &session.scenario().personal.income[0];
    assert_eq!(
        salary.linked_expense_id,
        Some(ItemId::from("linked_expense_director"))
    );
    assert_eq!(salary.social_insurance_by_year.get(&2025), Some(&true));
    // Linked expenses stay derived
    assert!(session.scenario().corporate.expense.is_empty());
    assert_eq!(session.derived().linked_expenses.len(), 1);
}

/// Manual overrides last until the next recompute
#[test]
fn test_override_is_overwritten_on_recompute() {
    let mut session = base_session();
    let mut record = session.table().records[1];
    record.personal.balance = 9999.0;
    assert!(session.override_cash_flow(record));
    assert_eq!(session.table().records[1].personal.balance, 9999.0);

    let mut outside = record;
    outside.year = 1990;
    assert!(!session.override_cash_flow(outside));

    session.set_parameters(Parameters::default());
    assert_eq!(session.table().records[1].personal.balance, 300.0);
}
