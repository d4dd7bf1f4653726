//! Loan repayments and outstanding balances in the table

use crate::config::{IncomeBuilder, LiabilityBuilder, ScenarioBuilder};
use crate::error::SynthesisError;
use crate::formulas::StandardFormulas;
use crate::model::{ItemId, LiabilityKind, Scenario, Section};
use crate::synthesis::synthesize;

/// 1200 at 0% over ten years repays 120 a year for exactly ten years
#[test]
fn test_interest_free_loan() {
    let scenario = ScenarioBuilder::new(2025, 40, 52)
        .personal_liability(LiabilityBuilder::loan("Car", 1200.0, 0.0, 10, 2025))
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;

    for record in &table.records {
        let expected = if record.year <= 2034 { 120.0 } else { 0.0 };
        assert_eq!(record.personal.loan_repayment, expected, "{}", record.year);
    }
    let outstanding: Vec<f64> = table
        .records
        .iter()
        .take(4)
        .map(|r| r.personal.liability_total)
        .collect();
    assert_eq!(outstanding, [1080.0, 960.0, 840.0, 720.0]);
    assert_eq!(table.record(2034).unwrap().personal.liability_total, 0.0);
    assert_eq!(table.record(2037).unwrap().personal.liability_total, 0.0);
}

/// Repayments reduce the balance and the net assets carry the liability
#[test]
fn test_loan_reduces_balance() {
    let scenario = ScenarioBuilder::new(2025, 40, 41)
        .personal_income(IncomeBuilder::wage("Salary").constant(500.0))
        .personal_liability(LiabilityBuilder::loan("Car", 1200.0, 0.0, 10, 2025))
        .build();
    let record = synthesize(&scenario, &StandardFormulas).unwrap().table.records[0];
    assert_eq!(record.personal.balance, 380.0);
    assert_eq!(record.personal.total_assets, 380.0);
    assert_eq!(record.personal.net_assets, 380.0 - 1080.0);
}

/// A loan starting later is invisible until its first year
#[test]
fn test_loan_starting_later() {
    let scenario = ScenarioBuilder::new(2025, 40, 45)
        .corporate_liability(LiabilityBuilder::loan("Bank", 600.0, 0.0, 2, 2028))
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    let repayments: Vec<f64> = table.records.iter().map(|r| r.corporate.loan_repayment).collect();
    assert_eq!(repayments, [0.0, 0.0, 0.0, 300.0, 300.0, 0.0]);
    assert_eq!(table.record(2027).unwrap().corporate.liability_total, 0.0);
    assert_eq!(table.record(2028).unwrap().corporate.liability_total, 300.0);
}

/// Interest-bearing equal-payment loans repay more than the principal and
/// the schedule is exposed per liability
#[test]
fn test_loan_schedule_in_derived_view() {
    let scenario = ScenarioBuilder::new(2025, 40, 70)
        .personal_liability(LiabilityBuilder::loan("Mortgage", 3000.0, 1.5, 20, 2025))
        .corporate_liability(LiabilityBuilder::loan("Mortgage", 500.0, 2.0, 5, 2025).equal_principal())
        .build();
    let projection = synthesize(&scenario, &StandardFormulas).unwrap();

    let personal = &projection.derived.personal.loan_schedules[&ItemId::from("mortgage")];
    let total: f64 = personal.years.values().map(|y| y.repayment).sum();
    assert!(total > 3000.0);
    assert!(personal.outstanding(2044) < 1e-6);

    // Same id in the other book is a separate schedule
    let corporate = projection.derived.book(Section::Corporate);
    let schedule = &corporate.loan_schedules[&ItemId::from("mortgage")];
    assert_eq!(schedule.years.len(), 5);
    assert!(schedule.repayment(2025) > schedule.repayment(2029));
}

/// A housing-covered mortgage adds no repayment but still counts as debt
#[test]
fn test_housing_covered_mortgage() {
    let scenario = ScenarioBuilder::new(2025, 40, 45)
        .personal_liability(LiabilityBuilder::loan("Mortgage", 3000.0, 1.0, 30, 2025).housing_covered())
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    for record in &table.records {
        assert_eq!(record.personal.loan_repayment, 0.0);
        assert!(record.personal.liability_total > 0.0);
    }
}

/// Manually entered balances count by magnitude
#[test]
fn test_manual_liability_balances() {
    let scenario = ScenarioBuilder::new(2025, 40, 41)
        .corporate_liability(
            LiabilityBuilder::manual("Credit line", LiabilityKind::Credit)
                .balance(2025, 400.0)
                .balance(2026, -250.0),
        )
        .build();
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    assert_eq!(table.records[0].corporate.liability_total, 400.0);
    assert_eq!(table.records[1].corporate.liability_total, 250.0);
    assert_eq!(table.records[1].corporate.loan_repayment, 0.0);
}

/// Older documents mark the housing mortgage by its name
#[test]
fn test_legacy_housing_loan_document() {
    let json = r#"{
        "basicInfo": {"startYear": 2025, "currentAge": 40, "deathAge": 41},
        "personal": {
            "liabilities": [
                {"id": "l1", "name": "loan", "type": "loan", "amounts": {"2025": 800, "2026": 760}}
            ]
        }
    }"#;
    let scenario: Scenario = serde_json::from_str::<Scenario>(json).unwrap().normalized();
    assert!(scenario.personal.liabilities[0].covered_by_housing_expense);

    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    assert_eq!(table.records[0].personal.liability_total, 800.0);
    assert_eq!(table.records[1].personal.liability_total, 760.0);
    assert_eq!(table.records[0].personal.loan_repayment, 0.0);
}

/// A zero-year term aborts the pass
#[test]
fn test_zero_term_loan_fails() {
    let scenario = ScenarioBuilder::new(2025, 40, 41)
        .personal_liability(LiabilityBuilder::loan("Broken", 100.0, 1.0, 0, 2025))
        .build();
    let err = synthesize(&scenario, &StandardFormulas).unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::InvalidLoan { section: Section::Personal, .. }
    ));
}
