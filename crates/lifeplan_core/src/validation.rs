//! Scenario checks run before synthesis
//!
//! Errors are conditions under which [`crate::synthesize`] fails. Warnings
//! cover references that synthesis tolerates by contributing zero.

use rustc_hash::FxHashSet;

use crate::error::{Severity, ValidationIssue};
use crate::model::{ItemId, LiabilityItem, Scenario, Section};

fn issue(severity: Severity, section: Section, id: &ItemId, message: String) -> ValidationIssue {
    ValidationIssue {
        severity,
        section: Some(section),
        item_id: Some(id.clone()),
        message,
    }
}

fn check_loan(section: Section, liability: &LiabilityItem, issues: &mut Vec<ValidationIssue>) {
    if !liability.auto_calculate {
        return;
    }
    let mut missing = Vec::new();
    if liability.original_amount.is_none() {
        missing.push("original amount");
    }
    if liability.term_years.is_none() {
        missing.push("term");
    }
    if liability.start_year.is_none() {
        missing.push("start year");
    }
    if !missing.is_empty() {
        issues.push(issue(
            Severity::Warning,
            section,
            &liability.id,
            format!("auto-calculated loan has no {}; no repayments are scheduled", missing.join(", ")),
        ));
        return;
    }

    if liability.term_years == Some(0) {
        issues.push(issue(
            Severity::Error,
            section,
            &liability.id,
            "term must be at least one year".to_string(),
        ));
    }
    if liability.original_amount.is_some_and(|p| p.is_nan() || p < 0.0) {
        issues.push(issue(
            Severity::Error,
            section,
            &liability.id,
            "original amount must be non-negative".to_string(),
        ));
    }
    if liability
        .interest_rate
        .is_some_and(|r| !r.is_finite() || r < 0.0)
    {
        issues.push(issue(
            Severity::Error,
            section,
            &liability.id,
            "interest rate must be non-negative".to_string(),
        ));
    }
}

/// Every problem found in `scenario`, errors and warnings mixed, in book order
pub fn validate(scenario: &Scenario) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let info = &scenario.basic_info;
    if info.death_age < info.current_age {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            section: None,
            item_id: None,
            message: format!(
                "death age {} is before current age {}",
                info.death_age, info.current_age
            ),
        });
    }

    for section in [Section::Personal, Section::Corporate] {
        let book = scenario.book(section);

        let mut seen = FxHashSet::default();
        let ids = book
            .income
            .iter()
            .map(|i| &i.id)
            .chain(book.expense.iter().map(|e| &e.id))
            .chain(book.assets.iter().map(|a| &a.id))
            .chain(book.liabilities.iter().map(|l| &l.id));
        for id in ids {
            if !seen.insert(id) {
                issues.push(issue(
                    Severity::Warning,
                    section,
                    id,
                    "id is used by more than one item".to_string(),
                ));
            }
        }

        for liability in &book.liabilities {
            check_loan(section, liability, &mut issues);
        }

        for item in &book.income {
            for watched in &item.auto_switch_income_ids {
                if book.income_item(watched).is_none() {
                    issues.push(issue(
                        Severity::Warning,
                        section,
                        &item.id,
                        format!("auto-switch watches unknown income {watched}"),
                    ));
                }
            }
            if item.is_corporate_salary && section == Section::Corporate {
                issues.push(issue(
                    Severity::Warning,
                    section,
                    &item.id,
                    "corporate salaries belong in the personal book".to_string(),
                ));
            }
        }

        for expense in &book.expense {
            let Some(settings) = expense.revenue_cost_settings() else {
                continue;
            };
            for target in &settings.target_income_ids {
                if scenario.corporate.income_item(target).is_none() {
                    issues.push(issue(
                        Severity::Warning,
                        section,
                        &expense.id,
                        format!("cost targets unknown revenue {target}"),
                    ));
                }
            }
        }

        for asset in book.assets.iter().filter(|a| a.is_income_linked()) {
            let linked_book = scenario.book(asset.linked_income_type.unwrap_or(section));
            match &asset.linked_income_id {
                Some(id) if linked_book.income_item(id).is_none() => issues.push(issue(
                    Severity::Warning,
                    section,
                    &asset.id,
                    format!("linked income {id} does not exist; the asset only grows"),
                )),
                None => issues.push(issue(
                    Severity::Warning,
                    section,
                    &asset.id,
                    "income-linked asset has no linked income".to_string(),
                )),
                _ => {}
            }
        }
    }

    issues
}

/// True when no issue would make synthesis fail
pub fn is_synthesizable(issues: &[ValidationIssue]) -> bool {
    issues.iter().all(|i| i.severity != Severity::Error)
}
