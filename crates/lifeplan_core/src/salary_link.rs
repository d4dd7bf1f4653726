//! Corporate salary linkage
//!
//! A personal income item flagged as a corporate salary is paid by the
//! corporation. Each one gets a synthetic corporate expense carrying the
//! employer's full cost of the salary for every simulated year. The linker
//! works on the synthesis working copies; resolved values reach the caller
//! through [`SalaryLinkage`].

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rustc_hash::FxHashSet;

use crate::formulas::FormulaLibrary;
use crate::model::{
    CorporateSalaryType, EMPLOYEE_SALARY_CATEGORY, ExpenseItem, ExpenseKind, IncomeItem, ItemId,
    YearFlags, YearMap,
};

const LINKED_EXPENSE_PREFIX: &str = "linked_expense_";

/// Id of the expense item mirroring the corporate salary `income_id`
pub fn linked_expense_id(income_id: &ItemId) -> ItemId {
    ItemId::new(format!("{LINKED_EXPENSE_PREFIX}{income_id}"))
}

/// What the linker resolved for every corporate salary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryLinkage {
    /// Social-insurance coverage per salary item and year
    pub social_insurance: BTreeMap<ItemId, YearFlags>,
    /// Coverage decided by the part-time auto-switch; sticky once stored
    pub switched: BTreeMap<ItemId, YearFlags>,
    /// Salary item id to its linked expense id
    pub linked_expense_ids: BTreeMap<ItemId, ItemId>,
}

impl SalaryLinkage {
    pub fn has_social_insurance(&self, income_id: &ItemId, year: i32) -> bool {
        self.social_insurance
            .get(income_id)
            .and_then(|flags| flags.get(&year))
            .copied()
            .unwrap_or(false)
    }
}

/// Social-insurance coverage of `item` in `year`.
///
/// Returns the coverage and whether it came from the part-time auto-switch.
fn resolve_social_insurance(item: &IncomeItem, income: &[IncomeItem], year: i32) -> (bool, bool) {
    match item.salary_type() {
        CorporateSalaryType::PartTime
            if item.auto_switch_enabled && !item.is_manually_overridden(year) =>
        {
            let watched: f64 = item
                .auto_switch_income_ids
                .iter()
                .filter(|id| **id != item.id)
                .filter_map(|id| income.iter().find(|other| &other.id == id))
                .map(|other| other.face_amount(year))
                .sum();
            (item.face_amount(year) > watched, true)
        }
        _ => (item.stored_social_insurance(year), false),
    }
}

fn is_stale_link(expense: &ExpenseItem, salaries: &FxHashSet<ItemId>) -> bool {
    let generated = expense.is_salary_link()
        || (expense.category.as_deref() == Some(EMPLOYEE_SALARY_CATEGORY)
            && expense.id.as_str().starts_with(LINKED_EXPENSE_PREFIX));
    if !generated {
        return false;
    }
    let income_id = expense
        .linked_income_id
        .clone()
        .or_else(|| {
            expense
                .id
                .as_str()
                .strip_prefix(LINKED_EXPENSE_PREFIX)
                .map(ItemId::from)
        });
    match income_id {
        Some(id) => !salaries.contains(&id),
        None => true,
    }
}

/// Create or refresh the linked expense of every corporate salary.
///
/// Auto-switch decisions are written into the salary's
/// `social_insurance_by_year` and the linked expense id onto the salary.
/// Linked expenses whose salary is gone are removed. Calling this twice
/// leaves one linked expense per salary.
pub fn link_corporate_salaries(
    personal_income: &mut [IncomeItem],
    corporate_expense: &mut Vec<ExpenseItem>,
    years: RangeInclusive<i32>,
    formulas: &dyn FormulaLibrary,
) -> SalaryLinkage {
    let salaries: FxHashSet<ItemId> = personal_income
        .iter()
        .filter(|item| item.is_corporate_salary)
        .map(|item| item.id.clone())
        .collect();
    corporate_expense.retain(|expense| !is_stale_link(expense, &salaries));

    let mut linkage = SalaryLinkage::default();
    for index in 0..personal_income.len() {
        if !personal_income[index].is_corporate_salary {
            continue;
        }

        let mut flags = YearFlags::new();
        let mut switched = YearFlags::new();
        let mut costs = YearMap::new();
        for year in years.clone() {
            let item = &personal_income[index];
            let (insured, from_switch) = resolve_social_insurance(item, personal_income, year);
            flags.insert(year, insured);
            if from_switch {
                switched.insert(year, insured);
            }
            let salary = item.face_amount(year);
            let cost = if salary == 0.0 {
                0.0
            } else {
                formulas.employer_cost_for_salary(salary, insured)
            };
            costs.insert(year, cost);
        }

        let item = &mut personal_income[index];
        item.social_insurance_by_year.extend(switched.iter());
        let expense_id = linked_expense_id(&item.id);
        item.linked_expense_id = Some(expense_id.clone());

        let position = corporate_expense.iter().position(|e| e.id == expense_id);
        let expense = match position {
            Some(position) => &mut corporate_expense[position],
            None => {
                corporate_expense.push(ExpenseItem::new(
                    expense_id.clone(),
                    item.name.clone(),
                    ExpenseKind::Business,
                ));
                let last = corporate_expense.len() - 1;
                &mut corporate_expense[last]
            }
        };
        expense.name = item.name.clone();
        expense.kind = ExpenseKind::Business;
        expense.category = Some(EMPLOYEE_SALARY_CATEGORY.to_string());
        expense.is_linked_from_income = true;
        expense.linked_income_id = Some(item.id.clone());
        expense.amounts = costs.clone();
        expense.raw_amounts = costs;

        linkage.social_insurance.insert(item.id.clone(), flags);
        if !switched.is_empty() {
            linkage.switched.insert(item.id.clone(), switched);
        }
        linkage
            .linked_expense_ids
            .insert(item.id.clone(), expense_id);
    }
    linkage
}

/// Take-home pay of a corporate salary in `year`.
///
/// Writes the face amount into `original_amounts` and the director net
/// income into `amounts`, so the item reads consistently afterwards.
pub fn apply_director_withholding(
    item: &mut IncomeItem,
    year: i32,
    has_social_insurance: bool,
    formulas: &dyn FormulaLibrary,
) -> f64 {
    let face = item.face_amount(year);
    let net = if face == 0.0 {
        0.0
    } else {
        formulas
            .net_income_for_director(face, has_social_insurance)
            .net_income
    };
    item.original_amounts.insert(year, face);
    item.amounts.insert(year, net);
    net
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::StandardFormulas;
    use crate::model::IncomeKind;

    fn salary(id: &str, kind: CorporateSalaryType, amount: f64) -> IncomeItem {
        let mut item = IncomeItem::new(id, "Director pay", IncomeKind::Wage);
        item.is_corporate_salary = true;
        item.corporate_salary_type = Some(kind);
        for year in 2025..=2027 {
            item.original_amounts.insert(year, amount);
        }
        item
    }

    fn side(id: &str, amounts: &[(i32, f64)]) -> IncomeItem {
        let mut item = IncomeItem::new(id, id, IncomeKind::Side);
        item.amounts.extend(amounts.iter().copied());
        item
    }

    #[test]
    fn test_full_time_salary_gets_insured_employer_cost() {
        let mut income = vec![salary("s", CorporateSalaryType::FullTime, 100.0)];
        let mut expense = Vec::new();
        let linkage =
            link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);

        assert_eq!(expense.len(), 1);
        let linked = &expense[0];
        assert_eq!(linked.id, ItemId::from("linked_expense_s"));
        assert_eq!(linked.category.as_deref(), Some(EMPLOYEE_SALARY_CATEGORY));
        assert!((linked.amount(2025) - 115.75).abs() < 1e-9);
        assert_eq!(linked.raw_amounts, linked.amounts);
        assert_eq!(income[0].linked_expense_id, Some(linked.id.clone()));
        assert!(linkage.has_social_insurance(&ItemId::from("s"), 2026));
        assert!(linkage.switched.is_empty());
    }

    #[test]
    fn test_full_time_can_be_switched_off_per_year() {
        let mut item = salary("s", CorporateSalaryType::FullTime, 100.0);
        item.social_insurance_by_year.insert(2026, false);
        let mut income = vec![item];
        let mut expense = Vec::new();
        link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);
        assert!((expense[0].amount(2026) - 100.3).abs() < 1e-9);
        assert!((expense[0].amount(2027) - 115.75).abs() < 1e-9);
    }

    #[test]
    fn test_relinking_is_idempotent() {
        let mut income = vec![salary("s", CorporateSalaryType::FullTime, 100.0)];
        let mut expense = Vec::new();
        link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);
        let first = expense.clone();
        link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);
        assert_eq!(expense, first);
    }

    #[test]
    fn test_zero_salary_year_costs_nothing() {
        let mut item = salary("s", CorporateSalaryType::FullTime, 100.0);
        item.original_amounts.insert(2026, 0.0);
        let mut income = vec![item];
        let mut expense = Vec::new();
        link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);
        assert_eq!(expense[0].amount(2026), 0.0);
    }

    #[test]
    fn test_part_time_auto_switch_compares_with_watch_list() {
        let mut item = salary("s", CorporateSalaryType::PartTime, 150.0);
        item.auto_switch_enabled = true;
        item.auto_switch_income_ids = vec![ItemId::from("a"), ItemId::from("b")];
        let mut income = vec![
            item,
            side("a", &[(2025, 100.0), (2026, 100.0), (2027, 100.0)]),
            side("b", &[(2025, 20.0), (2026, 50.0), (2027, 80.0)]),
        ];
        let mut expense = Vec::new();
        let linkage =
            link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);

        let id = ItemId::from("s");
        // 150 > 120, 150 == 150, 150 < 180
        assert!(linkage.has_social_insurance(&id, 2025));
        assert!(!linkage.has_social_insurance(&id, 2026));
        assert!(!linkage.has_social_insurance(&id, 2027));
        assert_eq!(income[0].social_insurance_by_year.get(&2025), Some(&true));
        assert_eq!(income[0].social_insurance_by_year.get(&2026), Some(&false));
        assert_eq!(linkage.switched[&id].len(), 3);
    }

    #[test]
    fn test_manual_override_year_keeps_stored_flag() {
        let mut item = salary("s", CorporateSalaryType::PartTime, 150.0);
        item.auto_switch_enabled = true;
        item.auto_switch_income_ids = vec![ItemId::from("a")];
        item.manual_override_years.insert(2025, true);
        item.social_insurance_by_year.insert(2025, false);

        for watched in [0.0, 1000.0] {
            let mut income = vec![item.clone(), side("a", &[(2025, watched)])];
            let mut expense = Vec::new();
            let linkage =
                link_corporate_salaries(&mut income, &mut expense, 2025..=2025, &StandardFormulas);
            assert!(!linkage.has_social_insurance(&ItemId::from("s"), 2025));
            assert!(linkage.switched.is_empty());
        }
    }

    #[test]
    fn test_part_time_without_auto_switch_defaults_uninsured() {
        let mut item = salary("s", CorporateSalaryType::PartTime, 150.0);
        item.social_insurance_by_year.insert(2027, true);
        let mut income = vec![item];
        let mut expense = Vec::new();
        let linkage =
            link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);
        let id = ItemId::from("s");
        assert!(!linkage.has_social_insurance(&id, 2025));
        assert!(linkage.has_social_insurance(&id, 2027));
    }

    #[test]
    fn test_stale_links_are_pruned() {
        let mut income = vec![side("gone", &[])];
        let mut orphan = ExpenseItem::new("linked_expense_gone", "Old pay", ExpenseKind::Business);
        orphan.category = Some(EMPLOYEE_SALARY_CATEGORY.to_string());
        orphan.linked_income_id = Some(ItemId::from("gone"));
        let rent = ExpenseItem::new("rent", "Office rent", ExpenseKind::Business);
        let mut expense = vec![orphan, rent];

        link_corporate_salaries(&mut income, &mut expense, 2025..=2027, &StandardFormulas);
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].id, ItemId::from("rent"));
    }

    #[test]
    fn test_director_withholding_overwrites_take_home() {
        let mut item = salary("s", CorporateSalaryType::FullTime, 600.0);
        let net = apply_director_withholding(&mut item, 2025, true, &StandardFormulas);
        assert!(net < 600.0 && net > 0.0);
        assert_eq!(item.amount(2025), net);
        assert_eq!(item.face_amount(2025), 600.0);
        // Re-applying reads the preserved face amount
        let again = apply_director_withholding(&mut item, 2025, true, &StandardFormulas);
        assert_eq!(again, net);
    }
}
