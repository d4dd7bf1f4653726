//! Default scenario seeding
//!
//! A new scenario is seeded from the profile: wage income (with raise and
//! cap) until retirement, spouse income, auto-calculated pensions, living
//! cost with inflation, housing cost from the formula library, education cost
//! per child, opening savings and the mortgage.

use crate::formulas::FormulaLibrary;
use crate::model::{
    AssetItem, AssetKind, BasicInfo, Child, ExpenseItem, ExpenseKind, Housing, IncomeItem,
    IncomeKind, IncomeRole, LiabilityItem, LiabilityKind, MaritalStatus, Parameters,
    RepaymentType, Scenario, SchoolType, YearMap, round1,
};

use super::autofill::{autofill_amounts, map_amounts};

/// Yearly cost of a school stage in start-year prices, public and private
struct SchoolStage {
    first_age: i32,
    last_age: i32,
    public: f64,
    private: f64,
}

const KINDERGARTEN: SchoolStage = SchoolStage {
    first_age: 3,
    last_age: 5,
    public: 16.5,
    private: 30.9,
};
const ELEMENTARY: SchoolStage = SchoolStage {
    first_age: 6,
    last_age: 11,
    public: 35.2,
    private: 166.7,
};
const JUNIOR_HIGH: SchoolStage = SchoolStage {
    first_age: 12,
    last_age: 14,
    public: 53.9,
    private: 143.6,
};
const HIGH_SCHOOL: SchoolStage = SchoolStage {
    first_age: 15,
    last_age: 17,
    public: 51.3,
    private: 105.4,
};
const UNIVERSITY: SchoolStage = SchoolStage {
    first_age: 18,
    last_age: 21,
    public: 107.0,
    private: 152.0,
};

/// Education cost of one child in `year`, before escalation
pub fn education_cost(child: &Child, year: i32) -> f64 {
    let age = year - child.birth_year;
    let plan = &child.education;
    let stages = [
        (&KINDERGARTEN, Some(plan.kindergarten)),
        (&ELEMENTARY, Some(plan.elementary)),
        (&JUNIOR_HIGH, Some(plan.junior_high)),
        (&HIGH_SCHOOL, Some(plan.high_school)),
        (&UNIVERSITY, plan.university),
    ];
    stages
        .iter()
        .find(|(stage, _)| (stage.first_age..=stage.last_age).contains(&age))
        .and_then(|(stage, school)| {
            school.map(|school| match school {
                SchoolType::Public => stage.public,
                SchoolType::Private => stage.private,
            })
        })
        .unwrap_or(0.0)
}

fn wage_items(info: &BasicInfo, formulas: &dyn FormulaLibrary) -> Vec<IncomeItem> {
    let mut items = Vec::new();
    let last_working_year = info.year_at_age(info.retirement_age) - 1;

    if info.annual_income > 0.0 {
        let mut salary = IncomeItem::new("salary", "Salary", IncomeKind::Wage);
        salary.role = Some(IncomeRole::PrimaryWage);
        salary.original_amounts = autofill_amounts(
            info.annual_income,
            info.income_raise_rate,
            info.start_year,
            last_working_year.min(info.end_year()),
            info.max_annual_income,
        );
        salary.amounts = map_amounts(&salary.original_amounts, |_, gross| {
            round1(
                formulas
                    .net_income_from_gross_salary(gross, info.occupation)
                    .net_income,
            )
        });
        items.push(salary);
    }

    if let (Some(spouse), Some(marriage_year)) = (info.spouse.as_ref(), info.marriage_year())
        && spouse.annual_income > 0.0
    {
        let retirement_year =
            info.start_year + info.retirement_age as i32 - spouse.current_age as i32;
        let mut wage = IncomeItem::new("spouse_salary", "Spouse salary", IncomeKind::Wage);
        wage.role = Some(IncomeRole::SpouseWage);
        wage.original_amounts = autofill_amounts(
            spouse.annual_income,
            info.income_raise_rate,
            marriage_year.max(info.start_year),
            (retirement_year - 1).min(info.end_year()),
            info.max_annual_income,
        );
        wage.amounts = map_amounts(&wage.original_amounts, |_, gross| {
            round1(
                formulas
                    .net_income_from_gross_salary(gross, spouse.occupation)
                    .net_income,
            )
        });
        items.push(wage);
    }

    let mut pension = IncomeItem::new("pension", "Pension", IncomeKind::Side);
    pension.role = Some(IncomeRole::Pension);
    pension.is_auto_calculated = true;
    items.push(pension);

    if info.spouse.is_some() && info.marital_status != MaritalStatus::Single {
        let mut spouse_pension =
            IncomeItem::new("spouse_pension", "Spouse pension", IncomeKind::Side);
        spouse_pension.role = Some(IncomeRole::SpousePension);
        spouse_pension.is_auto_calculated = true;
        items.push(spouse_pension);
    }

    items
}

fn escalate(raw: &YearMap, rate: f64, start_year: i32) -> YearMap {
    map_amounts(raw, |year, amount| {
        round1(amount * (1.0 + rate / 100.0).powi(year - start_year))
    })
}

fn expense_items(
    info: &BasicInfo,
    parameters: &Parameters,
    formulas: &dyn FormulaLibrary,
) -> Vec<ExpenseItem> {
    let mut items = Vec::new();
    let years = info.years();

    let mut living = ExpenseItem::new("living", "Living", ExpenseKind::Living);
    living.raw_amounts = years
        .clone()
        .map(|year| (year, info.monthly_living_expense * 12.0))
        .collect();
    living.amounts = escalate(&living.raw_amounts, parameters.inflation_rate, info.start_year);
    items.push(living);

    let mut housing = ExpenseItem::new("housing", "Housing", ExpenseKind::Housing);
    housing.amounts = years
        .clone()
        .map(|year| {
            let cost = formulas.housing_expense_for_year(&info.housing, year, info.start_year);
            (year, round1(cost))
        })
        .collect();
    housing.raw_amounts = housing.amounts.clone();
    items.push(housing);

    if !info.children.is_empty() {
        let mut education = ExpenseItem::new("education", "Education", ExpenseKind::Education);
        education.raw_amounts = years
            .map(|year| {
                let cost: f64 = info
                    .children
                    .iter()
                    .map(|child| education_cost(child, year))
                    .sum();
                (year, cost)
            })
            .filter(|(_, cost)| *cost > 0.0)
            .collect();
        education.amounts = escalate(
            &education.raw_amounts,
            parameters.education_cost_increase_rate,
            info.start_year,
        );
        items.push(education);
    }

    items
}

/// Scenario with the default items derived from `basic_info`
pub fn seed_scenario(
    basic_info: BasicInfo,
    parameters: Parameters,
    formulas: &dyn FormulaLibrary,
) -> Scenario {
    let mut scenario = Scenario::new(basic_info);
    scenario.parameters = parameters;
    let info = &scenario.basic_info;

    let income = wage_items(info, formulas);
    let expense = expense_items(info, &scenario.parameters, formulas);

    let mut assets = Vec::new();
    if info.savings > 0.0 {
        let mut savings = AssetItem::new("savings", "Savings", AssetKind::Cash);
        savings.amounts.insert(info.start_year, info.savings);
        assets.push(savings);
    }

    let mut liabilities = Vec::new();
    if let Housing::Own {
        mortgage: Some(mortgage),
        ..
    } = &info.housing
    {
        let mut loan = LiabilityItem::new("mortgage", "Mortgage", LiabilityKind::Loan);
        loan.auto_calculate = true;
        loan.original_amount = Some(mortgage.amount);
        loan.interest_rate = Some(mortgage.interest_rate);
        loan.term_years = Some(mortgage.term_years);
        loan.start_year = Some(mortgage.start_year);
        loan.repayment_type = RepaymentType::EqualPayment;
        loan.covered_by_housing_expense = true;
        liabilities.push(loan);
    }

    scenario.personal.income = income;
    scenario.personal.expense = expense;
    scenario.personal.assets = assets;
    scenario.personal.liabilities = liabilities;
    scenario
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::StandardFormulas;
    use crate::model::{EducationPlan, Mortgage};

    fn profile() -> BasicInfo {
        let mut info = BasicInfo::new(2025, 35, 90);
        info.annual_income = 500.0;
        info.income_raise_rate = 2.0;
        info.max_annual_income = Some(700.0);
        info.retirement_age = 65;
        info.monthly_living_expense = 20.0;
        info.savings = 800.0;
        info
    }

    #[test]
    fn test_wage_runs_until_retirement_and_respects_cap() {
        let scenario = seed_scenario(profile(), Parameters::default(), &StandardFormulas);
        let salary = &scenario.personal.income[0];
        assert_eq!(salary.original_amounts.keys().next(), Some(&2025));
        assert_eq!(salary.original_amounts.keys().last(), Some(&2054));
        assert!(salary.original_amounts.values().all(|a| *a <= 700.0));
        assert!(salary.amount(2025) < salary.face_amount(2025));
    }

    #[test]
    fn test_pension_is_auto_calculated() {
        let scenario = seed_scenario(profile(), Parameters::default(), &StandardFormulas);
        let pension = scenario
            .personal
            .income
            .iter()
            .find(|i| i.role == Some(IncomeRole::Pension))
            .unwrap();
        assert!(pension.is_auto_calculated);
        assert!(pension.amounts.is_empty());
    }

    #[test]
    fn test_living_cost_inflates() {
        let params = Parameters {
            inflation_rate: 10.0,
            ..Parameters::default()
        };
        let scenario = seed_scenario(profile(), params, &StandardFormulas);
        let living = &scenario.personal.expense[0];
        assert_eq!(living.amount(2025), 240.0);
        assert_eq!(living.amount(2027), 290.4);
        assert_eq!(living.raw_amounts[&2027], 240.0);
    }

    #[test]
    fn test_mortgage_is_flagged_as_housing_cost() {
        let mut info = profile();
        info.housing = Housing::Own {
            purchase_year: 2025,
            mortgage: Some(Mortgage {
                amount: 3000.0,
                interest_rate: 1.0,
                term_years: 35,
                start_year: 2025,
            }),
            maintenance_cost: 10.0,
            property_tax: 12.0,
            prior_monthly_rent: 0.0,
        };
        let scenario = seed_scenario(info, Parameters::default(), &StandardFormulas);
        let mortgage = &scenario.personal.liabilities[0];
        assert!(mortgage.auto_calculate);
        assert!(mortgage.covered_by_housing_expense);
        let housing = &scenario.personal.expense[1];
        assert!(housing.amount(2025) > 22.0);
    }

    #[test]
    fn test_education_follows_school_ages() {
        let child = Child {
            birth_year: 2020,
            education: EducationPlan {
                university: None,
                ..EducationPlan::default()
            },
        };
        assert_eq!(education_cost(&child, 2022), 0.0);
        assert_eq!(education_cost(&child, 2023), 16.5);
        assert_eq!(education_cost(&child, 2026), 35.2);
        assert_eq!(education_cost(&child, 2038), 0.0);
    }

    #[test]
    fn test_savings_become_opening_cash() {
        let scenario = seed_scenario(profile(), Parameters::default(), &StandardFormulas);
        assert_eq!(scenario.personal.assets[0].amounts[&2025], 800.0);
    }
}
