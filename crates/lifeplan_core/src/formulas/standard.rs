//! Bundled formula tables
//!
//! Amounts are in 10,000 yen. The tables are deliberately compact: a single
//! employee social-insurance rate, the national income-tax brackets with the
//! reconstruction surtax, a flat resident tax, a two-step corporate tax and a
//! flat basic pension plus an earnings-related part.

use crate::loans::equal_payment_monthly;
use crate::model::{
    BasicInfo, CorporateTaxBreakdown, CorporateTaxSettings, Housing, IncomeItem, IncomeRole,
    Occupation, Section,
};

use super::brackets::{INCOME_TAX_BRACKETS, progressive_tax};
use super::{FormulaLibrary, NetIncome, WithholdingBreakdown};

const PENSION_INSURANCE_RATE: f64 = 9.15;
const HEALTH_INSURANCE_RATE: f64 = 4.99;
const EMPLOYMENT_INSURANCE_RATE: f64 = 0.6;

const EMPLOYER_SOCIAL_INSURANCE_RATE: f64 = 15.09;
const CHILD_LEVY_RATE: f64 = 0.36;
const LABOR_INSURANCE_RATE: f64 = 0.3;

/// Part-time wages below this are outside employee insurance
const PART_TIME_INSURANCE_THRESHOLD: f64 = 106.0;

const NATIONAL_PENSION_PREMIUM: f64 = 20.4;
const NATIONAL_HEALTH_INSURANCE_RATE: f64 = 10.0;
const BLUE_RETURN_DEDUCTION: f64 = 65.0;

const BASIC_DEDUCTION: f64 = 48.0;
const RESIDENT_BASIC_DEDUCTION: f64 = 43.0;
const RESIDENT_TAX_RATE: f64 = 10.0;
const RESIDENT_TAX_PER_CAPITA: f64 = 0.5;
const RECONSTRUCTION_SURTAX: f64 = 1.021;

const BASIC_PENSION: f64 = 78.0;
const EARNINGS_RELATED_FACTOR: f64 = 0.005481;
const CAREER_START_AGE: u32 = 22;

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormulas;

fn employment_income_deduction(gross: f64) -> f64 {
    let deduction = if gross <= 162.5 {
        55.0
    } else if gross <= 180.0 {
        gross * 0.4 - 10.0
    } else if gross <= 360.0 {
        gross * 0.3 + 8.0
    } else if gross <= 660.0 {
        gross * 0.2 + 44.0
    } else if gross <= 850.0 {
        gross * 0.1 + 110.0
    } else {
        195.0
    };
    deduction.min(gross)
}

/// Income and resident tax on income already reduced by its own deduction
fn withhold(gross: f64, income: f64, social_insurance: f64) -> NetIncome {
    let income_tax = progressive_tax(
        (income - social_insurance - BASIC_DEDUCTION).max(0.0),
        &INCOME_TAX_BRACKETS,
    ) * RECONSTRUCTION_SURTAX;

    let resident_base = (income - social_insurance - RESIDENT_BASIC_DEDUCTION).max(0.0);
    let resident_tax = if resident_base > 0.0 {
        resident_base * RESIDENT_TAX_RATE / 100.0 + RESIDENT_TAX_PER_CAPITA
    } else {
        0.0
    };

    let breakdown = WithholdingBreakdown {
        social_insurance,
        income_tax,
        resident_tax,
    };
    NetIncome {
        net_income: gross - breakdown.total(),
        breakdown,
    }
}

fn salary_net_income(gross: f64, social_insurance_rate: f64) -> NetIncome {
    if gross <= 0.0 {
        return NetIncome::default();
    }
    let employment_income = gross - employment_income_deduction(gross);
    withhold(gross, employment_income, gross * social_insurance_rate / 100.0)
}

fn business_net_income(gross: f64) -> NetIncome {
    if gross <= 0.0 {
        return NetIncome::default();
    }
    let business_income = (gross - BLUE_RETURN_DEDUCTION).max(0.0);
    let social_insurance =
        NATIONAL_PENSION_PREMIUM + business_income * NATIONAL_HEALTH_INSURANCE_RATE / 100.0;
    withhold(gross, business_income, social_insurance.min(gross))
}

/// Earnings-related pension from yearly insured wages before `until_year`.
///
/// Years worked before the start year are assumed to have earned the first
/// observed wage.
fn earnings_related_pension(
    insured_wage: impl Fn(i32) -> f64,
    start_year: i32,
    until_year: i32,
    prior_years: u32,
) -> f64 {
    let wages: Vec<f64> = (start_year..until_year)
        .map(insured_wage)
        .filter(|w| *w > 0.0)
        .collect();
    let first = wages.first().copied().unwrap_or(0.0);
    let career_total: f64 = wages.iter().sum::<f64>() + first * prior_years as f64;
    career_total * EARNINGS_RELATED_FACTOR
}

impl FormulaLibrary for StandardFormulas {
    fn net_income_from_gross_salary(&self, gross: f64, occupation: Occupation) -> NetIncome {
        let employee_rate =
            PENSION_INSURANCE_RATE + HEALTH_INSURANCE_RATE + EMPLOYMENT_INSURANCE_RATE;
        match occupation {
            Occupation::CompanyEmployee => salary_net_income(gross, employee_rate),
            Occupation::PartTime | Occupation::Homemaker => {
                if gross >= PART_TIME_INSURANCE_THRESHOLD {
                    salary_net_income(gross, employee_rate)
                } else {
                    salary_net_income(gross, 0.0)
                }
            }
            Occupation::SelfEmployed | Occupation::Freelancer => business_net_income(gross),
        }
    }

    fn net_income_for_director(
        &self,
        gross_salary: f64,
        has_social_insurance: bool,
    ) -> NetIncome {
        let rate = if has_social_insurance {
            PENSION_INSURANCE_RATE + HEALTH_INSURANCE_RATE
        } else {
            0.0
        };
        salary_net_income(gross_salary, rate)
    }

    fn employer_cost_for_salary(&self, gross_salary: f64, has_social_insurance: bool) -> f64 {
        if gross_salary <= 0.0 {
            return 0.0;
        }
        let surcharge = if has_social_insurance {
            EMPLOYER_SOCIAL_INSURANCE_RATE + CHILD_LEVY_RATE + LABOR_INSURANCE_RATE
        } else {
            LABOR_INSURANCE_RATE
        };
        gross_salary * (1.0 + surcharge / 100.0)
    }

    fn housing_expense_for_year(&self, housing: &Housing, year: i32, start_year: i32) -> f64 {
        match housing {
            Housing::Rent {
                monthly_rent,
                rent_increase_rate,
            } => {
                let elapsed = (year - start_year).max(0);
                monthly_rent * 12.0 * (1.0 + rent_increase_rate / 100.0).powi(elapsed)
            }
            Housing::Own {
                purchase_year,
                mortgage,
                maintenance_cost,
                property_tax,
                prior_monthly_rent,
            } => {
                if year < *purchase_year {
                    return prior_monthly_rent * 12.0;
                }
                let repayment = mortgage
                    .filter(|m| year >= m.start_year && year < m.start_year + m.term_years as i32)
                    .map(|m| {
                        equal_payment_monthly(m.amount, m.interest_rate, m.term_years * 12) * 12.0
                    })
                    .unwrap_or(0.0);
                repayment + maintenance_cost + property_tax
            }
        }
    }

    fn corporate_tax(
        &self,
        pretax_profit: f64,
        settings: &CorporateTaxSettings,
    ) -> CorporateTaxBreakdown {
        let resident_tax_equal = settings.resident_tax_equal;
        if pretax_profit <= 0.0 {
            return CorporateTaxBreakdown {
                pretax_profit,
                corporate_tax: 0.0,
                local_corporate_tax: 0.0,
                resident_tax_equal,
                resident_tax_proportional: 0.0,
                total_tax: resident_tax_equal,
                aftertax_profit: pretax_profit - resident_tax_equal,
                effective_tax_rate: 0.0,
            };
        }

        let reduced_part = pretax_profit.min(settings.reduced_rate_threshold);
        let standard_part = (pretax_profit - settings.reduced_rate_threshold).max(0.0);
        let corporate_tax = reduced_part * settings.reduced_rate / 100.0
            + standard_part * settings.standard_rate / 100.0;
        let local_corporate_tax = corporate_tax * settings.local_corporate_tax_rate / 100.0;
        let resident_tax_proportional = corporate_tax * settings.resident_tax_rate / 100.0;
        let total_tax =
            corporate_tax + local_corporate_tax + resident_tax_proportional + resident_tax_equal;

        CorporateTaxBreakdown {
            pretax_profit,
            corporate_tax,
            local_corporate_tax,
            resident_tax_equal,
            resident_tax_proportional,
            total_tax,
            aftertax_profit: pretax_profit - total_tax,
            effective_tax_rate: total_tax / pretax_profit * 100.0,
        }
    }

    fn pension_benefit_for_year(&self, info: &BasicInfo, income: &[IncomeItem], year: i32) -> f64 {
        if info.age_in(year) < info.pension_start_age as i32 {
            return 0.0;
        }

        let employee = info.occupation.is_employee();
        let insured_wage = |y: i32| -> f64 {
            income
                .iter()
                .filter(|item| {
                    if item.is_corporate_salary {
                        item.stored_social_insurance(y)
                    } else {
                        employee && item.bucket(Section::Personal) == IncomeRole::PrimaryWage
                    }
                })
                .map(|item| item.face_amount(y))
                .sum()
        };
        let prior_years = if employee {
            info.current_age.saturating_sub(CAREER_START_AGE)
        } else {
            0
        };

        BASIC_PENSION
            + earnings_related_pension(
                insured_wage,
                info.start_year,
                info.year_at_age(info.pension_start_age),
                prior_years,
            )
    }

    fn spouse_pension_benefit_for_year(
        &self,
        info: &BasicInfo,
        income: &[IncomeItem],
        year: i32,
    ) -> f64 {
        let (Some(spouse), Some(spouse_age)) = (info.spouse.as_ref(), info.spouse_age_in(year))
        else {
            return 0.0;
        };
        if spouse_age < spouse.pension_start_age as i32 {
            return 0.0;
        }
        if !spouse.occupation.is_employee() {
            return BASIC_PENSION;
        }

        let insured_wage = |y: i32| -> f64 {
            income
                .iter()
                .filter(|item| item.bucket(Section::Personal) == IncomeRole::SpouseWage)
                .map(|item| item.face_amount(y))
                .sum()
        };
        let until_year =
            info.start_year + spouse.pension_start_age as i32 - spouse.current_age as i32;

        BASIC_PENSION
            + earnings_related_pension(
                insured_wage,
                info.start_year,
                until_year,
                spouse.current_age.saturating_sub(CAREER_START_AGE),
            )
    }
}
