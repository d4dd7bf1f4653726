//! Loan amortization
//!
//! Schedules are recomputed on every pass from the liability's terms; they are
//! never stored on the liability. Both repayment methods are simulated month
//! by month so that the closing balance of each year is available for the
//! liability totals.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthesisError};
use crate::model::{ItemId, LiabilityItem, RepaymentType, Section, YearMap};

/// Fixed monthly payment of an annuity loan.
///
/// `annual_rate` is a percentage. A zero rate splits the principal evenly.
pub fn equal_payment_monthly(principal: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let n = months as f64;
    let r = annual_rate / 12.0 / 100.0;
    if r == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// The four fields that fully determine a schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate: f64,
    pub term_years: u32,
    pub start_year: i32,
    pub repayment_type: RepaymentType,
}

impl LoanTerms {
    /// Terms of an auto-calculated liability, `None` when any field is missing
    pub fn of(liability: &LiabilityItem) -> Option<Self> {
        if !liability.auto_calculate {
            return None;
        }
        Some(Self {
            principal: liability.original_amount?,
            annual_rate: liability.interest_rate.unwrap_or(0.0),
            term_years: liability.term_years?,
            start_year: liability.start_year?,
            repayment_type: liability.repayment_type,
        })
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + self.term_years as i32
    }

    /// Year-by-year schedule over the whole term
    pub fn schedule(&self) -> LoanSchedule {
        let months = self.term_years * 12;
        let monthly_rate = self.annual_rate / 12.0 / 100.0;
        let mut balance = self.principal;
        let mut years = BTreeMap::new();

        match self.repayment_type {
            RepaymentType::EqualPayment => {
                let payment = equal_payment_monthly(self.principal, self.annual_rate, months);
                for k in 0..self.term_years {
                    let mut interest = 0.0;
                    let mut principal = 0.0;
                    for _ in 0..12 {
                        let month_interest = balance * monthly_rate;
                        let month_principal = (payment - month_interest).min(balance);
                        interest += month_interest;
                        principal += month_principal;
                        balance = (balance - month_principal).max(0.0);
                    }
                    years.insert(
                        self.start_year + k as i32,
                        LoanYear {
                            repayment: payment * 12.0,
                            interest,
                            principal,
                            closing_balance: balance,
                        },
                    );
                }
            }
            RepaymentType::EqualPrincipal => {
                let monthly_principal = self.principal / months as f64;
                for k in 0..self.term_years {
                    let mut interest = 0.0;
                    let mut principal = 0.0;
                    for _ in 0..12 {
                        interest += balance * monthly_rate;
                        principal += monthly_principal;
                        balance = (balance - monthly_principal).max(0.0);
                    }
                    years.insert(
                        self.start_year + k as i32,
                        LoanYear {
                            repayment: interest + principal,
                            interest,
                            principal,
                            closing_balance: balance,
                        },
                    );
                }
            }
        }

        LoanSchedule { years }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanYear {
    pub repayment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Outstanding principal after the year's last payment
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub years: BTreeMap<i32, LoanYear>,
}

impl LoanSchedule {
    pub fn repayment(&self, year: i32) -> f64 {
        self.years.get(&year).map(|y| y.repayment).unwrap_or(0.0)
    }

    /// Outstanding balance at the end of `year`; 0 before the loan starts and
    /// once it is repaid
    pub fn outstanding(&self, year: i32) -> f64 {
        self.years
            .get(&year)
            .map(|y| y.closing_balance)
            .unwrap_or(0.0)
    }
}

/// Repayment totals per book and year, plus every schedule by book and
/// liability id
#[derive(Debug, Clone, Default)]
pub struct RepaymentPlan {
    pub personal: YearMap,
    pub corporate: YearMap,
    pub schedules: FxHashMap<(Section, ItemId), LoanSchedule>,
}

impl RepaymentPlan {
    /// Schedule every auto-calculated liability of both books.
    ///
    /// Only years inside `horizon` are totalled. Liabilities covered by the
    /// housing expense get a schedule (for their outstanding balance) but do
    /// not contribute repayments.
    pub fn build(
        personal: &[LiabilityItem],
        corporate: &[LiabilityItem],
        horizon: RangeInclusive<i32>,
    ) -> Result<Self> {
        let mut plan = Self::default();
        for (section, liabilities) in [
            (Section::Personal, personal),
            (Section::Corporate, corporate),
        ] {
            for liability in liabilities {
                let Some(terms) = LoanTerms::of(liability) else {
                    continue;
                };
                check_terms(section, liability, &terms)?;

                let schedule = terms.schedule();
                if !liability.covered_by_housing_expense {
                    let totals = match section {
                        Section::Personal => &mut plan.personal,
                        Section::Corporate => &mut plan.corporate,
                    };
                    for (year, entry) in schedule.years.range(horizon.clone()) {
                        *totals.entry(*year).or_insert(0.0) += entry.repayment;
                    }
                }
                plan.schedules
                    .insert((section, liability.id.clone()), schedule);
            }
        }
        Ok(plan)
    }

    pub fn repayment(&self, section: Section, year: i32) -> f64 {
        let totals = match section {
            Section::Personal => &self.personal,
            Section::Corporate => &self.corporate,
        };
        totals.get(&year).copied().unwrap_or(0.0)
    }

    pub fn schedule(&self, section: Section, liability_id: &ItemId) -> Option<&LoanSchedule> {
        self.schedules.get(&(section, liability_id.clone()))
    }
}

fn check_terms(section: Section, liability: &LiabilityItem, terms: &LoanTerms) -> Result<()> {
    let reason = if terms.term_years == 0 {
        "term must be at least one year"
    } else if terms.principal.is_nan() || terms.principal < 0.0 {
        "original amount must be non-negative"
    } else if !terms.annual_rate.is_finite() || terms.annual_rate < 0.0 {
        "interest rate must be non-negative"
    } else {
        return Ok(());
    };
    Err(SynthesisError::InvalidLoan {
        section,
        liability_id: liability.id.clone(),
        reason,
    })
}
