//! The subject's household profile
//!
//! `BasicInfo` fixes the simulated horizon and carries the facts the formula
//! library and the default seeding need (occupation, spouse, housing, children).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    #[default]
    CompanyEmployee,
    PartTime,
    SelfEmployed,
    Freelancer,
    Homemaker,
}

impl Occupation {
    /// Covered by employee pension and employer health insurance
    pub fn is_employee(self) -> bool {
        matches!(self, Occupation::CompanyEmployee | Occupation::PartTime)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Planning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpouseInfo {
    pub current_age: u32,
    #[serde(default)]
    pub occupation: Occupation,
    /// Annual face income
    #[serde(default)]
    pub annual_income: f64,
    /// Subject's age at marriage when the marriage is still planned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_age: Option<u32>,
    /// Extra yearly living cost once married, in start-year prices
    #[serde(default)]
    pub additional_living_expense: f64,
    #[serde(default = "default_pension_start_age")]
    pub pension_start_age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mortgage {
    pub amount: f64,
    /// Annual interest rate (%)
    pub interest_rate: f64,
    pub term_years: u32,
    pub start_year: i32,
}

/// Housing arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Housing {
    Rent {
        monthly_rent: f64,
        /// Yearly rent escalation (%)
        #[serde(default)]
        rent_increase_rate: f64,
    },
    Own {
        purchase_year: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mortgage: Option<Mortgage>,
        /// Yearly maintenance and repair reserve
        #[serde(default)]
        maintenance_cost: f64,
        /// Yearly fixed-asset tax
        #[serde(default)]
        property_tax: f64,
        /// Monthly rent paid until the purchase year
        #[serde(default)]
        prior_monthly_rent: f64,
    },
}

impl Default for Housing {
    fn default() -> Self {
        Housing::Rent {
            monthly_rent: 0.0,
            rent_increase_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolType {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPlan {
    #[serde(default)]
    pub kindergarten: SchoolType,
    #[serde(default)]
    pub elementary: SchoolType,
    #[serde(default)]
    pub junior_high: SchoolType,
    #[serde(default)]
    pub high_school: SchoolType,
    /// `None` when the child does not go to university
    #[serde(default)]
    pub university: Option<SchoolType>,
}

impl Default for EducationPlan {
    fn default() -> Self {
        Self {
            kindergarten: SchoolType::Public,
            elementary: SchoolType::Public,
            junior_high: SchoolType::Public,
            high_school: SchoolType::Public,
            university: Some(SchoolType::Public),
        }
    }
}

/// A child, already born or planned (birth year after the start year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub birth_year: i32,
    #[serde(default)]
    pub education: EducationPlan,
}

fn default_current_age() -> u32 {
    30
}

fn default_death_age() -> u32 {
    90
}

fn default_pension_start_age() -> u32 {
    65
}

fn default_retirement_age() -> u32 {
    65
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    #[serde(default = "default_current_age")]
    pub current_age: u32,
    pub start_year: i32,
    #[serde(default = "default_death_age")]
    pub death_age: u32,
    #[serde(default)]
    pub occupation: Occupation,
    #[serde(default)]
    pub marital_status: MaritalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<SpouseInfo>,
    #[serde(default)]
    pub housing: Housing,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Child>,
    #[serde(default = "default_pension_start_age")]
    pub pension_start_age: u32,

    // Inputs used to seed a default scenario
    /// Annual face wage in the start year
    #[serde(default)]
    pub annual_income: f64,
    /// Yearly wage raise (%)
    #[serde(default)]
    pub income_raise_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_annual_income: Option<f64>,
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,
    #[serde(default)]
    pub monthly_living_expense: f64,
    #[serde(default)]
    pub savings: f64,
}

impl BasicInfo {
    pub fn new(start_year: i32, current_age: u32, death_age: u32) -> Self {
        Self {
            current_age,
            start_year,
            death_age,
            occupation: Occupation::default(),
            marital_status: MaritalStatus::default(),
            spouse: None,
            housing: Housing::default(),
            children: Vec::new(),
            pension_start_age: default_pension_start_age(),
            annual_income: 0.0,
            income_raise_rate: 0.0,
            max_annual_income: None,
            retirement_age: default_retirement_age(),
            monthly_living_expense: 0.0,
            savings: 0.0,
        }
    }

    /// Last simulated year (inclusive)
    pub fn end_year(&self) -> i32 {
        self.start_year + self.death_age as i32 - self.current_age as i32
    }

    /// Simulated years, start and end inclusive
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year()
    }

    pub fn age_in(&self, year: i32) -> i32 {
        self.current_age as i32 + (year - self.start_year)
    }

    /// Calendar year in which the subject reaches `age`
    pub fn year_at_age(&self, age: u32) -> i32 {
        self.start_year + age as i32 - self.current_age as i32
    }

    /// First year the spouse living supplement applies, if any
    pub fn marriage_year(&self) -> Option<i32> {
        match self.marital_status {
            MaritalStatus::Single => None,
            MaritalStatus::Married => Some(self.start_year),
            MaritalStatus::Planning => Some(
                self.spouse
                    .as_ref()
                    .and_then(|s| s.marriage_age)
                    .map(|age| self.year_at_age(age))
                    .unwrap_or(self.start_year),
            ),
        }
    }

    pub fn spouse_age_in(&self, year: i32) -> Option<i32> {
        self.spouse
            .as_ref()
            .map(|s| s.current_age as i32 + (year - self.start_year))
    }
}
