//! Household and corporate cash-flow projection engine
//!
//! This crate projects a year-by-year cash-flow table for a person and their
//! company from the current age to an assumed death age. It supports:
//! - Personal and corporate books of income, expense, asset and liability items
//! - Corporate salaries mirrored as employer-cost expenses, with automatic
//!   social-insurance switching for part-time salaries
//! - Loan amortization (equal payment and equal principal)
//! - Corporate costs proportional to revenue with an escalating ratio
//! - Compounding investments and income-linked sinking funds
//! - Corporate tax through a pluggable formula library
//!
//! The engine is pure: [`synthesize`] reads a [`Scenario`] snapshot and
//! returns the table plus everything it derived, leaving the scenario as is.
//!
//! # Builder DSL
//!
//! ```ignore
//! use lifeplan_core::{StandardFormulas, synthesize};
//! use lifeplan_core::config::{ExpenseBuilder, IncomeBuilder, ScenarioBuilder};
//!
//! let scenario = ScenarioBuilder::new(2025, 30, 90)
//!     .personal_income(IncomeBuilder::wage("Salary").growing(400.0, 2.0))
//!     .personal_expense(ExpenseBuilder::living("Living").constant(200.0))
//!     .build();
//! let projection = synthesize(&scenario, &StandardFormulas)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod assets;
pub mod cost;
pub mod error;
pub mod formulas;
pub mod loans;
pub mod salary_link;
pub mod synthesis;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ScenarioBuilder, seed_scenario};
pub use error::{SynthesisError, ValidationIssue};
pub use formulas::{FormulaLibrary, StandardFormulas};
pub use model::{CashFlowRecord, CashFlowTable, Scenario, Section};
pub use synthesis::{DerivedView, Projection, synthesize};
pub use validation::validate;
