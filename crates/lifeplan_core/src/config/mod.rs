//! Scenario construction
//!
//! `seed_scenario` derives the default items of a new scenario from its
//! profile. The builder DSL assembles scenarios item by item:
//!
//! ```ignore
//! use lifeplan_core::config::{AssetBuilder, ExpenseBuilder, IncomeBuilder, ScenarioBuilder};
//!
//! let scenario = ScenarioBuilder::new(2025, 30, 90)
//!     .personal_income(IncomeBuilder::wage("Salary").constant(400.0))
//!     .personal_expense(ExpenseBuilder::living("Living").constant(100.0))
//!     .personal_asset(AssetBuilder::investment("Fund", 200.0).returning(4.0))
//!     .build();
//! ```

pub mod autofill;
pub mod builder;
pub mod item_builder;
pub mod seed;

pub use autofill::{autofill_amounts, constant_amounts};
pub use builder::ScenarioBuilder;
pub use item_builder::{AssetBuilder, ExpenseBuilder, IncomeBuilder, LiabilityBuilder};
pub use seed::{education_cost, seed_scenario};
