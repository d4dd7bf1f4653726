//! Integration tests for the lifeplan synthesis engine
//!
//! Tests are organized by topic:
//! - `basic` - Horizon, determinism and the simple end-to-end scenario
//! - `corporate` - Corporate tax, salary linkage and revenue-proportional cost
//! - `investments` - Asset growth, income-linked funds and asset totals
//! - `loans` - Repayments, outstanding balances and the housing mortgage
//! - `builder_dsl` - Seeding and the builder DSL feeding synthesis

mod basic;
mod builder_dsl;
mod loans;
