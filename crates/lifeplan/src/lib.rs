//! Life-plan application layer
//!
//! Wraps the `lifeplan_core` engine with what an interactive front end needs:
//! - A single mutable scenario that resynthesizes on every edit
//! - Scenario documents in JSON or YAML
//! - File logging with size-based rotation
//! - Plain-text rendering of tables and validation issues

pub mod data;
pub mod logging;
pub mod session;
pub mod util;

#[cfg(test)]
mod tests;

pub use data::storage::{StorageError, default_data_dir, load_scenario, save_scenario};
pub use logging::init_logging;
pub use session::ScenarioSession;
