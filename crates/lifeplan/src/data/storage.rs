//! Scenario documents on disk
//!
//! One scenario per file. The format follows the extension: `.yaml` / `.yml`
//! through serde-saphyr, anything else as JSON. Only the scenario is stored;
//! cash-flow tables are recomputed on load and only ever exported.

use std::fs;
use std::path::{Path, PathBuf};

use lifeplan_core::{CashFlowTable, Scenario};

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {}", msg),
            StorageError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a scenario document and upgrade legacy conventions
pub fn scenario_from_str(content: &str, format: DocumentFormat) -> Result<Scenario, StorageError> {
    let scenario: Scenario = match format {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse JSON: {}", e)))?,
        DocumentFormat::Yaml => serde_saphyr::from_str(content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse YAML: {}", e)))?,
    };
    Ok(scenario.normalized())
}

pub fn scenario_to_string(scenario: &Scenario, format: DocumentFormat) -> Result<String, StorageError> {
    match format {
        DocumentFormat::Json => serde_json::to_string_pretty(scenario)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize scenario: {}", e))),
        DocumentFormat::Yaml => serde_saphyr::to_string(scenario)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize scenario: {}", e))),
    }
}

/// Load a scenario, choosing the format from the extension
pub fn load_scenario(path: &Path) -> Result<Scenario, StorageError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let scenario = scenario_from_str(&content, DocumentFormat::from_path(path))?;
    tracing::debug!(path = %path.display(), "Loaded scenario");
    Ok(scenario)
}

/// Save a scenario, creating parent directories as needed
pub fn save_scenario(path: &Path, scenario: &Scenario) -> Result<(), StorageError> {
    let content = scenario_to_string(scenario, DocumentFormat::from_path(path))?;
    write_file(path, &content)?;
    tracing::debug!(path = %path.display(), "Saved scenario");
    Ok(())
}

/// Write a computed table as JSON for other tools
pub fn export_table(path: &Path, table: &CashFlowTable) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(table)
        .map_err(|e| StorageError::Serialize(format!("Failed to serialize table: {}", e)))?;
    write_file(path, &json)
}

fn write_file(path: &Path, content: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::Io(format!("Failed to create directory: {}", e)))?;
    }
    fs::write(path, content)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Get the default data directory path (~/.lifeplan/)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lifeplan")
}
