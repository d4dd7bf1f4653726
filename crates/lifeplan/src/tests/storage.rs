//! Scenario documents on disk

use std::fs;

use lifeplan_core::config::{AssetBuilder, IncomeBuilder, ScenarioBuilder};
use lifeplan_core::{Scenario, StandardFormulas, synthesize};
use tempfile::TempDir;

use crate::data::storage::{
    DocumentFormat, StorageError, export_table, load_scenario, save_scenario, scenario_from_str,
};

fn scenario() -> Scenario {
    ScenarioBuilder::new(2025, 40, 45)
        .personal_income(IncomeBuilder::wage("Salary").growing(400.0, 2.0))
        .personal_asset(AssetBuilder::investment("Fund", 100.0).returning(3.0))
        .build()
}

/// JSON and YAML documents load back to the same scenario
#[test]
fn test_save_and_load_both_formats() {
    let dir = TempDir::new().unwrap();
    let original = scenario();

    for name in ["plan.json", "plan.yaml"] {
        let path = dir.path().join(name);
        save_scenario(&path, &original).unwrap();
        let loaded = load_scenario(&path).unwrap();
        assert_eq!(loaded, original, "{name}");
    }
}

/// Loading a document written by hand fills defaults and normalizes it
#[test]
fn test_hand_written_document() {
    let yaml = r#"
basicInfo:
  startYear: 2025
  currentAge: 40
  deathAge: 42
personal:
  liabilities:
    - id: old
      name: loan
      type: loan
      amounts:
        2025: 900
"#;
    let scenario = scenario_from_str(yaml, DocumentFormat::Yaml).unwrap();
    assert!(scenario.personal.liabilities[0].covered_by_housing_expense);
    let table = synthesize(&scenario, &StandardFormulas).unwrap().table;
    assert_eq!(table.len(), 3);
    assert_eq!(table.records[0].personal.liability_total, 900.0);
}

/// The scenario file holds no computed table
#[test]
fn test_table_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.json");
    save_scenario(&path, &scenario()).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("basicInfo"));
    assert!(!content.contains("totalAssets"));
}

/// Exported tables are plain JSON arrays of records
#[test]
fn test_export_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("table.json");
    let table = synthesize(&scenario(), &StandardFormulas).unwrap().table;
    export_table(&path, &table).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["records"].as_array().unwrap().len(), 6);
    assert_eq!(value["records"][0]["year"], 2025);
}

/// A document missing required fields is a parse error
#[test]
fn test_incomplete_document() {
    let err = scenario_from_str(r#"{"personal": {}}"#, DocumentFormat::Json).unwrap_err();
    assert!(matches!(err, StorageError::Parse(_)));
}
