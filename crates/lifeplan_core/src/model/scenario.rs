//! The scenario snapshot: everything synthesis reads
//!
//! A scenario is one persisted document. Optional fields absent from older
//! documents fall back to their defaults when deserialized; `normalize`
//! upgrades legacy conventions that used display names as markers.

use serde::{Deserialize, Serialize};

use super::ids::ItemId;
use super::items::{
    AssetItem, ExpenseItem, IncomeItem, LiabilityItem, LiabilityKind, LifeEvent, Section,
};
use super::parameters::Parameters;
use super::profile::BasicInfo;

/// Display name older documents used for the housing mortgage
pub const LEGACY_HOUSING_LOAN_NAME: &str = "loan";

/// The four collections of one book (personal or corporate)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub income: Vec<IncomeItem>,
    pub expense: Vec<ExpenseItem>,
    pub assets: Vec<AssetItem>,
    pub liabilities: Vec<LiabilityItem>,
}

impl Book {
    pub fn income_item(&self, id: &ItemId) -> Option<&IncomeItem> {
        self.income.iter().find(|i| &i.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub personal: Book,
    #[serde(default)]
    pub corporate: Book,
    #[serde(default)]
    pub life_events: Vec<LifeEvent>,
}

impl Scenario {
    /// Empty scenario for the given profile
    pub fn new(basic_info: BasicInfo) -> Self {
        Self {
            basic_info,
            parameters: Parameters::default(),
            personal: Book::default(),
            corporate: Book::default(),
            life_events: Vec::new(),
        }
    }

    pub fn book(&self, section: Section) -> &Book {
        match section {
            Section::Personal => &self.personal,
            Section::Corporate => &self.corporate,
        }
    }

    pub fn book_mut(&mut self, section: Section) -> &mut Book {
        match section {
            Section::Personal => &mut self.personal,
            Section::Corporate => &mut self.corporate,
        }
    }

    /// Upgrade legacy name-based markers to explicit flags.
    ///
    /// A personal liability named `"loan"` that is not auto-calculated is the
    /// housing mortgage already paid through the housing expense.
    pub fn normalize(&mut self) {
        for liability in &mut self.personal.liabilities {
            if !liability.auto_calculate
                && liability.kind == LiabilityKind::Loan
                && liability.name == LEGACY_HOUSING_LOAN_NAME
            {
                liability.covered_by_housing_expense = true;
            }
        }
    }

    /// Builder-style variant of [`Scenario::normalize`]
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}
