use std::fmt;

use crate::model::{ItemId, Section};

/// Errors that abort a synthesis pass.
///
/// Dangling references between items are not errors: they contribute zero.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// Death age before the current age leaves no year to simulate
    InvalidHorizon { current_age: u32, death_age: u32 },
    /// Auto-calculated loan whose terms cannot produce a schedule
    InvalidLoan {
        section: Section,
        liability_id: ItemId,
        reason: &'static str,
    },
    /// A computed amount was NaN or infinite
    NonFinite { field: &'static str, year: i32 },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::InvalidHorizon {
                current_age,
                death_age,
            } => write!(
                f,
                "death age {death_age} is before current age {current_age}"
            ),
            SynthesisError::InvalidLoan {
                section,
                liability_id,
                reason,
            } => write!(f, "{section:?} liability {liability_id}: {reason}"),
            SynthesisError::NonFinite { field, year } => {
                write!(f, "{field} is not a finite number in {year}")
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

pub type Result<T> = std::result::Result<T, SynthesisError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Synthesis will fail
    Error,
    /// Synthesis runs but the item contributes nothing
    Warning,
}

/// A problem found by [`crate::validation::validate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub section: Option<Section>,
    pub item_id: Option<ItemId>,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match (&self.section, &self.item_id) {
            (Some(section), Some(id)) => write!(f, "{level}: {section:?} {id}: {}", self.message),
            _ => write!(f, "{level}: {}", self.message),
        }
    }
}
