//! Progressive bracket arithmetic shared by the withholding and corporate
//! tax formulas

use serde::{Deserialize, Serialize};

/// Marginal `rate` (%) applying to income above `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

impl TaxBracket {
    pub const fn new(threshold: f64, rate: f64) -> Self {
        Self { threshold, rate }
    }
}

/// National income tax brackets (10,000 yen units)
pub const INCOME_TAX_BRACKETS: [TaxBracket; 7] = [
    TaxBracket::new(0.0, 5.0),
    TaxBracket::new(195.0, 10.0),
    TaxBracket::new(330.0, 20.0),
    TaxBracket::new(695.0, 23.0),
    TaxBracket::new(900.0, 33.0),
    TaxBracket::new(1800.0, 40.0),
    TaxBracket::new(4000.0, 45.0),
];

/// Tax owed on `income` under progressive brackets sorted by threshold
pub fn progressive_tax(income: f64, brackets: &[TaxBracket]) -> f64 {
    if income <= 0.0 || brackets.is_empty() {
        return 0.0;
    }

    let mut tax = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if income <= bracket.threshold {
            break;
        }
        let next_threshold = brackets
            .get(i + 1)
            .map(|b| b.threshold)
            .unwrap_or(f64::INFINITY);
        let taxable_in_bracket = income.min(next_threshold) - bracket.threshold;
        tax += taxable_in_bracket * bracket.rate / 100.0;
    }

    tax
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_bracket_only() {
        let tax = progressive_tax(100.0, &INCOME_TAX_BRACKETS);
        assert!((tax - 5.0).abs() < 1e-9, "Expected 5, got {tax}");
    }

    #[test]
    fn test_spans_three_brackets() {
        // 195 at 5% + 135 at 10% + 70 at 20%
        let tax = progressive_tax(400.0, &INCOME_TAX_BRACKETS);
        let expected = 9.75 + 13.5 + 14.0;
        assert!((tax - expected).abs() < 1e-9, "Expected {expected}, got {tax}");
    }

    #[test]
    fn test_non_positive_income_is_untaxed() {
        assert_eq!(progressive_tax(0.0, &INCOME_TAX_BRACKETS), 0.0);
        assert_eq!(progressive_tax(-50.0, &INCOME_TAX_BRACKETS), 0.0);
        assert_eq!(progressive_tax(100.0, &[]), 0.0);
    }
}
