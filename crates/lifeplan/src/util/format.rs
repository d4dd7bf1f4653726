use lifeplan_core::error::Severity;
use lifeplan_core::{CashFlowRecord, CashFlowTable, ValidationIssue};

/// Format an amount (10,000 yen units) with thousands separators and one
/// decimal
pub fn format_amount(value: f64) -> String {
    let tenths = (value.abs() * 10.0).round() as i64;
    let whole = tenths / 10;
    let fraction = tenths % 10;

    let whole_str = whole.to_string();
    let mut result = String::new();
    for (i, c) in whole_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let whole_formatted: String = result.chars().rev().collect();

    if value < 0.0 && tenths != 0 {
        format!("-{}.{}", whole_formatted, fraction)
    } else {
        format!("{}.{}", whole_formatted, fraction)
    }
}

/// Format a percentage value already expressed in percent
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

type Column = (&'static str, fn(&CashFlowRecord) -> f64);

const COLUMNS: [Column; 10] = [
    ("Income", |r| r.personal.total_income),
    ("Expense", |r| r.personal.total_expense),
    ("Balance", |r| r.personal.balance),
    ("Assets", |r| r.personal.total_assets),
    ("Net", |r| r.personal.net_assets),
    ("Corp income", |r| r.corporate.total_income),
    ("Corp expense", |r| r.corporate.total_expense),
    ("Corp tax", |r| r.corporate.tax.total_tax),
    ("Corp balance", |r| r.corporate.balance),
    ("Corp net", |r| r.corporate.net_assets),
];

/// Render the records between `from` and `to` (inclusive) as a text table
pub fn render_table(table: &CashFlowTable, from: Option<i32>, to: Option<i32>) -> String {
    let records: Vec<&CashFlowRecord> = table
        .records
        .iter()
        .filter(|r| from.is_none_or(|from| r.year >= from) && to.is_none_or(|to| r.year <= to))
        .collect();

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|r| COLUMNS.iter().map(|(_, value)| format_amount(value(r))).collect())
        .collect();
    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, (title, _))| {
            cells
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(title.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = format!("{:>4} {:>3}", "Year", "Age");
    for ((title, _), width) in COLUMNS.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", title, width = width));
    }
    out.push('\n');

    for (record, row) in records.iter().zip(&cells) {
        out.push_str(&format!("{:>4} {:>3}", record.year, record.age));
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", cell, width = width));
        }
        out.push('\n');
    }
    out
}

/// One line per issue, errors first
pub fn render_issues(issues: &[ValidationIssue]) -> String {
    let mut sorted: Vec<&ValidationIssue> = issues.iter().collect();
    sorted.sort_by_key(|issue| issue.severity != Severity::Error);

    let mut out = String::new();
    for issue in sorted {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let location = match (&issue.section, &issue.item_id) {
            (Some(section), Some(id)) => format!(" [{section:?}/{id}]"),
            (Some(section), None) => format!(" [{section:?}]"),
            _ => String::new(),
        };
        out.push_str(&format!("{label}{location}: {}\n", issue.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.0");
        assert_eq!(format_amount(1234.56), "1,234.6");
        assert_eq!(format_amount(-98765.4), "-98,765.4");
        assert_eq!(format_amount(1_000_000.0), "1,000,000.0");
        assert_eq!(format_amount(-0.01), "0.0");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(23.2), "23.2%");
    }

    #[test]
    fn test_render_issues_puts_errors_first() {
        let issues = vec![
            ValidationIssue {
                severity: Severity::Warning,
                section: None,
                item_id: None,
                message: "later".to_string(),
            },
            ValidationIssue {
                severity: Severity::Error,
                section: Some(lifeplan_core::Section::Corporate),
                item_id: Some("car".into()),
                message: "first".to_string(),
            },
        ];
        let rendered = render_issues(&issues);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, ["error [Corporate/car]: first", "warning: later"]);
    }
}
