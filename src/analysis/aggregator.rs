//! Frequency aggregation.
//!
//! Builds one [`Distribution`] per tracked question from the loaded
//! [`Table`], counting missing cells under a sentinel label.

use crate::config::{QuestionsConfig, ReportConfig};
use crate::models::{Distribution, Question, Summary, Table};
use tracing::{debug, info};

/// Rules for turning a cell into the label it is counted under.
#[derive(Debug, Clone)]
pub struct CellRules<'a> {
    /// Label for missing cells.
    pub sentinel: &'a str,
    /// Values treated as missing besides empty cells.
    pub missing_markers: &'a [String],
}

impl<'a> From<&'a ReportConfig> for CellRules<'a> {
    fn from(config: &'a ReportConfig) -> Self {
        Self {
            sentinel: &config.sentinel,
            missing_markers: &config.missing_markers,
        }
    }
}

impl<'a> CellRules<'a> {
    /// Only empty or absent cells are missing.
    #[cfg(test)]
    pub fn with_sentinel(sentinel: &'a str) -> Self {
        Self {
            sentinel,
            missing_markers: &[],
        }
    }

    /// Label a cell is counted under.
    pub fn label<'c>(&self, cell: Option<&'c str>) -> &'c str
    where
        'a: 'c,
    {
        match cell {
            None => self.sentinel,
            Some("") => self.sentinel,
            Some(value) if self.missing_markers.iter().any(|m| m == value) => self.sentinel,
            Some(value) => value,
        }
    }
}

/// Count the labels of column `column`.
///
/// Returns `None` when the table has no such column.
pub fn distribution(table: &Table, column: &str, rules: &CellRules<'_>) -> Option<Distribution> {
    let cells = table.column(column)?;
    Some(cells.map(|cell| rules.label(cell)).collect())
}

/// Build the distributions of every tracked question.
pub fn summarize(table: &Table, questions: &QuestionsConfig, rules: &CellRules<'_>) -> Summary {
    let mut summary = Summary::default();

    for question in Question::ALL {
        let column = questions.column(question);
        let dist = distribution(table, column, rules);

        match &dist {
            Some(d) => info!(
                "{}: {} distinct answers over {} rows",
                question,
                d.len(),
                d.total()
            ),
            None => debug!("{}: column {:?} not present, skipping", question, column),
        }

        summary.insert(question, dist);
    }

    summary
}
