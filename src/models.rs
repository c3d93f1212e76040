//! Data models for the survey report.
//!
//! This module contains the core data structures used throughout
//! the application: the tracked questions, the loaded table, and the
//! frequency distributions built from it.

use std::collections::HashMap;
use std::fmt;

/// Survey question tracked by the report.
///
/// Variants are declared in report order; `Question::ALL` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Question {
    /// Age bracket of the respondent.
    Age,
    /// Whether the respondent currently tracks their expenses.
    Control,
    /// Monthly price the respondent considers fair.
    PayRange,
    /// Ticket type the respondent receives most often.
    Ticket,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Presentation details for a question that gets a bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    /// File name of the PNG inside the figures directory.
    pub file_name: &'static str,
    /// Chart title.
    pub title: &'static str,
    /// X axis description.
    pub x_desc: &'static str,
    /// Y axis description.
    pub y_desc: &'static str,
}

impl Question {
    /// All tracked questions, in report order.
    pub const ALL: [Question; 4] = [
        Question::Age,
        Question::Control,
        Question::PayRange,
        Question::Ticket,
    ];

    /// Short stable key of the question.
    pub fn key(&self) -> &'static str {
        match self {
            Question::Age => "age",
            Question::Control => "control",
            Question::PayRange => "payrange",
            Question::Ticket => "ticket",
        }
    }

    /// Heading of the question's section in the LaTeX document.
    pub fn section_title(&self) -> &'static str {
        match self {
            Question::Age => "Summary: Age range",
            Question::Control => "Summary: Do you track your expenses?",
            Question::PayRange => "Summary: Acceptable price range",
            Question::Ticket => "Summary: Most frequent ticket types",
        }
    }

    /// Header of the label column in the question's table.
    pub fn label_header(&self) -> &'static str {
        match self {
            Question::Age => "Age range",
            Question::Control => "Answer",
            Question::PayRange => "Range",
            Question::Ticket => "Ticket type",
        }
    }

    /// Chart details, for the questions that are charted.
    pub fn chart(&self) -> Option<ChartSpec> {
        match self {
            Question::Age => Some(ChartSpec {
                file_name: "age_distribution.png",
                title: "Distribution by age range",
                x_desc: "Age range",
                y_desc: FREQUENCY_HEADER,
            }),
            Question::PayRange => Some(ChartSpec {
                file_name: "payrange_distribution.png",
                title: "Price range considered fair",
                x_desc: "Price range (MXN)",
                y_desc: FREQUENCY_HEADER,
            }),
            Question::Control | Question::Ticket => None,
        }
    }
}

/// Header of the count column in every frequency table.
pub const FREQUENCY_HEADER: &str = "Frequency";

/// Label that missing cells are counted under.
pub const NOT_SPECIFIED: &str = "Not specified";

/// A parsed survey export.
///
/// Rows hold one optional cell per header; `None` marks a cell the row
/// did not provide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table, trimming surrounding whitespace from every header.
    ///
    /// Short rows are padded with absent cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Trimmed column headers, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column whose header is exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate over the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[index].as_deref()))
    }
}

/// Frequency counts for one question.
///
/// Labels keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Distribution {
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`.
    pub fn record(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    /// Count for `label`, if it was seen.
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<usize> {
        self.index.get(label).map(|&position| self.entries[position].1)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Entries sorted by label (plain string order).
    pub fn sorted_by_label(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl<'a> FromIterator<&'a str> for Distribution {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut dist = Distribution::new();
        for label in iter {
            dist.record(label);
        }
        dist
    }
}

/// Distributions for every tracked question.
///
/// `None` means the question's column was not in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    distributions: HashMap<Question, Option<Distribution>>,
}

impl Summary {
    /// Record the outcome for one question.
    pub fn insert(&mut self, question: Question, distribution: Option<Distribution>) {
        self.distributions.insert(question, distribution);
    }

    /// Distribution for `question`, if its column was present.
    pub fn get(&self, question: Question) -> Option<&Distribution> {
        self.distributions.get(&question).and_then(Option::as_ref)
    }

    /// Available distributions, in report order.
    pub fn available(&self) -> impl Iterator<Item = (Question, &Distribution)> {
        Question::ALL
            .into_iter()
            .filter_map(move |q| self.get(q).map(|dist| (q, dist)))
    }
}
