//! LaTeX report generation.
//!
//! This module turns the frequency summary into a LaTeX fragment with one
//! `tabular` section per available question.

use crate::models::{Distribution, Question, Summary, FREQUENCY_HEADER};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Generate the complete LaTeX document.
///
/// Questions without a distribution are left out. Labels are written
/// verbatim unless `escape_markup` is set.
pub fn generate_latex_report(summary: &Summary, escape_markup: bool) -> String {
    let mut output = String::new();

    output.push_str(&generate_header());

    for (question, dist) in summary.available() {
        output.push_str(&generate_section(question, dist, escape_markup));
    }

    output
}

fn generate_header() -> String {
    format!(
        "% Summary tables generated automatically by {} v{}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate the section for one question.
fn generate_section(question: Question, dist: &Distribution, escape_markup: bool) -> String {
    let mut section = String::new();

    section.push_str(&format!("\\section{{{}}}\n", question.section_title()));
    section.push_str("\\begin{center}\\begin{tabular}{lr}\\toprule\n");
    section.push_str(&format!(
        "{} & {} \\\\ \\midrule\n",
        question.label_header(),
        FREQUENCY_HEADER
    ));

    for (label, count) in dist.iter() {
        let label = if escape_markup {
            escape_latex(label)
        } else {
            label.to_string()
        };
        section.push_str(&format!("{} & {} \\\\\n", label, count));
    }

    section.push_str("\\bottomrule\\end{tabular}\\end{center}\n");

    section
}

/// Escape the characters LaTeX reserves in text mode.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Write the LaTeX document to `path`, replacing any previous file.
///
/// The parent directory is created if needed.
pub fn write_latex_report(summary: &Summary, path: &Path, escape_markup: bool) -> Result<()> {
    let content = generate_latex_report(summary, escape_markup);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    debug!("Wrote {} bytes", content.len());
    info!("LaTeX tables written to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_summary() -> Summary {
        let mut summary = Summary::default();
        summary.insert(
            Question::Age,
            Some(["18-24", "25-34", "18-24", "Not specified"].into_iter().collect()),
        );
        summary.insert(Question::Control, None);
        summary.insert(Question::PayRange, None);
        summary.insert(Question::Ticket, Some(["Paper"].into_iter().collect()));
        summary
    }

    #[test]
    fn test_generate_latex_report() {
        let latex = generate_latex_report(&create_test_summary(), false);

        assert!(latex.starts_with("% Summary tables generated automatically by"));
        assert!(latex.contains("\\section{Summary: Age range}\n"));
        assert!(latex.contains("\\section{Summary: Most frequent ticket types}\n"));
        assert!(latex.contains("Age range & Frequency \\\\ \\midrule\n"));
        assert!(latex.contains("18-24 & 2 \\\\\n"));
        assert!(latex.contains("Not specified & 1 \\\\\n"));
        assert!(latex.contains("Paper & 1 \\\\\n"));
    }

    #[test]
    fn test_absent_questions_are_omitted() {
        let latex = generate_latex_report(&create_test_summary(), false);

        assert!(!latex.contains("track your expenses"));
        assert!(!latex.contains("price range"));
        assert_eq!(latex.matches("\\begin{tabular}").count(), 2);
        assert_eq!(latex.matches("\\bottomrule").count(), 2);
    }

    #[test]
    fn test_sections_follow_question_order() {
        let mut summary = Summary::default();
        summary.insert(Question::Ticket, Some(["t"].into_iter().collect()));
        summary.insert(Question::Age, Some(["a"].into_iter().collect()));

        let latex = generate_latex_report(&summary, false);
        let age = latex.find("Age range").unwrap();
        let ticket = latex.find("ticket types").unwrap();
        assert!(age < ticket);
    }

    #[test]
    fn test_rows_keep_first_seen_order() {
        let mut summary = Summary::default();
        summary.insert(Question::Age, Some(["b", "a", "a"].into_iter().collect()));

        let latex = generate_latex_report(&summary, false);
        let b = latex.find("b & 1").unwrap();
        let a = latex.find("a & 2").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_empty_summary_has_only_header() {
        let latex = generate_latex_report(&Summary::default(), false);
        assert_eq!(latex.lines().count(), 1);
        assert!(latex.starts_with('%'));
    }

    #[test]
    fn test_labels_verbatim_by_default() {
        let mut summary = Summary::default();
        summary.insert(Question::PayRange, Some(["$100 & up"].into_iter().collect()));

        let latex = generate_latex_report(&summary, false);
        assert!(latex.contains("$100 & up & 1 \\\\\n"));
    }

    #[test]
    fn test_labels_escaped_when_enabled() {
        let mut summary = Summary::default();
        summary.insert(Question::PayRange, Some(["$100 & up"].into_iter().collect()));

        let latex = generate_latex_report(&summary, true);
        assert!(latex.contains("\\$100 \\& up & 1 \\\\\n"));
    }

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("50%_off"), "50\\%\\_off");
        assert_eq!(escape_latex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_latex("~^"), "\\textasciitilde{}\\textasciicircum{}");
        assert_eq!(escape_latex("¿Qué?"), "¿Qué?");
    }

    #[test]
    fn test_write_latex_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tables.tex");

        write_latex_report(&create_test_summary(), &path, false).unwrap();
        std::fs::write(&path, "stale").unwrap();
        write_latex_report(&create_test_summary(), &path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("\\section{Summary: Age range}"));
    }
}
