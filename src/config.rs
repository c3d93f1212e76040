//! Configuration file handling.
//!
//! This module handles loading configuration from `.survey-report.toml`
//! files. Every setting has a default, so an empty file (or no file at
//! all) reproduces the standard layout of the survey annex.

use crate::models::{Question, NOT_SPECIFIED};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the root directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".survey-report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input file locations.
    #[serde(default)]
    pub input: InputConfig,

    /// Output file locations.
    #[serde(default)]
    pub output: OutputConfig,

    /// Column header of each tracked question.
    #[serde(default)]
    pub questions: QuestionsConfig,

    /// Frequency table settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Bar chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// Input CSV locations, relative to the root directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Pre-cleaned export, preferred when it exists.
    #[serde(default = "default_clean_csv")]
    pub clean_csv: PathBuf,

    /// Raw export.
    #[serde(default = "default_raw_csv")]
    pub raw_csv: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            clean_csv: default_clean_csv(),
            raw_csv: default_raw_csv(),
        }
    }
}

fn default_clean_csv() -> PathBuf {
    PathBuf::from("anexos/data/encuesta_clean.csv")
}

fn default_raw_csv() -> PathBuf {
    PathBuf::from("anexos/data/encuesta.csv")
}

/// Output locations, relative to the root directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// LaTeX document with the frequency tables.
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Directory the chart images are written to.
    #[serde(default = "default_figures_dir")]
    pub figures_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            figures_dir: default_figures_dir(),
        }
    }
}

fn default_document() -> PathBuf {
    PathBuf::from("anexos/encuesta_tablas.tex")
}

fn default_figures_dir() -> PathBuf {
    PathBuf::from("anexos/figures")
}

/// Column headers of the tracked questions.
///
/// Headers are matched exactly (case and inner whitespace) against the
/// trimmed headers of the loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsConfig {
    #[serde(default = "default_age_column")]
    pub age: String,

    #[serde(default = "default_control_column")]
    pub control: String,

    #[serde(default = "default_payrange_column")]
    pub payrange: String,

    #[serde(default = "default_ticket_column")]
    pub ticket: String,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            age: default_age_column(),
            control: default_control_column(),
            payrange: default_payrange_column(),
            ticket: default_ticket_column(),
        }
    }
}

fn default_age_column() -> String {
    "¿A que rango de edad perteneces?".to_string()
}

fn default_control_column() -> String {
    "¿Llevas actualmente un control de tus gastos?".to_string()
}

fn default_payrange_column() -> String {
    "¿Qué rango de precio considerarías justo por mes?".to_string()
}

fn default_ticket_column() -> String {
    "¿Que tipo de tickets recibes más seguido?".to_string()
}

impl QuestionsConfig {
    /// Column header configured for `question`.
    pub fn column(&self, question: Question) -> &str {
        match question {
            Question::Age => self.age.as_str(),
            Question::Control => self.control.as_str(),
            Question::PayRange => self.payrange.as_str(),
            Question::Ticket => self.ticket.as_str(),
        }
    }
}

/// Frequency table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Label that missing cells are counted under.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    /// Cell values treated as missing, in addition to empty cells.
    #[serde(default = "default_missing_markers")]
    pub missing_markers: Vec<String>,

    /// Escape LaTeX special characters in labels.
    ///
    /// Off by default: labels are written verbatim.
    #[serde(default)]
    pub escape_markup: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            missing_markers: default_missing_markers(),
            escape_markup: false,
        }
    }
}

fn default_sentinel() -> String {
    NOT_SPECIFIED.to_string()
}

fn default_missing_markers() -> Vec<String> {
    vec![
        "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
        "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Bar chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// TrueType fonts to try, in order, for chart text.
    #[serde(default = "default_font_paths")]
    pub font_paths: Vec<PathBuf>,

    /// Log a failed chart and continue with the next one instead of
    /// aborting the run.
    #[serde(default)]
    pub isolate_failures: bool,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            font_paths: default_font_paths(),
            isolate_failures: false,
        }
    }
}

// 6x4 inches at 150 dpi
fn default_width() -> u32 {
    900
}

fn default_height() -> u32 {
    600
}

fn default_font_paths() -> Vec<PathBuf> {
    vec![
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the root directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_root(root: &Path) -> Result<Option<Self>> {
        let config_path = root.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve every relative path against `root`.
    ///
    /// Absolute paths are left untouched.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        for path in [
            &mut self.input.clean_csv,
            &mut self.input.raw_csv,
            &mut self.output.document,
            &mut self.output.figures_dir,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Render this configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        Config::default().to_toml()
    }
}
