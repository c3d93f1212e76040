//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// survey-report - survey CSV to LaTeX frequency tables and bar charts
///
/// Reads the survey export under the root directory (the cleaned export
/// when present, the raw one otherwise), writes the frequency tables to a
/// LaTeX file and the age and price range charts as PNG images.
///
/// Examples:
///   survey-report
///   survey-report --root ./ReporteTecnico
///   survey-report --config survey.toml --verbose
///   survey-report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory that relative input and output paths resolve against
    #[arg(long, default_value = ".", value_name = "DIR", env = "SURVEY_REPORT_ROOT")]
    pub root: PathBuf,

    /// Path to configuration file
    ///
    /// If not specified, looks for .survey-report.toml in the root directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .survey-report.toml in the root directory
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if !self.root.is_dir() {
            return Err(format!(
                "Root directory does not exist: {}",
                self.root.display()
            ));
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            root: PathBuf::from("."),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_defaults_parse() {
        let args = Args::try_parse_from(["survey-report"]).unwrap();
        assert!(args.config.is_none());
        assert!(!args.init_config);
    }

    #[test]
    fn test_parse_flags() {
        let args =
            Args::try_parse_from(["survey-report", "--root", "/tmp", "-c", "s.toml", "-v"]).unwrap();
        assert_eq!(args.root, PathBuf::from("/tmp"));
        assert_eq!(args.config, Some(PathBuf::from("s.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_root() {
        let mut args = make_args();
        args.root = PathBuf::from("/definitely/not/here");
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_config() {
        let mut args = make_args();
        args.config = Some(PathBuf::from("/definitely/not/here.toml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
