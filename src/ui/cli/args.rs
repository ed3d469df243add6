// Wed Jan 15 2026 - Alex

use crate::batch::BatchFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "packet-frame-validator")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Cross-checks declared packet lengths against protocol framing", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a batch of packet records
    Validate(ValidateArgs),
    /// Show the effective protocol profile table
    Profiles(ProfilesArgs),
    /// Load a config file and check its profile table
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    /// Input format; inferred from the extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<BatchFormat>,

    /// Annotated batch destination
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub output_format: Option<BatchFormat>,

    #[arg(short, long)]
    pub report: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub report_format: ReportFormat,

    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub threads: Option<usize>,

    #[arg(long)]
    pub sequential: bool,

    #[arg(long)]
    pub payload_features: bool,

    #[arg(long)]
    pub no_progress: bool,

    /// Exit with status 2 when any record is invalid
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration as JSON
    #[arg(short, long)]
    pub write: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckConfigArgs {
    #[arg(short, long)]
    pub config: PathBuf,
}

impl ValidateArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.input.exists() {
            return Err(format!("Input file does not exist: {:?}", self.input));
        }
        if self.threads == Some(0) {
            return Err("Thread count must be at least 1".to_string());
        }
        if let Some(config) = &self.config {
            if !config.exists() {
                return Err(format!("Config file does not exist: {:?}", config));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let args = Args::try_parse_from([
            "packet-frame-validator",
            "validate",
            "--input",
            "events.csv",
            "--report-format",
            "markdown",
            "--threads",
            "4",
            "--payload-features",
        ])
        .unwrap();

        match args.command {
            Command::Validate(v) => {
                assert_eq!(v.input, PathBuf::from("events.csv"));
                assert_eq!(v.report_format, ReportFormat::Markdown);
                assert_eq!(v.threads, Some(4));
                assert!(v.payload_features);
                assert!(!v.sequential);
                assert_eq!(v.format, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "packet-frame-validator",
            "check-config",
            "--config",
            "profiles.json",
            "--log-level",
            "debug",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
        assert!(args.no_color);
        assert!(matches!(args.command, Command::CheckConfig(_)));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let args = ValidateArgs {
            input: std::env::temp_dir(),
            format: Some(BatchFormat::Csv),
            output: None,
            output_format: None,
            report: None,
            report_format: ReportFormat::Text,
            config: None,
            threads: Some(0),
            sequential: false,
            payload_features: false,
            no_progress: true,
            strict: false,
        };
        assert!(args.validate().is_err());
    }
}
