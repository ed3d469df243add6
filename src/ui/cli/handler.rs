// Wed Jan 15 2026 - Alex

use super::args::{Args, CheckConfigArgs, Command, ProfilesArgs, ReportFormat, ValidateArgs};
use crate::batch::{annotate, read_records, write_annotated};
use crate::config::Config;
use crate::payload::{FillerDetector, PayloadFeatures};
use crate::ui::progress::{Stage, StageProgress};
use crate::ui::table::{profile_table, protocol_table};
use crate::ui::{print_info, print_success};
use crate::utils::{format_duration, pluralize, scoped_timer, LoggingUtils};
use crate::validation::ValidationSummary;
use anyhow::Context;
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::time::Instant;

pub const EXIT_OK: i32 = 0;
pub const EXIT_INVALID_RECORDS: i32 = 2;

pub struct CommandHandler {
    quiet: bool,
    use_color: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            quiet: false,
            use_color: true,
        }
    }

    /// Returns the process exit code.
    pub fn execute(mut self, args: Args) -> anyhow::Result<i32> {
        self.quiet = args.quiet;
        self.use_color = !args.no_color;
        if args.no_color {
            colored::control::set_override(false);
        }

        LoggingUtils::init_logger(LoggingUtils::level_from_str(&args.log_level));

        match args.command {
            Command::Validate(validate_args) => self.handle_validate(validate_args),
            Command::Profiles(profiles_args) => self.handle_profiles(profiles_args),
            Command::CheckConfig(check_args) => self.handle_check_config(check_args),
        }
    }

    fn load_config(&self, path: Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(path) => Config::load(path).with_context(|| format!("Failed to load config {:?}", path)),
            None => Ok(Config::default()),
        }
    }

    fn handle_validate(&self, args: ValidateArgs) -> anyhow::Result<i32> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;
        let start = Instant::now();

        let mut config = self.load_config(args.config.as_deref())?;
        if let Some(threads) = args.threads {
            config.threads = threads;
        }
        if args.sequential {
            config.parallel = false;
        }
        if args.payload_features {
            config.payload_features = true;
        }

        let validator = config.build_validator().context("Profile table is misconfigured")?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads.max(1))
            .build()
            .context("Failed to build worker pool")?;

        let progress = StageProgress::new(!args.no_progress && !self.quiet);

        if !self.quiet {
            print_info(&format!("Loading records: {}", args.input.display()));
        }
        progress.enter(Stage::Loading);
        let records = {
            let _timer = scoped_timer("load");
            read_records(&args.input, args.format, &config.columns)
                .with_context(|| format!("Failed to read records from {:?}", args.input))?
        };
        log::info!("Loaded {}", pluralize(records.len(), "record", "records"));

        progress.enter(Stage::Validating);
        let outcome = {
            let _timer = scoped_timer("validate");
            pool.install(|| validator.validate_batch(&records))
        };

        let features = if config.payload_features {
            progress.enter(Stage::Features);
            let _timer = scoped_timer("payload features");
            let detector = FillerDetector::new();
            let features: Vec<PayloadFeatures> = pool.install(|| {
                records
                    .par_iter()
                    .map(|r| PayloadFeatures::extract(r.payload.as_deref(), &detector))
                    .collect()
            });
            Some(features)
        } else {
            None
        };

        progress.enter(Stage::Writing);
        if let Some(output) = &args.output {
            let rows = annotate(&records, &outcome.results, features.as_deref());
            write_annotated(output, args.output_format, &rows)
                .with_context(|| format!("Failed to write annotated batch to {:?}", output))?;
        }

        if let Some(report_path) = &args.report {
            let rendered = render_report(&outcome.summary, args.report_format)?;
            fs::write(report_path, rendered)
                .with_context(|| format!("Failed to write report to {:?}", report_path))?;
        }
        progress.finish();

        self.print_summary(&outcome.summary);
        if !self.quiet {
            if let Some(output) = &args.output {
                print_success(&format!("Annotated batch saved to: {}", output.display()));
            }
            if let Some(report_path) = &args.report {
                print_success(&format!("Report saved to: {}", report_path.display()));
            }
            print_success(&format!("Validation complete in {}", format_duration(start.elapsed())));
        }

        if args.strict && outcome.summary.invalid_count > 0 {
            return Ok(EXIT_INVALID_RECORDS);
        }
        Ok(EXIT_OK)
    }

    fn handle_profiles(&self, args: ProfilesArgs) -> anyhow::Result<i32> {
        let config = self.load_config(args.config.as_deref())?;

        if !self.quiet {
            let framing = &config.profiles.framing;
            println!("{}", "Protocol Frame Profiles".cyan().bold());
            println!(
                "  MTU {} bytes, Ethernet overhead {} bytes, IP header {} bytes",
                framing.mtu, framing.ethernet_overhead, framing.ip_header
            );
            println!("{}", profile_table(&config.profiles, self.use_color));
        }

        if let Some(path) = &args.write {
            config
                .save(path)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            if !self.quiet {
                print_success(&format!("Config written to: {}", path.display()));
            }
        }

        Ok(EXIT_OK)
    }

    fn handle_check_config(&self, args: CheckConfigArgs) -> anyhow::Result<i32> {
        let config = self.load_config(Some(&args.config))?;
        if !self.quiet {
            print_success(&format!(
                "{:?} is valid: {} plus fallback",
                args.config,
                pluralize(config.profiles.len(), "protocol", "protocols")
            ));
        }
        Ok(EXIT_OK)
    }

    fn print_summary(&self, summary: &ValidationSummary) {
        if self.quiet {
            return;
        }

        println!();
        println!("{}", "Validation Summary".cyan().bold());
        println!("{}", "=".repeat(50).cyan());
        println!("  Total records:          {}", summary.total);
        println!(
            "  Valid:                  {} ({:.1}%)",
            summary.valid_count.to_string().green(),
            summary.valid_ratio()
        );
        let invalid = summary.invalid_count.to_string();
        println!(
            "  Invalid:                {}",
            if summary.invalid_count > 0 { invalid.red() } else { invalid.normal() }
        );
        println!("  Unrecognized protocol:  {}", summary.unrecognized_protocol_count);
        println!("  Unparseable length:     {}", summary.unparseable_count);
        println!();

        if !summary.protocols.is_empty() {
            println!("{}", protocol_table(summary, self.use_color));
            println!();
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_report(summary: &ValidationSummary, format: ReportFormat) -> anyhow::Result<String> {
    Ok(match format {
        ReportFormat::Text => summary.format_report(),
        ReportFormat::Markdown => summary.to_markdown(),
        ReportFormat::Json => summary.to_json().context("Failed to serialize summary")?,
    })
}
