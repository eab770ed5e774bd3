//! logcat-verify CLI
//!
//! Verifies analytics events recorded in captured Android logcat output.
//!
//! ## Commands
//!
//! - `verify`: extract and validate one or more log files, report per file
//! - `extract`: print the extracted events of a single log as JSON

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use logcat_verify::{
    render_report_json, render_report_md, render_report_text, write_report_json, BatchReport,
    EventExtractor, ExtractorConfig, Rule, RulePreset, Verifier, VerifyConfig, METRICS,
};

#[derive(Parser)]
#[command(name = "logcat-verify")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify clickstream analytics events in captured logcat output", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and validate log files
    Verify {
        /// Log files to verify (added to any paths listed in the config)
        files: Vec<PathBuf>,

        /// YAML config: a list of log paths, or paths plus extractor/rule settings
        #[arg(short, long, env = "LOGCAT_VERIFY_CONFIG")]
        config: Option<PathBuf>,

        /// Rule preset (overrides the config)
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,

        /// Only accept JSON-shaped fragments inside event bodies
        #[arg(long)]
        strict: bool,

        /// Also fail on "Error to save event" lines
        #[arg(long)]
        no_save_failures: bool,

        /// Stop evaluating a file at its first violation
        #[arg(long)]
        fail_fast: bool,

        /// Report format written to stdout
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Also write the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of files verified concurrently
        #[arg(short, long, default_value = "1")]
        jobs: usize,
    },

    /// Print the events extracted from one log file as JSON
    Extract {
        /// Log file to read
        file: PathBuf,

        /// Only accept JSON-shaped fragments inside event bodies
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Lifecycle,
    Extended,
}

impl From<PresetArg> for RulePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Lifecycle => RulePreset::Lifecycle,
            PresetArg::Extended => RulePreset::Extended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Markdown,
    Json,
}

struct VerifyArgs {
    files: Vec<PathBuf>,
    config: Option<PathBuf>,
    preset: Option<PresetArg>,
    strict: bool,
    no_save_failures: bool,
    fail_fast: bool,
    format: ReportFormat,
    output: Option<PathBuf>,
    jobs: usize,
}

/// Exit status for configuration and I/O errors, matching clap's usage errors.
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    logcat_verify::init_tracing(cli.json, level);

    match run(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Verify {
            files,
            config,
            preset,
            strict,
            no_save_failures,
            fail_fast,
            format,
            output,
            jobs,
        } => {
            cmd_verify(VerifyArgs {
                files,
                config,
                preset,
                strict,
                no_save_failures,
                fail_fast,
                format,
                output,
                jobs,
            })
            .await
        }
        Commands::Extract { file, strict } => cmd_extract(&file, strict),
    }
}

/// Merge the config file with command-line overrides.
fn build_config(args: &VerifyArgs) -> Result<VerifyConfig> {
    let mut config = match &args.config {
        Some(path) => VerifyConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => VerifyConfig::default(),
    };

    config.paths.extend(args.files.iter().cloned());
    if let Some(preset) = args.preset {
        config.rules.preset = preset.into();
    }
    if args.strict {
        config.extractor.strict = true;
    }
    if args.no_save_failures && !config.rules.extra.contains(&Rule::NoSaveFailures) {
        config.rules.extra.push(Rule::NoSaveFailures);
    }
    if args.fail_fast {
        config.rules.fail_fast = true;
    }

    if config.paths.is_empty() {
        anyhow::bail!("No log files given: pass FILES or a --config listing paths");
    }
    Ok(config)
}

async fn cmd_verify(args: VerifyArgs) -> Result<ExitCode> {
    let config = build_config(&args)?;
    let verifier = Verifier::from_config(&config);
    info!(
        files = config.paths.len(),
        rules = verifier.rule_set().rules.len(),
        jobs = args.jobs,
        "verifying logcat captures"
    );

    let report = if args.jobs > 1 {
        verifier
            .verify_paths_concurrent(&config.paths, args.jobs)
            .await
    } else {
        verifier.verify_paths(&config.paths)
    };
    METRICS.flush();

    print!("{}", render(&report, args.format)?);
    if let Some(path) = &args.output {
        write_report_json(path, &report)?;
        info!(path = %path.display(), "report written");
    }

    Ok(exit_code(&report))
}

fn render(report: &BatchReport, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => render_report_text(report),
        ReportFormat::Markdown => render_report_md(report),
        ReportFormat::Json => {
            let mut json = render_report_json(report)?;
            json.push('\n');
            json
        }
    })
}

/// 0 when every file is valid, 1 otherwise.
fn exit_status(report: &BatchReport) -> u8 {
    u8::from(!report.passed())
}

fn exit_code(report: &BatchReport) -> ExitCode {
    ExitCode::from(exit_status(report))
}

fn cmd_extract(path: &Path, strict: bool) -> Result<ExitCode> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = if strict {
        ExtractorConfig::strict()
    } else {
        ExtractorConfig::default()
    };
    let extraction = EventExtractor::new(config)
        .extract(&text)
        .with_context(|| format!("Failed to extract events from {}", path.display()))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&extraction).context("serialize extraction")?
    );
    Ok(ExitCode::SUCCESS)
}
