use clap::Parser;
use colored::Colorize;
use hiltlint::analysis::Severity;
use hiltlint::{Config, Pipeline, ReportFormat, Reporter};
use miette::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;

/// hiltlint - Hilt entry point consistency checks for Android (Kotlin/Java)
#[derive(Parser, Debug)]
#[command(name = "hiltlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target directories to analyze (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Output format (defaults to the config file's, then terminal)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json/sarif formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable parallel parsing for faster analysis
    #[arg(long)]
    parallel: bool,

    /// Whether the project uses view binding, instead of detecting it
    /// from the Gradle build files
    #[arg(long, value_name = "BOOL")]
    view_binding: Option<bool>,

    /// Exit with status 0 even when errors are reported
    #[arg(long)]
    exit_zero: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Sarif,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Sarif => ReportFormat::Sarif,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("hiltlint v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so json/sarif on stdout stay parseable
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if cli.view_binding.is_some() {
        config.hilt.view_binding = cli.view_binding;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<ExitCode> {
    let start_time = Instant::now();

    let format = cli
        .format
        .map(ReportFormat::from)
        .unwrap_or_else(|| ReportFormat::from_name(&config.report.format));
    let interactive = format == ReportFormat::Terminal && !cli.quiet;

    if cli.parallel && interactive {
        println!("{}", "⚡ Parallel mode".cyan());
    }

    let outcome = Pipeline::new(config)
        .with_parallel(cli.parallel)
        .with_progress(interactive)
        .run(&cli.path)?;

    if outcome.stats.source_files() == 0 {
        if interactive {
            println!("{}", "No Kotlin or Java files found.".yellow());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = Reporter::new(format, cli.output.clone());
    reporter.report(&outcome.diagnostics)?;

    if interactive {
        println!(
            "{}",
            format!(
                "Checked {} source files and {} resource files in {:.2}s",
                outcome.stats.source_files(),
                outcome.stats.resource_trees(),
                start_time.elapsed().as_secs_f64()
            )
            .dimmed()
        );
    }

    let has_errors = outcome
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error);
    if has_errors && !cli.exit_zero {
        return Ok(ExitCode::from(1));
    }

    Ok(ExitCode::SUCCESS)
}
