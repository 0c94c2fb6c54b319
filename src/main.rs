//! pgcheck CLI
//!
//! Usage:
//! ```bash
//! pgcheck lint [--config pgcheck.yaml] [--format text|json] migrations/*.sql
//! pgcheck rules [--format text|json]
//! pgcheck explain drop-column
//! ```
//!
//! Exit codes:
//! - 0: Run completed (violations, if any, are in the report)
//! - 1: Violations found and `--fail-on-violations` was given
//! - 2: Tool error (no files, bad pattern, config error, parse failure, I/O error, etc.)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pgcheck::input::collect_files;
use pgcheck::output::{OutputFormat, OutputOptions};
use pgcheck::{Config, LintPipeline, RuleId, RuleInfo, RuleRegistry};

#[derive(Parser)]
#[command(name = "pgcheck")]
#[command(version, about = "Linter for PostgreSQL migration scripts", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint migration files
    Lint {
        /// Path to a YAML configuration file overlaying the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Exit with status 1 when any violation is reported
        #[arg(long)]
        fail_on_violations: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// File patterns to lint (shell glob syntax; directories select their .sql files)
        #[arg(required = true, num_args = 1..)]
        patterns: Vec<String>,
    },

    /// List all rules
    Rules {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Explain a rule (e.g., `pgcheck explain drop-column`)
    Explain {
        /// Rule code
        code: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(failed) => {
            if failed {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(true)` when the run should exit with status 1.
fn run(cli: Cli) -> Result<bool> {
    let mut registry = RuleRegistry::new();
    registry.register_defaults();

    match cli.command {
        Commands::Lint {
            config,
            format,
            fail_on_violations,
            no_color,
            patterns,
        } => {
            let options = OutputOptions {
                format: OutputFormat::from_str(&format)?,
                colored: !no_color && std::io::stdout().is_terminal(),
            };
            let config = load_config(&registry, config)?;

            let files = collect_files(&patterns)?;
            debug!(files = files.len(), "selected files");

            let report = LintPipeline::new(&registry, &config).lint_files(&files)?;
            let rendered = options
                .reporter()
                .render(&report)
                .context("Failed to render report")?;
            print!("{rendered}");

            Ok(fail_on_violations && !report.is_empty())
        }
        Commands::Rules { format } => {
            let options = OutputOptions {
                format: OutputFormat::from_str(&format)?,
                colored: std::io::stdout().is_terminal(),
            };
            let rules: Vec<RuleInfo> = registry.iter().map(RuleInfo::from_rule).collect();
            print!("{}", options.reporter().render_rules(&rules)?);
            Ok(false)
        }
        Commands::Explain { code } => {
            explain_rule(&registry, &code)?;
            Ok(false)
        }
    }
}

/// Compiled defaults, overlaid with `--config` when given.
fn load_config(registry: &RuleRegistry, path: Option<PathBuf>) -> Result<Config> {
    let config = Config::default_for(registry);
    match path {
        Some(path) => config
            .overlay_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(config),
    }
}

fn explain_rule(registry: &RuleRegistry, code: &str) -> Result<()> {
    let id = RuleId::from_str(code).map_err(|_| anyhow::anyhow!("Unknown rule: {}", code))?;
    let rule = registry
        .get(id)
        .with_context(|| format!("Rule {} is not registered", code))?;

    println!("Rule: {}", rule.id());
    println!("Category: {}", rule.category());
    println!("Enabled by default: {}", rule.enabled_by_default());
    println!();
    println!("{}", rule.explain());
    println!();
    println!("Solution: {}", rule.help());

    Ok(())
}
