use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbtlineage_core::{Config, LineageEntry, LineageResult};
use dbtlineage_engine::{
    lineage_for_file, resolve_lineage, resolve_open_file, LineageError, LineageSession,
    OpenOutcome, UpdateOutcome,
};

/// dbt-lineage - one-hop lineage for dbt models
#[derive(Parser)]
#[command(name = "dbt-lineage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: <project-dir>/dbtlineage.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// dbt project root (default: the config file's directory, else ".")
    #[arg(short = 'p', long, global = true)]
    project_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show upstream and downstream models for a model
    Show {
        /// Model name (e.g., "orders")
        model: String,
    },

    /// Show lineage for the model a file defines
    File {
        /// Path to a .sql or .yml file
        path: PathBuf,
    },

    /// Read model names or file paths from stdin and keep one lineage view
    /// updated. `:close` drops the view, `:open` brings it back.
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.project_dir.as_deref())?;
    let project_dir = project_root(cli.project_dir.as_deref(), &config);

    tracing::debug!(
        project = %project_dir.display(),
        manifest = %config.manifest_path.display(),
        "using configuration"
    );

    match cli.command {
        Commands::Show { model } => show_command(&config, &project_dir, &model, cli.format),
        Commands::File { path } => file_command(&config, &project_dir, &path, cli.format),
        Commands::Watch => watch_command(&config, &project_dir, cli.format),
    }
}

/// Explicit `--config`, else `dbtlineage.toml` in the project dir, else defaults
fn load_config(config_path: Option<&Path>, project_dir: Option<&Path>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::discover(project_dir.unwrap_or(Path::new(".")))?,
    };
    Ok(config)
}

/// `--project-dir` wins; otherwise the directory the config was found in
fn project_root(project_dir: Option<&Path>, config: &Config) -> PathBuf {
    project_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.project_root.clone())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Show command - lineage by model name
fn show_command(config: &Config, project_dir: &Path, model: &str, format: OutputFormat) -> Result<()> {
    let lineage = resolve_lineage(project_dir, model, config)?;
    print_outcome(lineage.as_ref(), project_dir, format)
}

/// File command - lineage for the model defined by a file
fn file_command(config: &Config, project_dir: &Path, path: &Path, format: OutputFormat) -> Result<()> {
    let lineage = lineage_for_file(project_dir, path, config)?;
    print_outcome(lineage.as_ref(), project_dir, format)
}

/// Watch command - drive a single lineage view from stdin
fn watch_command(config: &Config, project_dir: &Path, format: OutputFormat) -> Result<()> {
    let mut session = LineageSession::new();
    session.open();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            ":close" => {
                session.dispose();
                eprintln!("{}", "Lineage view closed".dimmed());
                continue;
            }
            ":open" => {
                if session.open() == OpenOutcome::Revealed {
                    if let Some(current) = session.current() {
                        print_lineage(current, project_dir, format)?;
                    }
                }
                continue;
            }
            _ => {}
        }

        let Some(ticket) = session.begin_request() else {
            tracing::debug!(input, "no open view, ignoring");
            continue;
        };

        match request(config, project_dir, input) {
            Ok(outcome) => {
                if session.complete(ticket, outcome) == UpdateOutcome::Applied {
                    if let Some(current) = session.current() {
                        print_lineage(current, project_dir, format)?;
                    }
                }
            }
            // Artifact problems are loud; the view stays as it was
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
    }

    Ok(())
}

/// A watch line is a file when it has a path separator or an extension
fn request(config: &Config, project_dir: &Path, input: &str) -> Result<Option<LineageResult>, LineageError> {
    let path = Path::new(input);
    if path.extension().is_some() || path.components().count() > 1 {
        lineage_for_file(project_dir, path, config)
    } else {
        resolve_lineage(project_dir, input, config)
    }
}

fn print_outcome(lineage: Option<&LineageResult>, project_dir: &Path, format: OutputFormat) -> Result<()> {
    match lineage {
        Some(lineage) => print_lineage(lineage, project_dir, format),
        None => {
            if format == OutputFormat::Json {
                println!("null");
            }
            tracing::info!("no model lineage to show");
            Ok(())
        }
    }
}

fn print_lineage(lineage: &LineageResult, project_dir: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", lineage.to_json()?),
        OutputFormat::Text => print_text(lineage, project_dir),
    }
    Ok(())
}

fn print_text(lineage: &LineageResult, project_dir: &Path) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", lineage.title().bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!(
        "{} {} {}",
        "Model:".bold(),
        lineage.current.name.green(),
        resolve_open_file(project_dir, &lineage.current.path)
            .display()
            .to_string()
            .dimmed()
    );
    println!();

    print_section("Upstream", &lineage.upstream, project_dir);
    print_section("Downstream", &lineage.downstream, project_dir);

    if lineage.is_isolated() {
        println!("{}", "✓ No upstream or downstream dependencies".green());
    }

    println!("{}", "=".repeat(60).bright_blue());
}

fn print_section(label: &str, entries: &[LineageEntry], project_dir: &Path) {
    println!("{} {}", format!("{}:", label).bold(), entries.len());
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            entry.name.yellow(),
            resolve_open_file(project_dir, &entry.path)
                .display()
                .to_string()
                .dimmed()
        );
    }
    println!();
}
