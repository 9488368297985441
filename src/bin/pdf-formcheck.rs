//! PDF Form-Code Checker CLI tool
//!
//! A command-line tool for checking PDF form codes against a spreadsheet.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use pdf_formcheck::batch::{execute, FAIL, PASS};
use pdf_formcheck::config::RunConfig;
use pdf_formcheck::pdf::{describe, passed, validate_pdf};
use pdf_formcheck::viewer::{Launcher, NoopLauncher, SystemLauncher};

/// PDF Form-Code Checker - verify form codes listed in a spreadsheet
#[derive(Parser)]
#[command(name = "pdf-formcheck")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Check spreadsheet rows 0..4 using a config file
    pdf-formcheck run --config run.toml

    # Same, without a config file and without opening each PDF
    pdf-formcheck run --table Compare_Sheet.xlsx --root Requirements/oil --end 4 --no-open

    # Check a single PDF
    pdf-formcheck check form.pdf --cma CMA-1001 --factsheet FS-2002")]
struct Cli {
    /// Show per-page and indexing detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a row range of the spreadsheet and write pass/fail results
    Run {
        /// TOML run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Spreadsheet (.xlsx) to read and update
        #[arg(long)]
        table: Option<PathBuf>,

        /// Directory searched recursively for the PDFs
        #[arg(long)]
        root: Option<PathBuf>,

        /// Language code a row must declare to be validated
        #[arg(long)]
        language: Option<String>,

        /// First data row to process (zero-based, inclusive)
        #[arg(long)]
        start: Option<usize>,

        /// Data row to stop at (zero-based, exclusive)
        #[arg(long)]
        end: Option<usize>,

        /// Do not open validated PDFs in the default viewer
        #[arg(long)]
        no_open: bool,
    },

    /// Check a single PDF for two form codes
    Check {
        /// PDF file to check
        input: PathBuf,

        /// CMA form code
        #[arg(long)]
        cma: String,

        /// Factsheet form code
        #[arg(long)]
        factsheet: String,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config, table, root, language, start, end, no_open,
        } => {
            cmd_run(config, table, root, language, start, end, no_open)
        }
        Commands::Check { input, cma, factsheet } => {
            cmd_check(input, cma, factsheet)
        }
        Commands::Info { input } => {
            cmd_info(input)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

/// Assemble the run configuration from an optional file plus flag overrides
fn build_config(
    config: Option<PathBuf>,
    table: Option<PathBuf>,
    root: Option<PathBuf>,
    language: Option<String>,
    start: Option<usize>,
    end: Option<usize>,
    no_open: bool,
) -> Result<RunConfig> {
    let mut run_config = match config {
        Some(path) => RunConfig::from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let (Some(table), Some(root), Some(end)) = (table.clone(), root.clone(), end) else {
                bail!("--table, --root and --end are required without --config");
            };
            RunConfig::new(table, root, start.unwrap_or(0), end)
        }
    };

    if let Some(table) = table {
        run_config.table = table;
    }
    if let Some(root) = root {
        run_config.corpus_root = root;
    }
    if let Some(language) = language {
        run_config.expected_language = language;
    }
    if let Some(start) = start {
        run_config.start_row = start;
    }
    if let Some(end) = end {
        run_config.end_row = end;
    }
    if no_open {
        run_config.open_documents = false;
    }

    run_config.validate()?;
    Ok(run_config)
}

/// Validate a spreadsheet row range
fn cmd_run(
    config: Option<PathBuf>,
    table: Option<PathBuf>,
    root: Option<PathBuf>,
    language: Option<String>,
    start: Option<usize>,
    end: Option<usize>,
    no_open: bool,
) -> Result<()> {
    let run_config = build_config(config, table, root, language, start, end, no_open)?;

    let launcher: &dyn Launcher = if run_config.open_documents {
        &SystemLauncher
    } else {
        &NoopLauncher
    };

    // Errors are already logged by the run itself
    if execute(&run_config, launcher).is_none() {
        process::exit(1);
    }

    Ok(())
}

/// Check one PDF and print what was found
fn cmd_check(input: PathBuf, cma: String, factsheet: String) -> Result<()> {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let outcome = validate_pdf(&input, &name, cma.trim(), factsheet.trim());

    println!("File: {}", input.display());
    match &outcome {
        Ok(findings) => {
            println!("Pages: {}", findings.page_count);
            println!("CMA form code found: {}", findings.cma_found);
            println!("Factsheet form code found: {}", findings.factsheet_found);
        }
        Err(e) => println!("Error: {}", e),
    }
    println!("Result: {}", if passed(&outcome) { PASS } else { FAIL });

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let info = describe(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", info.page_count);
    println!("Pages with text: {}", info.text_pages);

    if let Some(title) = info.title {
        println!("Title: {}", title);
    }
    if let Some(author) = info.author {
        println!("Author: {}", author);
    }

    Ok(())
}
