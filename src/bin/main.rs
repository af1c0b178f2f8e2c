use anyhow::{Context, Result};
use clap::Parser;
use clq::{ChangelogChecker, ClqConfig, OutputFormat};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// exit codes reported by clq
struct ExitCodes;

impl ExitCodes {
    const SUCCESS: u8 = 0;
    const VALIDATION_FAILURE: u8 = 1;
    const INVALID_ARGS: u8 = 2;
}

#[derive(Parser)]
#[command(name = "clq")]
#[command(
    version,
    about = "validate and query changelogs written in the keep-a-changelog format",
    long_about = None
)]
struct Cli {
    /// changelog files to check, `-` reads standard input
    #[arg(default_value = "-")]
    files: Vec<String>,

    /// json file mapping change kinds to semantic version increments
    #[arg(long, value_name = "FILE")]
    change_map: Option<PathBuf>,

    /// output format of complex results (json or md)
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// query extracting information out of the changelog
    #[arg(short, long, default_value = "")]
    query: String,

    /// release mode, `[Unreleased]` sections are rejected
    #[arg(long)]
    release: bool,

    /// always print the file name with the results
    #[arg(long)]
    with_filename: bool,

    /// configuration file (defaults to ./clq.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// log debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❗️ {:#}", e);
            return ExitCode::from(ExitCodes::INVALID_ARGS);
        }
    };
    let change_kind = match config.change_kind().context("failed to load change kinds") {
        Ok(change_kind) => change_kind,
        Err(e) => {
            eprintln!("❗️ {:#}", e);
            return ExitCode::from(ExitCodes::INVALID_ARGS);
        }
    };
    let checker = match ChangelogChecker::new(&change_kind)
        .release(config.release)
        .output(config.output)
        .query(&cli.query)
    {
        Ok(checker) => checker,
        Err(e) => {
            eprintln!("❗️ {}", e);
            return ExitCode::from(ExitCodes::INVALID_ARGS);
        }
    };

    let show_filename = config.with_filename || cli.files.len() > 1;
    let mut failed = false;
    for document in &cli.files {
        match check_document(&checker, document) {
            Ok(result) => {
                if result.is_empty() {
                    if config.with_filename {
                        println!("✅ {}", document);
                    }
                } else if show_filename {
                    println!("✅ {}: {}", document, result);
                } else {
                    println!("{}", result);
                }
            }
            Err(e) => {
                failed = true;
                if show_filename {
                    eprintln!("❗️ {}: {}", document, e);
                } else {
                    eprintln!("❗️ {}", e);
                }
            }
        }
    }

    if failed {
        ExitCode::from(ExitCodes::VALIDATION_FAILURE)
    } else {
        ExitCode::from(ExitCodes::SUCCESS)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();

    if let Err(e) = log_result {
        eprintln!("❗️ failed to initialize logging: {}", e);
    }
}

/// the configuration file, overridden by the command line flags
fn load_config(cli: &Cli) -> Result<ClqConfig> {
    let mut config = match &cli.config {
        Some(path) => ClqConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => ClqConfig::load_or_default(".").context("failed to load configuration")?,
    };

    if cli.release {
        config.release = true;
    }
    if cli.with_filename {
        config.with_filename = true;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(change_map) = &cli.change_map {
        config.change_map = Some(change_map.clone());
        config.change_kinds.clear();
    }
    Ok(config)
}

fn check_document(checker: &ChangelogChecker<'_>, document: &str) -> clq::Result<String> {
    if document == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        checker.check(&source)
    } else {
        checker.check_file(document)
    }
}

