//! Binary entry point for csvmap.
//!
//! Decodes delimited text against a runtime column list and reports,
//! converts or rewrites it.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use csv::StringRecord;
use csvmap::config::CsvmapConfig;
use csvmap::io::CsvRowSource;
use csvmap::observability::{self, LoggingConfig};
use csvmap::{Decoder, Dialect, DynamicRow, DynamicSchema, Encoder, RowSource, ScalarKind};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// csvmap - name-matched mapping of delimited text to typed rows.
#[derive(Parser)]
#[command(name = "csvmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Decode the input and print the number of rows.
    Check {
        /// Input file (default: stdin).
        file: Option<PathBuf>,
    },

    /// Decode the input and print it as a JSON array.
    Json {
        /// Input file (default: stdin).
        file: Option<PathBuf>,
    },

    /// Decode the input and write it back in canonical form.
    Reformat {
        /// Input file (default: stdin).
        file: Option<PathBuf>,

        /// Output delimiter (single character or `tab`).
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Terminate output rows with CRLF.
        #[arg(long)]
        crlf: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(LoggingConfig::from_settings(
        Some(&config.logging),
        cli.verbose,
    )) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads the config file (explicit path or default location) plus env overrides.
fn load_config(path: Option<&Path>) -> csvmap::Result<CsvmapConfig> {
    let mut config = match path {
        Some(path) => CsvmapConfig::load_from_file(path)?,
        None => CsvmapConfig::load_default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

/// Runs the selected command.
fn run_command(command: Commands, config: &CsvmapConfig) -> csvmap::Result<()> {
    match command {
        Commands::Check { file } => {
            let (schema, rows) = decode_input(file.as_deref(), config)?;
            println!("{} rows, {} columns", rows.len(), schema.column_names().len());
        },
        Commands::Json { file } => {
            let (schema, rows) = decode_input(file.as_deref(), config)?;
            let objects: Vec<_> = rows.iter().map(|row| schema.to_json(row)).collect();
            let text = serde_json::to_string_pretty(&objects).map_err(|e| {
                csvmap::Error::OperationFailed {
                    operation: "serialize_json".to_string(),
                    cause: e.to_string(),
                }
            })?;
            println!("{text}");
        },
        Commands::Reformat {
            file,
            delimiter,
            crlf,
        } => {
            let (schema, rows) = decode_input(file.as_deref(), config)?;
            let mut dialect = config.dialect.with_crlf(config.dialect.crlf || crlf);
            if let Some(delimiter) = delimiter {
                dialect.delimiter = csvmap::config::parse_delimiter(&delimiter)?;
            }
            let stdout = std::io::stdout().lock();
            let mut out = Encoder::new(stdout)
                .with_dialect(dialect)
                .encode_dynamic(&schema, &rows)?;
            out.flush()?;
        },
    }
    Ok(())
}

/// Reads the whole input and decodes it against the configured columns.
///
/// Without configured columns every header name becomes a string column.
fn decode_input(
    file: Option<&Path>,
    config: &CsvmapConfig,
) -> csvmap::Result<(DynamicSchema, Vec<DynamicRow>)> {
    let input = read_input(file)?;
    let name = file
        .and_then(Path::file_stem)
        .map_or_else(|| "stdin".to_string(), |stem| stem.to_string_lossy().into_owned());

    let schema = match config.dynamic_schema(&name)? {
        Some(schema) => schema,
        None => header_schema(&name, &input, &config.dialect)?,
    };

    let mut rows = Vec::new();
    Decoder::new(input.as_slice())
        .with_dialect(config.dialect)
        .decode_dynamic(&schema, &mut rows)?;
    Ok((schema, rows))
}

fn header_schema(name: &str, input: &[u8], dialect: &Dialect) -> csvmap::Result<DynamicSchema> {
    dialect.validate()?;
    let mut header = StringRecord::new();
    if !CsvRowSource::new(input, dialect).read_row(&mut header)? {
        return Err(csvmap::Error::MissingHeader);
    }
    DynamicSchema::from_columns(
        name,
        header
            .iter()
            .map(|column| (column.to_string(), ScalarKind::String)),
    )
}

fn read_input(file: Option<&Path>) -> csvmap::Result<Vec<u8>> {
    if let Some(path) = file {
        return std::fs::read(path).map_err(|e| csvmap::Error::OperationFailed {
            operation: "read_input".to_string(),
            cause: format!("{}: {e}", path.display()),
        });
    }

    let mut input = Vec::new();
    std::io::stdin().lock().read_to_end(&mut input)?;
    Ok(input)
}
