//! relflat CLI
//!
//! Usage:
//!   relflat [OPTIONS] <INPUT>
//!
//! Options:
//!   -s, --scale <FACTOR>   Horizontal scale factor (overrides config)
//!   -c, --config <FILE>    Configuration file (TOML format)
//!   -o, --output <FILE>    Output file, `-` for stdout
//!   -d, --debug            Dump positioning trees
//!   --allow-partial        Write output even if an axis failed
//!   -h, --help             Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use relflat::document::derived_output_path;
use relflat::{flatten_document, DocumentFormat, FlattenConfig, FlattenError, LayoutDocument};

#[derive(Parser)]
#[command(name = "relflat")]
#[command(about = "Flatten RelativeLayout documents into absolute offsets")]
struct Cli {
    /// Layout document (Android XML, or TOML)
    input: PathBuf,

    /// Horizontal scale factor applied after flattening
    #[arg(short, long, value_name = "FACTOR")]
    scale: Option<f64>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file; defaults to the input name plus the output suffix
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug mode: dump both positioning trees before and after flattening
    #[arg(short, long)]
    debug: bool,

    /// Write the output even when one axis could not be flattened
    #[arg(long)]
    allow_partial: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Load config
    let mut config = match &cli.config {
        Some(path) => match FlattenConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FlattenConfig::default(),
    };
    if let Some(scale) = cli.scale {
        config = config.with_scale(scale);
    }
    if cli.debug {
        config = config.with_debug(true);
    }

    // Read input
    let filename = cli.input.display().to_string();
    let source = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            std::process::exit(1);
        }
    };

    let format = DocumentFormat::detect(&cli.input, &source);
    let document = match LayoutDocument::parse(&source, format) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename).trim_end());
            std::process::exit(1);
        }
    };

    let flat = match flatten_document(document, &config) {
        Ok(flat) => flat,
        Err(FlattenError::Document(e)) => {
            eprintln!("{}", e.format(&source, &filename).trim_end());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for dump in &flat.dumps {
        eprintln!("{}", dump);
    }
    for warning in &flat.report.warnings {
        eprintln!("warning: {}", warning);
    }

    for (axis, e) in flat.outcome.failures() {
        eprintln!("Error: {} axis not flattened: {}", axis, e);
    }
    if !flat.outcome.is_complete() && !cli.allow_partial {
        std::process::exit(1);
    }

    let output = cli
        .output
        .unwrap_or_else(|| derived_output_path(&cli.input, &config.output_suffix));

    if output.as_os_str() == "-" {
        match flat.document.render(format) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else if let Err(e) = flat
        .document
        .write_to(&output, DocumentFormat::from_path(&output).unwrap_or(format))
    {
        eprintln!("Error writing '{}': {}", output.display(), e);
        std::process::exit(1);
    }
}
