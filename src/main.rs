//! `configme` command line tool: inspect and edit TOML property files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use configme::observability::logging;
use configme::{PropertyResource, PropertyValue, TomlFileResource};

#[derive(Parser)]
#[command(name = "configme")]
#[command(about = "Inspect and edit configuration property files", long_about = None)]
struct Cli {
    /// Log level for this crate's events (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole property tree as JSON
    Dump { file: PathBuf },
    /// Print the value at a dot-delimited path
    Get { file: PathBuf, path: String },
    /// Set the value at a path and write the file back
    Set {
        file: PathBuf,
        path: String,
        value: String,
    },
    /// List every leaf path in file order
    Paths { file: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&format!("configme={}", cli.log_level));

    match cli.command {
        Commands::Dump { file } => {
            let resource = TomlFileResource::open(file)?;
            println!("{}", serde_json::to_string_pretty(resource.root())?);
        }
        Commands::Get { file, path } => {
            let resource = TomlFileResource::open(file)?;
            match resource.get_value(&path) {
                Some(PropertyValue::String(value)) => println!("{value}"),
                Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
                None => {
                    eprintln!("No value at '{path}'");
                    std::process::exit(1);
                }
            }
        }
        Commands::Set { file, path, value } => {
            let mut resource = TomlFileResource::open(file)?;
            let value = parse_scalar(&value);
            tracing::info!(path = %path, kind = value.kind(), "Setting value");
            resource.set_value(&path, Some(value));
            resource.save_tree()?;
        }
        Commands::Paths { file } => {
            let resource = TomlFileResource::open(file)?;
            for (path, _) in resource.root().leaves() {
                println!("{path}");
            }
        }
    }

    Ok(())
}

/// Boolean, then integer, then float; anything else is a string.
fn parse_scalar(raw: &str) -> PropertyValue {
    if let Ok(value) = raw.parse::<bool>() {
        return PropertyValue::Bool(value);
    }
    if let Ok(value) = raw.parse::<i64>() {
        return PropertyValue::Integer(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => PropertyValue::Float(value),
        _ => PropertyValue::String(raw.to_string()),
    }
}
