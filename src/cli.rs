use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Load the movies metadata CSV into a relational SQLite store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the movie database schema (idempotent)
    Init(InitArgs),
    /// Ingest a movies metadata CSV into the database
    Load(LoadArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// SQLite database file to create or update
    #[arg(short, long)]
    pub database: PathBuf,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Input CSV file to ingest ('-' reads from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// SQLite database file to load into
    #[arg(short = 'd', long = "database")]
    pub database: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Rows per committed transaction
    #[arg(long = "batch-size", default_value_t = 500)]
    pub batch_size: usize,
    /// Write failures tolerated before the run aborts
    #[arg(long = "max-failures", default_value_t = 1000)]
    pub max_failures: usize,
    /// Skip the load entirely when the movies table already has rows
    #[arg(long = "if-empty")]
    pub if_empty: bool,
    /// Emit the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
