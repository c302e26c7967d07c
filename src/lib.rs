pub mod cli;
pub mod decode;
pub mod error;
pub mod io_utils;
pub mod literal;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod store;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    pipeline::{IngestOptions, IngestSummary},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("movie_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => handle_init(&args),
        Commands::Load(args) => handle_load(&args),
    }
}

fn handle_init(args: &cli::InitArgs) -> Result<()> {
    let conn = store::open(&args.database)
        .with_context(|| format!("Opening database {:?}", args.database))?;
    store::apply_schema(&conn)
        .with_context(|| format!("Applying schema to {:?}", args.database))?;
    info!("Schema provisioned in {:?}", args.database);
    Ok(())
}

fn handle_load(args: &cli::LoadArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Loading '{}' into {:?} (delimiter '{}', batch size {})",
        args.input.display(),
        args.database,
        printable_delimiter(delimiter),
        args.batch_size
    );

    let mut conn = store::open(&args.database)
        .with_context(|| format!("Opening database {:?}", args.database))?;
    store::apply_schema(&conn)
        .with_context(|| format!("Applying schema to {:?}", args.database))?;

    if args.if_empty && store::movies_has_data(&conn)? {
        info!("Movies table already has data; skipping load");
        return Ok(());
    }

    let options = IngestOptions {
        batch_size: args.batch_size,
        max_failures: args.max_failures,
        delimiter,
        encoding,
    };
    let summary = pipeline::run_ingest(&mut conn, &args.input, &options)
        .with_context(|| format!("Ingesting {:?}", args.input))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report_summary(&summary);
    }
    Ok(())
}

fn report_summary(summary: &IngestSummary) {
    println!(
        "inserted={} updated={} skipped={} write_failures={} malformed_dates={}",
        summary.inserted,
        summary.updated,
        summary.skipped,
        summary.write_failures,
        summary.malformed_dates
    );
    for failure in &summary.failures {
        match failure.movie_id {
            Some(id) => println!("  row {} (id {}): {}", failure.row, id, failure.reason),
            None => println!("  row {}: {}", failure.row, failure.reason),
        }
    }
    if summary.unreported_failures > 0 {
        println!(
            "  ... and {} more failure(s) not listed",
            summary.unreported_failures
        );
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
