//! Top-level ingestion driver.
//!
//! Owns one run: a sequential pass over the CSV, batched `BEGIN IMMEDIATE`
//! transactions, per-movie savepoints, and failure accumulation. A bad row
//! is recorded and skipped; only a lost store connection or exceeding the
//! write-failure limit aborts the run.

use std::{collections::HashMap, path::Path};

use csv::StringRecord;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use crate::{
    decode,
    error::IngestError,
    io_utils,
    record::{self, MovieRecord},
    resolver::Resolver,
    writer,
};

/// Failure entries kept verbatim in the summary; the rest are counted.
pub const MAX_REPORTED_FAILURES: usize = 100;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Rows per committed transaction.
    pub batch_size: usize,
    /// Write failures tolerated before the run aborts.
    pub max_failures: usize,
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 500,
            max_failures: 1000,
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

/// One recorded per-row failure: a coercion rejection, an unreadable CSV
/// record, or a write error.
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// 1-based data row number (header excluded).
    pub row: u64,
    pub movie_id: Option<i64>,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct IngestSummary {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    pub write_failures: u64,
    pub malformed_dates: u64,
    pub failures: Vec<RowFailure>,
    /// Failures beyond [`MAX_REPORTED_FAILURES`], counted rather than listed.
    pub unreported_failures: u64,
}

impl IngestSummary {
    pub fn total_failures(&self) -> u64 {
        self.skipped + self.write_failures
    }

    fn record_failure(&mut self, row: u64, movie_id: Option<i64>, reason: String) {
        if self.failures.len() < MAX_REPORTED_FAILURES {
            self.failures.push(RowFailure {
                row,
                movie_id,
                reason,
            });
        } else {
            self.unreported_failures += 1;
        }
    }
}

/// Ingest one CSV into the store. Re-running over the same input is safe:
/// movie rows are overwritten by id and associations are additive no-ops.
pub fn run_ingest(
    conn: &mut Connection,
    csv_path: &Path,
    options: &IngestOptions,
) -> Result<IngestSummary, IngestError> {
    let mut reader =
        io_utils::open_csv_reader_from_path(csv_path, options.delimiter, options.encoding)?;
    let headers = reader.headers()?.clone();
    let columns = record::column_map(&headers);
    let mut records = reader.into_records();

    let mut resolver = Resolver::new();
    let mut summary = IngestSummary::default();
    let mut committed_batches = 0usize;
    let mut row_no = 0u64;
    let batch_size = options.batch_size.max(1);

    let mut exhausted = false;
    while !exhausted {
        let mut tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|source| IngestError::StoreLost {
                committed_batches,
                source,
            })?;
        let mut in_batch = 0usize;

        while in_batch < batch_size {
            let Some(next) = records.next() else {
                exhausted = true;
                break;
            };
            row_no += 1;
            in_batch += 1;
            match next {
                Ok(raw) => {
                    ingest_row(&mut tx, &mut resolver, &columns, &raw, row_no, &mut summary);
                }
                Err(err) => {
                    summary.skipped += 1;
                    summary.record_failure(row_no, None, format!("unreadable CSV record: {err}"));
                    debug!("Row {row_no}: unreadable CSV record: {err}");
                }
            }
            if summary.write_failures as usize > options.max_failures {
                drop(tx);
                return Err(IngestError::TooManyFailures {
                    failures: summary.write_failures as usize,
                    limit: options.max_failures,
                    committed_batches,
                });
            }
        }

        tx.commit().map_err(|source| IngestError::StoreLost {
            committed_batches,
            source,
        })?;
        if in_batch > 0 {
            committed_batches += 1;
            debug!("Committed batch {committed_batches} ({in_batch} row(s))");
        }
    }

    info!(
        "Ingest complete: {} inserted, {} updated, {} skipped, {} write failure(s), {} malformed date(s)",
        summary.inserted,
        summary.updated,
        summary.skipped,
        summary.write_failures,
        summary.malformed_dates
    );
    Ok(summary)
}

fn ingest_row(
    tx: &mut Transaction<'_>,
    resolver: &mut Resolver,
    columns: &HashMap<String, usize>,
    raw: &StringRecord,
    row_no: u64,
    summary: &mut IngestSummary,
) {
    let movie = match MovieRecord::from_csv_row(columns, raw) {
        Ok(movie) => movie,
        Err(rejection) => {
            summary.skipped += 1;
            summary.record_failure(row_no, None, rejection.to_string());
            debug!("Row {row_no} skipped: {rejection}");
            return;
        }
    };
    let genres = decode::decode_names(&movie.raw_genres);
    let companies = decode::decode_names(&movie.raw_production_companies);

    match write_with_savepoint(tx, resolver, &movie, &genres, &companies) {
        Ok(existed) => {
            if existed {
                summary.updated += 1;
            } else {
                summary.inserted += 1;
            }
            if movie.release_date_malformed {
                summary.malformed_dates += 1;
            }
        }
        Err(err) => {
            summary.write_failures += 1;
            summary.record_failure(row_no, Some(movie.id), err.to_string());
            warn!("Row {row_no} (id {}): write failed: {err}", movie.id);
        }
    }
}

/// Resolve associations, then write the movie inside its own savepoint so a
/// failed write rolls back alone without poisoning the batch.
///
/// Reference rows are resolved outside the savepoint: they are additive and
/// never deleted, and the resolver cache must stay truthful when a movie
/// write rolls back.
fn write_with_savepoint(
    tx: &mut Transaction<'_>,
    resolver: &mut Resolver,
    movie: &MovieRecord,
    genres: &[String],
    companies: &[String],
) -> rusqlite::Result<bool> {
    let existed = writer::movie_exists(tx, movie.id)?;

    let mut genre_ids = Vec::with_capacity(genres.len());
    for name in genres {
        genre_ids.push(resolver.resolve_genre(tx, name)?);
    }
    let mut company_ids = Vec::with_capacity(companies.len());
    for name in companies {
        company_ids.push(resolver.resolve_company(tx, name)?);
    }

    let sp = tx.savepoint()?;
    writer::write_movie(&sp, movie, &genre_ids, &company_ids)?;
    sp.commit()?;
    Ok(existed)
}
