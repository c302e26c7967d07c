use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort an ingestion run. Row-level problems are accumulated
/// in the run summary instead and never surface through this type.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot open input file {path:?}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "aborted after {failures} write failure(s) (limit {limit}); \
         {committed_batches} batch(es) were committed before the abort"
    )]
    TooManyFailures {
        failures: usize,
        limit: usize,
        committed_batches: usize,
    },

    #[error(
        "store connection failed after {committed_batches} committed batch(es); \
         rows in the interrupted batch were rolled back: {source}"
    )]
    StoreLost {
        committed_batches: usize,
        source: rusqlite::Error,
    },
}
