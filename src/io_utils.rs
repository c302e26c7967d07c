//! I/O utilities for CSV reading, encoding, and delimiter resolution.
//!
//! All input handling flows through this module:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reader construction**: buffered, optionally transcoding CSV readers.
//! - **stdin**: the `-` path convention routes through standard input.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::IngestError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<csv::Reader<Box<dyn Read>>, IngestError> {
    let raw: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        let file = File::open(path).map_err(|source| IngestError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };
    let decoded: Box<dyn Read> = if encoding == UTF_8 {
        raw
    } else {
        Box::new(
            DecodeReaderBytesBuilder::new()
                .encoding(Some(encoding))
                .build(raw),
        )
    };
    Ok(open_csv_reader(decoded, delimiter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_input_delimiter_prefers_override_then_extension() {
        assert_eq!(
            resolve_input_delimiter(Path::new("movies.csv"), Some(b';')),
            b';'
        );
        assert_eq!(resolve_input_delimiter(Path::new("movies.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("movies.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("movies.dat"), None), b',');
    }

    #[test]
    fn resolve_encoding_defaults_to_utf8() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some("latin1")).unwrap(),
            encoding_rs::WINDOWS_1252
        );
        assert!(resolve_encoding(Some("no-such-encoding")).is_err());
    }
}
