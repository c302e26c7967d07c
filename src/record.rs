//! Row coercion: raw CSV cells into a typed [`MovieRecord`].
//!
//! Coercion is deliberately forgiving everywhere except the primary key.
//! Numeric noise falls back to documented defaults, unparseable dates are
//! stored as absent, and only a missing or invalid `id` rejects the row.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;
use thiserror::Error;

/// Why a row could not be coerced. Rejections are counted and reported by
/// the driver; they never abort the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowRejection {
    #[error("missing id")]
    MissingId,
    #[error("invalid id '{0}'")]
    InvalidId(String),
}

/// One movie row, coerced and ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: i64,
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub adult: Option<bool>,
    pub budget: i64,
    pub revenue: i64,
    pub runtime: Option<f64>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: i64,
    pub original_language: Option<String>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub poster_path: Option<String>,
    /// Unparsed source text of the `genres` cell, kept for auditability.
    pub raw_genres: String,
    /// Unparsed source text of the `production_companies` cell.
    pub raw_production_companies: String,
    /// True when `release_date` was present in the source but unparseable.
    pub release_date_malformed: bool,
}

/// Header-name → field-index lookup for the input file.
pub fn column_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect()
}

fn cell<'a>(
    columns: &HashMap<String, usize>,
    record: &'a StringRecord,
    name: &str,
) -> Option<&'a str> {
    columns
        .get(name)
        .and_then(|&idx| record.get(idx))
        .filter(|value| !value.is_empty())
}

fn text_cell(
    columns: &HashMap<String, usize>,
    record: &StringRecord,
    name: &str,
) -> Option<String> {
    cell(columns, record, name).map(str::to_string)
}

impl MovieRecord {
    /// Coerce one raw CSV row. Only an unusable `id` rejects the row.
    pub fn from_csv_row(
        columns: &HashMap<String, usize>,
        record: &StringRecord,
    ) -> Result<Self, RowRejection> {
        let id = parse_required_id(cell(columns, record, "id"))?;

        let release_date_raw = cell(columns, record, "release_date");
        let release_date = release_date_raw.and_then(parse_release_date);
        let release_date_malformed = release_date_raw.is_some() && release_date.is_none();

        Ok(Self {
            id,
            imdb_id: text_cell(columns, record, "imdb_id"),
            title: text_cell(columns, record, "title"),
            original_title: text_cell(columns, record, "original_title"),
            overview: text_cell(columns, record, "overview"),
            release_date,
            release_date_malformed,
            adult: cell(columns, record, "adult").and_then(parse_loose_bool),
            budget: parse_int_or_zero(cell(columns, record, "budget")),
            revenue: parse_int_or_zero(cell(columns, record, "revenue")),
            runtime: cell(columns, record, "runtime").and_then(parse_opt_float),
            popularity: cell(columns, record, "popularity").and_then(parse_opt_float),
            vote_average: cell(columns, record, "vote_average").and_then(parse_opt_float),
            vote_count: parse_int_or_zero(cell(columns, record, "vote_count")),
            original_language: text_cell(columns, record, "original_language"),
            status: text_cell(columns, record, "status"),
            tagline: text_cell(columns, record, "tagline"),
            homepage: text_cell(columns, record, "homepage"),
            poster_path: text_cell(columns, record, "poster_path"),
            raw_genres: cell(columns, record, "genres").unwrap_or("").to_string(),
            raw_production_companies: cell(columns, record, "production_companies")
                .unwrap_or("")
                .to_string(),
        })
    }
}

fn parse_required_id(value: Option<&str>) -> Result<i64, RowRejection> {
    let raw = value.ok_or(RowRejection::MissingId)?;
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RowRejection::InvalidId(raw.to_string())),
    }
}

/// Loose boolean parsing matching the source export's habits.
pub fn parse_loose_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

/// Integer parse with a documented default of 0. Numeric noise is common
/// in the source and must not block ingestion of usable text fields.
pub fn parse_int_or_zero(value: Option<&str>) -> i64 {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

pub fn parse_opt_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Salvage a release date from the formats seen in the wild.
///
/// Accepts ISO `YYYY-MM-DD`, US `MM/DD/YYYY`, a bare year (stored as
/// January 1st), and as a last resort a leading 10-character ISO slice of
/// a longer timestamp.
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(parsed);
        }
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        if (1800..=2200).contains(&year) {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    trimmed
        .get(..10)
        .and_then(|slice| NaiveDate::parse_from_str(slice, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(headers: &[&str], cells: &[&str]) -> (HashMap<String, usize>, StringRecord) {
        let header_record = StringRecord::from(headers.to_vec());
        (column_map(&header_record), StringRecord::from(cells.to_vec()))
    }

    #[test]
    fn from_csv_row_coerces_a_well_formed_row() {
        let (columns, record) = row(
            &["id", "title", "budget", "vote_count", "adult", "release_date"],
            &["862", "Toy Story", "30000000", "5415", "False", "1995-10-30"],
        );
        let movie = MovieRecord::from_csv_row(&columns, &record).unwrap();
        assert_eq!(movie.id, 862);
        assert_eq!(movie.title.as_deref(), Some("Toy Story"));
        assert_eq!(movie.budget, 30_000_000);
        assert_eq!(movie.vote_count, 5415);
        assert_eq!(movie.adult, Some(false));
        assert_eq!(
            movie.release_date,
            NaiveDate::from_ymd_opt(1995, 10, 30)
        );
        assert!(!movie.release_date_malformed);
    }

    #[test]
    fn from_csv_row_rejects_missing_or_invalid_id() {
        let (columns, record) = row(&["id", "title"], &["", "No Id"]);
        assert_eq!(
            MovieRecord::from_csv_row(&columns, &record),
            Err(RowRejection::MissingId)
        );

        let (columns, record) = row(&["id", "title"], &["abc123", "Bad Id"]);
        assert_eq!(
            MovieRecord::from_csv_row(&columns, &record),
            Err(RowRejection::InvalidId("abc123".to_string()))
        );

        let (columns, record) = row(&["id", "title"], &["-4", "Negative"]);
        assert!(MovieRecord::from_csv_row(&columns, &record).is_err());
    }

    #[test]
    fn numeric_noise_defaults_instead_of_rejecting() {
        let (columns, record) = row(
            &["id", "vote_count", "budget", "popularity"],
            &["5", "abc", "/ff.jpg", "not-a-number"],
        );
        let movie = MovieRecord::from_csv_row(&columns, &record).unwrap();
        assert_eq!(movie.vote_count, 0);
        assert_eq!(movie.budget, 0);
        assert_eq!(movie.popularity, None);
    }

    #[test]
    fn empty_cells_become_absent_not_empty_strings() {
        let (columns, record) = row(&["id", "tagline", "homepage"], &["9", "", ""]);
        let movie = MovieRecord::from_csv_row(&columns, &record).unwrap();
        assert_eq!(movie.tagline, None);
        assert_eq!(movie.homepage, None);
    }

    #[test]
    fn malformed_dates_are_flagged_and_stored_absent() {
        let (columns, record) = row(&["id", "release_date"], &["7", "soon"]);
        let movie = MovieRecord::from_csv_row(&columns, &record).unwrap();
        assert_eq!(movie.release_date, None);
        assert!(movie.release_date_malformed);
    }

    #[test]
    fn parse_release_date_salvages_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2014, 3, 8).unwrap();
        assert_eq!(parse_release_date("2014-03-08"), Some(expected));
        assert_eq!(parse_release_date("03/08/2014"), Some(expected));
        assert_eq!(
            parse_release_date("2014"),
            NaiveDate::from_ymd_opt(2014, 1, 1)
        );
        assert_eq!(
            parse_release_date("2014-03-08T00:00:00"),
            Some(expected)
        );
        assert_eq!(parse_release_date("unknown"), None);
    }

    #[test]
    fn parse_loose_bool_accepts_source_spellings() {
        assert_eq!(parse_loose_bool("True"), Some(true));
        assert_eq!(parse_loose_bool("t"), Some(true));
        assert_eq!(parse_loose_bool("1"), Some(true));
        assert_eq!(parse_loose_bool("FALSE"), Some(false));
        assert_eq!(parse_loose_bool("0"), Some(false));
        assert_eq!(parse_loose_bool("yes-ish"), None);
    }
}
