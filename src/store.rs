//! SQLite connection handling and schema provisioning.

use std::path::Path;

use rusqlite::Connection;

use crate::error::IngestError;

/// Five-table relational schema for the normalized movie catalog.
///
/// `movies.id` comes verbatim from the source export, so it is a plain
/// `INTEGER PRIMARY KEY` rather than an autoincrement. Reference tables
/// carry surrogate keys and an exact-match unique name. Every statement is
/// `IF NOT EXISTS` so provisioning is idempotent.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    imdb_id TEXT,
    title TEXT,
    original_title TEXT,
    overview TEXT,
    release_date TEXT,
    adult INTEGER,
    budget INTEGER,
    revenue INTEGER,
    runtime REAL,
    popularity REAL,
    vote_average REAL,
    vote_count INTEGER,
    original_language TEXT,
    status TEXT,
    tagline TEXT,
    homepage TEXT,
    poster_path TEXT,
    raw_genres TEXT,
    raw_production_companies TEXT
);

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS production_companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS movie_genres (
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    genre_id INTEGER NOT NULL REFERENCES genres(id),
    PRIMARY KEY (movie_id, genre_id)
);

CREATE TABLE IF NOT EXISTS movie_companies (
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    company_id INTEGER NOT NULL REFERENCES production_companies(id),
    PRIMARY KEY (movie_id, company_id)
);

CREATE INDEX IF NOT EXISTS idx_movies_release_date ON movies(release_date);
CREATE INDEX IF NOT EXISTS idx_movies_title ON movies(title);
"#;

/// Open (creating if necessary) the database at `path` with write-friendly
/// pragmas applied.
pub fn open(path: &Path) -> Result<Connection, IngestError> {
    let conn = Connection::open(path)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// In-memory database for tests.
pub fn open_in_memory() -> Result<Connection, IngestError> {
    let conn = Connection::open_in_memory()?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
}

/// Apply the schema. Safe to call on an already-provisioned database.
pub fn apply_schema(conn: &Connection) -> Result<(), IngestError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Whether the movies table already holds any rows.
pub fn movies_has_data(conn: &Connection) -> Result<bool, IngestError> {
    let populated = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM movies LIMIT 1)",
        [],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(populated)
}
