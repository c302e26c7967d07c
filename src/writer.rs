//! Conflict-safe persistence of one movie and its associations.

use rusqlite::{Connection, params};

use crate::record::MovieRecord;

const UPSERT_MOVIE_SQL: &str = "
INSERT INTO movies (
    id, imdb_id, title, original_title, overview, release_date, adult,
    budget, revenue, runtime, popularity, vote_average, vote_count,
    original_language, status, tagline, homepage, poster_path,
    raw_genres, raw_production_companies
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
ON CONFLICT(id) DO UPDATE SET
    imdb_id = excluded.imdb_id,
    title = excluded.title,
    original_title = excluded.original_title,
    overview = excluded.overview,
    release_date = excluded.release_date,
    adult = excluded.adult,
    budget = excluded.budget,
    revenue = excluded.revenue,
    runtime = excluded.runtime,
    popularity = excluded.popularity,
    vote_average = excluded.vote_average,
    vote_count = excluded.vote_count,
    original_language = excluded.original_language,
    status = excluded.status,
    tagline = excluded.tagline,
    homepage = excluded.homepage,
    poster_path = excluded.poster_path,
    raw_genres = excluded.raw_genres,
    raw_production_companies = excluded.raw_production_companies
";

/// Whether a movie row with this source id is already present.
pub fn movie_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.prepare_cached("SELECT EXISTS(SELECT 1 FROM movies WHERE id = ?1)")?
        .query_row([id], |row| row.get(0))
}

/// Persist a movie and its genre/company links.
///
/// The movie row is written last-write-wins: an existing row with the same
/// id has every scalar column overwritten. Join rows are written with a
/// do-nothing conflict policy, so re-associating an existing pair is a
/// no-op. The caller supplies the transaction (or savepoint) that makes the
/// whole write atomic.
pub fn write_movie(
    conn: &Connection,
    movie: &MovieRecord,
    genre_ids: &[i64],
    company_ids: &[i64],
) -> rusqlite::Result<()> {
    conn.prepare_cached(UPSERT_MOVIE_SQL)?.execute(params![
        movie.id,
        movie.imdb_id,
        movie.title,
        movie.original_title,
        movie.overview,
        movie
            .release_date
            .map(|date| date.format("%Y-%m-%d").to_string()),
        movie.adult,
        movie.budget,
        movie.revenue,
        movie.runtime,
        movie.popularity,
        movie.vote_average,
        movie.vote_count,
        movie.original_language,
        movie.status,
        movie.tagline,
        movie.homepage,
        movie.poster_path,
        movie.raw_genres,
        movie.raw_production_companies,
    ])?;

    let mut link_genre = conn.prepare_cached(
        "INSERT INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2)
         ON CONFLICT DO NOTHING",
    )?;
    for genre_id in genre_ids {
        link_genre.execute(params![movie.id, genre_id])?;
    }

    let mut link_company = conn.prepare_cached(
        "INSERT INTO movie_companies (movie_id, company_id) VALUES (?1, ?2)
         ON CONFLICT DO NOTHING",
    )?;
    for company_id in company_ids {
        link_company.execute(params![movie.id, company_id])?;
    }

    Ok(())
}
