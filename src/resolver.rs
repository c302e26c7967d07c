//! Name → surrogate-id resolution for reference entities.

use std::collections::HashMap;

use rusqlite::Connection;

/// The two reference tables a movie row links into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Genre,
    Company,
}

impl ReferenceKind {
    fn table(self) -> &'static str {
        match self {
            ReferenceKind::Genre => "genres",
            ReferenceKind::Company => "production_companies",
        }
    }
}

/// Run-scoped resolver with one name → id cache per reference kind.
///
/// Matching is exact and case-sensitive, mirroring the plain `UNIQUE` text
/// column: differently-cased spellings become distinct reference rows.
#[derive(Debug, Default)]
pub struct Resolver {
    genres: HashMap<String, i64>,
    companies: HashMap<String, i64>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stable id for `name`, inserting a reference row on first
    /// sighting. The insert tolerates conflicts and the id is re-read
    /// afterwards, so a racing insert by another writer is absorbed instead
    /// of failing.
    pub fn resolve(
        &mut self,
        conn: &Connection,
        kind: ReferenceKind,
        name: &str,
    ) -> rusqlite::Result<i64> {
        let cache = match kind {
            ReferenceKind::Genre => &mut self.genres,
            ReferenceKind::Company => &mut self.companies,
        };
        if let Some(&id) = cache.get(name) {
            return Ok(id);
        }
        let table = kind.table();
        conn.prepare_cached(&format!(
            "INSERT INTO {table} (name) VALUES (?1) ON CONFLICT(name) DO NOTHING"
        ))?
        .execute([name])?;
        let id: i64 = conn
            .prepare_cached(&format!("SELECT id FROM {table} WHERE name = ?1"))?
            .query_row([name], |row| row.get(0))?;
        cache.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn resolve_genre(&mut self, conn: &Connection, name: &str) -> rusqlite::Result<i64> {
        self.resolve(conn, ReferenceKind::Genre, name)
    }

    pub fn resolve_company(&mut self, conn: &Connection, name: &str) -> rusqlite::Result<i64> {
        self.resolve(conn, ReferenceKind::Company, name)
    }
}
