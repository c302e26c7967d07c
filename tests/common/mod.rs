#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes CSV rows (header first) with proper quoting and returns the path.
    pub fn write_csv(&self, name: &str, rows: &[Vec<&str>]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut writer = csv::Writer::from_path(&path).expect("create csv");
        for row in rows {
            writer.write_record(row).expect("write csv row");
        }
        writer.flush().expect("flush csv");
        path
    }

    /// Path (not yet created) for a SQLite database under the workspace.
    pub fn db_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// One-row movie CSV covering the full documented column set.
pub fn full_movies_csv() -> Vec<Vec<&'static str>> {
    vec![
        vec![
            "id",
            "imdb_id",
            "title",
            "original_title",
            "overview",
            "release_date",
            "adult",
            "budget",
            "revenue",
            "runtime",
            "popularity",
            "vote_average",
            "vote_count",
            "original_language",
            "status",
            "tagline",
            "homepage",
            "poster_path",
            "genres",
            "production_companies",
        ],
        vec![
            "862",
            "tt0114709",
            "Toy Story",
            "Toy Story",
            "Woody the cowboy is threatened by the arrival of Buzz Lightyear.",
            "1995-10-30",
            "False",
            "30000000",
            "373554033",
            "81.0",
            "21.946",
            "7.7",
            "5415",
            "en",
            "Released",
            "",
            "http://toystory.disney.com",
            "/rhIRbceoE9lR4veEXuwCC2wARtG.jpg",
            "[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]",
            "[{'id': 3, 'name': 'Pixar Animation Studios'}]",
        ],
    ]
}
