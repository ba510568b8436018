//! SQLite-backed course catalog via libsql. Implements CatalogPort.
//!
//! Single `courses` table mirroring the JSON record shape; `fixed_share`
//! carries the explicit special weighting when present, NULL otherwise
//! (the title-marker shim fills the gap for legacy rows).

use crate::adapters::persistence::finalize_courses;
use crate::domain::DomainError;
use crate::domain::entities::{Course, SpecialWeighting};
use crate::ports::CatalogPort;
use libsql::Database;
use std::path::Path;
use tracing::info;

const COURSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    credits REAL NOT NULL,
    weight REAL,
    semester INTEGER NOT NULL DEFAULT 1,
    graded INTEGER NOT NULL DEFAULT 1,
    mandatory INTEGER NOT NULL DEFAULT 0,
    fixed_share REAL
)"#;

/// SQLite catalog. One database file holding the `courses` table.
pub struct SqliteCatalog {
    db: Database,
}

impl SqliteCatalog {
    /// Connect to (or create) the catalog database and ensure the schema
    /// exists. Call once at startup; the store is safe to share via Arc.
    pub async fn connect(db_path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::Catalog(e.to_string()))?;
            }
        }
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Catalog(e.to_string()))?;
        let conn = db
            .connect()
            .map_err(|e| DomainError::Catalog(e.to_string()))?;

        conn.execute(COURSES_TABLE, ())
            .await
            .map_err(|e| DomainError::Catalog(e.to_string()))?;

        info!(path = %db_path.display(), "SQLite catalog connected");

        Ok(Self { db })
    }
}

#[async_trait::async_trait]
impl CatalogPort for SqliteCatalog {
    async fn load_courses(&self) -> Result<Vec<Course>, DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Catalog(e.to_string()))?;
        let mut rows = conn
            .query(
                r#"
                SELECT id, title, credits, weight, semester, graded, mandatory, fixed_share
                FROM courses
                ORDER BY semester, title
                "#,
                (),
            )
            .await
            .map_err(|e| DomainError::Catalog(e.to_string()))?;

        let mut courses = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Catalog(e.to_string()))?
        {
            let id: String = row.get(0).map_err(|e| DomainError::Catalog(e.to_string()))?;
            let title: String = row.get(1).map_err(|e| DomainError::Catalog(e.to_string()))?;
            let credits: f64 = row.get(2).map_err(|e| DomainError::Catalog(e.to_string()))?;
            let weight: Option<f64> = row.get(3).ok();
            let semester: i64 = row.get::<i64>(4).unwrap_or(1);
            let graded: i64 = row.get::<i64>(5).unwrap_or(1);
            let mandatory: i64 = row.get::<i64>(6).unwrap_or(0);
            let fixed_share: Option<f64> = row.get(7).ok();

            courses.push(Course {
                id,
                title,
                credits,
                weight,
                semester: semester.max(1) as u32,
                graded: graded != 0,
                mandatory: mandatory != 0,
                special_weighting: fixed_share
                    .map(|share| SpecialWeighting::FixedShare { share }),
            });
        }

        let courses = finalize_courses(courses)?;
        info!(count = courses.len(), "catalog loaded from SQLite");

        Ok(courses)
    }
}
