//! JSON-file course catalog. Implements CatalogPort.
//!
//! The file holds a plain array of course records; omitted fields fall back
//! to the serde defaults. The whole file is re-read on every load so a
//! catalog reload picks up external edits without restarting.

use crate::adapters::persistence::finalize_courses;
use crate::domain::DomainError;
use crate::domain::entities::Course;
use crate::ports::CatalogPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// File-backed catalog. One JSON array of courses.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogPort for JsonCatalog {
    async fn load_courses(&self) -> Result<Vec<Course>, DomainError> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Catalog(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let courses: Vec<Course> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::Catalog(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        let courses = finalize_courses(courses)?;

        info!(
            path = %self.path.display(),
            count = courses.len(),
            "catalog loaded from JSON"
        );

        Ok(courses)
    }
}
