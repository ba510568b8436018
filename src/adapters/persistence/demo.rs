//! Built-in demo catalog for running without any configured store.
//!
//! Serves a small hardcoded CS curriculum, thesis included. Useful for trying
//! the planner before pointing it at a real catalog file or database.

use crate::adapters::persistence::finalize_courses;
use crate::domain::DomainError;
use crate::domain::entities::Course;
use crate::ports::CatalogPort;
use tracing::info;

/// Fallback catalog with predetermined sample data.
pub struct DemoCatalog;

impl DemoCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogPort for DemoCatalog {
    async fn load_courses(&self) -> Result<Vec<Course>, DomainError> {
        let courses = finalize_courses(sample_curriculum())?;
        info!(count = courses.len(), "using built-in demo catalog");
        Ok(courses)
    }
}

fn course(
    id: &str,
    title: &str,
    credits: f64,
    weight: Option<f64>,
    semester: u32,
    graded: bool,
    mandatory: bool,
) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        credits,
        weight,
        semester,
        graded,
        mandatory,
        special_weighting: None,
    }
}

/// Three semesters of a CS bachelor's program. Weights are percent figures,
/// as in the original study regulations.
fn sample_curriculum() -> Vec<Course> {
    vec![
        course("gdi", "Grundlagen der Informatik", 9.0, Some(5.0), 1, true, true),
        course("prog1", "Programmierung 1", 6.0, Some(5.0), 1, true, true),
        course("mathe1", "Mathematik 1", 9.0, Some(5.0), 1, true, true),
        course("prosem", "Proseminar", 3.0, Some(2.0), 1, true, false),
        course("prog2", "Programmierung 2", 6.0, Some(5.0), 2, true, true),
        course("algodat", "Algorithmen und Datenstrukturen", 9.0, Some(10.0), 2, true, true),
        course("swtpr", "Softwaretechnik-Praktikum", 6.0, None, 2, false, true),
        course("dbs", "Datenbanksysteme", 6.0, Some(5.0), 3, true, true),
        course("ml", "Wahlpflicht: Machine Learning", 6.0, Some(5.0), 3, true, false),
        course("ba", "Bachelorarbeit", 12.0, Some(20.0), 3, true, true),
    ]
}
