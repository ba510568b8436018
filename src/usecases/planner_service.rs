//! Planner service. Hosts the calculation core for the UI.
//!
//! Coordinates between the catalog store (courses), the pure aggregation and
//! retake functions (domain), and the filesystem (overview reports).

use crate::domain::DomainError;
use crate::domain::aggregate::{self, GradeAggregate};
use crate::domain::entities::{Course, GradeSelection, WeightMode};
use crate::domain::retake::{self, RetakeCandidate, RetakeTuning};
use crate::ports::CatalogPort;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;

/// Everything the UI renders after a grade change: aggregate and suggestions
/// from one consistent recomputation over the same inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSnapshot {
    pub aggregate: GradeAggregate,
    pub suggestions: Vec<RetakeCandidate>,
}

/// Courses of one semester, mandatory split out for display.
#[derive(Debug, Clone)]
pub struct SemesterGroup {
    pub semester: u32,
    pub mandatory: Vec<Course>,
    pub optional: Vec<Course>,
}

/// Service for the interactive planning session.
///
/// Holds the loaded catalog behind a read lock; the grade selection and the
/// weighting toggle live in the UI and are passed into every computation.
pub struct PlannerService {
    catalog: Arc<dyn CatalogPort>,
    courses: RwLock<Vec<Course>>,
    tuning: RetakeTuning,
    reports_dir: PathBuf,
}

impl PlannerService {
    /// Load the catalog and build the service.
    ///
    /// # Arguments
    /// * `catalog` - Catalog port implementation (JSON, SQLite, demo)
    /// * `tuning` - Retake ranking knobs, usually from config
    /// * `reports_dir` - Directory for exported overview reports
    pub async fn load(
        catalog: Arc<dyn CatalogPort>,
        tuning: RetakeTuning,
        reports_dir: PathBuf,
    ) -> Result<Self, DomainError> {
        let courses = Self::fetch_sorted(catalog.as_ref()).await?;
        info!(count = courses.len(), "catalog loaded");

        Ok(Self {
            catalog,
            courses: RwLock::new(courses),
            tuning,
            reports_dir,
        })
    }

    /// Re-fetch the catalog, e.g. after the file was edited while the app runs.
    /// Recorded grades are untouched; stale course ids simply stop matching.
    pub async fn reload(&self) -> Result<usize, DomainError> {
        let courses = Self::fetch_sorted(self.catalog.as_ref()).await?;
        let count = courses.len();
        *self.courses.write().await = courses;
        info!(count, "catalog reloaded");
        Ok(count)
    }

    /// Display order: semester, mandatory before optional, then title.
    async fn fetch_sorted(catalog: &dyn CatalogPort) -> Result<Vec<Course>, DomainError> {
        let mut courses = catalog.load_courses().await?;
        courses.sort_by(|a, b| {
            a.semester
                .cmp(&b.semester)
                .then(b.mandatory.cmp(&a.mandatory))
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(courses)
    }

    /// Current course list in display order.
    pub async fn courses(&self) -> Vec<Course> {
        self.courses.read().await.clone()
    }

    /// Courses grouped by semester, ascending, mandatory split from optional.
    pub async fn semesters(&self) -> Vec<SemesterGroup> {
        let courses = self.courses.read().await;
        let mut groups: Vec<SemesterGroup> = Vec::new();

        // The list is already sorted by semester, so groups come out ascending.
        for course in courses.iter() {
            if groups.last().map(|g| g.semester) != Some(course.semester) {
                groups.push(SemesterGroup {
                    semester: course.semester,
                    mandatory: Vec::new(),
                    optional: Vec::new(),
                });
            }
            if let Some(group) = groups.last_mut() {
                if course.mandatory {
                    group.mandatory.push(course.clone());
                } else {
                    group.optional.push(course.clone());
                }
            }
        }

        groups
    }

    /// One consistent recomputation over the current catalog. Called by the UI
    /// after every grade change; cheap enough to run edge-triggered.
    pub async fn snapshot(&self, selection: &GradeSelection, mode: WeightMode) -> PlannerSnapshot {
        let courses = self.courses.read().await;
        PlannerSnapshot {
            aggregate: aggregate::compute(&courses, selection, mode),
            suggestions: retake::recommend(&courses, selection, mode, &self.tuning),
        }
    }

    /// Export the current overview as a Markdown report.
    ///
    /// Returns the path of the generated file.
    pub async fn export_overview(
        &self,
        selection: &GradeSelection,
        mode: WeightMode,
    ) -> Result<PathBuf, DomainError> {
        // Ensure reports directory exists
        fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|e| DomainError::Report(format!("Failed to create reports dir: {}", e)))?;

        let snapshot = self.snapshot(selection, mode).await;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.reports_dir.join(format!("gpa_overview_{}.md", stamp));

        let md = render_overview(&snapshot, mode);
        fs::write(&path, md)
            .await
            .map_err(|e| DomainError::Report(format!("Failed to write report: {}", e)))?;

        info!(path = %path.display(), "overview exported");

        Ok(path)
    }
}

/// Render the snapshot as a Markdown document.
fn render_overview(snapshot: &PlannerSnapshot, mode: WeightMode) -> String {
    let agg = &snapshot.aggregate;
    let mut md = String::new();

    // Header
    md.push_str("# GPA Overview\n\n");
    md.push_str(&format!(
        "**GPA:** {:.2} | **Courses graded:** {} | **Weighting:** {}\n\n",
        agg.value,
        agg.details.len(),
        mode.label()
    ));
    md.push_str("---\n\n");

    // Calculation details
    if !agg.details.is_empty() {
        md.push_str("## 📊 Calculation Details\n\n");
        md.push_str("| Course | Grade | Weight | Weighted |\n");
        md.push_str("|---|---|---|---|\n");
        for d in &agg.details {
            let title = if d.is_thesis {
                format!("{} *(thesis)*", d.course.title)
            } else {
                d.course.title.clone()
            };
            md.push_str(&format!(
                "| {} | {:.1} | {} | {:.2} |\n",
                title, d.grade, d.weight, d.weighted_grade
            ));
        }
        md.push('\n');

        let regular_sum: f64 = agg
            .details
            .iter()
            .filter(|d| !d.is_thesis)
            .map(|d| d.weighted_grade)
            .sum();
        let regular_weight: f64 = agg
            .details
            .iter()
            .filter(|d| !d.is_thesis)
            .map(|d| d.weight)
            .sum();

        if regular_weight > 0.0 {
            md.push_str(&format!(
                "Regular total: {} ÷ {} = **{:.2}**\n\n",
                regular_sum,
                regular_weight,
                regular_sum / regular_weight
            ));
        }

        if let Some(thesis) = agg.thesis_grade {
            let share = agg
                .details
                .iter()
                .find(|d| d.is_thesis)
                .map(|d| d.weight)
                .unwrap_or(0.0);
            if regular_weight > 0.0 {
                md.push_str(&format!(
                    "Final: regular × {:.0}% + thesis {:.1} × {:.0}% = **{:.2}**\n\n",
                    (1.0 - share) * 100.0,
                    thesis,
                    share * 100.0,
                    agg.value
                ));
            }
        }
    }

    // Retake suggestions
    if !snapshot.suggestions.is_empty() {
        md.push_str("## 🔁 Retake Suggestions\n\n");
        for (i, c) in snapshot.suggestions.iter().enumerate() {
            md.push_str(&format!(
                "{}. **{}** — current {:.1}, impact score {:.2}, GPA {:.2} → {:.2}\n",
                i + 1,
                c.course.title,
                c.current_grade,
                c.impact_score,
                agg.value,
                agg.value + c.hypothetical_impact
            ));
        }
        md.push('\n');
    }

    // Footer
    md.push_str("---\n");
    md.push_str("*Generated by notenrechner*\n");

    md
}
