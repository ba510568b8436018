//! Domain entities. Pure data structures for the core business.
//!
//! No storage/terminal types here — these are mapped from adapters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque course identifier, assigned by the catalog store (UUIDs in practice).
pub type CourseId = String;

/// Title marker for the compatibility shim: stored records without an explicit
/// `special_weighting` are treated as the thesis when their title contains this.
pub const THESIS_TITLE_MARKER: &str = "bachelorarbeit";

/// Share of the final value the thesis takes under the stock 80/20 split.
pub const DEFAULT_THESIS_SHARE: f64 = 0.2;

/// Best attainable grade. Lower is better on the German scale.
pub const BEST_GRADE: f64 = 1.0;

/// Grade recorded for a failed exam ("nicht bestanden").
pub const FAILED_GRADE: f64 = 5.0;

/// Selectable grade steps for graded courses, best first.
pub const GRADE_STEPS: &[f64] = &[1.0, 1.3, 1.7, 2.0, 2.3, 2.7, 3.0, 3.3, 3.7, 4.0, FAILED_GRADE];

/// Marks a course that bypasses the regular weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpecialWeighting {
    /// Takes a fixed share of the final value (0.2 = the classic thesis split).
    FixedShare { share: f64 },
}

/// Which per-course figure weighs each grade in the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// ECTS credits.
    Credits,
    /// The administratively assigned weight value (absent = 1).
    CourseWeight,
}

impl WeightMode {
    pub fn label(self) -> &'static str {
        match self {
            WeightMode::Credits => "ECTS credits",
            WeightMode::CourseWeight => "course weight",
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    /// ECTS credit weight. Always present, non-negative.
    pub credits: f64,
    /// Secondary administrative multiplier (a percent figure in the original
    /// catalog). Absent means 1 in the formula; 0 contributes zero weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Semester grouping key (1-based).
    #[serde(default = "default_semester")]
    pub semester: u32,
    /// Graded course (grade steps) vs pass/fail course. Display-level only.
    #[serde(default = "default_graded")]
    pub graded: bool,
    /// Mandatory vs optional. Grouping/display only, never enters the formula.
    #[serde(default)]
    pub mandatory: bool,
    /// Explicit special weighting. Absent in stored data means "derive from the
    /// title marker" — see [`Course::with_derived_weighting`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_weighting: Option<SpecialWeighting>,
}

fn default_semester() -> u32 {
    1
}

fn default_graded() -> bool {
    true
}

impl Course {
    /// Effective weight under the given mode. An absent weight value defaults to 1.
    pub fn weight_in(&self, mode: WeightMode) -> f64 {
        match mode {
            WeightMode::Credits => self.credits,
            WeightMode::CourseWeight => self.weight.unwrap_or(1.0),
        }
    }

    /// Fixed final-value share, when this course carries one.
    pub fn fixed_share(&self) -> Option<f64> {
        match self.special_weighting {
            Some(SpecialWeighting::FixedShare { share }) => Some(share),
            None => None,
        }
    }

    /// Compatibility shim for stored records without an explicit
    /// `special_weighting`: derives the stock thesis share from the title
    /// marker. An explicit field always wins over the marker.
    pub fn with_derived_weighting(mut self) -> Self {
        if self.special_weighting.is_none() && title_marks_thesis(&self.title) {
            self.special_weighting = Some(SpecialWeighting::FixedShare {
                share: DEFAULT_THESIS_SHARE,
            });
        }
        self
    }
}

/// Returns true when `title` contains the thesis marker (case-insensitive).
pub fn title_marks_thesis(title: &str) -> bool {
    title.to_lowercase().contains(THESIS_TITLE_MARKER)
}

/// Recorded grades per course. Owned and mutated by the presentation layer;
/// the calculation core only reads it. An absent course is "ungraded", which
/// is distinct from any numeric value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeSelection {
    grades: HashMap<CourseId, f64>,
}

impl GradeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the grade for a course.
    pub fn record(&mut self, course_id: CourseId, grade: f64) {
        self.grades.insert(course_id, grade);
    }

    /// Drop the recorded grade, back to "ungraded".
    pub fn clear(&mut self, course_id: &str) {
        self.grades.remove(course_id);
    }

    /// Recorded grade for a course, if any.
    pub fn grade_for(&self, course_id: &str) -> Option<f64> {
        self.grades.get(course_id).copied()
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str) -> Course {
        Course {
            id: "c1".to_string(),
            title: title.to_string(),
            credits: 6.0,
            weight: None,
            semester: 1,
            graded: true,
            mandatory: true,
            special_weighting: None,
        }
    }

    #[test]
    fn test_title_marker_is_case_insensitive_substring() {
        assert!(title_marks_thesis("Bachelorarbeit"));
        assert!(title_marks_thesis("BACHELORARBEIT: Verteilte Systeme"));
        assert!(title_marks_thesis("Kolloquium zur Bachelorarbeit"));
        assert!(!title_marks_thesis("Bachelor Seminar"));
        assert!(!title_marks_thesis("Masterarbeit"));
    }

    #[test]
    fn test_derived_weighting_from_marker() {
        let c = course("Bachelorarbeit").with_derived_weighting();
        assert_eq!(
            c.special_weighting,
            Some(SpecialWeighting::FixedShare {
                share: DEFAULT_THESIS_SHARE
            })
        );
        assert_eq!(c.fixed_share(), Some(DEFAULT_THESIS_SHARE));

        let plain = course("Analysis").with_derived_weighting();
        assert_eq!(plain.special_weighting, None);
        assert_eq!(plain.fixed_share(), None);
    }

    #[test]
    fn test_explicit_weighting_wins_over_marker() {
        let mut c = course("Bachelorarbeit");
        c.special_weighting = Some(SpecialWeighting::FixedShare { share: 0.3 });
        let c = c.with_derived_weighting();
        assert_eq!(c.fixed_share(), Some(0.3));
    }

    #[test]
    fn test_weight_per_mode() {
        let mut c = course("Analysis");
        c.credits = 9.0;
        c.weight = Some(5.0);
        assert_eq!(c.weight_in(WeightMode::Credits), 9.0);
        assert_eq!(c.weight_in(WeightMode::CourseWeight), 5.0);

        c.weight = None;
        assert_eq!(c.weight_in(WeightMode::CourseWeight), 1.0);
    }

    #[test]
    fn test_selection_absence_is_distinct_from_values() {
        let mut sel = GradeSelection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.grade_for("c1"), None);

        sel.record("c1".to_string(), 2.3);
        assert_eq!(sel.grade_for("c1"), Some(2.3));
        assert_eq!(sel.len(), 1);

        sel.record("c1".to_string(), 1.7);
        assert_eq!(sel.grade_for("c1"), Some(1.7));
        assert_eq!(sel.len(), 1);

        sel.clear("c1");
        assert_eq!(sel.grade_for("c1"), None);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_course_serde_defaults() {
        let json = r#"{ "id": "a", "title": "Analysis", "credits": 6 }"#;
        let c: Course = serde_json::from_str(json).unwrap();
        assert_eq!(c.semester, 1);
        assert!(c.graded);
        assert!(!c.mandatory);
        assert_eq!(c.weight, None);
        assert_eq!(c.special_weighting, None);
    }

    #[test]
    fn test_special_weighting_serde_shape() {
        let json = r#"
        {
            "id": "ba", "title": "Abschlussmodul", "credits": 12,
            "special_weighting": { "kind": "fixedShare", "share": 0.25 }
        }"#;
        let c: Course = serde_json::from_str(json).unwrap();
        assert_eq!(c.fixed_share(), Some(0.25));

        let out = serde_json::to_string(&c).unwrap();
        assert!(out.contains("\"kind\":\"fixedShare\""));
        assert!(out.contains("\"share\":0.25"));
    }
}
