//! Catalog store adapters. Implement CatalogPort.

pub mod catalog_json;
pub mod catalog_sqlite;
pub mod demo;

pub use catalog_json::JsonCatalog;
pub use catalog_sqlite::SqliteCatalog;
pub use demo::DemoCatalog;

use crate::domain::DomainError;
use crate::domain::entities::Course;

/// Shared post-load step for every store: reject invalid weights before the
/// calculation core sees them, clamp the 1-based semester, then run the
/// title-marker shim on records without an explicit special weighting.
pub(crate) fn finalize_courses(courses: Vec<Course>) -> Result<Vec<Course>, DomainError> {
    for course in &courses {
        if !course.credits.is_finite() || course.credits < 0.0 {
            return Err(DomainError::Catalog(format!(
                "course '{}': invalid credits {}",
                course.title, course.credits
            )));
        }
        if let Some(w) = course.weight {
            if !w.is_finite() || w < 0.0 {
                return Err(DomainError::Catalog(format!(
                    "course '{}': invalid weight {}",
                    course.title, w
                )));
            }
        }
        if let Some(share) = course.fixed_share() {
            if !share.is_finite() || !(0.0..=1.0).contains(&share) {
                return Err(DomainError::Catalog(format!(
                    "course '{}': fixed share {} outside [0, 1]",
                    course.title, share
                )));
            }
        }
    }
    Ok(courses
        .into_iter()
        .map(|mut course| {
            // Grouping is 1-based; stored data occasionally says 0.
            course.semester = course.semester.max(1);
            course.with_derived_weighting()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DEFAULT_THESIS_SHARE, SpecialWeighting};

    fn course(title: &str, credits: f64, weight: Option<f64>) -> Course {
        Course {
            id: title.to_lowercase(),
            title: title.to_string(),
            credits,
            weight,
            semester: 1,
            graded: true,
            mandatory: true,
            special_weighting: None,
        }
    }

    #[test]
    fn test_negative_credits_are_rejected() {
        let err = finalize_courses(vec![course("Analysis", -1.0, None)]).unwrap_err();
        assert!(matches!(err, DomainError::Catalog(_)));
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let err = finalize_courses(vec![course("Analysis", 6.0, Some(-2.0))]).unwrap_err();
        assert!(err.to_string().contains("invalid weight"));
    }

    #[test]
    fn test_share_outside_unit_interval_is_rejected() {
        let mut c = course("Abschlussmodul", 12.0, None);
        c.special_weighting = Some(SpecialWeighting::FixedShare { share: 1.5 });
        let err = finalize_courses(vec![c]).unwrap_err();
        assert!(err.to_string().contains("fixed share"));
    }

    #[test]
    fn test_semester_zero_is_clamped_to_one() {
        let mut c = course("Analysis", 6.0, None);
        c.semester = 0;
        let out = finalize_courses(vec![c]).unwrap();
        assert_eq!(out[0].semester, 1);
    }

    #[test]
    fn test_marker_shim_runs_after_validation() {
        let out = finalize_courses(vec![
            course("Analysis", 6.0, None),
            course("Bachelorarbeit", 12.0, None),
        ])
        .unwrap();
        assert_eq!(out[0].fixed_share(), None);
        assert_eq!(out[1].fixed_share(), Some(DEFAULT_THESIS_SHARE));
    }
}
