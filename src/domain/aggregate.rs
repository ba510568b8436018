//! Weighted grade aggregation.
//!
//! Regular courses fold into Σ(grade × weight) / Σ(weight), with the weight
//! picked per [`WeightMode`]. A fixed-share course (the thesis) stays out of
//! that sum and takes its share of the final value instead. There are no
//! error paths: empty selections and zero total weight resolve to 0.

use crate::domain::entities::{Course, GradeSelection, WeightMode};

/// One explanatory line item per graded course. Rebuilt on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationDetail {
    pub course: Course,
    pub grade: f64,
    /// Display weight: the formula weight, or the fixed share for a thesis row.
    pub weight: f64,
    pub weighted_grade: f64,
    pub is_thesis: bool,
}

/// Aggregation result: final value, line items, and the thesis grade when present.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeAggregate {
    /// Weighted average. 0.0 when nothing contributes weight.
    pub value: f64,
    /// One entry per graded course, in catalog iteration order.
    pub details: Vec<CalculationDetail>,
    /// Grade of the fixed-share course, when one is graded.
    pub thesis_grade: Option<f64>,
}

/// Computes the aggregate for the given catalog and selection.
///
/// Pure and idempotent: identical inputs produce an identical result,
/// including the order of the detail rows. Ungraded courses are skipped
/// entirely; they never appear as zeros in the sum or the details.
pub fn compute(courses: &[Course], selection: &GradeSelection, mode: WeightMode) -> GradeAggregate {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    // (grade, share); if several courses carry a fixed share, the last graded one wins.
    let mut thesis: Option<(f64, f64)> = None;
    let mut details = Vec::new();

    for course in courses {
        let Some(grade) = selection.grade_for(&course.id) else {
            continue;
        };

        if let Some(share) = course.fixed_share() {
            thesis = Some((grade, share));
            details.push(CalculationDetail {
                course: course.clone(),
                grade,
                weight: share,
                weighted_grade: grade * share,
                is_thesis: true,
            });
        } else {
            let weight = course.weight_in(mode);
            weighted_sum += grade * weight;
            total_weight += weight;
            details.push(CalculationDetail {
                course: course.clone(),
                grade,
                weight,
                weighted_grade: grade * weight,
                is_thesis: false,
            });
        }
    }

    let regular = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    let value = match thesis {
        // Nothing carries regular weight: the split degenerates to the thesis grade.
        Some((grade, _)) if total_weight <= 0.0 => grade,
        Some((grade, share)) => regular * (1.0 - share) + grade * share,
        None => regular,
    };

    GradeAggregate {
        value,
        details,
        thesis_grade: thesis.map(|(grade, _)| grade),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DEFAULT_THESIS_SHARE;

    fn course(id: &str, title: &str, credits: f64, weight: Option<f64>) -> Course {
        Course {
            id: id.to_string(),
            title: title.to_string(),
            credits,
            weight,
            semester: 1,
            graded: true,
            mandatory: true,
            special_weighting: None,
        }
        .with_derived_weighting()
    }

    fn select(entries: &[(&str, f64)]) -> GradeSelection {
        let mut sel = GradeSelection::new();
        for (id, grade) in entries {
            sel.record(id.to_string(), *grade);
        }
        sel
    }

    #[test]
    fn test_weighted_average_matches_formula() {
        let courses = vec![
            course("a", "Analysis", 6.0, Some(2.0)),
            course("b", "Lineare Algebra", 9.0, Some(3.0)),
        ];
        let sel = select(&[("a", 2.0), ("b", 3.0)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        // (2.0*2 + 3.0*3) / (2 + 3)
        assert!((agg.value - 2.6).abs() < 1e-9);
        assert_eq!(agg.details.len(), 2);
        assert_eq!(agg.thesis_grade, None);
    }

    #[test]
    fn test_modes_pick_different_weights() {
        let courses = vec![
            course("a", "Analysis", 9.0, Some(1.0)),
            course("b", "Proseminar", 3.0, Some(1.0)),
        ];
        let sel = select(&[("a", 1.0), ("b", 4.0)]);

        let by_weight = compute(&courses, &sel, WeightMode::CourseWeight);
        assert!((by_weight.value - 2.5).abs() < 1e-9);

        let by_credits = compute(&courses, &sel, WeightMode::Credits);
        // (1.0*9 + 4.0*3) / 12
        assert!((by_credits.value - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_absent_weight_defaults_to_one() {
        let courses = vec![
            course("a", "Analysis", 6.0, None),
            course("b", "Stochastik", 6.0, None),
        ];
        let sel = select(&[("a", 1.0), ("b", 3.0)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert!((agg.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_contributes_nothing() {
        let courses = vec![
            course("a", "Analysis", 6.0, Some(0.0)),
            course("b", "Stochastik", 6.0, Some(2.0)),
        ];
        let sel = select(&[("a", 4.0), ("b", 2.0)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert_eq!(agg.value, 2.0);
        // The zero-weight course still shows up as a line item.
        assert_eq!(agg.details.len(), 2);
        assert_eq!(agg.details[0].weighted_grade, 0.0);
    }

    #[test]
    fn test_all_weights_zero_yields_zero() {
        let courses = vec![course("a", "Analysis", 0.0, Some(0.0))];
        let sel = select(&[("a", 4.0)]);

        let agg = compute(&courses, &sel, WeightMode::Credits);
        assert_eq!(agg.value, 0.0);
        assert_eq!(agg.details.len(), 1);
    }

    #[test]
    fn test_empty_selection_yields_zero() {
        let courses = vec![course("a", "Analysis", 6.0, None)];

        let agg = compute(&courses, &GradeSelection::new(), WeightMode::Credits);
        assert_eq!(agg.value, 0.0);
        assert!(agg.details.is_empty());
        assert_eq!(agg.thesis_grade, None);
    }

    #[test]
    fn test_ungraded_courses_are_skipped_not_zeroed() {
        let courses = vec![
            course("a", "Analysis", 6.0, Some(1.0)),
            course("b", "Stochastik", 6.0, Some(99.0)),
        ];
        let sel = select(&[("a", 4.0)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert_eq!(agg.value, 4.0);
        assert_eq!(agg.details.len(), 1);
    }

    #[test]
    fn test_thesis_split() {
        // Regular average 2.3, thesis 1.7: 2.3*0.8 + 1.7*0.2 = 2.18.
        let courses = vec![
            course("1", "Algebra", 6.0, Some(1.0)),
            course("2", "Bachelorarbeit", 12.0, Some(1.0)),
        ];
        let sel = select(&[("1", 2.3), ("2", 1.7)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert!((agg.value - 2.18).abs() < 1e-9);
        assert_eq!(agg.thesis_grade, Some(1.7));

        // The thesis row displays its fixed share, not the formula weight.
        let thesis_row = agg.details.iter().find(|d| d.is_thesis).unwrap();
        assert_eq!(thesis_row.weight, DEFAULT_THESIS_SHARE);
        assert!((thesis_row.weighted_grade - 1.7 * DEFAULT_THESIS_SHARE).abs() < 1e-9);
    }

    #[test]
    fn test_thesis_excluded_from_regular_sum() {
        // Without the exclusion the 12-credit thesis would dominate in credits mode.
        let courses = vec![
            course("1", "Algebra", 6.0, None),
            course("2", "Bachelorarbeit", 12.0, None),
        ];
        let sel = select(&[("1", 3.0), ("2", 1.0)]);

        let agg = compute(&courses, &sel, WeightMode::Credits);
        // Regular average is 3.0 alone; final 3.0*0.8 + 1.0*0.2.
        assert!((agg.value - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_ungraded_thesis_does_not_trigger_the_split() {
        let courses = vec![
            course("1", "Algebra", 6.0, Some(1.0)),
            course("2", "Bachelorarbeit", 12.0, Some(1.0)),
        ];
        let sel = select(&[("1", 4.0)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert_eq!(agg.value, 4.0);
        assert_eq!(agg.details.len(), 1);
        assert_eq!(agg.thesis_grade, None);
    }

    #[test]
    fn test_thesis_alone_degenerates_to_thesis_grade() {
        let courses = vec![
            course("a", "Analysis", 6.0, None),
            course("t", "Bachelorarbeit", 12.0, Some(1.0)),
        ];
        let sel = select(&[("t", 1.7)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert_eq!(agg.value, 1.7);
        assert_eq!(agg.thesis_grade, Some(1.7));
        assert_eq!(agg.details.len(), 1);
        assert!(agg.details[0].is_thesis);
    }

    #[test]
    fn test_custom_share_is_honored() {
        let mut thesis = course("t", "Abschlussmodul", 12.0, Some(1.0));
        thesis.special_weighting =
            Some(crate::domain::entities::SpecialWeighting::FixedShare { share: 0.5 });
        let courses = vec![course("a", "Analysis", 6.0, Some(1.0)), thesis];
        let sel = select(&[("a", 3.0), ("t", 1.0)]);

        let agg = compute(&courses, &sel, WeightMode::CourseWeight);
        assert!((agg.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent_including_detail_order() {
        let courses = vec![
            course("a", "Analysis", 6.0, Some(2.0)),
            course("b", "Stochastik", 9.0, Some(3.0)),
            course("t", "Bachelorarbeit", 12.0, Some(1.0)),
        ];
        let sel = select(&[("a", 2.0), ("b", 3.0), ("t", 1.3)]);

        let first = compute(&courses, &sel, WeightMode::CourseWeight);
        let second = compute(&courses, &sel, WeightMode::CourseWeight);
        assert_eq!(first, second);

        let ids: Vec<&str> = first.details.iter().map(|d| d.course.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "t"]);
    }
}
