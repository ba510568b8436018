//! Retake recommendations.
//!
//! Ranks graded courses by how much a retake would pull the average down.
//! Eligible is everything graded strictly worse than [`BEST_GRADE`]. The
//! score blends the course weight with the improvement headroom; a
//! fixed-share course gets a multiplicative boost since its grade bypasses
//! the regular denominator. The tuning values are empirical, not derived.

use std::cmp::Ordering;

use crate::domain::aggregate;
use crate::domain::entities::{BEST_GRADE, Course, GradeSelection, WeightMode};

/// Boost applied to the impact score of a fixed-share course.
pub const DEFAULT_THESIS_BOOST: f64 = 5.0;
/// Impact scores closer together than this count as tied.
pub const DEFAULT_TIE_TOLERANCE: f64 = 0.1;
/// A hypothetical retake improves the grade by one full step, clamped at best.
pub const RETAKE_STEP: f64 = 1.0;
/// At most this many suggestions are returned.
pub const MAX_SUGGESTIONS: usize = 2;

/// Ranking knobs. The defaults reproduce the stock behavior; config can
/// override them per installation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetakeTuning {
    pub thesis_boost: f64,
    pub tie_tolerance: f64,
}

impl Default for RetakeTuning {
    fn default() -> Self {
        Self {
            thesis_boost: DEFAULT_THESIS_BOOST,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
        }
    }
}

/// One retake suggestion. Rebuilt on every call, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RetakeCandidate {
    pub course: Course,
    pub current_grade: f64,
    /// Effective weight under the active mode.
    pub weight: f64,
    /// Distance to the best attainable grade.
    pub improvement_potential: f64,
    /// Aggregate delta for a one-step regrade (≤ 0; more negative is better).
    pub hypothetical_impact: f64,
    pub is_thesis: bool,
    /// weight × improvement_potential, boosted for fixed-share courses.
    pub impact_score: f64,
}

/// Returns up to [`MAX_SUGGESTIONS`] candidates, best first.
///
/// Reads the selection but never mutates it; the what-if regrades run on a
/// private copy. Recomputing the full aggregate per candidate is deliberate,
/// the hypothetical delta has to honor the thesis split exactly.
pub fn recommend(
    courses: &[Course],
    selection: &GradeSelection,
    mode: WeightMode,
    tuning: &RetakeTuning,
) -> Vec<RetakeCandidate> {
    let current = aggregate::compute(courses, selection, mode);

    let mut candidates = Vec::new();
    for course in courses {
        let Some(grade) = selection.grade_for(&course.id) else {
            continue;
        };
        // A perfect grade has no headroom.
        if grade <= BEST_GRADE {
            continue;
        }

        let is_thesis = course.fixed_share().is_some();
        let weight = course.weight_in(mode);
        let improvement_potential = grade - BEST_GRADE;

        let mut regraded = selection.clone();
        regraded.record(course.id.clone(), (grade - RETAKE_STEP).max(BEST_GRADE));
        let hypothetical = aggregate::compute(courses, &regraded, mode);
        let hypothetical_impact = hypothetical.value - current.value;

        let mut impact_score = weight * improvement_potential;
        if is_thesis {
            impact_score *= tuning.thesis_boost;
        }

        candidates.push(RetakeCandidate {
            course: course.clone(),
            current_grade: grade,
            weight,
            improvement_potential,
            hypothetical_impact,
            is_thesis,
            impact_score,
        });
    }

    candidates.sort_by(pre_rank);
    candidates.truncate(MAX_SUGGESTIONS);
    settle_near_tie(&mut candidates, tuning.tie_tolerance);
    candidates
}

/// Pre-ranking fed to the sort: thesis before everything, then the higher
/// impact score, then the bigger realized improvement (more negative delta).
/// Total over all inputs, which `sort_by` requires; "within tolerance" is
/// not transitive, so the tolerance rule stays out of this comparator and
/// is settled on the kept pair afterwards. `sort_by` is stable, so full
/// ties keep catalog order.
fn pre_rank(a: &RetakeCandidate, b: &RetakeCandidate) -> Ordering {
    match (a.is_thesis, b.is_thesis) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    b.impact_score
        .total_cmp(&a.impact_score)
        .then_with(|| a.hypothetical_impact.total_cmp(&b.hypothetical_impact))
}

/// Impact scores within `tie_tolerance` of each other (inclusive) count as
/// tied; between the two reported suggestions the bigger realized
/// improvement then wins, even when its score is nominally lower.
fn settle_near_tie(candidates: &mut [RetakeCandidate], tie_tolerance: f64) {
    if candidates.len() < 2 {
        return;
    }
    let (first, second) = (&candidates[0], &candidates[1]);
    let tied = first.is_thesis == second.is_thesis
        && (first.impact_score - second.impact_score).abs() <= tie_tolerance;
    if tied && second.hypothetical_impact < first.hypothetical_impact {
        candidates.swap(0, 1);
    }
}
