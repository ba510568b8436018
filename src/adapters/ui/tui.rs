//! Implements InputPort. Inquire-based interactive planning session.
//!
//! Owns the per-session state the core treats as input: the recorded grades
//! and the credits-vs-weight toggle. Recomputes the snapshot after every
//! grade change so the running average is always visible.

use crate::domain::DomainError;
use crate::domain::aggregate::GradeAggregate;
use crate::domain::entities::{
    BEST_GRADE, Course, FAILED_GRADE, GRADE_STEPS, GradeSelection, WeightMode,
};
use crate::domain::retake::RETAKE_STEP;
use crate::ports::InputPort;
use crate::usecases::{PlannerService, PlannerSnapshot, SemesterGroup};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Select};
use std::sync::Arc;

const MENU_GRADES: &str = "Enter grades";
const MENU_OVERVIEW: &str = "Show overview";
const MENU_SUGGESTIONS: &str = "Retake suggestions";
const MENU_RELOAD: &str = "Reload catalog";
const MENU_EXPORT: &str = "Export overview";
const MENU_QUIT: &str = "Quit";

const PASS_LABEL: &str = "Bestanden (1.0)";
const FAIL_LABEL: &str = "Nicht bestanden";
const CLEAR_LABEL: &str = "Clear grade";

/// Applies the prompt theme for all subsequent inquire prompts.
/// Called once from `init_ui`.
pub fn apply_theme() {
    let cfg = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("»").with_fg(Color::LightBlue))
        .with_answered_prompt_prefix(Styled::new("✓").with_fg(Color::LightGreen))
        .with_highlighted_option_prefix(Styled::new("›").with_fg(Color::LightCyan))
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightCyan)));
    inquire::set_global_render_config(cfg);
}

/// TUI adapter. Inquire prompts around the planner service.
pub struct PlannerTui {
    planner: Arc<PlannerService>,
    initial_mode: WeightMode,
}

impl PlannerTui {
    pub fn new(planner: Arc<PlannerService>, initial_mode: WeightMode) -> Self {
        Self {
            planner,
            initial_mode,
        }
    }

    /// Semester picker, then course-by-course grading until the user backs out.
    async fn enter_grades(
        &self,
        selection: &mut GradeSelection,
        mode: WeightMode,
    ) -> Result<(), DomainError> {
        loop {
            let groups = self.planner.semesters().await;
            if groups.is_empty() {
                println!("The catalog is empty.");
                return Ok(());
            }
            let single = groups.len() == 1;

            let group = if single {
                match groups.into_iter().next() {
                    Some(g) => g,
                    None => return Ok(()),
                }
            } else {
                let labels: Vec<String> = groups.iter().map(semester_label).collect();
                let index = match Select::new("Semester:", labels).raw_prompt() {
                    Ok(picked) => picked.index,
                    Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                        return Ok(());
                    }
                    Err(e) => return Err(DomainError::Prompt(e.to_string())),
                };
                match groups.into_iter().nth(index) {
                    Some(g) => g,
                    None => return Ok(()),
                }
            };

            self.grade_courses_in(&group, selection, mode).await?;

            if single {
                return Ok(());
            }
        }
    }

    /// Grade courses of one semester until Esc. Mandatory courses are listed
    /// first; optional ones start hidden behind a show/hide entry, unless the
    /// semester has nothing else.
    async fn grade_courses_in(
        &self,
        group: &SemesterGroup,
        selection: &mut GradeSelection,
        mode: WeightMode,
    ) -> Result<(), DomainError> {
        let mut show_optional = group.mandatory.is_empty();
        loop {
            let courses = visible_courses(group, show_optional);
            let mut labels: Vec<String> =
                courses.iter().map(|c| course_line(c, selection)).collect();
            let toggle = optional_toggle_label(group, show_optional);
            if let Some(label) = &toggle {
                labels.push(label.clone());
            }

            let prompt = format!("Semester {} — pick a course:", group.semester);
            let index = match Select::new(&prompt, labels).raw_prompt() {
                Ok(picked) => picked.index,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(DomainError::Prompt(e.to_string())),
            };
            if toggle.is_some() && index == courses.len() {
                show_optional = !show_optional;
                continue;
            }
            let Some(course) = courses.get(index) else {
                return Ok(());
            };

            if pick_grade(course, selection)? {
                let snap = self.planner.snapshot(selection, mode).await;
                print_status_line(&snap, mode);
            }
        }
    }
}

#[async_trait]
impl InputPort for PlannerTui {
    async fn run(&self) -> Result<(), DomainError> {
        let mut selection = GradeSelection::new();
        let mut mode = self.initial_mode;

        loop {
            let toggle_label = format!("Switch weighting (current: {})", mode.label());
            let options = vec![
                MENU_GRADES.to_string(),
                MENU_OVERVIEW.to_string(),
                MENU_SUGGESTIONS.to_string(),
                toggle_label.clone(),
                MENU_RELOAD.to_string(),
                MENU_EXPORT.to_string(),
                MENU_QUIT.to_string(),
            ];

            let choice = match Select::new("What next?", options).prompt() {
                Ok(c) => c,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(e) => return Err(DomainError::Prompt(e.to_string())),
            };

            match choice.as_str() {
                MENU_GRADES => self.enter_grades(&mut selection, mode).await?,
                MENU_OVERVIEW => {
                    let snap = self.planner.snapshot(&selection, mode).await;
                    print_overview(&snap.aggregate, mode);
                }
                MENU_SUGGESTIONS => {
                    let snap = self.planner.snapshot(&selection, mode).await;
                    print_suggestions(&snap);
                }
                s if s == toggle_label => {
                    mode = match mode {
                        WeightMode::Credits => WeightMode::CourseWeight,
                        WeightMode::CourseWeight => WeightMode::Credits,
                    };
                    let snap = self.planner.snapshot(&selection, mode).await;
                    print_status_line(&snap, mode);
                }
                MENU_RELOAD => match self.planner.reload().await {
                    // Recorded grades survive; ids that vanished simply stop matching.
                    Ok(count) => println!("Catalog reloaded: {} courses.", count),
                    Err(e) => println!("Reload failed, keeping the current catalog: {}", e),
                },
                MENU_EXPORT => match self.planner.export_overview(&selection, mode).await {
                    Ok(path) => println!("Overview written to {}", path.display()),
                    Err(e) => println!("Export failed: {}", e),
                },
                _ => break,
            }
        }

        Ok(())
    }
}

/// Prompt for one course's grade. Returns true when the selection changed.
fn pick_grade(course: &Course, selection: &mut GradeSelection) -> Result<bool, DomainError> {
    let mut options: Vec<String> = if course.graded {
        GRADE_STEPS.iter().map(|g| grade_label(*g)).collect()
    } else {
        vec![PASS_LABEL.to_string(), FAIL_LABEL.to_string()]
    };
    if selection.grade_for(&course.id).is_some() {
        options.push(CLEAR_LABEL.to_string());
    }

    let prompt = format!("Grade for {}:", course.title);
    let choice = match Select::new(&prompt, options).prompt() {
        Ok(c) => c,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(false);
        }
        Err(e) => return Err(DomainError::Prompt(e.to_string())),
    };

    match choice.as_str() {
        CLEAR_LABEL => selection.clear(&course.id),
        PASS_LABEL => selection.record(course.id.clone(), BEST_GRADE),
        // A failed pass/fail course stays out of the average entirely.
        FAIL_LABEL => selection.clear(&course.id),
        s => {
            if let Some(grade) = parse_grade_label(s) {
                selection.record(course.id.clone(), grade);
            }
        }
    }
    Ok(true)
}

/// Grade labels start with the numeric value ("5.0 (nicht bestanden)").
fn parse_grade_label(s: &str) -> Option<f64> {
    s.split_whitespace().next()?.parse().ok()
}

fn grade_label(grade: f64) -> String {
    if grade == FAILED_GRADE {
        format!("{:.1} (nicht bestanden)", grade)
    } else {
        format!("{:.1}", grade)
    }
}

/// Courses offered by the picker: mandatory always, optional only when shown.
fn visible_courses(group: &SemesterGroup, show_optional: bool) -> Vec<&Course> {
    if show_optional {
        group.mandatory.iter().chain(group.optional.iter()).collect()
    } else {
        group.mandatory.iter().collect()
    }
}

fn optional_toggle_label(group: &SemesterGroup, show_optional: bool) -> Option<String> {
    if group.optional.is_empty() {
        None
    } else if show_optional {
        Some("Hide optional courses".to_string())
    } else {
        Some(format!("Show optional courses ({})", group.optional.len()))
    }
}

fn semester_label(group: &SemesterGroup) -> String {
    format!(
        "Semester {} ({} mandatory, {} optional)",
        group.semester,
        group.mandatory.len(),
        group.optional.len()
    )
}

fn course_line(course: &Course, selection: &GradeSelection) -> String {
    let mut line = format!("{} ({} ECTS", course.title, course.credits);
    if let Some(w) = course.weight {
        line.push_str(&format!(", {}%", w));
    }
    if !course.graded {
        line.push_str(", pass/fail");
    }
    if !course.mandatory {
        line.push_str(", optional");
    }
    line.push(')');
    if let Some(g) = selection.grade_for(&course.id) {
        line.push_str(&format!("  [{:.1}]", g));
    }
    line
}

fn truncated(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        title.to_string()
    } else {
        let cut: String = title.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// One-line running status after a grade change or mode switch.
fn print_status_line(snapshot: &PlannerSnapshot, mode: WeightMode) {
    let agg = &snapshot.aggregate;
    if agg.details.is_empty() {
        println!("  No grades recorded yet.");
        return;
    }
    let mut line = format!(
        "  GPA {:.2} ({} graded, {})",
        agg.value,
        agg.details.len(),
        mode.label()
    );
    if let Some(best) = snapshot.suggestions.first() {
        line.push_str(&format!(
            "  |  best retake: {} ({:+.2})",
            best.course.title, best.hypothetical_impact
        ));
    }
    println!("{}", line);
}

/// Full calculation breakdown, one row per graded course.
fn print_overview(agg: &GradeAggregate, mode: WeightMode) {
    println!();
    if agg.details.is_empty() {
        println!("No grades recorded yet.");
        println!();
        return;
    }

    println!(
        "Your GPA: {:.2} (based on {} courses, {})",
        agg.value,
        agg.details.len(),
        mode.label()
    );
    println!();
    for d in &agg.details {
        let marker = if d.is_thesis { "  [thesis]" } else { "" };
        println!(
            "  {:<38} {:>4.1} × {:<5} = {:.2}{}",
            truncated(&d.course.title, 38),
            d.grade,
            d.weight,
            d.weighted_grade,
            marker
        );
    }

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

    println!("  {:-<62}", "");
    if regular_weight > 0.0 {
        println!(
            "  Regular: {} ÷ {} = {:.2}",
            regular_sum,
            regular_weight,
            regular_sum / regular_weight
        );
    }
    if let Some(thesis) = agg.thesis_grade {
        let share = agg
            .details
            .iter()
            .find(|d| d.is_thesis)
            .map(|d| d.weight)
            .unwrap_or(0.0);
        if regular_weight > 0.0 {
            println!(
                "  Final:   {:.2} × {:.0}% + {:.1} × {:.0}% = {:.2}",
                regular_sum / regular_weight,
                (1.0 - share) * 100.0,
                thesis,
                share * 100.0,
                agg.value
            );
        } else {
            println!("  Final:   thesis only = {:.2}", agg.value);
        }
    }
    println!();
}

fn print_suggestions(snapshot: &PlannerSnapshot) {
    println!();
    if snapshot.suggestions.is_empty() {
        println!(
            "No retake suggestions. Nothing is graded worse than {:.1}.",
            BEST_GRADE
        );
        println!();
        return;
    }

    let gpa = snapshot.aggregate.value;
    for (i, c) in snapshot.suggestions.iter().enumerate() {
        let thesis = if c.is_thesis { " (thesis)" } else { "" };
        println!("{}. {}{}", i + 1, c.course.title, thesis);
        println!(
            "   current {:.1} → retake target {:.1}  |  impact score {:.2}  |  GPA {:.2} → {:.2}",
            c.current_grade,
            (c.current_grade - RETAKE_STEP).max(BEST_GRADE),
            c.impact_score,
            gpa,
            gpa + c.hypothetical_impact
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, weight: Option<f64>, graded: bool, mandatory: bool) -> Course {
        Course {
            id: "c1".to_string(),
            title: title.to_string(),
            credits: 6.0,
            weight,
            semester: 1,
            graded,
            mandatory,
            special_weighting: None,
        }
    }

    #[test]
    fn test_grade_labels_parse_back() {
        assert_eq!(parse_grade_label("2.3"), Some(2.3));
        assert_eq!(parse_grade_label("5.0 (nicht bestanden)"), Some(5.0));
        assert_eq!(parse_grade_label(CLEAR_LABEL), None);
        assert_eq!(parse_grade_label(FAIL_LABEL), None);

        for g in GRADE_STEPS {
            assert_eq!(parse_grade_label(&grade_label(*g)), Some(*g));
        }
    }

    #[test]
    fn test_course_line_badges() {
        let sel = GradeSelection::new();

        let full = course("Analysis", Some(5.0), true, true);
        assert_eq!(course_line(&full, &sel), "Analysis (6 ECTS, 5%)");

        let optional = course("Proseminar", None, false, false);
        assert_eq!(
            course_line(&optional, &sel),
            "Proseminar (6 ECTS, pass/fail, optional)"
        );
    }

    #[test]
    fn test_course_line_shows_recorded_grade() {
        let mut sel = GradeSelection::new();
        sel.record("c1".to_string(), 1.7);
        let c = course("Analysis", None, true, true);
        assert_eq!(course_line(&c, &sel), "Analysis (6 ECTS)  [1.7]");
    }

    #[test]
    fn test_optional_courses_hidden_until_toggled() {
        let group = SemesterGroup {
            semester: 1,
            mandatory: vec![course("Analysis", None, true, true)],
            optional: vec![course("Proseminar", None, true, false)],
        };

        let hidden = visible_courses(&group, false);
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].title, "Analysis");
        assert_eq!(
            optional_toggle_label(&group, false).as_deref(),
            Some("Show optional courses (1)")
        );

        let shown = visible_courses(&group, true);
        assert_eq!(shown.len(), 2);
        assert_eq!(
            optional_toggle_label(&group, true).as_deref(),
            Some("Hide optional courses")
        );
    }

    #[test]
    fn test_no_toggle_without_optional_courses() {
        let group = SemesterGroup {
            semester: 1,
            mandatory: vec![course("Analysis", None, true, true)],
            optional: Vec::new(),
        };
        assert_eq!(optional_toggle_label(&group, false), None);
        assert_eq!(optional_toggle_label(&group, true), None);
    }

    #[test]
    fn test_semester_label_counts() {
        let group = SemesterGroup {
            semester: 2,
            mandatory: vec![course("A", None, true, true)],
            optional: vec![
                course("B", None, true, false),
                course("C", None, true, false),
            ],
        };
        assert_eq!(semester_label(&group), "Semester 2 (1 mandatory, 2 optional)");
    }

    #[test]
    fn test_truncated_keeps_short_titles() {
        assert_eq!(truncated("Analysis", 38), "Analysis");
        let long = "Algorithmen und Datenstrukturen für sehr lange Modulnamen";
        let cut = truncated(long, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with('…'));
    }
}
