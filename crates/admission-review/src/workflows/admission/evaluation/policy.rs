use serde::{Deserialize, Serialize};

use super::super::domain::RequirementCourse;
use super::rules::MatchSignals;

/// Grade reported when the canonical course or a same-level alternative failed.
pub const FAILED_GRADE: &str = "F";
/// Grade reported when no transcript subject matched the requirement.
pub const NOT_ATTEMPTED_GRADE: &str = "N/A";

/// Verdict for one requirement course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementResult {
    /// Requirement course name as configured.
    pub requirement: String,
    /// Course that fulfilled (or was checked for) the requirement.
    pub course_name: String,
    pub required_grade: String,
    pub is_met: bool,
    pub student_grade: String,
    pub met_by_alternative_course: bool,
    pub alternative_course_name: Option<String>,
    pub alternative_course_grade: Option<String>,
    pub met_by_higher_level_course: bool,
    pub higher_level_course_name: Option<String>,
    pub higher_level_course_grade: Option<String>,
    pub other_grades_in_alternatives: Vec<String>,
}

impl RequirementResult {
    pub fn summary(&self) -> String {
        if self.is_met && self.met_by_alternative_course {
            format!(
                "{} met by alternative {} with {} (required {})",
                self.requirement, self.course_name, self.student_grade, self.required_grade
            )
        } else if self.is_met {
            format!(
                "{} met with {} (required {})",
                self.requirement, self.student_grade, self.required_grade
            )
        } else if self.student_grade == NOT_ATTEMPTED_GRADE {
            format!(
                "{} not met: no matching course (required {})",
                self.requirement, self.required_grade
            )
        } else {
            format!(
                "{} not met: {} (required {})",
                self.requirement, self.student_grade, self.required_grade
            )
        }
    }
}

/// A same-level failure overrides any pass; a higher-level pass alone is
/// informational only.
pub(crate) fn settle(course: &RequirementCourse, signals: MatchSignals) -> RequirementResult {
    let MatchSignals {
        met,
        failed,
        student_grade,
        fulfilling_course,
        met_by_alternative,
        higher_level,
        other_grades,
    } = signals;

    let is_met = met && !failed;
    let student_grade = if failed {
        FAILED_GRADE.to_string()
    } else {
        student_grade.unwrap_or_else(|| NOT_ATTEMPTED_GRADE.to_string())
    };

    let (higher_level_course_name, higher_level_course_grade) = match higher_level {
        Some(higher) => (Some(higher.course_name), Some(higher.grade)),
        None => (None, None),
    };

    RequirementResult {
        requirement: course.name.clone(),
        alternative_course_name: met_by_alternative.then(|| fulfilling_course.clone()),
        alternative_course_grade: met_by_alternative.then(|| student_grade.clone()),
        course_name: fulfilling_course,
        required_grade: course.required_grade.clone(),
        is_met,
        student_grade,
        met_by_alternative_course: met_by_alternative,
        met_by_higher_level_course: higher_level_course_name.is_some(),
        higher_level_course_name,
        higher_level_course_grade,
        other_grades_in_alternatives: other_grades,
    }
}
