use super::super::domain::{CourseKey, RequirementCourse, TranscriptDocument};
use super::super::equivalence::EquivalenceSet;
use super::super::grading::grade_value;

/// Everything a single pass over the transcript learned about one requirement.
pub(crate) struct MatchSignals {
    pub met: bool,
    pub failed: bool,
    pub student_grade: Option<String>,
    pub fulfilling_course: String,
    pub met_by_alternative: bool,
    pub higher_level: Option<HigherLevelMatch>,
    pub other_grades: Vec<String>,
}

pub(crate) struct HigherLevelMatch {
    pub course_name: String,
    pub grade: String,
}

pub(crate) fn scan_transcript(
    course: &RequirementCourse,
    equivalents: &EquivalenceSet,
    document: &TranscriptDocument,
) -> MatchSignals {
    let requirement_key = CourseKey::new(&course.name);
    let required_value = grade_value(&course.required_grade);

    let mut signals = MatchSignals {
        met: false,
        failed: false,
        student_grade: None,
        fulfilling_course: course.name.clone(),
        met_by_alternative: false,
        higher_level: None,
        other_grades: Vec::new(),
    };

    for subject in &document.subjects {
        let grade = subject.grade.trim();
        let value = grade_value(grade);

        if subject.is_identified_by(&requirement_key) {
            if value >= required_value && value > 0.0 {
                signals.met = true;
                signals.student_grade = Some(grade.to_string());
                signals.fulfilling_course = course.name.clone();
            } else if value == 0.0 {
                signals.failed = true;
                signals.student_grade = Some(grade.to_string());
                signals.fulfilling_course = course.name.clone();
            } else if signals.student_grade.is_none() {
                signals.student_grade = Some(grade.to_string());
            }
            continue;
        }

        let Some(equivalent) = equivalents.first_match(subject) else {
            continue;
        };

        if value >= required_value && value > 0.0 {
            if equivalent.level == course.level {
                signals.met = true;
                signals.met_by_alternative = true;
                signals.student_grade = Some(grade.to_string());
                signals.fulfilling_course = equivalent.name.clone();
            } else if equivalent.level > course.level {
                signals.higher_level = Some(HigherLevelMatch {
                    course_name: equivalent.name.clone(),
                    grade: grade.to_string(),
                });
            }
        } else {
            if value == 0.0 {
                signals.failed = true;
            }
            signals
                .other_grades
                .push(format!("{}: {}", subject.subject_name, subject.grade));
        }
    }

    signals
}
