use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{
    parse_points, MeritCourseConfig, RequirementTree, SubjectRecord, TranscriptDocument,
};
use super::equivalence::resolve;
use super::evaluation::{EvaluationError, NOT_ATTEMPTED_GRADE};
use super::grading::grade_value;
use crate::workflows::catalog::CourseCatalog;

/// Where a merit entry's contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    /// A transcript subject matched the entry's code or an alternative code.
    Transcript,
    /// Not taken; nominal points came from the catalog at grade value 0.
    Catalog,
    /// Unknown to both the transcript and the catalog; excluded entirely.
    Skipped,
}

/// One entry's share of the weighted average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeritContribution {
    pub code: String,
    pub source: ContributionSource,
    pub grade_value: f64,
    pub weight: u32,
}

/// Per-course merit points for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeritPointResult {
    pub course_name: String,
    pub student_grade: String,
    pub merit_point: f64,
    pub original_course: String,
    pub alternative_course: Option<String>,
    pub other_alternatives: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured_points: Option<String>,
}

/// Credit-weighted merit average over the configured course list.
#[derive(Debug, Clone, Default)]
pub struct MeritPointCalculator {
    catalog: CourseCatalog,
}

impl MeritPointCalculator {
    pub fn new(catalog: CourseCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// `Σ(value × weight) / Σ(weight)` rounded to two decimals; 0 when nothing
    /// carries weight.
    pub fn average(&self, document: &TranscriptDocument, courses: &[MeritCourseConfig]) -> f64 {
        let contributions = self.contributions(document, courses);
        weighted_average(
            contributions
                .iter()
                .filter(|contribution| contribution.source != ContributionSource::Skipped)
                .map(|contribution| (contribution.grade_value, contribution.weight)),
        )
    }

    pub fn contributions(
        &self,
        document: &TranscriptDocument,
        courses: &[MeritCourseConfig],
    ) -> Vec<MeritContribution> {
        courses
            .iter()
            .map(|course| self.contribution(document, course))
            .collect()
    }

    fn contribution(
        &self,
        document: &TranscriptDocument,
        course: &MeritCourseConfig,
    ) -> MeritContribution {
        if let Some(subject) = matching_subject(document, course) {
            let weight = subject_weight(subject);
            let value = grade_value(&subject.grade);
            debug!(
                code = %course.code,
                subject = %subject.subject_name,
                value,
                weight,
                "merit course taken"
            );
            return MeritContribution {
                code: course.code.clone(),
                source: ContributionSource::Transcript,
                grade_value: value,
                weight,
            };
        }

        if let Some(entry) = course.codes().find_map(|code| self.catalog.lookup(code)) {
            let weight = entry.points.unwrap_or(0);
            debug!(
                code = %course.code,
                weight,
                "merit course not taken; catalog points at zero value"
            );
            return MeritContribution {
                code: course.code.clone(),
                source: ContributionSource::Catalog,
                grade_value: 0.0,
                weight,
            };
        }

        warn!(
            code = %course.code,
            "merit course found in neither transcript nor catalog; skipping"
        );
        MeritContribution {
            code: course.code.clone(),
            source: ContributionSource::Skipped,
            grade_value: 0.0,
            weight: 0,
        }
    }

    /// Per-entry merit points, `"N/A"` with zero points for untaken courses.
    pub fn breakdown(
        &self,
        document: &TranscriptDocument,
        courses: &[MeritCourseConfig],
    ) -> Vec<MeritPointResult> {
        courses
            .iter()
            .map(|course| {
                let alternative_names: Vec<String> = course
                    .alternative_courses
                    .iter()
                    .map(|alternative| alternative.name.clone())
                    .collect();
                let (course_name, student_grade, merit_point) =
                    match matching_subject(document, course) {
                        Some(subject) => (
                            subject.subject_name.clone(),
                            subject.grade.clone(),
                            grade_value(&subject.grade),
                        ),
                        None => (course.name.clone(), NOT_ATTEMPTED_GRADE.to_string(), 0.0),
                    };

                MeritPointResult {
                    course_name,
                    student_grade,
                    merit_point,
                    original_course: course.name.clone(),
                    alternative_course: alternative_names.first().cloned(),
                    other_alternatives: alternative_names,
                    configured_points: course.gymnasium_points.clone(),
                }
            })
            .collect()
    }
}

/// Average over requirement-tree courses flagged `includeInAverage`, matched
/// through the level-aware equivalence sets.
pub fn average_flagged(
    document: &TranscriptDocument,
    tree: &RequirementTree,
) -> Result<f64, EvaluationError> {
    if tree.is_empty() {
        return Err(EvaluationError::MissingRequirements);
    }

    let pairs = tree
        .courses()
        .filter(|course| course.include_in_average)
        .filter_map(|course| {
            let equivalents = resolve(&course.name, tree);
            document
                .subjects
                .iter()
                .find(|subject| equivalents.first_match(subject).is_some())
                .map(|subject| (grade_value(&subject.grade), subject_weight(subject)))
        })
        .collect::<Vec<_>>();

    Ok(weighted_average(pairs))
}

fn matching_subject<'a>(
    document: &'a TranscriptDocument,
    course: &MeritCourseConfig,
) -> Option<&'a SubjectRecord> {
    let codes = course.code_keys();
    document.subjects.iter().find(|subject| {
        let code = subject.code_key();
        codes.iter().any(|candidate| candidate.matches(&code))
    })
}

fn subject_weight(subject: &SubjectRecord) -> u32 {
    if parse_points(&subject.gymnasium_points).is_none() {
        warn!(
            subject = %subject.subject_name,
            points = %subject.gymnasium_points,
            "credit weight is not a whole number; counting it as 0"
        );
    }
    subject.credit_weight()
}

fn weighted_average(pairs: impl IntoIterator<Item = (f64, u32)>) -> f64 {
    let (weighted, total) = pairs
        .into_iter()
        .fold((0.0_f64, 0_u64), |(weighted, total), (value, weight)| {
            (weighted + value * f64::from(weight), total + u64::from(weight))
        });

    if total == 0 {
        return 0.0;
    }

    round_to_cents(weighted / total as f64)
}

/// Two-decimal rounding with ties to even.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
