use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{MeritCourseConfig, RequirementTree, TranscriptDocument};
use super::evaluation::{EvaluationError, RequirementEvaluator, RequirementReport};
use super::intake::{IntakeGuard, IntakePolicy, IntakeViolation, UnrecognizedGrade};
use super::merge::merge_documents;
use super::merit::{average_flagged, MeritPointCalculator, MeritPointResult};
use super::store::{ConfigStore, StoreError};
use crate::workflows::catalog::CourseCatalog;

/// Everything the review screen shows for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub merged: TranscriptDocument,
    pub requirements: RequirementReport,
    pub meets_all_requirements: bool,
    pub merit_average: f64,
    /// Average over requirement courses flagged for inclusion.
    pub flagged_average: f64,
    pub merit_breakdown: Vec<MeritPointResult>,
    pub unrecognized_grades: Vec<UnrecognizedGrade>,
    pub has_valid_degree: bool,
}

/// Service composing the intake guard, configuration store, evaluator and
/// merit calculator.
pub struct AdmissionReviewService<S> {
    guard: IntakeGuard,
    store: Arc<S>,
    calculator: MeritPointCalculator,
}

impl<S> AdmissionReviewService<S>
where
    S: ConfigStore + 'static,
{
    pub fn new(store: Arc<S>, catalog: CourseCatalog) -> Self {
        Self::with_policy(store, catalog, IntakePolicy::default())
    }

    pub fn with_policy(store: Arc<S>, catalog: CourseCatalog, policy: IntakePolicy) -> Self {
        Self {
            guard: IntakeGuard::with_policy(policy),
            store,
            calculator: MeritPointCalculator::new(catalog),
        }
    }

    pub fn catalog(&self) -> &CourseCatalog {
        self.calculator.catalog()
    }

    /// Merge the student's documents, then check requirements and compute
    /// merit averages against the stored configuration.
    pub fn review(
        &self,
        documents: &[TranscriptDocument],
    ) -> Result<ReviewOutcome, ReviewServiceError> {
        let unrecognized_grades = self.guard.check_documents(documents)?;
        let merged = combine(documents);

        let tree = self
            .store
            .load_requirements()?
            .ok_or(EvaluationError::MissingRequirements)?;
        let evaluator = RequirementEvaluator::new(tree)?;
        let requirements = evaluator.evaluate(&merged);
        let flagged_average = average_flagged(&merged, evaluator.tree())?;

        let merit_courses = self.store.load_merit_courses()?.unwrap_or_default();
        let merit_average = self.calculator.average(&merged, &merit_courses);
        let merit_breakdown = self.calculator.breakdown(&merged, &merit_courses);

        let meets_all_requirements = requirements.meets_all();
        info!(
            documents = documents.len(),
            subjects = merged.subjects.len(),
            meets_all_requirements,
            merit_average,
            "admission review completed"
        );

        Ok(ReviewOutcome {
            has_valid_degree: merged.has_valid_degree(),
            merged,
            requirements,
            meets_all_requirements,
            merit_average,
            flagged_average,
            merit_breakdown,
            unrecognized_grades,
        })
    }

    /// Merge without evaluating; still subject to the intake guard.
    pub fn merge(
        &self,
        documents: &[TranscriptDocument],
    ) -> Result<TranscriptDocument, ReviewServiceError> {
        self.guard.check_documents(documents)?;
        Ok(merge_documents(documents))
    }

    pub fn requirements(&self) -> Result<Option<RequirementTree>, ReviewServiceError> {
        Ok(self.store.load_requirements()?)
    }

    pub fn save_requirements(&self, tree: &RequirementTree) -> Result<(), ReviewServiceError> {
        self.store.save_requirements(tree)?;
        info!(subjects = tree.subjects.len(), "requirement tree saved");
        Ok(())
    }

    pub fn merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, ReviewServiceError> {
        Ok(self.store.load_merit_courses()?)
    }

    pub fn save_merit_courses(
        &self,
        courses: &[MeritCourseConfig],
    ) -> Result<(), ReviewServiceError> {
        self.store.save_merit_courses(courses)?;
        info!(courses = courses.len(), "merit course list saved");
        Ok(())
    }
}

/// A lone document is reviewed as uploaded; several are merged first.
fn combine(documents: &[TranscriptDocument]) -> TranscriptDocument {
    match documents {
        [single] => single.clone(),
        _ => merge_documents(documents),
    }
}

/// Error raised by the admission review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
