//! Transcript review: grade normalisation, level-aware course equivalence,
//! requirement checks, best-grade merging and merit-point averages.

pub mod domain;
pub mod equivalence;
pub(crate) mod evaluation;
pub mod grading;
pub(crate) mod intake;
pub mod merge;
pub mod merit;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    AlternativeCourse, CourseKey, DocumentId, MeritCourseConfig, RequirementCourse,
    RequirementSubject, RequirementTree, SubjectRecord, TranscriptDocument,
};
pub use equivalence::{resolve, EquivalenceSet, EquivalentCourse, Resolution};
pub use evaluation::{
    evaluate_requirements, EvaluationError, RequirementEvaluator, RequirementReport,
    RequirementResult, FAILED_GRADE, NOT_ATTEMPTED_GRADE,
};
pub use grading::{grade_value, is_recognized};
pub use intake::{
    unrecognized_grades, IntakeGuard, IntakePolicy, IntakeViolation, UnrecognizedGrade,
};
pub use merge::{merge_documents, MERGED_DOCUMENT_ID, MERGED_DOCUMENT_NAME};
pub use merit::{
    average_flagged, ContributionSource, MeritContribution, MeritPointCalculator,
    MeritPointResult,
};
pub use router::{admission_router, DocumentsRequest};
pub use service::{AdmissionReviewService, ReviewOutcome, ReviewServiceError};
pub use store::{ConfigStore, StoreError};
