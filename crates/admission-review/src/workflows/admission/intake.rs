use serde::{Deserialize, Serialize};

use super::domain::{DocumentId, TranscriptDocument};
use super::grading::is_recognized;

/// Validation errors raised before transcripts are evaluated.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("no transcript documents were supplied")]
    NoDocuments,
    #[error(
        "document {document:?} belongs to personal id {found:?}, expected {expected:?} from earlier documents"
    )]
    PersonalIdMismatch {
        document: DocumentId,
        expected: String,
        found: String,
    },
    #[error("subject {subject:?} carries unrecognized grade {grade:?}")]
    UnrecognizedGrade { subject: String, grade: String },
}

/// A transcript line whose grade token is outside every known scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrecognizedGrade {
    pub document: DocumentId,
    pub subject: String,
    pub grade: String,
}

/// Policy dial for intake validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakePolicy {
    /// Reject instead of scoring unknown grade tokens as failing.
    pub reject_unrecognized_grades: bool,
}

/// Guard checking that a batch of transcripts can be reviewed together.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Every document must belong to the same student; documents without a
    /// personal id are accepted. Returns the grade tokens that will score 0.
    pub fn check_documents(
        &self,
        documents: &[TranscriptDocument],
    ) -> Result<Vec<UnrecognizedGrade>, IntakeViolation> {
        if documents.is_empty() {
            return Err(IntakeViolation::NoDocuments);
        }

        let mut expected: Option<&str> = None;
        for document in documents {
            let Some(found) = document
                .personal_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
            else {
                continue;
            };

            match expected {
                None => expected = Some(found),
                Some(known) if known == found => {}
                Some(known) => {
                    return Err(IntakeViolation::PersonalIdMismatch {
                        document: document.id.clone(),
                        expected: known.to_string(),
                        found: found.to_string(),
                    })
                }
            }
        }

        let unrecognized = unrecognized_grades(documents);
        if self.policy.reject_unrecognized_grades {
            if let Some(first) = unrecognized.first() {
                return Err(IntakeViolation::UnrecognizedGrade {
                    subject: first.subject.clone(),
                    grade: first.grade.clone(),
                });
            }
        }

        Ok(unrecognized)
    }
}

pub fn unrecognized_grades(documents: &[TranscriptDocument]) -> Vec<UnrecognizedGrade> {
    documents
        .iter()
        .flat_map(|document| {
            document
                .subjects
                .iter()
                .filter(|subject| !is_recognized(&subject.grade))
                .map(|subject| UnrecognizedGrade {
                    document: document.id.clone(),
                    subject: subject.subject_name.clone(),
                    grade: subject.grade.clone(),
                })
        })
        .collect()
}
