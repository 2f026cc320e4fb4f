use std::collections::HashMap;

use tracing::debug;

use super::domain::{CourseKey, DocumentId, SubjectRecord, TranscriptDocument};

pub const MERGED_DOCUMENT_NAME: &str = "Merged Document";
pub const MERGED_DOCUMENT_ID: &str = "merged";

/// Subjects keyed by case-folded name, in first-seen order.
#[derive(Default)]
struct BestGrades {
    order: Vec<SubjectRecord>,
    index: HashMap<CourseKey, usize>,
}

impl BestGrades {
    fn offer(mut self, subject: &SubjectRecord) -> Self {
        let key = subject.name_key();
        match self.index.get(&key) {
            Some(&slot) => {
                let existing = &self.order[slot];
                if subject.grade_value() > existing.grade_value() {
                    debug!(
                        subject = %subject.subject_name,
                        kept = %subject.grade,
                        replaced = %existing.grade,
                        "higher grade found in later document"
                    );
                    self.order[slot] = subject.clone();
                }
            }
            None => {
                self.index.insert(key, self.order.len());
                self.order.push(subject.clone());
            }
        }
        self
    }
}

/// Consolidates one student's transcripts, keeping the highest grade per
/// subject name. Ties keep the first record seen. Header fields come from the
/// first document.
pub fn merge_documents(documents: &[TranscriptDocument]) -> TranscriptDocument {
    let best = documents
        .iter()
        .flat_map(|document| document.subjects.iter())
        .fold(BestGrades::default(), BestGrades::offer);

    let first = documents.first();
    TranscriptDocument {
        id: DocumentId(MERGED_DOCUMENT_ID.to_string()),
        document_name: MERGED_DOCUMENT_NAME.to_string(),
        full_name: first.and_then(|document| document.full_name.clone()),
        personal_id: first.and_then(|document| document.personal_id.clone()),
        has_valid_degree: first.and_then(|document| document.has_valid_degree.clone()),
        subjects: best.order,
    }
}
