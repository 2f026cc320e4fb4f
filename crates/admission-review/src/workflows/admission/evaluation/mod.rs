mod policy;
mod rules;

pub use policy::{RequirementResult, FAILED_GRADE, NOT_ATTEMPTED_GRADE};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{CourseKey, RequirementCourse, RequirementTree, TranscriptDocument};
use super::equivalence::{resolve, EquivalenceSet};

/// Configuration problems that stop an evaluation from running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("course requirements are missing or malformed")]
    MissingRequirements,
}

/// Stateless evaluator that checks transcripts against a requirement tree.
#[derive(Debug, Clone)]
pub struct RequirementEvaluator {
    tree: RequirementTree,
}

impl RequirementEvaluator {
    /// Fails when the tree has no subjects; an empty tree is a configuration
    /// error rather than "nothing required".
    pub fn new(tree: RequirementTree) -> Result<Self, EvaluationError> {
        if tree.is_empty() {
            return Err(EvaluationError::MissingRequirements);
        }
        Ok(Self { tree })
    }

    pub fn tree(&self) -> &RequirementTree {
        &self.tree
    }

    pub fn evaluate(&self, document: &TranscriptDocument) -> RequirementReport {
        let mut results = BTreeMap::new();
        let mut unresolved = Vec::new();

        for course in self.tree.courses() {
            let (result, equivalents) = self.evaluate_course(course, document);
            if equivalents.is_unresolved() {
                unresolved.push(course.name.clone());
            }
            debug!(
                requirement = %course.name,
                met = result.is_met,
                grade = %result.student_grade,
                "requirement evaluated"
            );
            results.insert(CourseKey::new(&course.name), result);
        }

        RequirementReport {
            results,
            unresolved,
        }
    }

    pub fn evaluate_course(
        &self,
        course: &RequirementCourse,
        document: &TranscriptDocument,
    ) -> (RequirementResult, EquivalenceSet) {
        let equivalents = resolve(&course.name, &self.tree);
        let signals = rules::scan_transcript(course, &equivalents, document);
        (policy::settle(course, signals), equivalents)
    }
}

/// Convenience wrapper for one-off evaluations.
pub fn evaluate_requirements(
    document: &TranscriptDocument,
    tree: &RequirementTree,
) -> Result<RequirementReport, EvaluationError> {
    let evaluator = RequirementEvaluator::new(tree.clone())?;
    Ok(evaluator.evaluate(document))
}

/// Requirement verdicts keyed by case-folded requirement name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementReport {
    pub results: BTreeMap<CourseKey, RequirementResult>,
    /// Requirements whose name was not found in the tree while resolving
    /// equivalents.
    #[serde(default)]
    pub unresolved: Vec<String>,
}

impl RequirementReport {
    pub fn get(&self, requirement: &str) -> Option<&RequirementResult> {
        self.results.get(&CourseKey::new(requirement))
    }

    /// Overall verdict: every requirement met.
    pub fn meets_all(&self) -> bool {
        self.results.values().all(|result| result.is_met)
    }

    pub fn unmet(&self) -> impl Iterator<Item = &RequirementResult> {
        self.results.values().filter(|result| !result.is_met)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
