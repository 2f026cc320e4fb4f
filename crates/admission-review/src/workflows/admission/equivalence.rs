use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{CourseKey, RequirementTree, SubjectRecord};

/// A course that can stand in for a requirement, with the level it counts at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalentCourse {
    pub name: String,
    pub code: String,
    pub level: i32,
}

impl EquivalentCourse {
    /// A transcript subject matches on either its name or its code.
    pub fn matches(&self, subject: &SubjectRecord) -> bool {
        CourseKey::new(&self.name).matches(&subject.name_key())
            || CourseKey::new(&self.code).matches(&subject.code_key())
    }
}

/// How the query was located in the requirement tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Found in the named subject.
    Resolved { subject: String },
    /// Not present anywhere; the set only holds the query itself at level 0.
    Unresolved,
}

/// Courses able to satisfy one requirement. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceSet {
    pub query: String,
    pub resolution: Resolution,
    entries: Vec<EquivalentCourse>,
}

impl EquivalenceSet {
    pub fn entries(&self) -> &[EquivalentCourse] {
        &self.entries
    }

    pub fn is_unresolved(&self) -> bool {
        self.resolution == Resolution::Unresolved
    }

    /// First entry, in set order, that the subject matches.
    pub fn first_match(&self, subject: &SubjectRecord) -> Option<&EquivalentCourse> {
        self.entries.iter().find(|entry| entry.matches(subject))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a course name or code against the tree.
///
/// The first subject holding a course that answers to the query (by name,
/// code, or one of its alternatives) fixes the pivot level. Every course of
/// that subject at or above the pivot is emitted, each followed by its
/// alternatives at the parent's level.
pub fn resolve(query: &str, tree: &RequirementTree) -> EquivalenceSet {
    let key = CourseKey::new(query);

    for subject in &tree.subjects {
        let Some(pivot) = subject.courses.iter().find(|course| course.answers_to(&key)) else {
            continue;
        };

        let entries = subject
            .courses
            .iter()
            .filter(|course| course.level >= pivot.level)
            .flat_map(|course| {
                std::iter::once(EquivalentCourse {
                    name: course.name.clone(),
                    code: course.code.clone(),
                    level: course.level,
                })
                .chain(course.alternatives.iter().map(|alternative| EquivalentCourse {
                    name: alternative.name.clone(),
                    code: alternative.code.clone(),
                    level: course.level,
                }))
            })
            .collect();

        return EquivalenceSet {
            query: query.to_string(),
            resolution: Resolution::Resolved {
                subject: subject.name.clone(),
            },
            entries,
        };
    }

    warn!(
        course = query,
        "course not present in requirement tree; using itself as sole equivalent"
    );
    EquivalenceSet {
        query: query.to_string(),
        resolution: Resolution::Unresolved,
        entries: vec![EquivalentCourse {
            name: query.to_string(),
            code: query.to_string(),
            level: 0,
        }],
    }
}
