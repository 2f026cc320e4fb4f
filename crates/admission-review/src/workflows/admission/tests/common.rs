use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::admission::domain::{
    AlternativeCourse, DocumentId, MeritCourseConfig, RequirementCourse, RequirementSubject,
    RequirementTree, SubjectRecord, TranscriptDocument,
};
use crate::workflows::admission::store::{ConfigStore, StoreError};
use crate::workflows::admission::{admission_router, AdmissionReviewService};
use crate::workflows::catalog::{CatalogCourse, CourseCatalog};

pub(super) const PERSONAL_ID: &str = "20050101-1234";

pub(super) fn course(
    name: &str,
    code: &str,
    level: i32,
    required_grade: &str,
    alternatives: &[(&str, &str)],
) -> RequirementCourse {
    RequirementCourse {
        name: name.to_string(),
        code: code.to_string(),
        level,
        alternatives: alternatives
            .iter()
            .map(|(name, code)| AlternativeCourse {
                name: name.to_string(),
                code: code.to_string(),
            })
            .collect(),
        required_grade: required_grade.to_string(),
        include_in_average: false,
    }
}

pub(super) fn requirement_tree() -> RequirementTree {
    let mut matematik_1c = course(
        "Matematik 1c",
        "MATMAT01c",
        1,
        "E",
        &[("Matematik 1b", "MATMAT01b")],
    );
    matematik_1c.include_in_average = true;
    let mut engelska_5 = course("Engelska 5", "ENGENG05", 1, "C", &[]);
    engelska_5.include_in_average = true;

    RequirementTree {
        subjects: vec![
            RequirementSubject {
                name: "Matematik".to_string(),
                courses: vec![
                    matematik_1c,
                    course(
                        "Matematik 2c",
                        "MATMAT02c",
                        2,
                        "E",
                        &[("Matematik 2b", "MATMAT02b")],
                    ),
                    course("Matematik 3c", "MATMAT03c", 3, "C", &[]),
                ],
            },
            RequirementSubject {
                name: "Engelska".to_string(),
                courses: vec![engelska_5, course("Engelska 6", "ENGENG06", 2, "E", &[])],
            },
            RequirementSubject {
                name: "Svenska".to_string(),
                courses: vec![course(
                    "Svenska 1",
                    "SVESVE01",
                    1,
                    "E",
                    &[("Svenska som andraspråk 1", "SVASVA01")],
                )],
            },
        ],
    }
}

pub(super) fn merit_courses() -> Vec<MeritCourseConfig> {
    vec![
        MeritCourseConfig {
            code: "MATMAT01c".to_string(),
            name: "Matematik 1c".to_string(),
            alternative_courses: vec![AlternativeCourse {
                name: "Matematik 1b".to_string(),
                code: "MATMAT01b".to_string(),
            }],
            gymnasium_points: Some("100".to_string()),
        },
        merit_course("ENGENG05", "Engelska 5"),
        MeritCourseConfig {
            code: "SVESVE01".to_string(),
            name: "Svenska 1".to_string(),
            alternative_courses: vec![AlternativeCourse {
                name: "Svenska som andraspråk 1".to_string(),
                code: "SVASVA01".to_string(),
            }],
            gymnasium_points: Some("100".to_string()),
        },
    ]
}

pub(super) fn merit_course(code: &str, name: &str) -> MeritCourseConfig {
    MeritCourseConfig {
        code: code.to_string(),
        name: name.to_string(),
        alternative_courses: Vec::new(),
        gymnasium_points: None,
    }
}

pub(super) fn catalog() -> CourseCatalog {
    CourseCatalog::new(
        [
            ("MATMAT01c", "Matematik 1c", Some(100)),
            ("MATMAT01b", "Matematik 1b", Some(100)),
            ("ENGENG05", "Engelska 5", Some(100)),
            ("SVESVE01", "Svenska 1", Some(100)),
            ("IDRIDR01", "Idrott och hälsa 1", None),
        ]
        .into_iter()
        .map(|(code, name, points)| CatalogCourse {
            code: code.to_string(),
            name: name.to_string(),
            points,
        }),
    )
}

pub(super) fn subject(name: &str, code: &str, grade: &str) -> SubjectRecord {
    SubjectRecord::new(name, code, grade, 100)
}

pub(super) fn document(id: &str, subjects: Vec<SubjectRecord>) -> TranscriptDocument {
    TranscriptDocument {
        id: DocumentId(id.to_string()),
        document_name: format!("{id}.pdf"),
        full_name: Some("Alva Lind".to_string()),
        personal_id: Some(PERSONAL_ID.to_string()),
        has_valid_degree: None,
        subjects,
    }
}

/// Upper-secondary transcript plus a later adult-education supplement that
/// together meet every requirement in [`requirement_tree`].
pub(super) fn complete_transcripts() -> Vec<TranscriptDocument> {
    let mut upper_secondary = document(
        "gymnasium",
        vec![
            subject("Matematik 1c", "MATMAT01c", "B"),
            subject("Engelska 5", "ENGENG05", "C"),
            subject("Svenska 1", "SVESVE01", "A"),
            subject("Matematik 2c", "MATMAT02c", "E"),
        ],
    );
    upper_secondary.has_valid_degree = Some("Gymnasieexamen uppnådd".to_string());

    let supplement = document(
        "komvux",
        vec![
            subject("Matematik 2c", "MATMAT02c", "C"),
            subject("Matematik 3c", "MATMAT03c", "C"),
            subject("Engelska 6", "ENGENG06", "B"),
        ],
    );

    vec![upper_secondary, supplement]
}

#[derive(Default)]
pub(super) struct MemoryStore {
    requirements: Mutex<Option<RequirementTree>>,
    merit_courses: Mutex<Option<Vec<MeritCourseConfig>>>,
}

impl MemoryStore {
    pub(super) fn configured() -> Self {
        Self {
            requirements: Mutex::new(Some(requirement_tree())),
            merit_courses: Mutex::new(Some(merit_courses())),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load_requirements(&self) -> Result<Option<RequirementTree>, StoreError> {
        Ok(self
            .requirements
            .lock()
            .expect("store mutex poisoned")
            .clone())
    }

    fn save_requirements(&self, tree: &RequirementTree) -> Result<(), StoreError> {
        *self.requirements.lock().expect("store mutex poisoned") = Some(tree.clone());
        Ok(())
    }

    fn load_merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, StoreError> {
        Ok(self
            .merit_courses
            .lock()
            .expect("store mutex poisoned")
            .clone())
    }

    fn save_merit_courses(&self, courses: &[MeritCourseConfig]) -> Result<(), StoreError> {
        *self.merit_courses.lock().expect("store mutex poisoned") = Some(courses.to_vec());
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl ConfigStore for UnavailableStore {
    fn load_requirements(&self) -> Result<Option<RequirementTree>, StoreError> {
        Err(StoreError::Unavailable("volume not mounted".to_string()))
    }

    fn save_requirements(&self, _tree: &RequirementTree) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("volume not mounted".to_string()))
    }

    fn load_merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, StoreError> {
        Err(StoreError::Unavailable("volume not mounted".to_string()))
    }

    fn save_merit_courses(&self, _courses: &[MeritCourseConfig]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("volume not mounted".to_string()))
    }
}

pub(super) fn build_service() -> (AdmissionReviewService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::configured());
    let service = AdmissionReviewService::new(store.clone(), catalog());
    (service, store)
}

pub(super) fn unconfigured_service() -> AdmissionReviewService<MemoryStore> {
    AdmissionReviewService::new(Arc::new(MemoryStore::default()), catalog())
}

pub(super) fn router_with_service(service: AdmissionReviewService<MemoryStore>) -> axum::Router {
    admission_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
