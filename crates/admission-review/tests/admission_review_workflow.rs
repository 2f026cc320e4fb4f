//! End-to-end admission review scenarios driven through the public API with
//! JSON payloads shaped like the stored configuration files and the
//! transcripts produced by document extraction.

mod common {
    use std::sync::{Arc, Mutex};

    use admission_review::workflows::admission::{
        ConfigStore, MeritCourseConfig, RequirementTree, StoreError, TranscriptDocument,
    };

    pub(super) const REQUIREMENTS_JSON: &str = r#"{
        "subjects": [
            {
                "name": "Mathematics",
                "courses": [
                    {
                        "name": "Mathematics 1c",
                        "code": "MATMAT01c",
                        "level": 1,
                        "requiredGrade": "E",
                        "includeInAverage": true,
                        "alternatives": [{ "name": "Mathematics 1b", "code": "MATMAT01b" }]
                    },
                    { "name": "Mathematics 2c", "code": "MATMAT02c", "level": 2, "requiredGrade": "E" },
                    { "name": "Mathematics 3c", "code": "MATMAT03c", "level": 3, "requiredGrade": "C" }
                ]
            },
            {
                "name": "English",
                "courses": [
                    { "name": "English 5", "code": "ENGENG05", "level": 1, "requiredGrade": "C", "includeInAverage": true },
                    { "name": "English 6", "code": "ENGENG06", "level": 2, "requiredGrade": "E" }
                ]
            }
        ]
    }"#;

    pub(super) const MERIT_COURSES_JSON: &str = r#"[
        { "code": "MATMAT01c", "name": "Mathematics 1c", "alternativeCourses": [{ "name": "Mathematics 1b", "code": "MATMAT01b" }], "gymnasiumPoints": "100" },
        { "code": "ENGENG05", "name": "English 5", "gymnasiumPoints": 100 },
        { "code": "ENGENG06", "name": "English 6" }
    ]"#;

    pub(super) const CATALOG_CSV: &str = "Code,Name,Points\n\
MATMAT01c,Mathematics 1c,100\n\
ENGENG05,English 5,100\n\
ENGENG06,English 6,100\n";

    pub(super) const FIRST_TRANSCRIPT_JSON: &str = r#"{
        "id": "upper-secondary",
        "documentName": "slutbetyg.pdf",
        "fullName": "Alva Lind",
        "personalId": "20050101-1234",
        "hasValidDegree": "Gymnasieexamen",
        "subjects": [
            { "subjectName": "Mathematics 1c", "courseCode": "MATMAT01c", "grade": "C", "gymnasiumPoints": "100" },
            { "subjectName": "English 5", "courseCode": "ENGENG05", "grade": "D", "gymnasiumPoints": 100 },
            { "subjectName": "Mathematics 2c", "courseCode": "MATMAT02c", "grade": "E", "gymnasiumPoints": "100" }
        ]
    }"#;

    pub(super) const SECOND_TRANSCRIPT_JSON: &str = r#"{
        "id": "adult-education",
        "documentName": "komvux.pdf",
        "personalId": "20050101-1234",
        "subjects": [
            { "subjectName": "english 5", "courseCode": "ENGENG05", "grade": "A", "gymnasiumPoints": "100" },
            { "subjectName": "Mathematics 3c", "courseCode": "MATMAT03c", "grade": "B", "gymnasiumPoints": "100" },
            { "subjectName": "English 6", "courseCode": "ENGENG06", "grade": "VG", "gymnasiumPoints": "100" }
        ]
    }"#;

    pub(super) fn requirement_tree() -> RequirementTree {
        serde_json::from_str(REQUIREMENTS_JSON).expect("requirements parse")
    }

    pub(super) fn merit_courses() -> Vec<MeritCourseConfig> {
        serde_json::from_str(MERIT_COURSES_JSON).expect("merit courses parse")
    }

    pub(super) fn transcripts() -> Vec<TranscriptDocument> {
        [FIRST_TRANSCRIPT_JSON, SECOND_TRANSCRIPT_JSON]
            .into_iter()
            .map(|json| serde_json::from_str(json).expect("transcript parses"))
            .collect()
    }

    #[derive(Default)]
    pub(super) struct MemoryStore {
        requirements: Mutex<Option<RequirementTree>>,
        merit_courses: Mutex<Option<Vec<MeritCourseConfig>>>,
    }

    impl MemoryStore {
        pub(super) fn configured() -> Arc<Self> {
            Arc::new(Self {
                requirements: Mutex::new(Some(requirement_tree())),
                merit_courses: Mutex::new(Some(merit_courses())),
            })
        }
    }

    impl ConfigStore for MemoryStore {
        fn load_requirements(&self) -> Result<Option<RequirementTree>, StoreError> {
            Ok(self.requirements.lock().expect("store mutex").clone())
        }

        fn save_requirements(&self, tree: &RequirementTree) -> Result<(), StoreError> {
            *self.requirements.lock().expect("store mutex") = Some(tree.clone());
            Ok(())
        }

        fn load_merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, StoreError> {
            Ok(self.merit_courses.lock().expect("store mutex").clone())
        }

        fn save_merit_courses(&self, courses: &[MeritCourseConfig]) -> Result<(), StoreError> {
            *self.merit_courses.lock().expect("store mutex") = Some(courses.to_vec());
            Ok(())
        }
    }
}

use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use admission_review::workflows::admission::{
    admission_router, evaluate_requirements, merge_documents, resolve, AdmissionReviewService,
    MeritPointCalculator, RequirementTree, FAILED_GRADE,
};
use admission_review::workflows::catalog::CatalogImporter;

use common::*;

fn service() -> AdmissionReviewService<MemoryStore> {
    let catalog = CatalogImporter::from_reader(CATALOG_CSV.as_bytes()).expect("catalog imports");
    AdmissionReviewService::new(MemoryStore::configured(), catalog)
}

#[test]
fn review_combines_documents_before_checking_requirements() {
    let outcome = service().review(&transcripts()).expect("review succeeds");

    let english = outcome
        .requirements
        .get("English 5")
        .expect("english present");
    assert!(english.is_met);
    assert_eq!(english.student_grade, "A");

    let math = outcome
        .requirements
        .get("Mathematics 2c")
        .expect("math present");
    assert!(math.is_met);
    assert!(math.met_by_higher_level_course);

    assert!(outcome.meets_all_requirements);
    assert!(outcome.has_valid_degree);
    // C, A and VG at 100 points each
    assert_eq!(outcome.merit_average, 16.67);
    assert_eq!(outcome.flagged_average, 17.5);
}

#[test]
fn failing_direct_course_overrides_higher_level_pass() {
    let mut documents = transcripts();
    documents[0].subjects[0].grade = "F".to_string();

    let outcome = service().review(&documents).expect("review succeeds");

    let result = outcome
        .requirements
        .get("Mathematics 1c")
        .expect("math present");
    assert!(!result.is_met);
    assert_eq!(result.student_grade, FAILED_GRADE);
    assert_eq!(
        result.higher_level_course_name.as_deref(),
        Some("Mathematics 3c")
    );
    assert!(!outcome.meets_all_requirements);
}

#[test]
fn requirement_tree_round_trips_without_changing_results() {
    let tree = requirement_tree();
    let json = serde_json::to_string(&tree).expect("tree serializes");
    let restored: RequirementTree = serde_json::from_str(&json).expect("tree parses");
    assert_eq!(restored, tree);

    let merged = merge_documents(&transcripts());
    for course in tree.courses() {
        assert_eq!(resolve(&course.name, &tree), resolve(&course.name, &restored));
    }
    assert_eq!(
        evaluate_requirements(&merged, &tree).expect("tree configured"),
        evaluate_requirements(&merged, &restored).expect("tree configured")
    );
}

#[test]
fn merit_average_falls_back_to_catalog_points() {
    let catalog = CatalogImporter::from_reader(CATALOG_CSV.as_bytes()).expect("catalog imports");
    let calculator = MeritPointCalculator::new(catalog);
    let documents = transcripts();

    // C and D taken; English 6 only appears on the second transcript.
    let average = calculator.average(&documents[0], &merit_courses());
    assert_eq!(average, 9.17);
}

#[tokio::test]
async fn review_route_serves_the_same_outcome() {
    let router = admission_router(Arc::new(service()));
    let body = json!({ "documents": transcripts() });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admission/review")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).expect("body serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&bytes).expect("json payload");
    assert_eq!(payload["merged"]["documentName"], json!("Merged Document"));
    assert_eq!(payload["meetsAllRequirements"], json!(true));
}

#[tokio::test]
async fn mismatched_students_are_rejected() {
    let mut documents = transcripts();
    documents[1].personal_id = Some("19991231-0000".to_string());
    let router = admission_router(Arc::new(service()));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admission/merge")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "documents": documents }))
                        .expect("body serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
