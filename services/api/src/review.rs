use crate::infra::{load_catalog, read_documents, InMemoryConfigStore, JsonFileConfigStore};
use admission_review::config::AppConfig;
use admission_review::error::AppError;
use admission_review::telemetry;
use admission_review::workflows::admission::{
    AdmissionReviewService, IntakePolicy, ReviewOutcome,
};
use admission_review::workflows::catalog::CourseCatalog;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    /// Transcript JSON files belonging to one student
    #[arg(long, num_args = 1.., required = true)]
    pub(crate) documents: Vec<PathBuf>,
    /// Requirement tree JSON (defaults to the configured data directory)
    #[arg(long)]
    pub(crate) requirements: Option<PathBuf>,
    /// Merit course list JSON (defaults to the configured data directory)
    #[arg(long)]
    pub(crate) merit_courses: Option<PathBuf>,
    /// Course catalog CSV or JSON used for untaken merit courses
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the full outcome as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MergeArgs {
    /// Transcript JSON files belonging to one student
    #[arg(long, num_args = 1.., required = true)]
    pub(crate) documents: Vec<PathBuf>,
}

pub(crate) fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let ReviewArgs {
        documents,
        requirements,
        merit_courses,
        catalog,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = JsonFileConfigStore::new(
        requirements.unwrap_or_else(|| config.storage.requirements_path()),
        merit_courses.unwrap_or_else(|| config.storage.merit_courses_path()),
    );
    let catalog = load_catalog(&catalog.unwrap_or_else(|| config.storage.catalog_path()))?;
    let policy = IntakePolicy {
        reject_unrecognized_grades: config.review.strict_grades,
    };
    let service = AdmissionReviewService::with_policy(Arc::new(store), catalog, policy);

    let documents = read_documents(&documents)?;
    let outcome = service.review(&documents)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

pub(crate) fn run_merge(args: MergeArgs) -> Result<(), AppError> {
    let documents = read_documents(&args.documents)?;
    let service = AdmissionReviewService::new(
        Arc::new(InMemoryConfigStore::default()),
        CourseCatalog::default(),
    );
    let merged = service.merge(&documents)?;
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

fn render_outcome(outcome: &ReviewOutcome) -> String {
    let mut lines = Vec::new();
    let student = outcome
        .merged
        .full_name
        .as_deref()
        .unwrap_or("unknown student");
    lines.push(format!(
        "Admission review for {student} ({} subjects)",
        outcome.merged.subjects.len()
    ));
    lines.push(format!(
        "  Degree statement: {}",
        if outcome.has_valid_degree {
            "examination awarded"
        } else {
            "no examination found"
        }
    ));

    lines.push("\nRequirements:".to_string());
    for result in outcome.requirements.results.values() {
        let mark = if result.is_met { "PASS" } else { "FAIL" };
        lines.push(format!("  [{mark}] {}", result.summary()));
        if let (Some(course), Some(grade)) = (
            &result.higher_level_course_name,
            &result.higher_level_course_grade,
        ) {
            lines.push(format!("         higher level: {course} {grade}"));
        }
        if !result.other_grades_in_alternatives.is_empty() {
            lines.push(format!(
                "         other alternatives: {}",
                result.other_grades_in_alternatives.join(", ")
            ));
        }
    }
    for name in &outcome.requirements.unresolved {
        lines.push(format!("  note: {name} is not part of any requirement subject"));
    }

    lines.push(format!(
        "\nAll requirements met: {}",
        if outcome.meets_all_requirements {
            "yes"
        } else {
            "no"
        }
    ));
    lines.push(format!("Merit average: {:.2}", outcome.merit_average));
    lines.push(format!(
        "Average over flagged requirement courses: {:.2}",
        outcome.flagged_average
    ));

    if !outcome.merit_breakdown.is_empty() {
        lines.push("\nMerit courses:".to_string());
        for entry in &outcome.merit_breakdown {
            lines.push(format!(
                "  {:<32} {:>4} {:>6.2}",
                entry.course_name, entry.student_grade, entry.merit_point
            ));
        }
    }

    if !outcome.unrecognized_grades.is_empty() {
        lines.push("\nUnrecognised grades (scored as 0):".to_string());
        for unknown in &outcome.unrecognized_grades {
            lines.push(format!(
                "  {} in {}: {:?}",
                unknown.subject, unknown.document.0, unknown.grade
            ));
        }
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}
