use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::grading::grade_value;

/// Case-insensitive lookup key: trimmed and case-folded once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseKey(String);

impl CourseKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Equality that never pairs two blank fields.
    pub fn matches(&self, other: &CourseKey) -> bool {
        !self.is_empty() && self == other
    }
}

impl From<String> for CourseKey {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<CourseKey> for String {
    fn from(value: CourseKey) -> Self {
        value.0
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for transcript documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// One line of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub subject_name: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub grade: String,
    /// Nominal credit weight exactly as written on the transcript.
    #[serde(default, deserialize_with = "text_or_number")]
    pub gymnasium_points: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_match_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_subject_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_gymnasium_points: Option<String>,
}

impl SubjectRecord {
    pub fn new(subject_name: &str, course_code: &str, grade: &str, points: u32) -> Self {
        Self {
            subject_name: subject_name.to_string(),
            course_code: course_code.to_string(),
            grade: grade.to_string(),
            gymnasium_points: points.to_string(),
            fuzzy_match_score: None,
            original_subject_name: None,
            original_course_code: None,
            original_gymnasium_points: None,
        }
    }

    pub fn name_key(&self) -> CourseKey {
        CourseKey::new(&self.subject_name)
    }

    pub fn code_key(&self) -> CourseKey {
        CourseKey::new(&self.course_code)
    }

    pub fn grade_value(&self) -> f64 {
        grade_value(&self.grade)
    }

    /// Parsed credit weight; text that is not a whole number counts as zero.
    pub fn credit_weight(&self) -> u32 {
        parse_points(&self.gymnasium_points).unwrap_or(0)
    }

    /// True when either the name or the code equals `key`.
    pub fn is_identified_by(&self, key: &CourseKey) -> bool {
        key.matches(&self.name_key()) || key.matches(&self.code_key())
    }
}

/// A normalised transcript as produced by the extraction or editing workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptDocument {
    #[serde(default)]
    pub id: DocumentId,
    #[serde(default)]
    pub document_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub personal_id: Option<String>,
    #[serde(default)]
    pub has_valid_degree: Option<String>,
    #[serde(default)]
    pub subjects: Vec<SubjectRecord>,
}

impl TranscriptDocument {
    /// Whether the degree statement names a completed examination.
    pub fn has_valid_degree(&self) -> bool {
        self.has_valid_degree
            .as_deref()
            .map(|text| text.to_lowercase().contains("examen"))
            .unwrap_or(false)
    }
}

/// Declared stand-in for a requirement course at the same level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeCourse {
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// Leaf of the requirement tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCourse {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub alternatives: Vec<AlternativeCourse>,
    #[serde(default)]
    pub required_grade: String,
    #[serde(default)]
    pub include_in_average: bool,
}

impl RequirementCourse {
    /// True when the course or one of its alternatives is named or coded `key`.
    pub fn answers_to(&self, key: &CourseKey) -> bool {
        key.matches(&CourseKey::new(&self.name))
            || key.matches(&CourseKey::new(&self.code))
            || self.alternatives.iter().any(|alternative| {
                key.matches(&CourseKey::new(&alternative.name))
                    || key.matches(&CourseKey::new(&alternative.code))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSubject {
    pub name: String,
    #[serde(default)]
    pub courses: Vec<RequirementCourse>,
}

/// Ordered admission requirements grouped by subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementTree {
    #[serde(default)]
    pub subjects: Vec<RequirementSubject>,
}

impl RequirementTree {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn courses(&self) -> impl Iterator<Item = &RequirementCourse> {
        self.subjects.iter().flat_map(|subject| subject.courses.iter())
    }
}

/// Entry of the merit-average course list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeritCourseConfig {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternative_courses: Vec<AlternativeCourse>,
    #[serde(
        default,
        deserialize_with = "optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub gymnasium_points: Option<String>,
}

impl MeritCourseConfig {
    /// Own code followed by every alternative code.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.code.as_str()).chain(
            self.alternative_courses
                .iter()
                .map(|alternative| alternative.code.as_str()),
        )
    }

    pub fn code_keys(&self) -> Vec<CourseKey> {
        self.codes().map(CourseKey::new).collect()
    }
}

pub(crate) fn parse_points(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(number) => number.to_string(),
            TextOrNumber::Float(number) => number.to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(String::from).unwrap_or_default())
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(String::from))
}

/// Credit points given as text or number; anything unparseable reads as `None`.
pub(crate) fn optional_points<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(String::from).as_deref().and_then(parse_points))
}
