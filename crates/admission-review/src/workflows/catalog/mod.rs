//! Read-only course catalog: nominal credit points per course code, used when
//! a configured merit course is missing from the transcript.

mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::workflows::admission::domain::{optional_points, CourseKey};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read course catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid course catalog CSV: {}", err),
            CatalogImportError::Json(err) => write!(f, "invalid course catalog JSON: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for CatalogImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCourse {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "optional_points")]
    pub points: Option<u32>,
}

/// Course code → catalog entry, case-insensitive on the code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCatalog {
    courses: BTreeMap<CourseKey, CatalogCourse>,
}

impl CourseCatalog {
    pub fn new(courses: impl IntoIterator<Item = CatalogCourse>) -> Self {
        let courses = courses
            .into_iter()
            .filter(|course| !course.code.trim().is_empty())
            .map(|course| (CourseKey::new(&course.code), course))
            .collect();
        Self { courses }
    }

    pub fn lookup(&self, code: &str) -> Option<&CatalogCourse> {
        self.courses.get(&CourseKey::new(code))
    }

    pub fn courses(&self) -> impl Iterator<Item = &CatalogCourse> {
        self.courses.values()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

pub struct CatalogImporter;

impl CatalogImporter {
    /// Loads a catalog file; `.json` files hold an array of entries, anything
    /// else is read as CSV with `Code,Name,Points` headers.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CourseCatalog, CatalogImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_reader(file)
        } else {
            Self::from_reader(file)
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CourseCatalog, CatalogImportError> {
        Ok(CourseCatalog::new(parser::parse_rows(reader)?))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<CourseCatalog, CatalogImportError> {
        let courses: Vec<CatalogCourse> = serde_json::from_reader(reader)?;
        Ok(CourseCatalog::new(courses))
    }
}
