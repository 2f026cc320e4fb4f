use admission_review::config::StorageConfig;
use admission_review::error::AppError;
use admission_review::workflows::admission::{
    ConfigStore, MeritCourseConfig, RequirementTree, StoreError, TranscriptDocument,
};
use admission_review::workflows::catalog::{CatalogImporter, CourseCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local configuration store; nothing survives a restart.
#[derive(Default)]
pub(crate) struct InMemoryConfigStore {
    requirements: Mutex<Option<RequirementTree>>,
    merit_courses: Mutex<Option<Vec<MeritCourseConfig>>>,
}

fn poisoned(key: &str) -> StoreError {
    StoreError::Unavailable(format!("{key} lock poisoned"))
}

impl ConfigStore for InMemoryConfigStore {
    fn load_requirements(&self) -> Result<Option<RequirementTree>, StoreError> {
        let guard = self.requirements.lock().map_err(|_| poisoned("requirements"))?;
        Ok(guard.clone())
    }

    fn save_requirements(&self, tree: &RequirementTree) -> Result<(), StoreError> {
        let mut guard = self.requirements.lock().map_err(|_| poisoned("requirements"))?;
        *guard = Some(tree.clone());
        Ok(())
    }

    fn load_merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, StoreError> {
        let guard = self.merit_courses.lock().map_err(|_| poisoned("merit courses"))?;
        Ok(guard.clone())
    }

    fn save_merit_courses(&self, courses: &[MeritCourseConfig]) -> Result<(), StoreError> {
        let mut guard = self.merit_courses.lock().map_err(|_| poisoned("merit courses"))?;
        *guard = Some(courses.to_vec());
        Ok(())
    }
}

/// Stores each configuration document as a JSON file; a missing file reads as
/// "not configured".
pub(crate) struct JsonFileConfigStore {
    requirements_path: PathBuf,
    merit_courses_path: PathBuf,
}

impl JsonFileConfigStore {
    pub(crate) fn new(requirements_path: PathBuf, merit_courses_path: PathBuf) -> Self {
        Self {
            requirements_path,
            merit_courses_path,
        }
    }

    pub(crate) fn from_storage(storage: &StorageConfig) -> Self {
        Self::new(storage.requirements_path(), storage.merit_courses_path())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::Unavailable(format!("{}: {err}", path.display()))),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StoreError::Malformed {
            key: path.display().to_string(),
            reason: err.to_string(),
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let unavailable =
        |err: std::io::Error| StoreError::Unavailable(format!("{}: {err}", path.display()));

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(unavailable)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|err| StoreError::Malformed {
        key: path.display().to_string(),
        reason: err.to_string(),
    })?;
    std::fs::write(path, json).map_err(unavailable)?;
    info!(path = %path.display(), "configuration written");
    Ok(())
}

impl ConfigStore for JsonFileConfigStore {
    fn load_requirements(&self) -> Result<Option<RequirementTree>, StoreError> {
        read_json(&self.requirements_path)
    }

    fn save_requirements(&self, tree: &RequirementTree) -> Result<(), StoreError> {
        write_json(&self.requirements_path, tree)
    }

    fn load_merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, StoreError> {
        read_json(&self.merit_courses_path)
    }

    fn save_merit_courses(&self, courses: &[MeritCourseConfig]) -> Result<(), StoreError> {
        write_json(&self.merit_courses_path, courses)
    }
}

/// A missing catalog file means no fallback points rather than a startup failure.
pub(crate) fn load_catalog(path: &Path) -> Result<CourseCatalog, AppError> {
    if !path.exists() {
        warn!(path = %path.display(), "course catalog not found; merit fallback disabled");
        return Ok(CourseCatalog::default());
    }

    let catalog = CatalogImporter::from_path(path)?;
    info!(path = %path.display(), courses = catalog.len(), "course catalog loaded");
    Ok(catalog)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    Many(Vec<TranscriptDocument>),
    One(Box<TranscriptDocument>),
}

/// Each file holds one transcript or an array of transcripts.
pub(crate) fn read_documents(paths: &[PathBuf]) -> Result<Vec<TranscriptDocument>, AppError> {
    let mut documents = Vec::new();
    for path in paths {
        let raw = std::fs::read_to_string(path)?;
        match serde_json::from_str::<DocumentFile>(&raw)? {
            DocumentFile::Many(many) => documents.extend(many),
            DocumentFile::One(one) => documents.push(*one),
        }
    }
    Ok(documents)
}
