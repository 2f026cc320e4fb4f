use super::domain::{MeritCourseConfig, RequirementTree};

/// Opaque key-value persistence for the two configuration documents.
///
/// A document that was never saved loads as `Ok(None)`.
pub trait ConfigStore: Send + Sync {
    fn load_requirements(&self) -> Result<Option<RequirementTree>, StoreError>;
    fn save_requirements(&self, tree: &RequirementTree) -> Result<(), StoreError>;
    fn load_merit_courses(&self) -> Result<Option<Vec<MeritCourseConfig>>, StoreError>;
    fn save_merit_courses(&self, courses: &[MeritCourseConfig]) -> Result<(), StoreError>;
}

/// Error enumeration for configuration store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),
    #[error("stored configuration {key} is malformed: {reason}")]
    Malformed { key: String, reason: String },
}
