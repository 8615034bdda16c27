use super::domain::InspectionId;
use super::record::Inspection;

/// Storage abstraction owned by the dashboard; the engine itself never persists anything.
pub trait InspectionRepository: Send + Sync {
    fn insert(&self, inspection: Inspection) -> Result<Inspection, RepositoryError>;
    /// Overwrites the stored record only if its version still equals `expected_version`.
    fn update(&self, inspection: Inspection, expected_version: u64)
        -> Result<(), RepositoryError>;
    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError>;
    fn list_for_apartment(&self, apartment_id: &str) -> Result<Vec<Inspection>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("inspection was modified concurrently")]
    Conflict,
    #[error("inspection not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
