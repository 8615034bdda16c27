use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::commands::InspectionCommand;
use super::domain::{AreaSpec, InspectionError, InspectionId, InventoryItemRef};
use super::record::{CompletionReport, Inspection, InspectionRecordBuilder};
use super::report::ReportDocument;
use super::repository::{InspectionRepository, RepositoryError};
use crate::config::InspectionConfig;

/// Collaborator payload opening a new inspection session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInspection {
    pub apartment_id: String,
    pub verifier_id: String,
    #[serde(default)]
    pub inventory: Vec<InventoryItemRef>,
    /// Falls back to the configured default areas when absent.
    #[serde(default)]
    pub areas: Option<Vec<AreaSpec>>,
}

/// Service composing the record builder with a repository, guarding every write with a version check.
pub struct InspectionService<R> {
    repository: Arc<R>,
    default_areas: Vec<AreaSpec>,
}

static INSPECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_inspection_id() -> InspectionId {
    let id = INSPECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InspectionId(format!("insp-{id:06}"))
}

impl<R> InspectionService<R>
where
    R: InspectionRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: &InspectionConfig) -> Self {
        let default_areas = config
            .default_areas
            .iter()
            .map(|name| AreaSpec::new(name.clone()))
            .collect();

        Self {
            repository,
            default_areas,
        }
    }

    pub fn start(
        &self,
        request: StartInspection,
        now: DateTime<Utc>,
    ) -> Result<Inspection, InspectionServiceError> {
        let StartInspection {
            apartment_id,
            verifier_id,
            inventory,
            areas,
        } = request;

        let areas = areas.unwrap_or_else(|| self.default_areas.clone());
        let inspection = InspectionRecordBuilder::new(next_inspection_id(), apartment_id, verifier_id)
            .inventory(inventory)
            .areas(areas)
            .start(now)?;

        Ok(self.repository.insert(inspection)?)
    }

    pub fn apply(
        &self,
        id: &InspectionId,
        expected_version: u64,
        command: InspectionCommand,
    ) -> Result<Inspection, InspectionServiceError> {
        let mut inspection = self.fetch_at(id, expected_version)?;
        debug!(inspection_id = %id, ?command, "applying inspection command");
        command.apply(&mut inspection)?;
        self.repository.update(inspection.clone(), expected_version)?;
        Ok(inspection)
    }

    pub fn complete(
        &self,
        id: &InspectionId,
        expected_version: u64,
        now: DateTime<Utc>,
    ) -> Result<(Inspection, CompletionReport), InspectionServiceError> {
        let mut inspection = self.fetch_at(id, expected_version)?;
        let report = inspection.complete(now)?;
        self.repository.update(inspection.clone(), expected_version)?;
        Ok((inspection, report))
    }

    pub fn cancel(
        &self,
        id: &InspectionId,
        expected_version: u64,
        now: DateTime<Utc>,
    ) -> Result<Inspection, InspectionServiceError> {
        let mut inspection = self.fetch_at(id, expected_version)?;
        inspection.cancel(now)?;
        self.repository.update(inspection.clone(), expected_version)?;
        Ok(inspection)
    }

    pub fn get(&self, id: &InspectionId) -> Result<Inspection, InspectionServiceError> {
        let inspection = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(inspection)
    }

    pub fn report(
        &self,
        id: &InspectionId,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportDocument, InspectionServiceError> {
        Ok(self.get(id)?.report(generated_at))
    }

    pub fn history(&self, apartment_id: &str) -> Result<Vec<Inspection>, InspectionServiceError> {
        Ok(self.repository.list_for_apartment(apartment_id)?)
    }

    fn fetch_at(
        &self,
        id: &InspectionId,
        expected_version: u64,
    ) -> Result<Inspection, InspectionServiceError> {
        let inspection = self.get(id)?;
        if inspection.version() != expected_version {
            return Err(RepositoryError::Conflict.into());
        }
        Ok(inspection)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InspectionServiceError {
    #[error(transparent)]
    Inspection(#[from] InspectionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
