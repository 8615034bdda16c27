use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::InspectionConfig;
use crate::workflows::inspection::domain::{AreaSpec, InspectionId, InventoryItemRef};
use crate::workflows::inspection::record::Inspection;
use crate::workflows::inspection::repository::{InspectionRepository, RepositoryError};
use crate::workflows::inspection::service::{InspectionService, StartInspection};

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<InspectionId, Inspection>>,
}

impl InspectionRepository for MemoryRepository {
    fn insert(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(inspection.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inspection.id().clone(), inspection.clone());
        Ok(inspection)
    }

    fn update(&self, inspection: Inspection, expected_version: u64) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(inspection.id()) {
            Some(stored) if stored.version() == expected_version => {
                guard.insert(inspection.id().clone(), inspection);
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_apartment(&self, apartment_id: &str) -> Result<Vec<Inspection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Inspection> = guard
            .values()
            .filter(|inspection| inspection.apartment_id() == apartment_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }
}

pub(super) struct UnavailableRepository;

impl InspectionRepository for UnavailableRepository {
    fn insert(&self, _inspection: Inspection) -> Result<Inspection, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn update(&self, _inspection: Inspection, _expected: u64) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn fetch(&self, _id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn list_for_apartment(&self, _apartment_id: &str) -> Result<Vec<Inspection>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn inspection_config() -> InspectionConfig {
    InspectionConfig {
        default_areas: vec!["Living Room".to_string(), "Kitchen".to_string()],
    }
}

pub(super) fn build_service() -> (InspectionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = InspectionService::new(repository.clone(), &inspection_config());
    (service, repository)
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn inventory() -> Vec<InventoryItemRef> {
    vec![
        InventoryItemRef::new("sofa", "Sofa", "Furniture").in_area("Living Room"),
        InventoryItemRef::new("table", "Dining table", "Furniture").in_area("Living Room"),
        InventoryItemRef::new("fridge", "Refrigerator", "Appliances").in_area("Kitchen"),
    ]
}

pub(super) fn start_request() -> StartInspection {
    StartInspection {
        apartment_id: "apt-12".to_string(),
        verifier_id: "verifier-3".to_string(),
        inventory: inventory(),
        areas: None,
    }
}

pub(super) fn start_request_with_areas(areas: Vec<AreaSpec>) -> StartInspection {
    StartInspection {
        areas: Some(areas),
        ..start_request()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
