use inventory_inspection::workflows::inspection::{
    AreaIssueTag, Inspection, InspectionId, InspectionRepository, ItemId, ItemStatus,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store standing in for the dashboard's key-value persistence.
#[derive(Default, Clone)]
pub(crate) struct InMemoryInspectionRepository {
    records: Arc<Mutex<HashMap<InspectionId, Inspection>>>,
}

impl InMemoryInspectionRepository {
    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<InspectionId, Inspection>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("inspection store lock poisoned".to_string()))
    }
}

impl InspectionRepository for InMemoryInspectionRepository {
    fn insert(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(inspection.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inspection.id().clone(), inspection.clone());
        Ok(inspection)
    }

    fn update(&self, inspection: Inspection, expected_version: u64) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get(inspection.id()) {
            Some(stored) if stored.version() != expected_version => Err(RepositoryError::Conflict),
            Some(_) => {
                guard.insert(inspection.id().clone(), inspection);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn list_for_apartment(&self, apartment_id: &str) -> Result<Vec<Inspection>, RepositoryError> {
        let guard = self.lock()?;
        let mut records: Vec<Inspection> = guard
            .values()
            .filter(|inspection| inspection.apartment_id() == apartment_id)
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(records)
    }
}

/// `--finding item_id=status[:notes]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemFinding {
    pub(crate) item_id: ItemId,
    pub(crate) status: ItemStatus,
    pub(crate) notes: Option<String>,
}

/// `--area-issue "Area=tag+tag[:notes]"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AreaFinding {
    pub(crate) area_name: String,
    pub(crate) tags: BTreeSet<AreaIssueTag>,
    pub(crate) notes: Option<String>,
}

fn split_assignment<'a>(raw: &'a str, expected: &str) -> Result<(&'a str, &'a str, Option<String>), String> {
    let (target, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected {expected}, got '{raw}'"))?;
    let target = target.trim();
    if target.is_empty() {
        return Err(format!("expected {expected}, got '{raw}'"));
    }

    let (value, notes) = match rest.split_once(':') {
        Some((value, notes)) => (value, Some(notes.trim().to_string())),
        None => (rest, None),
    };
    Ok((target, value.trim(), notes.filter(|text| !text.is_empty())))
}

pub(crate) fn parse_item_finding(raw: &str) -> Result<ItemFinding, String> {
    let (item_id, status, notes) = split_assignment(raw, "ITEM=STATUS[:NOTES]")?;
    let status = status.parse::<ItemStatus>().map_err(|err| err.to_string())?;
    Ok(ItemFinding {
        item_id: ItemId::new(item_id),
        status,
        notes,
    })
}

pub(crate) fn parse_area_finding(raw: &str) -> Result<AreaFinding, String> {
    let (area_name, tags, notes) = split_assignment(raw, "AREA=TAG[+TAG][:NOTES]")?;
    let tags = tags
        .split('+')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.parse::<AreaIssueTag>().map_err(|err| err.to_string()))
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(AreaFinding {
        area_name: area_name.to_string(),
        tags,
        notes,
    })
}
