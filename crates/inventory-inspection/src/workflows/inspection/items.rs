use super::domain::{InspectionError, InventoryItemRef, ItemId, ItemStatus, SnapshotError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Verifier judgment for one inventory item during a single inspection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEvaluation {
    pub item_id: ItemId,
    pub status: ItemStatus,
    #[serde(default)]
    pub notes: String,
}

impl ItemEvaluation {
    fn seeded(item_id: ItemId) -> Self {
        Self {
            item_id,
            status: ItemStatus::Ok,
            notes: String::new(),
        }
    }

    pub fn is_justified(&self) -> bool {
        !self.status.requires_justification() || !self.notes.trim().is_empty()
    }
}

/// Per-item state for the seeded inventory of one inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemEvaluationSnapshot")]
pub struct ItemEvaluationTracker {
    inventory: Vec<InventoryItemRef>,
    evaluations: BTreeMap<ItemId, ItemEvaluation>,
}

#[derive(Deserialize)]
struct ItemEvaluationSnapshot {
    inventory: Vec<InventoryItemRef>,
    evaluations: BTreeMap<ItemId, ItemEvaluation>,
}

/// Stored trackers must hold exactly one evaluation per inventory item.
impl TryFrom<ItemEvaluationSnapshot> for ItemEvaluationTracker {
    type Error = SnapshotError;

    fn try_from(snapshot: ItemEvaluationSnapshot) -> Result<Self, Self::Error> {
        let ItemEvaluationSnapshot {
            inventory,
            evaluations,
        } = snapshot;

        let mut seen = BTreeSet::new();
        for item in &inventory {
            if !seen.insert(&item.id) {
                return Err(SnapshotError::DuplicateItem(item.id.clone()));
            }
            if !evaluations.contains_key(&item.id) {
                return Err(SnapshotError::UnevaluatedItem(item.id.clone()));
            }
        }

        for (key, evaluation) in &evaluations {
            if !seen.contains(key) {
                return Err(SnapshotError::OrphanEvaluation(key.clone()));
            }
            if evaluation.item_id != *key {
                return Err(SnapshotError::MislabelledEvaluation {
                    key: key.clone(),
                    item_id: evaluation.item_id.clone(),
                });
            }
        }

        Ok(Self {
            inventory,
            evaluations,
        })
    }
}

impl ItemEvaluationTracker {
    /// Seeds one `ok` evaluation per inventory entry, rejecting duplicated ids.
    pub fn seed(inventory: Vec<InventoryItemRef>) -> Result<Self, InspectionError> {
        let mut evaluations = BTreeMap::new();
        for item in &inventory {
            if evaluations.contains_key(&item.id) {
                return Err(InspectionError::DuplicateItem(item.id.clone()));
            }
            evaluations.insert(item.id.clone(), ItemEvaluation::seeded(item.id.clone()));
        }

        Ok(Self {
            inventory,
            evaluations,
        })
    }

    pub fn set_status(&mut self, item_id: &ItemId, status: ItemStatus) -> Result<(), InspectionError> {
        let evaluation = self.evaluation_mut(item_id)?;
        evaluation.status = status;
        if status == ItemStatus::Ok {
            evaluation.notes.clear();
        }
        Ok(())
    }

    pub fn set_notes(&mut self, item_id: &ItemId, notes: &str) -> Result<(), InspectionError> {
        let evaluation = self.evaluation_mut(item_id)?;
        evaluation.notes = notes.to_string();
        Ok(())
    }

    pub fn form(&self) -> &BTreeMap<ItemId, ItemEvaluation> {
        &self.evaluations
    }

    pub fn evaluation(&self, item_id: &ItemId) -> Option<&ItemEvaluation> {
        self.evaluations.get(item_id)
    }

    pub fn inventory(&self) -> &[InventoryItemRef] {
        &self.inventory
    }

    pub fn len(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    /// Inventory entries paired with their evaluation, in the order the dashboard supplied them.
    pub fn entries(&self) -> impl Iterator<Item = (&InventoryItemRef, &ItemEvaluation)> {
        self.inventory
            .iter()
            .filter_map(|item| self.evaluations.get(&item.id).map(|eval| (item, eval)))
    }

    pub fn outstanding_justifications(&self) -> Vec<&InventoryItemRef> {
        self.entries()
            .filter(|(_, evaluation)| !evaluation.is_justified())
            .map(|(item, _)| item)
            .collect()
    }

    pub fn has_findings(&self) -> bool {
        self.evaluations
            .values()
            .any(|evaluation| evaluation.status != ItemStatus::Ok)
    }

    fn evaluation_mut(&mut self, item_id: &ItemId) -> Result<&mut ItemEvaluation, InspectionError> {
        self.evaluations
            .get_mut(item_id)
            .ok_or_else(|| InspectionError::UnknownItem(item_id.clone()))
    }
}
