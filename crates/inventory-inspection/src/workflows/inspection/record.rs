use super::areas::AreaEvaluationTracker;
use super::domain::{
    AreaIssueTag, AreaSpec, InspectionError, InspectionId, InspectionStatus, InspectionTransition,
    InventoryItemRef, ItemId, ItemStatus, SnapshotError,
};
use super::items::ItemEvaluationTracker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Seeds a pending inspection from the inventory and area list handed over by the dashboard.
#[derive(Debug, Clone)]
pub struct InspectionRecordBuilder {
    id: InspectionId,
    apartment_id: String,
    verifier_id: String,
    inventory: Vec<InventoryItemRef>,
    areas: Vec<AreaSpec>,
}

impl InspectionRecordBuilder {
    pub fn new(
        id: InspectionId,
        apartment_id: impl Into<String>,
        verifier_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            apartment_id: apartment_id.into(),
            verifier_id: verifier_id.into(),
            inventory: Vec::new(),
            areas: Vec::new(),
        }
    }

    pub fn inventory(mut self, inventory: Vec<InventoryItemRef>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn areas(mut self, areas: Vec<AreaSpec>) -> Self {
        self.areas = areas;
        self
    }

    pub fn start(self, created_at: DateTime<Utc>) -> Result<Inspection, InspectionError> {
        let items = ItemEvaluationTracker::seed(self.inventory)?;
        let areas = AreaEvaluationTracker::from_specs(self.areas)?;

        info!(
            inspection_id = %self.id,
            apartment_id = %self.apartment_id,
            items = items.len(),
            areas = areas.len(),
            "inspection started"
        );

        Ok(Inspection {
            id: self.id,
            apartment_id: self.apartment_id,
            verifier_id: self.verifier_id,
            status: InspectionStatus::Pending,
            items,
            areas,
            general_notes: None,
            created_at,
            completed_at: None,
            cancelled_at: None,
            version: 0,
        })
    }
}

/// Aggregate root for one verification session against one apartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InspectionSnapshot")]
pub struct Inspection {
    id: InspectionId,
    apartment_id: String,
    verifier_id: String,
    status: InspectionStatus,
    items: ItemEvaluationTracker,
    areas: AreaEvaluationTracker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    general_notes: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    version: u64,
}

#[derive(Deserialize)]
struct InspectionSnapshot {
    id: InspectionId,
    apartment_id: String,
    verifier_id: String,
    status: InspectionStatus,
    items: ItemEvaluationTracker,
    areas: AreaEvaluationTracker,
    #[serde(default)]
    general_notes: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    version: u64,
}

/// Trackers validate themselves; this checks what only the whole record can see.
impl TryFrom<InspectionSnapshot> for Inspection {
    type Error = SnapshotError;

    fn try_from(snapshot: InspectionSnapshot) -> Result<Self, Self::Error> {
        let status = snapshot.status;
        let completed = status == InspectionStatus::Completed;
        let cancelled = status == InspectionStatus::Cancelled;
        if snapshot.completed_at.is_some() != completed
            || snapshot.cancelled_at.is_some() != cancelled
        {
            return Err(SnapshotError::TimestampMismatch { status });
        }

        if completed {
            if let Some(item) = snapshot.items.outstanding_justifications().first() {
                return Err(SnapshotError::UnjustifiedItem(item.id.clone()));
            }
        }

        Ok(Self {
            id: snapshot.id,
            apartment_id: snapshot.apartment_id,
            verifier_id: snapshot.verifier_id,
            status,
            items: snapshot.items,
            areas: snapshot.areas,
            general_notes: snapshot.general_notes,
            created_at: snapshot.created_at,
            completed_at: snapshot.completed_at,
            cancelled_at: snapshot.cancelled_at,
            version: snapshot.version,
        })
    }
}

/// Non-blocking observations produced while completing an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionWarning {
    GeneralNotesRecommended,
    AreaNotesRecommended { area_name: String },
}

impl CompletionWarning {
    pub fn message(&self) -> String {
        match self {
            Self::GeneralNotesRecommended => {
                "findings were recorded without general notes".to_string()
            }
            Self::AreaNotesRecommended { area_name } => {
                format!("area '{area_name}' has issue tags but no notes")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub completed_at: DateTime<Utc>,
    pub warnings: Vec<CompletionWarning>,
}

impl Inspection {
    pub fn id(&self) -> &InspectionId {
        &self.id
    }

    pub fn apartment_id(&self) -> &str {
        &self.apartment_id
    }

    pub fn verifier_id(&self) -> &str {
        &self.verifier_id
    }

    pub fn status(&self) -> InspectionStatus {
        self.status
    }

    pub fn items(&self) -> &ItemEvaluationTracker {
        &self.items
    }

    pub fn areas(&self) -> &AreaEvaluationTracker {
        &self.areas
    }

    pub fn inventory(&self) -> &[InventoryItemRef] {
        self.items.inventory()
    }

    pub fn general_notes(&self) -> Option<&str> {
        self.general_notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Incremented on every accepted mutation; storage layers compare it before overwriting.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_frozen(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when at least one item or area was judged not good.
    pub fn has_findings(&self) -> bool {
        self.items.has_findings() || self.areas.has_findings()
    }

    pub fn set_item_status(
        &mut self,
        item_id: &ItemId,
        status: ItemStatus,
    ) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.items.set_status(item_id, status)?;
        self.touch();
        Ok(())
    }

    pub fn set_item_notes(&mut self, item_id: &ItemId, notes: &str) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.items.set_notes(item_id, notes)?;
        self.touch();
        Ok(())
    }

    pub fn register_area(&mut self, name: &str) -> Result<(), InspectionError> {
        self.register_area_with_tags(name, None)
    }

    pub fn register_area_with_tags(
        &mut self,
        name: &str,
        allowed_tags: Option<BTreeSet<AreaIssueTag>>,
    ) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.areas.register_area_with_tags(name, allowed_tags)?;
        self.touch();
        Ok(())
    }

    pub fn set_area_condition(&mut self, name: &str, is_good: bool) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.areas.set_good_condition(name, is_good)?;
        self.touch();
        Ok(())
    }

    pub fn toggle_area_tag(&mut self, name: &str, tag: AreaIssueTag) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.areas.toggle_issue_tag(name, tag)?;
        self.touch();
        Ok(())
    }

    pub fn set_area_notes(&mut self, name: &str, notes: &str) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.areas.set_notes(name, notes)?;
        self.touch();
        Ok(())
    }

    /// Blank text clears the notes.
    pub fn set_general_notes(&mut self, notes: Option<&str>) -> Result<(), InspectionError> {
        self.ensure_mutable()?;
        self.general_notes = notes
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        self.touch();
        Ok(())
    }

    /// Validates every outstanding invariant and freezes the record as completed.
    ///
    /// Nothing on the record changes unless every check passes.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<CompletionReport, InspectionError> {
        let next = self.status.transition(InspectionTransition::Complete)?;

        let outstanding = self.items.outstanding_justifications();
        if let Some(first) = outstanding.first() {
            return Err(InspectionError::MissingJustification {
                item_id: first.id.clone(),
                item_name: first.name.clone(),
                outstanding: outstanding.len(),
            });
        }

        let warnings = self.completion_warnings();
        for warning in &warnings {
            warn!(inspection_id = %self.id, "{}", warning.message());
        }

        self.status = next;
        self.completed_at = Some(now);
        self.touch();

        info!(
            inspection_id = %self.id,
            apartment_id = %self.apartment_id,
            warnings = warnings.len(),
            "inspection completed"
        );

        Ok(CompletionReport {
            completed_at: now,
            warnings,
        })
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), InspectionError> {
        let next = self.status.transition(InspectionTransition::Cancel)?;
        self.status = next;
        self.cancelled_at = Some(now);
        self.touch();

        info!(inspection_id = %self.id, "inspection cancelled");
        Ok(())
    }

    fn completion_warnings(&self) -> Vec<CompletionWarning> {
        let mut warnings = Vec::new();
        if self.has_findings() && self.general_notes.is_none() {
            warnings.push(CompletionWarning::GeneralNotesRecommended);
        }

        warnings.extend(
            self.areas
                .iter()
                .filter(|area| !area.issue_tags.is_empty() && area.notes.trim().is_empty())
                .map(|area| CompletionWarning::AreaNotesRecommended {
                    area_name: area.area_name.clone(),
                }),
        );
        warnings
    }

    fn ensure_mutable(&self) -> Result<(), InspectionError> {
        if self.is_frozen() {
            return Err(InspectionError::RecordFrozen {
                status: self.status,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn started_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn finished_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, 10, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn inspection() -> Inspection {
        InspectionRecordBuilder::new(InspectionId::new("insp-1"), "apt-4b", "verifier-7")
            .inventory(vec![
                InventoryItemRef::new("sofa", "Sofa", "Furniture").in_area("Living Room"),
                InventoryItemRef::new("oven", "Oven", "Appliances").in_area("Kitchen"),
            ])
            .areas(vec![AreaSpec::new("Living Room"), AreaSpec::new("Kitchen")])
            .start(started_at())
            .expect("inspection starts")
    }

    #[test]
    fn stored_records_need_timestamps_matching_their_status() {
        let mut completed = inspection();
        completed.complete(finished_at()).expect("completes");
        let stored = serde_json::to_value(&completed).expect("serializable");
        let restored: Inspection = serde_json::from_value(stored.clone()).expect("valid snapshot");
        assert_eq!(restored, completed);

        let mut undated = stored.clone();
        undated
            .as_object_mut()
            .expect("record object")
            .remove("completed_at");
        let err = serde_json::from_value::<Inspection>(undated).expect_err("completed without time");
        assert!(err.to_string().contains("timestamps"));

        let mut both = stored;
        both["cancelled_at"] = serde_json::to_value(finished_at()).expect("serializable");
        assert!(serde_json::from_value::<Inspection>(both).is_err());

        let pending = serde_json::to_value(inspection()).expect("serializable");
        let mut early = pending;
        early["completed_at"] = serde_json::to_value(finished_at()).expect("serializable");
        assert!(serde_json::from_value::<Inspection>(early).is_err());
    }

    #[test]
    fn start_seeds_pending_record() {
        let inspection = inspection();
        assert_eq!(inspection.status(), InspectionStatus::Pending);
        assert_eq!(inspection.items().form().len(), 2);
        assert_eq!(inspection.areas().len(), 2);
        assert_eq!(inspection.created_at(), started_at());
        assert!(inspection.completed_at().is_none());
        assert_eq!(inspection.version(), 0);
    }

    #[test]
    fn duplicate_area_specs_fail_to_start() {
        let result =
            InspectionRecordBuilder::new(InspectionId::new("insp-2"), "apt-4b", "verifier-7")
                .areas(vec![AreaSpec::new("Kitchen"), AreaSpec::new("Kitchen")])
                .start(started_at());
        assert_eq!(
            result.expect_err("duplicate area"),
            InspectionError::DuplicateArea("Kitchen".to_string())
        );
    }

    #[test]
    fn complete_requires_notes_for_flagged_items() {
        let mut inspection = inspection();
        let oven = ItemId::new("oven");
        inspection
            .set_item_status(&oven, ItemStatus::Issue)
            .expect("pending record");

        let err = inspection.complete(finished_at()).expect_err("missing notes");
        assert_eq!(
            err,
            InspectionError::MissingJustification {
                item_id: oven,
                item_name: "Oven".to_string(),
                outstanding: 1,
            }
        );
        assert_eq!(inspection.status(), InspectionStatus::Pending);
        assert!(inspection.completed_at().is_none());
    }

    #[test]
    fn complete_freezes_and_reports_soft_warnings() {
        let mut inspection = inspection();
        let sofa = ItemId::new("sofa");
        inspection
            .set_item_status(&sofa, ItemStatus::Missing)
            .expect("pending record");
        inspection
            .set_item_notes(&sofa, "Not in unit at walkthrough")
            .expect("pending record");
        inspection
            .set_area_condition("Kitchen", false)
            .expect("pending record");
        inspection
            .toggle_area_tag("Kitchen", AreaIssueTag::Outlets)
            .expect("pending record");

        let report = inspection.complete(finished_at()).expect("completes");
        assert_eq!(report.completed_at, finished_at());
        assert_eq!(
            report.warnings,
            vec![
                CompletionWarning::GeneralNotesRecommended,
                CompletionWarning::AreaNotesRecommended {
                    area_name: "Kitchen".to_string()
                },
            ]
        );
        assert_eq!(inspection.status(), InspectionStatus::Completed);
        assert_eq!(inspection.completed_at(), Some(finished_at()));
    }

    #[test]
    fn clean_inspection_completes_without_warnings() {
        let mut inspection = inspection();
        let report = inspection.complete(finished_at()).expect("completes");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn frozen_records_reject_mutation_and_second_completion() {
        let mut inspection = inspection();
        inspection.complete(finished_at()).expect("completes");
        let version = inspection.version();

        let frozen = InspectionError::RecordFrozen {
            status: InspectionStatus::Completed,
        };
        assert_eq!(
            inspection.set_item_status(&ItemId::new("sofa"), ItemStatus::Issue),
            Err(frozen.clone())
        );
        assert_eq!(inspection.register_area("Hallway"), Err(frozen.clone()));
        assert_eq!(inspection.set_general_notes(Some("late note")), Err(frozen));
        assert_eq!(
            inspection.complete(finished_at()),
            Err(InspectionError::InvalidTransition {
                from: InspectionStatus::Completed,
                attempted: InspectionTransition::Complete,
            })
        );
        assert_eq!(inspection.version(), version);
    }

    #[test]
    fn cancel_freezes_pending_records_only() {
        let mut inspection = inspection();
        inspection.cancel(finished_at()).expect("cancels");
        assert_eq!(inspection.status(), InspectionStatus::Cancelled);
        assert_eq!(inspection.cancelled_at(), Some(finished_at()));
        assert!(inspection.completed_at().is_none());

        assert_eq!(
            inspection.set_area_notes("Kitchen", "x"),
            Err(InspectionError::RecordFrozen {
                status: InspectionStatus::Cancelled
            })
        );
        assert_eq!(
            inspection.cancel(finished_at()),
            Err(InspectionError::InvalidTransition {
                from: InspectionStatus::Cancelled,
                attempted: InspectionTransition::Cancel,
            })
        );
        assert!(inspection.complete(finished_at()).is_err());
    }

    #[test]
    fn general_notes_are_trimmed_and_blank_clears() {
        let mut inspection = inspection();
        inspection
            .set_general_notes(Some("  Tenant reported leak  "))
            .expect("pending record");
        assert_eq!(inspection.general_notes(), Some("Tenant reported leak"));

        inspection.set_general_notes(Some("   ")).expect("pending record");
        assert!(inspection.general_notes().is_none());
    }

    #[test]
    fn successful_mutations_bump_version() {
        let mut inspection = inspection();
        inspection
            .set_item_notes(&ItemId::new("sofa"), "Minor wear")
            .expect("pending record");
        assert!(inspection
            .set_item_notes(&ItemId::new("ghost"), "?")
            .is_err());
        assert_eq!(inspection.version(), 1);
    }
}
