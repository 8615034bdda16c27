use super::super::aggregation::CategoryCounts;
use super::super::domain::{AreaIssueTag, InspectionId, InspectionStatus, ItemId, ItemStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder shown wherever a free-text or optional field is empty.
pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Success,
    Warning,
    Danger,
}

impl StatusBadge {
    pub const fn for_status(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Ok => Self::Success,
            ItemStatus::Issue => Self::Warning,
            ItemStatus::Missing => Self::Danger,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    pub folio: InspectionId,
    pub apartment_id: String,
    pub verifier_id: String,
    pub status: InspectionStatus,
    pub status_label: &'static str,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub health_percentage: u8,
    pub issue_count: usize,
    pub missing_count: usize,
    pub total_items: usize,
    pub no_items_evaluated: bool,
    pub areas_with_issues: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub item_id: ItemId,
    pub name: String,
    pub area: String,
    pub status: ItemStatus,
    pub status_label: &'static str,
    pub badge: StatusBadge,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub category: String,
    pub counts: CategoryCounts,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingItemIncident {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub area: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaIncident {
    pub area_name: String,
    pub tags: Vec<AreaIssueTag>,
    pub tag_labels: Vec<&'static str>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportIncidents {
    pub missing_items: Vec<MissingItemIncident>,
    pub area_issues: Vec<AreaIncident>,
}

impl ReportIncidents {
    pub fn is_empty(&self) -> bool {
        self.missing_items.is_empty() && self.area_issues.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFooter {
    pub generated_at: DateTime<Utc>,
    pub inspection_id: InspectionId,
}

/// Renderer-agnostic document for a web view, print layout or file export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub header: ReportHeader,
    pub summary: ReportSummary,
    pub sections: Vec<ReportSection>,
    pub incidents: ReportIncidents,
    pub footer: ReportFooter,
}

impl ReportDocument {
    /// Equality that ignores the generation timestamp.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.summary == other.summary
            && self.sections == other.sections
            && self.incidents == other.incidents
            && self.footer.inspection_id == other.footer.inspection_id
    }
}
