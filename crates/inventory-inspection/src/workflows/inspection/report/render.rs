use super::super::aggregation::AggregationResult;
use super::super::record::Inspection;
use super::views::{
    AreaIncident, MissingItemIncident, ReportDocument, ReportFooter, ReportHeader,
    ReportIncidents, ReportRow, ReportSection, ReportSummary, StatusBadge, EMPTY_CELL,
};
use crate::workflows::inspection::domain::ItemStatus;
use chrono::{DateTime, Utc};

/// Lays out an inspection and its aggregation. Counts come from `aggregation` as-is.
pub fn render(
    inspection: &Inspection,
    aggregation: &AggregationResult,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    ReportDocument {
        header: header(inspection),
        summary: summary(inspection, aggregation),
        sections: sections(inspection, aggregation),
        incidents: incidents(inspection),
        footer: ReportFooter {
            generated_at,
            inspection_id: inspection.id().clone(),
        },
    }
}

fn header(inspection: &Inspection) -> ReportHeader {
    ReportHeader {
        folio: inspection.id().clone(),
        apartment_id: inspection.apartment_id().to_string(),
        verifier_id: inspection.verifier_id().to_string(),
        status: inspection.status(),
        status_label: inspection.status().label(),
        created_at: inspection.created_at(),
        completed_at: inspection.completed_at(),
    }
}

fn summary(inspection: &Inspection, aggregation: &AggregationResult) -> ReportSummary {
    ReportSummary {
        health_percentage: aggregation.health_percentage,
        issue_count: aggregation.issue_count,
        missing_count: aggregation.missing_count,
        total_items: aggregation.total_items,
        no_items_evaluated: aggregation.no_items_evaluated,
        areas_with_issues: aggregation.areas_with_issues,
        general_notes: inspection.general_notes().map(str::to_string),
    }
}

fn sections(inspection: &Inspection, aggregation: &AggregationResult) -> Vec<ReportSection> {
    let mut sections: Vec<ReportSection> = Vec::new();

    for (item, evaluation) in inspection.items().entries() {
        let row = ReportRow {
            item_id: item.id.clone(),
            name: item.name.clone(),
            area: cell(item.area_name.as_deref().unwrap_or_default()),
            status: evaluation.status,
            status_label: evaluation.status.label(),
            badge: StatusBadge::for_status(evaluation.status),
            notes: cell(&evaluation.notes),
        };

        match sections
            .iter_mut()
            .find(|section| section.category == item.category)
        {
            Some(section) => section.rows.push(row),
            None => sections.push(ReportSection {
                category: item.category.clone(),
                counts: aggregation
                    .category_breakdown
                    .get(&item.category)
                    .copied()
                    .unwrap_or_default(),
                rows: vec![row],
            }),
        }
    }

    sections
}

fn incidents(inspection: &Inspection) -> ReportIncidents {
    let missing_items = inspection
        .items()
        .entries()
        .filter(|(_, evaluation)| evaluation.status == ItemStatus::Missing)
        .map(|(item, evaluation)| MissingItemIncident {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            area: cell(item.area_name.as_deref().unwrap_or_default()),
            notes: cell(&evaluation.notes),
        })
        .collect();

    let area_issues = inspection
        .areas()
        .iter()
        .filter(|area| !area.is_good_condition)
        .map(|area| AreaIncident {
            area_name: area.area_name.clone(),
            tags: area.issue_tags.iter().copied().collect(),
            tag_labels: area.issue_tags.iter().map(|tag| tag.label()).collect(),
            notes: cell(&area.notes),
        })
        .collect();

    ReportIncidents {
        missing_items,
        area_issues,
    }
}

fn cell(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        trimmed.to_string()
    }
}

impl Inspection {
    /// Aggregates and renders in one step.
    pub fn report(&self, generated_at: DateTime<Utc>) -> ReportDocument {
        render(self, &self.aggregate(), generated_at)
    }
}
