use super::domain::ItemStatus;
use super::record::Inspection;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub ok: usize,
    pub issue: usize,
    pub missing: usize,
}

impl CategoryCounts {
    fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Ok => self.ok += 1,
            ItemStatus::Issue => self.issue += 1,
            ItemStatus::Missing => self.missing += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.issue + self.missing
    }
}

/// Rollup statistics for a completed or in-progress inspection.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub total_items: usize,
    pub ok_count: usize,
    pub issue_count: usize,
    pub missing_count: usize,
    pub health_percentage: u8,
    /// Set when the inventory was empty; the health figure is then vacuous.
    pub no_items_evaluated: bool,
    pub total_areas: usize,
    pub areas_with_issues: usize,
    pub total_area_issue_tags: usize,
    pub category_breakdown: BTreeMap<String, CategoryCounts>,
}

pub fn aggregate(inspection: &Inspection) -> AggregationResult {
    let mut result = AggregationResult::default();

    for (item, evaluation) in inspection.items().entries() {
        result.total_items += 1;
        match evaluation.status {
            ItemStatus::Ok => result.ok_count += 1,
            ItemStatus::Issue => result.issue_count += 1,
            ItemStatus::Missing => result.missing_count += 1,
        }
        result
            .category_breakdown
            .entry(item.category.clone())
            .or_default()
            .record(evaluation.status);
    }

    for area in inspection.areas().iter() {
        result.total_areas += 1;
        if !area.is_good_condition {
            result.areas_with_issues += 1;
        }
        result.total_area_issue_tags += area.issue_tags.len();
    }

    result.health_percentage = health_percentage(result.ok_count, result.total_items);
    result.no_items_evaluated = result.total_items == 0;
    result
}

/// Share of `ok` items rounded to the nearest whole percent, halves rounding up.
pub fn health_percentage(ok: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }

    let rounded = (ok * 200 + total) / (2 * total);
    rounded.min(100) as u8
}

impl Inspection {
    pub fn aggregate(&self) -> AggregationResult {
        aggregate(self)
    }
}
