//! Inspection & condition-evaluation engine.
//!
//! Data flows one way: vocabulary → item/area trackers → record builder → aggregation → report.
//! The service, repository and router modules wrap the engine for the dashboard that owns storage.

pub mod aggregation;
pub mod areas;
pub mod commands;
pub mod domain;
pub mod items;
pub mod record;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregation::{aggregate, AggregationResult, CategoryCounts};
pub use areas::{AreaEvaluation, AreaEvaluationTracker};
pub use commands::InspectionCommand;
pub use domain::{
    AreaIssueTag, AreaSpec, InspectionError, InspectionId, InspectionStatus, InspectionTransition,
    InventoryItemRef, ItemId, ItemStatus, SnapshotError, VocabularyError,
};
pub use items::{ItemEvaluation, ItemEvaluationTracker};
pub use record::{CompletionReport, CompletionWarning, Inspection, InspectionRecordBuilder};
pub use report::{render, ReportDocument};
pub use repository::{InspectionRepository, RepositoryError};
pub use router::inspection_router;
pub use service::{InspectionService, InspectionServiceError, StartInspection};
