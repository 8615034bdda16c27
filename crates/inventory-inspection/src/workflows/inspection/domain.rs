use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of an inventory item supplied by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Folio of one inspection session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionId(pub String);

impl InspectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InspectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only inventory entry handed over by the dashboard when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItemRef {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
}

impl InventoryItemRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            category: category.into(),
            area_name: None,
        }
    }

    pub fn in_area(mut self, area_name: impl Into<String>) -> Self {
        self.area_name = Some(area_name.into());
        self
    }
}

/// Physical area configured for an inspection, optionally with a restricted tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tags: Option<BTreeSet<AreaIssueTag>>,
}

impl AreaSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed_tags: None,
        }
    }

    pub fn with_tags(name: impl Into<String>, tags: impl IntoIterator<Item = AreaIssueTag>) -> Self {
        Self {
            name: name.into(),
            allowed_tags: Some(tags.into_iter().collect()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Ok,
    Issue,
    Missing,
}

impl ItemStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Ok, Self::Issue, Self::Missing]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Issue => "issue",
            Self::Missing => "missing",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Issue => "Issue",
            Self::Missing => "Missing",
        }
    }

    /// Statuses that need written notes before the inspection can be completed.
    pub const fn requires_justification(self) -> bool {
        matches!(self, Self::Issue | Self::Missing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaIssueTag {
    Walls,
    Floor,
    Ceiling,
    Lighting,
    Windows,
    Doors,
    Outlets,
    Baseboards,
    Switches,
    OdorMoisturePest,
}

impl AreaIssueTag {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Walls,
            Self::Floor,
            Self::Ceiling,
            Self::Lighting,
            Self::Windows,
            Self::Doors,
            Self::Outlets,
            Self::Baseboards,
            Self::Switches,
            Self::OdorMoisturePest,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Walls => "walls",
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::Lighting => "lighting",
            Self::Windows => "windows",
            Self::Doors => "doors",
            Self::Outlets => "outlets",
            Self::Baseboards => "baseboards",
            Self::Switches => "switches",
            Self::OdorMoisturePest => "odor_moisture_pest",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Walls => "Walls",
            Self::Floor => "Floor",
            Self::Ceiling => "Ceiling",
            Self::Lighting => "Lighting",
            Self::Windows => "Windows",
            Self::Doors => "Doors",
            Self::Outlets => "Outlets",
            Self::Baseboards => "Baseboards",
            Self::Switches => "Switches",
            Self::OdorMoisturePest => "Odor/Moisture/Pest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The only place lifecycle edges are decided. Terminal states have no outgoing edges.
    pub fn transition(self, requested: InspectionTransition) -> Result<Self, InspectionError> {
        match (self, requested) {
            (Self::Pending, InspectionTransition::Complete) => Ok(Self::Completed),
            (Self::Pending, InspectionTransition::Cancel) => Ok(Self::Cancelled),
            (from, attempted) => Err(InspectionError::InvalidTransition { from, attempted }),
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionTransition {
    Complete,
    Cancel,
}

impl fmt::Display for InspectionTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => f.write_str("complete"),
            Self::Cancel => f.write_str("cancel"),
        }
    }
}

/// Raised when free text does not name a value of the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct VocabularyError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_vocabulary<T, const N: usize>(
    kind: &'static str,
    raw: &str,
    values: [T; N],
    key: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Result<T, VocabularyError>
where
    T: Copy,
{
    let trimmed = raw.trim();
    values
        .into_iter()
        .find(|value| {
            key(*value).eq_ignore_ascii_case(trimmed) || label(*value).eq_ignore_ascii_case(trimmed)
        })
        .ok_or_else(|| VocabularyError {
            kind,
            value: raw.to_string(),
        })
}

impl FromStr for ItemStatus {
    type Err = VocabularyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("item status", raw, Self::ordered(), Self::key, Self::label)
    }
}

impl FromStr for AreaIssueTag {
    type Err = VocabularyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_vocabulary("area issue tag", raw, Self::ordered(), Self::key, Self::label)
    }
}

impl FromStr for InspectionStatus {
    type Err = VocabularyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_vocabulary(
            "inspection status",
            raw,
            [Self::Pending, Self::Completed, Self::Cancelled],
            Self::key,
            Self::label,
        )
    }
}

/// Validation failures raised synchronously by the trackers and the record builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectionError {
    #[error("item {0} is not part of this inspection")]
    UnknownItem(ItemId),
    #[error("item {0} appears more than once in the inventory")]
    DuplicateItem(ItemId),
    #[error("area '{0}' is already registered")]
    DuplicateArea(String),
    #[error("area '{0}' is not registered on this inspection")]
    UnknownArea(String),
    #[error("area name must not be blank")]
    InvalidAreaName,
    #[error("tag {} is not allowed for area '{area}'", .tag.label())]
    TagNotAllowed { area: String, tag: AreaIssueTag },
    #[error("item {item_id} ({item_name}) needs notes before completion ({outstanding} item(s) outstanding)")]
    MissingJustification {
        item_id: ItemId,
        item_name: String,
        outstanding: usize,
    },
    #[error("cannot {attempted} an inspection that is {from}")]
    InvalidTransition {
        from: InspectionStatus,
        attempted: InspectionTransition,
    },
    #[error("inspection is {status} and can no longer be edited")]
    RecordFrozen { status: InspectionStatus },
}

/// Raised when a stored snapshot does not satisfy the record invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("inventory item {0} is listed more than once")]
    DuplicateItem(ItemId),
    #[error("inventory item {0} has no evaluation")]
    UnevaluatedItem(ItemId),
    #[error("evaluation for {0} does not match any inventory item")]
    OrphanEvaluation(ItemId),
    #[error("evaluation stored under {key} names item {item_id}")]
    MislabelledEvaluation { key: ItemId, item_id: ItemId },
    #[error("area order does not match the registered areas")]
    AreaOrderMismatch,
    #[error("area stored under '{key}' is named '{area_name}'")]
    MislabelledArea { key: String, area_name: String },
    #[error("area '{0}' is in good condition but carries issue tags")]
    TaggedGoodArea(String),
    #[error("area '{area}' carries tag {} outside its allowed set", .tag.label())]
    DisallowedTag { area: String, tag: AreaIssueTag },
    #[error("{status} inspection has inconsistent completion/cancellation timestamps")]
    TimestampMismatch { status: InspectionStatus },
    #[error("completed inspection still has unjustified item {0}")]
    UnjustifiedItem(ItemId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_status_parses_keys_and_labels() {
        assert_eq!("issue".parse::<ItemStatus>(), Ok(ItemStatus::Issue));
        assert_eq!(" OK ".parse::<ItemStatus>(), Ok(ItemStatus::Ok));
        assert_eq!("Missing".parse::<ItemStatus>(), Ok(ItemStatus::Missing));
    }

    #[test]
    fn unknown_vocabulary_is_rejected() {
        let err = "broken".parse::<ItemStatus>().expect_err("not a status");
        assert_eq!(err.kind, "item status");
        assert_eq!(err.value, "broken");

        assert!("mold".parse::<AreaIssueTag>().is_err());
        assert!("archived".parse::<InspectionStatus>().is_err());
        assert!(serde_json::from_str::<ItemStatus>("\"damaged\"").is_err());
    }

    #[test]
    fn odor_tag_accepts_key_and_label() {
        assert_eq!(
            "odor_moisture_pest".parse::<AreaIssueTag>(),
            Ok(AreaIssueTag::OdorMoisturePest)
        );
        assert_eq!(
            "Odor/Moisture/Pest".parse::<AreaIssueTag>(),
            Ok(AreaIssueTag::OdorMoisturePest)
        );
    }

    #[test]
    fn transitions_only_leave_pending() {
        assert_eq!(
            InspectionStatus::Pending.transition(InspectionTransition::Complete),
            Ok(InspectionStatus::Completed)
        );
        assert_eq!(
            InspectionStatus::Pending.transition(InspectionTransition::Cancel),
            Ok(InspectionStatus::Cancelled)
        );

        for terminal in [InspectionStatus::Completed, InspectionStatus::Cancelled] {
            for attempted in [InspectionTransition::Complete, InspectionTransition::Cancel] {
                assert_eq!(
                    terminal.transition(attempted),
                    Err(InspectionError::InvalidTransition {
                        from: terminal,
                        attempted
                    })
                );
            }
        }
    }

    #[test]
    fn justification_is_required_for_non_ok_statuses() {
        assert!(!ItemStatus::Ok.requires_justification());
        assert!(ItemStatus::Issue.requires_justification());
        assert!(ItemStatus::Missing.requires_justification());
    }
}
