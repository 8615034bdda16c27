use super::domain::{AreaIssueTag, InspectionError, ItemId, ItemStatus};
use super::record::Inspection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Serializable form of every tracker mutation, so remote callers can drive a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InspectionCommand {
    SetItemStatus {
        item_id: ItemId,
        status: ItemStatus,
    },
    SetItemNotes {
        item_id: ItemId,
        notes: String,
    },
    RegisterArea {
        area_name: String,
        #[serde(default)]
        allowed_tags: Option<BTreeSet<AreaIssueTag>>,
    },
    SetAreaCondition {
        area_name: String,
        is_good: bool,
    },
    ToggleAreaTag {
        area_name: String,
        tag: AreaIssueTag,
    },
    SetAreaNotes {
        area_name: String,
        notes: String,
    },
    SetGeneralNotes {
        #[serde(default)]
        notes: Option<String>,
    },
}

impl InspectionCommand {
    pub fn apply(self, inspection: &mut Inspection) -> Result<(), InspectionError> {
        match self {
            Self::SetItemStatus { item_id, status } => inspection.set_item_status(&item_id, status),
            Self::SetItemNotes { item_id, notes } => inspection.set_item_notes(&item_id, &notes),
            Self::RegisterArea {
                area_name,
                allowed_tags,
            } => inspection.register_area_with_tags(&area_name, allowed_tags),
            Self::SetAreaCondition { area_name, is_good } => {
                inspection.set_area_condition(&area_name, is_good)
            }
            Self::ToggleAreaTag { area_name, tag } => inspection.toggle_area_tag(&area_name, tag),
            Self::SetAreaNotes { area_name, notes } => {
                inspection.set_area_notes(&area_name, &notes)
            }
            Self::SetGeneralNotes { notes } => inspection.set_general_notes(notes.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: InspectionCommand = serde_json::from_str(
            r#"{"type":"toggle_area_tag","area_name":"Kitchen","tag":"odor_moisture_pest"}"#,
        )
        .expect("valid command");
        assert_eq!(
            command,
            InspectionCommand::ToggleAreaTag {
                area_name: "Kitchen".to_string(),
                tag: AreaIssueTag::OdorMoisturePest,
            }
        );
    }

    #[test]
    fn unknown_status_values_fail_to_deserialize() {
        let result = serde_json::from_str::<InspectionCommand>(
            r#"{"type":"set_item_status","item_id":"sofa","status":"broken"}"#,
        );
        assert!(result.is_err());
    }
}
