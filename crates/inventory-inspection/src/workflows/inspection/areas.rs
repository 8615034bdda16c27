use super::domain::{AreaIssueTag, AreaSpec, InspectionError, SnapshotError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Condition of one physical space. Issue tags only exist while the area is marked bad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEvaluation {
    pub area_name: String,
    pub is_good_condition: bool,
    #[serde(default)]
    pub issue_tags: BTreeSet<AreaIssueTag>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tags: Option<BTreeSet<AreaIssueTag>>,
}

impl AreaEvaluation {
    fn registered(area_name: String, allowed_tags: Option<BTreeSet<AreaIssueTag>>) -> Self {
        Self {
            area_name,
            is_good_condition: true,
            issue_tags: BTreeSet::new(),
            notes: String::new(),
            allowed_tags,
        }
    }

    pub fn allows(&self, tag: AreaIssueTag) -> bool {
        self.allowed_tags
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&tag))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AreaEvaluationSnapshot")]
pub struct AreaEvaluationTracker {
    order: Vec<String>,
    areas: BTreeMap<String, AreaEvaluation>,
}

#[derive(Deserialize)]
struct AreaEvaluationSnapshot {
    #[serde(default)]
    order: Vec<String>,
    #[serde(default)]
    areas: BTreeMap<String, AreaEvaluation>,
}

impl TryFrom<AreaEvaluationSnapshot> for AreaEvaluationTracker {
    type Error = SnapshotError;

    fn try_from(snapshot: AreaEvaluationSnapshot) -> Result<Self, Self::Error> {
        let AreaEvaluationSnapshot { order, areas } = snapshot;

        let ordered: BTreeSet<&String> = order.iter().collect();
        if ordered.len() != order.len() || !ordered.iter().copied().eq(areas.keys()) {
            return Err(SnapshotError::AreaOrderMismatch);
        }

        for (key, area) in &areas {
            if area.area_name != *key {
                return Err(SnapshotError::MislabelledArea {
                    key: key.clone(),
                    area_name: area.area_name.clone(),
                });
            }
            if area.is_good_condition && !area.issue_tags.is_empty() {
                return Err(SnapshotError::TaggedGoodArea(key.clone()));
            }
            if let Some(tag) = area.issue_tags.iter().copied().find(|tag| !area.allows(*tag)) {
                return Err(SnapshotError::DisallowedTag {
                    area: key.clone(),
                    tag,
                });
            }
        }

        Ok(Self { order, areas })
    }
}

impl AreaEvaluationTracker {
    pub fn from_specs(specs: Vec<AreaSpec>) -> Result<Self, InspectionError> {
        let mut tracker = Self::default();
        for spec in specs {
            tracker.register_area_with_tags(&spec.name, spec.allowed_tags)?;
        }
        Ok(tracker)
    }

    pub fn register_area(&mut self, name: &str) -> Result<(), InspectionError> {
        self.register_area_with_tags(name, None)
    }

    pub fn register_area_with_tags(
        &mut self,
        name: &str,
        allowed_tags: Option<BTreeSet<AreaIssueTag>>,
    ) -> Result<(), InspectionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InspectionError::InvalidAreaName);
        }
        if self.areas.contains_key(name) {
            return Err(InspectionError::DuplicateArea(name.to_string()));
        }

        self.order.push(name.to_string());
        self.areas.insert(
            name.to_string(),
            AreaEvaluation::registered(name.to_string(), allowed_tags),
        );
        Ok(())
    }

    /// Marking an area good discards any previously selected tags.
    pub fn set_good_condition(&mut self, name: &str, is_good: bool) -> Result<(), InspectionError> {
        let area = self.area_mut(name)?;
        area.is_good_condition = is_good;
        if is_good {
            area.issue_tags.clear();
        }
        Ok(())
    }

    /// Flips the tag on a bad area. Areas in good condition ignore the call.
    pub fn toggle_issue_tag(&mut self, name: &str, tag: AreaIssueTag) -> Result<(), InspectionError> {
        let area = self.area_mut(name)?;
        if !area.allows(tag) {
            return Err(InspectionError::TagNotAllowed {
                area: area.area_name.clone(),
                tag,
            });
        }
        if area.is_good_condition {
            return Ok(());
        }

        if !area.issue_tags.remove(&tag) {
            area.issue_tags.insert(tag);
        }
        Ok(())
    }

    pub fn set_notes(&mut self, name: &str, notes: &str) -> Result<(), InspectionError> {
        let area = self.area_mut(name)?;
        area.notes = notes.to_string();
        Ok(())
    }

    pub fn form(&self) -> &BTreeMap<String, AreaEvaluation> {
        &self.areas
    }

    pub fn evaluation(&self, name: &str) -> Option<&AreaEvaluation> {
        self.areas.get(name.trim())
    }

    /// Areas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AreaEvaluation> {
        self.order.iter().filter_map(|name| self.areas.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn has_findings(&self) -> bool {
        self.areas.values().any(|area| !area.is_good_condition)
    }

    fn area_mut(&mut self, name: &str) -> Result<&mut AreaEvaluation, InspectionError> {
        let name = name.trim();
        self.areas
            .get_mut(name)
            .ok_or_else(|| InspectionError::UnknownArea(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> AreaEvaluationTracker {
        AreaEvaluationTracker::from_specs(vec![
            AreaSpec::new("Kitchen"),
            AreaSpec::with_tags("Balcony", [AreaIssueTag::Floor, AreaIssueTag::Doors]),
        ])
        .expect("areas register")
    }

    #[test]
    fn registered_areas_start_good_without_tags() {
        let tracker = tracker();
        let kitchen = tracker.evaluation("Kitchen").expect("registered");
        assert!(kitchen.is_good_condition);
        assert!(kitchen.issue_tags.is_empty());
        assert!(kitchen.notes.is_empty());
        assert!(!tracker.has_findings());
    }

    #[test]
    fn duplicate_and_blank_registrations_fail() {
        let mut tracker = tracker();
        assert_eq!(
            tracker.register_area(" Kitchen "),
            Err(InspectionError::DuplicateArea("Kitchen".to_string()))
        );
        assert_eq!(tracker.register_area("   "), Err(InspectionError::InvalidAreaName));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn toggle_is_ignored_while_area_is_good() {
        let mut tracker = tracker();
        tracker
            .toggle_issue_tag("Kitchen", AreaIssueTag::Walls)
            .expect("known area");
        assert!(tracker.evaluation("Kitchen").expect("registered").issue_tags.is_empty());
    }

    #[test]
    fn toggle_adds_then_removes_tags_on_bad_areas() {
        let mut tracker = tracker();
        tracker.set_good_condition("Kitchen", false).expect("known area");
        tracker
            .toggle_issue_tag("Kitchen", AreaIssueTag::Walls)
            .expect("known area");
        tracker
            .toggle_issue_tag("Kitchen", AreaIssueTag::Lighting)
            .expect("known area");
        tracker
            .toggle_issue_tag("Kitchen", AreaIssueTag::Walls)
            .expect("known area");

        let kitchen = tracker.evaluation("Kitchen").expect("registered");
        assert_eq!(
            kitchen.issue_tags.iter().copied().collect::<Vec<_>>(),
            vec![AreaIssueTag::Lighting]
        );
    }

    #[test]
    fn marking_good_discards_tags() {
        let mut tracker = tracker();
        tracker.set_good_condition("Kitchen", false).expect("known area");
        for tag in [AreaIssueTag::Floor, AreaIssueTag::OdorMoisturePest] {
            tracker.toggle_issue_tag("Kitchen", tag).expect("known area");
        }
        tracker.set_notes("Kitchen", "Damp smell near sink").expect("known area");

        tracker.set_good_condition("Kitchen", true).expect("known area");
        let kitchen = tracker.evaluation("Kitchen").expect("registered");
        assert!(kitchen.issue_tags.is_empty());
        assert_eq!(kitchen.notes, "Damp smell near sink");
    }

    #[test]
    fn restricted_vocabulary_rejects_other_tags() {
        let mut tracker = tracker();
        tracker.set_good_condition("Balcony", false).expect("known area");
        tracker
            .toggle_issue_tag("Balcony", AreaIssueTag::Floor)
            .expect("allowed tag");
        assert_eq!(
            tracker.toggle_issue_tag("Balcony", AreaIssueTag::Ceiling),
            Err(InspectionError::TagNotAllowed {
                area: "Balcony".to_string(),
                tag: AreaIssueTag::Ceiling,
            })
        );
    }

    #[test]
    fn stored_trackers_keep_tag_and_order_invariants() {
        let stored = serde_json::to_value(tracker()).expect("serializable");
        let restored: AreaEvaluationTracker =
            serde_json::from_value(stored.clone()).expect("valid snapshot");
        assert_eq!(restored, tracker());

        let mut tagged_good = stored.clone();
        tagged_good["areas"]["Kitchen"]["issue_tags"] = serde_json::json!(["walls", "floor"]);
        let err = serde_json::from_value::<AreaEvaluationTracker>(tagged_good)
            .expect_err("good area with tags");
        assert!(err.to_string().contains("good condition"));

        let mut disallowed = stored.clone();
        disallowed["areas"]["Balcony"]["is_good_condition"] = serde_json::json!(false);
        disallowed["areas"]["Balcony"]["issue_tags"] = serde_json::json!(["ceiling"]);
        assert!(serde_json::from_value::<AreaEvaluationTracker>(disallowed).is_err());

        let mut reordered = stored.clone();
        reordered["order"] = serde_json::json!(["Kitchen"]);
        assert!(serde_json::from_value::<AreaEvaluationTracker>(reordered).is_err());

        let mut duplicated = stored;
        duplicated["order"] = serde_json::json!(["Kitchen", "Balcony", "Kitchen"]);
        assert!(serde_json::from_value::<AreaEvaluationTracker>(duplicated).is_err());
    }

    #[test]
    fn unknown_areas_are_rejected() {
        let mut tracker = tracker();
        assert_eq!(
            tracker.set_good_condition("Garage", false),
            Err(InspectionError::UnknownArea("Garage".to_string()))
        );
        assert_eq!(
            tracker.set_notes("Garage", "n/a"),
            Err(InspectionError::UnknownArea("Garage".to_string()))
        );
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut tracker = tracker();
        tracker.register_area("Attic").expect("new area");
        let names: Vec<&str> = tracker.iter().map(|area| area.area_name.as_str()).collect();
        assert_eq!(names, vec!["Kitchen", "Balcony", "Attic"]);
    }
}
