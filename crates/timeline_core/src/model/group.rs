//! Group forest model.
//!
//! # Responsibility
//! - Define one node of the hierarchical lane tree.
//! - Provide forest-wide ordering and id helpers.
//!
//! # Invariants
//! - `id` is unique across the entire forest.
//! - Siblings are ordered by `position` ascending; ties keep relative order.
//! - Removing a node removes its subtree with it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable group identifier. Generated ids are uuid v4 strings.
pub type GroupId = String;

/// One node in the group forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Style key applied to the lane. Empty means unstyled.
    #[serde(default)]
    pub category: String,
    /// Sibling order key.
    #[serde(default)]
    pub position: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub children: Vec<Group>,
}

fn default_visible() -> bool {
    true
}

impl Group {
    /// Creates a visible leaf group with empty category.
    pub fn new(id: impl Into<GroupId>, name: impl Into<String>, position: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            position,
            visible: true,
            children: Vec::new(),
        }
    }

    /// Returns this node and all descendants in pre-order.
    pub fn descendants(&self) -> Vec<&Group> {
        let mut out = Vec::new();
        collect_preorder(std::slice::from_ref(self), &mut out);
        out
    }
}

/// Sorts every sibling list of the forest by `position`.
///
/// Uses a stable sort so equal positions keep their relative order, which
/// makes sorting an already-sorted forest a no-op.
pub fn sort_forest(groups: &mut [Group]) {
    groups.sort_by_key(|group| group.position);
    for group in groups.iter_mut() {
        sort_forest(&mut group.children);
    }
}

/// Returns all groups of the forest in pre-order.
pub fn flatten_forest(groups: &[Group]) -> Vec<&Group> {
    let mut out = Vec::new();
    collect_preorder(groups, &mut out);
    out
}

/// Returns the first id that occurs more than once in the forest.
pub fn find_duplicate_id(groups: &[Group]) -> Option<&str> {
    let mut seen = HashSet::new();
    flatten_forest(groups)
        .into_iter()
        .map(|group| group.id.as_str())
        .find(|id| !seen.insert(*id))
}

fn collect_preorder<'a>(groups: &'a [Group], out: &mut Vec<&'a Group>) {
    for group in groups {
        out.push(group);
        collect_preorder(&group.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::{find_duplicate_id, flatten_forest, sort_forest, Group};

    fn with_children(mut group: Group, children: Vec<Group>) -> Group {
        group.children = children;
        group
    }

    #[test]
    fn sort_forest_is_recursive_and_stable() {
        let mut forest = vec![
            with_children(
                Group::new("b", "B", 2),
                vec![Group::new("b2", "B2", 5), Group::new("b1", "B1", 1)],
            ),
            Group::new("a", "A", 1),
            Group::new("c", "C", 2),
        ];

        sort_forest(&mut forest);

        let ids: Vec<&str> = flatten_forest(&forest)
            .iter()
            .map(|group| group.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "b1", "b2", "c"]);
    }

    #[test]
    fn sorting_sorted_forest_keeps_order() {
        let mut forest = vec![
            Group::new("x", "X", 1),
            Group::new("y", "Y", 1),
            Group::new("z", "Z", 3),
        ];
        let before = forest.clone();
        sort_forest(&mut forest);
        assert_eq!(forest, before);
    }

    #[test]
    fn duplicate_ids_are_detected_across_levels() {
        let forest = vec![
            with_children(Group::new("a", "A", 1), vec![Group::new("dup", "D1", 1)]),
            Group::new("dup", "D2", 2),
        ];
        assert_eq!(find_duplicate_id(&forest), Some("dup"));
        assert_eq!(find_duplicate_id(&forest[..1]), None);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let group: Group = serde_json::from_str(r#"{"id":"g","name":"Lane"}"#).unwrap();
        assert!(group.visible);
        assert!(group.category.is_empty());
        assert_eq!(group.position, 0);
        assert!(group.children.is_empty());
    }
}
