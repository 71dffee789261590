//! Groups panel: tree list of groups with drag-reorder.
//!
//! # Responsibility
//! - Render the group forest as indented rows in pre-order.
//! - Apply add/rename/remove/visibility/category edits.
//! - Rewrite sibling order wholesale after a drop.
//!
//! # Invariants
//! - After `apply_drop`, `position` is the 1-based index within each
//!   sibling list.
//! - A drop never loses groups: ids missing from the dropped order are
//!   appended at the root.

use super::binding::{PanelBinding, PanelView};
use super::PanelResult;
use crate::model::document::Document;
use crate::model::group::{flatten_forest, Group, GroupId};
use crate::store::{DocumentError, DocumentStore};
use log::{info, warn};
use std::cell::Ref;
use std::collections::HashMap;

/// One rendered group row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub id: GroupId,
    pub name: String,
    pub category: String,
    pub visible: bool,
    /// 0-based indentation level.
    pub depth: usize,
    pub position: i64,
    pub parent: Option<GroupId>,
}

#[derive(Debug, Default)]
pub struct GroupsView {
    pub rows: Vec<GroupRow>,
}

impl PanelView for GroupsView {
    const NAME: &'static str = "groups";

    fn render(&mut self, document: &Document) {
        self.rows.clear();
        push_rows(&document.groups, None, 0, &mut self.rows);
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}

fn push_rows(groups: &[Group], parent: Option<&str>, depth: usize, rows: &mut Vec<GroupRow>) {
    for group in groups {
        rows.push(GroupRow {
            id: group.id.clone(),
            name: group.name.clone(),
            category: group.category.clone(),
            visible: group.visible,
            depth,
            position: group.position,
            parent: parent.map(str::to_string),
        });
        push_rows(&group.children, Some(group.id.as_str()), depth + 1, rows);
    }
}

/// Nested order read back from the rendered list after a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrder {
    pub id: GroupId,
    pub children: Vec<GroupOrder>,
}

impl GroupOrder {
    pub fn leaf(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(id: impl Into<GroupId>, children: Vec<GroupOrder>) -> Self {
        Self {
            id: id.into(),
            children,
        }
    }
}

pub struct GroupsPanel {
    binding: PanelBinding<GroupsView>,
}

impl GroupsPanel {
    pub fn attach(store: &mut DocumentStore) -> Self {
        Self {
            binding: PanelBinding::attach(store, GroupsView::default()),
        }
    }

    pub fn detach(self, store: &mut DocumentStore) {
        self.binding.detach(store);
    }

    pub fn view(&self) -> Ref<'_, GroupsView> {
        self.binding.view()
    }

    pub fn add_group(&self, store: &mut DocumentStore, name: &str) -> PanelResult<GroupId> {
        let result = store.add_group(name);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn rename_group(&self, store: &mut DocumentStore, id: &str, name: &str) -> PanelResult<()> {
        let result = store.rename_group(id, name, None);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn remove_group(&self, store: &mut DocumentStore, id: &str) -> PanelResult<Group> {
        let result = store.remove_group(id, None);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn toggle_visibility(&self, store: &mut DocumentStore, id: &str) -> PanelResult<bool> {
        let result = store.toggle_group_visibility(id, None);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    pub fn set_category(
        &self,
        store: &mut DocumentStore,
        id: &str,
        category: &str,
    ) -> PanelResult<()> {
        let result = store.set_group_category(id, category, None);
        self.binding.refresh(store);
        result.map_err(Into::into)
    }

    /// Writes the dropped order back as the new forest.
    pub fn apply_drop(&self, store: &mut DocumentStore, order: &[GroupOrder]) -> PanelResult<()> {
        let document = store.document().ok_or(DocumentError::NotLoaded)?;
        let forest = reorder_forest(&document.groups, order);
        let result = store.replace_groups(forest);
        if result.is_ok() {
            info!("event=groups_reorder module=panel status=ok roots={}", order.len());
        }
        self.binding.refresh(store);
        result.map_err(Into::into)
    }
}

/// Rebuilds `groups` following `order`, renumbering positions from 1.
pub fn reorder_forest(groups: &[Group], order: &[GroupOrder]) -> Vec<Group> {
    let preorder: Vec<&Group> = flatten_forest(groups);
    let mut pool: HashMap<&str, Group> = preorder
        .iter()
        .map(|group| {
            let mut detached = (*group).clone();
            detached.children.clear();
            (group.id.as_str(), detached)
        })
        .collect();

    let mut forest = build_level(order, &mut pool);

    for group in preorder {
        if let Some(mut leftover) = pool.remove(group.id.as_str()) {
            warn!(
                "event=groups_reorder module=panel status=warn reason=missing_from_drop id={}",
                leftover.id
            );
            leftover.position = forest.len() as i64 + 1;
            forest.push(leftover);
        }
    }
    forest
}

fn build_level(order: &[GroupOrder], pool: &mut HashMap<&str, Group>) -> Vec<Group> {
    let mut level = Vec::with_capacity(order.len());
    for entry in order {
        let Some(mut group) = pool.remove(entry.id.as_str()) else {
            warn!(
                "event=groups_reorder module=panel status=skip reason=unknown_or_repeated id={}",
                entry.id
            );
            continue;
        };
        group.position = level.len() as i64 + 1;
        group.children = build_level(&entry.children, pool);
        level.push(group);
    }
    level
}

#[cfg(test)]
mod tests {
    use super::{reorder_forest, GroupOrder};
    use crate::model::group::{flatten_forest, Group};

    fn forest() -> Vec<Group> {
        let mut a = Group::new("a", "A", 1);
        a.children.push(Group::new("a1", "A1", 1));
        a.visible = false;
        vec![a, Group::new("b", "B", 2), Group::new("c", "C", 3)]
    }

    #[test]
    fn drop_reassigns_one_based_positions_per_level() {
        let order = vec![
            GroupOrder::with_children("c", vec![GroupOrder::leaf("a1")]),
            GroupOrder::leaf("a"),
            GroupOrder::leaf("b"),
        ];

        let reordered = reorder_forest(&forest(), &order);

        assert_eq!(reordered[0].id, "c");
        assert_eq!(reordered[0].position, 1);
        assert_eq!(reordered[0].children[0].id, "a1");
        assert_eq!(reordered[0].children[0].position, 1);
        assert_eq!(reordered[1].id, "a");
        assert!(reordered[1].children.is_empty());
        assert!(!reordered[1].visible);
        assert_eq!(reordered[2].position, 3);
    }

    #[test]
    fn omitted_groups_are_appended_and_unknown_ids_ignored() {
        let order = vec![GroupOrder::leaf("b"), GroupOrder::leaf("ghost"), GroupOrder::leaf("b")];

        let reordered = reorder_forest(&forest(), &order);

        let ids: Vec<&str> = flatten_forest(&reordered)
            .iter()
            .map(|group| group.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "a1", "c"]);
        let positions: Vec<i64> = reordered.iter().map(|group| group.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }
}
