//! Pure document → widget projections.
//!
//! # Invariants
//! - Groups are emitted in pre-order; a hidden group hides its subtree.
//! - Only visible eras with `end > start` become background spans.
//! - Era spans are keyed by the era uuid and styled `era-<uuid>`.

use super::widget::{WidgetGroup, WidgetItem, WidgetMarker};
use crate::model::document::Document;
use crate::model::group::Group;
use crate::model::item::ItemType;
use log::warn;

/// CSS class prefix for era background spans.
pub const ERA_CLASS_PREFIX: &str = "era-";

/// Flattens the visible part of the forest for the widget.
pub fn flatten_groups(groups: &[Group]) -> Vec<WidgetGroup> {
    let mut out = Vec::new();
    push_visible(groups, None, 1, &mut out);
    out
}

fn push_visible(groups: &[Group], parent: Option<&str>, level: u32, out: &mut Vec<WidgetGroup>) {
    for group in groups.iter().filter(|group| group.visible) {
        out.push(WidgetGroup {
            id: group.id.clone(),
            content: group.name.clone(),
            class_name: (!group.category.is_empty()).then(|| group.category.clone()),
            level,
            parent: parent.map(str::to_string),
            nested_groups: group
                .children
                .iter()
                .filter(|child| child.visible)
                .map(|child| child.id.clone())
                .collect(),
            order: group.position,
        });
        push_visible(&group.children, Some(group.id.as_str()), level + 1, out);
    }
}

/// Returns items followed by renderable era spans.
pub fn materialize_items(document: &Document) -> Vec<WidgetItem> {
    let mut out: Vec<WidgetItem> = document
        .items
        .iter()
        .map(|item| WidgetItem {
            id: item.id.clone(),
            group: item.group.clone(),
            content: item.content.clone(),
            class_name: item.class_name.clone(),
            kind: item.kind,
            start: item.start,
            end: item.end,
        })
        .collect();

    for (uuid, era) in document.eras.iter().filter(|(_, era)| era.visible) {
        if !era.is_renderable() {
            warn!(
                "event=era_render module=adapter status=skip reason=end_not_after_start uuid={} start={} end={}",
                uuid, era.start, era.end
            );
            continue;
        }
        out.push(WidgetItem {
            id: uuid.clone(),
            group: None,
            content: era.text.clone(),
            class_name: Some(era_class_name(uuid)),
            kind: ItemType::Background,
            start: era.start,
            end: Some(era.end),
        });
    }
    out
}

/// Returns all markers, sorted by uuid.
pub fn project_markers(document: &Document, editable: bool) -> Vec<WidgetMarker> {
    document
        .markers
        .iter()
        .map(|(uuid, marker)| WidgetMarker {
            id: uuid.clone(),
            title: marker.name.clone(),
            date: marker.date,
            editable,
        })
        .collect()
}

pub fn era_class_name(uuid: &str) -> String {
    format!("{ERA_CLASS_PREFIX}{uuid}")
}
