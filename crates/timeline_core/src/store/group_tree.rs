//! Recursive descent over the group forest.
//!
//! Lookups return an index path from the forest root to the node, so callers
//! can mutate through one `&mut` walk instead of holding references into the
//! tree across calls.

use crate::model::group::Group;

/// Child indexes from the forest root down to one node.
pub type GroupPath = Vec<usize>;

/// Depth-first, pre-order search by id. The first match wins.
pub fn find_path(groups: &[Group], id: &str) -> Option<GroupPath> {
    for (index, group) in groups.iter().enumerate() {
        if group.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = find_path(&group.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Searches the whole forest, or only below `parent` when given.
///
/// An unknown `parent` yields `None`.
pub fn locate(groups: &[Group], id: &str, parent: Option<&str>) -> Option<GroupPath> {
    let Some(parent) = parent else {
        return find_path(groups, id);
    };
    let mut path = find_path(groups, parent)?;
    let scope = node_at(groups, &path)?;
    path.extend(find_path(&scope.children, id)?);
    Some(path)
}

pub fn node_at<'a>(groups: &'a [Group], path: &[usize]) -> Option<&'a Group> {
    let (first, rest) = path.split_first()?;
    let mut node = groups.get(*first)?;
    for index in rest {
        node = node.children.get(*index)?;
    }
    Some(node)
}

pub fn node_at_mut<'a>(groups: &'a mut [Group], path: &[usize]) -> Option<&'a mut Group> {
    let (first, rest) = path.split_first()?;
    let mut node = groups.get_mut(*first)?;
    for index in rest {
        node = node.children.get_mut(*index)?;
    }
    Some(node)
}

/// Detaches the node at `path` together with its subtree.
pub fn remove_at(groups: &mut Vec<Group>, path: &[usize]) -> Option<Group> {
    let (last, parents) = path.split_last()?;
    let siblings = if parents.is_empty() {
        groups
    } else {
        &mut node_at_mut(groups, parents)?.children
    };
    if *last < siblings.len() {
        Some(siblings.remove(*last))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{find_path, locate, node_at, remove_at};
    use crate::model::group::Group;

    fn forest() -> Vec<Group> {
        let mut a = Group::new("a", "A", 1);
        let mut a1 = Group::new("a1", "A1", 1);
        a1.children.push(Group::new("deep", "Deep", 1));
        a.children.push(a1);
        a.children.push(Group::new("shared", "Shared under A", 2));
        vec![a, Group::new("b", "B", 2), Group::new("shared", "Shared at root", 3)]
    }

    #[test]
    fn find_path_walks_preorder() {
        let groups = forest();
        assert_eq!(find_path(&groups, "deep"), Some(vec![0, 0, 0]));
        assert_eq!(find_path(&groups, "b"), Some(vec![1]));
        assert_eq!(find_path(&groups, "shared"), Some(vec![0, 1]));
        assert_eq!(find_path(&groups, "missing"), None);
    }

    #[test]
    fn locate_respects_parent_scope() {
        let groups = forest();
        assert_eq!(locate(&groups, "deep", Some("a1")), Some(vec![0, 0, 0]));
        assert_eq!(locate(&groups, "b", Some("a")), None);
        assert_eq!(locate(&groups, "deep", Some("nope")), None);
    }

    #[test]
    fn remove_at_detaches_subtree() {
        let mut groups = forest();
        let removed = remove_at(&mut groups, &[0, 0]).unwrap();
        assert_eq!(removed.id, "a1");
        assert_eq!(removed.children[0].id, "deep");
        assert_eq!(find_path(&groups, "deep"), None);
        assert_eq!(node_at(&groups, &[0, 0]).unwrap().id, "shared");
        assert!(remove_at(&mut groups, &[9]).is_none());
    }
}
