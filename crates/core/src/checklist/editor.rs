//! Structural tree editing operations used when authoring a checklist.
//!
//! Every operation clones the input forest and returns a new one; the
//! caller's tree is never mutated in place. Nodes are located by index path
//! from the root, so there are no parent back-references and no cycles.
//! Restructuring never regenerates ids: in-flight evaluations reference
//! items by id and must survive reordering.

use uuid::Uuid;

use super::item::{ChecklistItem, FieldOption, FieldType};

/// Index path of a node: the child index at each level from the root list.
fn find_path(items: &[ChecklistItem], id: &str) -> Option<Vec<usize>> {
    for (index, item) in items.iter().enumerate() {
        if item.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = find_path(&item.children, id) {
            let mut path = vec![index];
            path.append(&mut rest);
            return Some(path);
        }
    }
    None
}

/// The sibling list containing the node addressed by `path`.
///
/// `path` must be non-empty and valid for the forest.
fn list_at_mut<'a>(
    items: &'a mut Vec<ChecklistItem>,
    path: &[usize],
) -> &'a mut Vec<ChecklistItem> {
    let mut list = items;
    for &index in &path[..path.len() - 1] {
        list = &mut list[index].children;
    }
    list
}

fn node_at_mut<'a>(items: &'a mut Vec<ChecklistItem>, path: &[usize]) -> &'a mut ChecklistItem {
    let index = *path.last().unwrap();
    &mut list_at_mut(items, path)[index]
}

/// A blank node as the editor creates it: empty title (the author fills it
/// in before saving; sanitization drops it otherwise), default rating type.
fn blank_node() -> ChecklistItem {
    ChecklistItem {
        id: Uuid::new_v4().to_string(),
        title: String::new(),
        field_type: FieldType::Rating,
        options: Vec::new(),
        children: Vec::new(),
    }
}

/// Swap the node with its previous sibling. No-op at the first position or
/// when the id is unknown.
pub fn move_up(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        let index = *path.last().unwrap();
        if index > 0 {
            list_at_mut(&mut tree, &path).swap(index - 1, index);
        }
    }
    tree
}

/// Swap the node with its next sibling. No-op at the last position.
pub fn move_down(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        let index = *path.last().unwrap();
        let list = list_at_mut(&mut tree, &path);
        if index + 1 < list.len() {
            list.swap(index, index + 1);
        }
    }
    tree
}

/// Outdent one level: re-insert the node as a sibling immediately following
/// its former parent. No-op when the node is already at the root.
pub fn promote(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        if path.len() >= 2 {
            let index = *path.last().unwrap();
            let node = list_at_mut(&mut tree, &path).remove(index);
            let parent_path = &path[..path.len() - 1];
            let parent_index = *parent_path.last().unwrap();
            list_at_mut(&mut tree, parent_path).insert(parent_index + 1, node);
        }
    }
    tree
}

/// Indent one level: append the node as the last child of its immediate
/// previous sibling. No-op when there is no previous sibling.
pub fn demote(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        let index = *path.last().unwrap();
        if index > 0 {
            let list = list_at_mut(&mut tree, &path);
            let node = list.remove(index);
            list[index - 1].children.push(node);
        }
    }
    tree
}

/// Append a blank node to the target's children.
pub fn add_child(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        node_at_mut(&mut tree, &path).children.push(blank_node());
    }
    tree
}

/// Delete the node and its entire subtree. Grandchildren are not promoted.
pub fn remove_node(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        let index = *path.last().unwrap();
        list_at_mut(&mut tree, &path).remove(index);
    }
    tree
}

/// Append a blank node to the root list.
pub fn add_root_item(items: &[ChecklistItem]) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    tree.push(blank_node());
    tree
}

/// Replace the node's title (untrimmed; sanitization trims on save).
pub fn set_title(items: &[ChecklistItem], id: &str, title: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        node_at_mut(&mut tree, &path).title = title.to_string();
    }
    tree
}

/// Toggle a node between section and rating. Turning a node into a section
/// clears its options because sections never carry a response.
pub fn toggle_check(items: &[ChecklistItem], id: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        let node = node_at_mut(&mut tree, &path);
        if node.field_type == FieldType::Section {
            node.field_type = FieldType::Rating;
        } else {
            node.field_type = FieldType::Section;
            node.options.clear();
        }
    }
    tree
}

/// Replace the node's options from one label per line. Blank lines are
/// skipped; empty input clears the options.
pub fn set_options(items: &[ChecklistItem], id: &str, lines: &str) -> Vec<ChecklistItem> {
    let mut tree = items.to_vec();
    if let Some(path) = find_path(&tree, id) {
        node_at_mut(&mut tree, &path).options = lines
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(FieldOption::from_label)
            .collect();
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::item::flatten_ids;

    fn node(id: &str, children: Vec<ChecklistItem>) -> ChecklistItem {
        ChecklistItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            field_type: FieldType::Rating,
            options: Vec::new(),
            children,
        }
    }

    /// a, b(b1, b2), c
    fn fixture() -> Vec<ChecklistItem> {
        vec![
            node("a", vec![]),
            node("b", vec![node("b1", vec![]), node("b2", vec![])]),
            node("c", vec![]),
        ]
    }

    fn sorted_ids(items: &[ChecklistItem]) -> Vec<String> {
        let mut ids = flatten_ids(items);
        ids.sort();
        ids
    }

    // -----------------------------------------------------------------------
    // Reordering
    // -----------------------------------------------------------------------

    #[test]
    fn move_up_swaps_with_previous_sibling() {
        let tree = move_up(&fixture(), "b2");
        assert_eq!(flatten_ids(&tree), ["a", "b", "b2", "b1", "c"]);
    }

    #[test]
    fn move_up_first_sibling_is_noop() {
        let original = fixture();
        assert_eq!(move_up(&original, "a"), original);
        assert_eq!(move_up(&original, "b1"), original);
    }

    #[test]
    fn move_down_swaps_with_next_sibling() {
        let tree = move_down(&fixture(), "a");
        assert_eq!(flatten_ids(&tree), ["b", "b1", "b2", "a", "c"]);
    }

    #[test]
    fn move_down_last_sibling_is_noop() {
        let original = fixture();
        assert_eq!(move_down(&original, "c"), original);
        assert_eq!(move_down(&original, "b2"), original);
    }

    // -----------------------------------------------------------------------
    // Promote / demote
    // -----------------------------------------------------------------------

    #[test]
    fn promote_inserts_after_former_parent() {
        let tree = promote(&fixture(), "b1");
        assert_eq!(flatten_ids(&tree), ["a", "b", "b2", "b1", "c"]);
        // b1 is now a root sibling, not inside b.
        assert_eq!(tree[2].id, "b1");
        assert_eq!(tree[1].children.len(), 1);
    }

    #[test]
    fn promote_root_node_is_noop() {
        let original = fixture();
        assert_eq!(promote(&original, "a"), original);
    }

    #[test]
    fn demote_appends_to_previous_sibling() {
        let tree = demote(&fixture(), "c");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].children.last().unwrap().id, "c");
    }

    #[test]
    fn demote_without_previous_sibling_is_noop() {
        let original = fixture();
        assert_eq!(demote(&original, "a"), original);
        assert_eq!(demote(&original, "b1"), original);
    }

    // -----------------------------------------------------------------------
    // Structure invariants
    // -----------------------------------------------------------------------

    #[test]
    fn restructuring_preserves_id_multiset() {
        let original = fixture();
        let ids = sorted_ids(&original);
        for tree in [
            move_up(&original, "b2"),
            move_down(&original, "a"),
            promote(&original, "b2"),
            demote(&original, "c"),
        ] {
            assert_eq!(sorted_ids(&tree), ids);
        }
    }

    #[test]
    fn restructuring_preserves_node_fields() {
        let mut original = fixture();
        original[1].field_type = FieldType::Section;
        let tree = promote(&original, "b1");
        let moved = &tree[2];
        assert_eq!(moved.id, "b1");
        assert_eq!(moved.title, "Item b1");
        assert_eq!(moved.field_type, FieldType::Rating);
    }

    #[test]
    fn operations_do_not_mutate_input() {
        let original = fixture();
        let snapshot = original.clone();
        let _ = move_down(&original, "a");
        let _ = remove_node(&original, "b");
        let _ = add_child(&original, "c");
        assert_eq!(original, snapshot);
    }

    #[test]
    fn unknown_id_is_noop() {
        let original = fixture();
        assert_eq!(move_up(&original, "zzz"), original);
        assert_eq!(promote(&original, "zzz"), original);
        assert_eq!(remove_node(&original, "zzz"), original);
    }

    // -----------------------------------------------------------------------
    // Add / remove
    // -----------------------------------------------------------------------

    #[test]
    fn add_child_appends_blank_rating_node() {
        let tree = add_child(&fixture(), "a");
        let added = tree[0].children.last().unwrap();
        assert!(added.title.is_empty());
        assert_eq!(added.field_type, FieldType::Rating);
        assert!(!added.id.is_empty());
    }

    #[test]
    fn add_root_item_appends_at_root() {
        let tree = add_root_item(&fixture());
        assert_eq!(tree.len(), 4);
        assert!(tree[3].title.is_empty());
    }

    #[test]
    fn remove_node_drops_entire_subtree() {
        let tree = remove_node(&fixture(), "b");
        assert_eq!(flatten_ids(&tree), ["a", "c"]);
    }

    // -----------------------------------------------------------------------
    // Field edits
    // -----------------------------------------------------------------------

    #[test]
    fn set_title_replaces_only_target() {
        let tree = set_title(&fixture(), "b1", "Nuevo titulo");
        assert_eq!(tree[1].children[0].title, "Nuevo titulo");
        assert_eq!(tree[0].title, "Item a");
    }

    #[test]
    fn toggle_check_roundtrips_and_clears_options() {
        let mut original = fixture();
        original[0].options = vec![FieldOption::from_label("Solo")];
        let tree = toggle_check(&original, "a");
        assert_eq!(tree[0].field_type, FieldType::Section);
        assert!(tree[0].options.is_empty());
        let back = toggle_check(&tree, "a");
        assert_eq!(back[0].field_type, FieldType::Rating);
    }

    #[test]
    fn set_options_parses_lines_and_derives_values() {
        let tree = set_options(&fixture(), "a", "Muy Bien\n\n  Regular  \n");
        let opts = &tree[0].options;
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].value, "muy_bien");
        assert_eq!(opts[1].label, "Regular");
        let cleared = set_options(&tree, "a", "");
        assert!(cleared[0].options.is_empty());
    }
}
