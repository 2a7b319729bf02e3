use vkv_core::{Node, Scalar, TreeNode, VkvError};

fn sample() -> TreeNode {
    TreeNode::new()
        .with("a", Node::single(1i32))
        .with("b", Node::single("two"))
        .with("c", Node::single(3.5f64))
}

fn keys(tree: &TreeNode) -> Vec<&str> {
    tree.keys().collect()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn from_entries_skips_absent_children() {
    let tree = TreeNode::from_entries([
        ("a", Some(Node::single(1i32))),
        ("b", None),
        ("c", Some(Node::single("x"))),
    ]);
    assert_eq!(keys(&tree), vec!["a", "c"]);
}

#[test]
fn collect_from_pairs() {
    let tree: TreeNode = vec![("x", Node::single(true)), ("y", Node::single(false))]
        .into_iter()
        .collect();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get("x"), Some(&Node::single(true)));
}

#[test]
fn single_node_accessors() {
    let mut node = Node::single("hello");
    assert_eq!(node.value(), Some(&Scalar::String("hello".into())));
    assert!(!node.is_tree());
    assert!(node.as_tree().is_none());
    assert!(node.as_tree_mut().is_none());

    if let Node::Single(single) = &mut node {
        single.set_value(42i64);
    }
    assert_eq!(node.as_single().map(|s| s.value()), Some(&Scalar::I64(42)));
}

// ============================================================================
// Upsert, delete, order
// ============================================================================

#[test]
fn overwrite_keeps_first_position() {
    let mut tree = sample();
    let previous = tree.insert("a", Node::single("replaced"));
    assert_eq!(previous, Some(Node::single(1i32)));
    assert_eq!(keys(&tree), vec!["a", "b", "c"]);
    assert_eq!(tree.get("a"), Some(&Node::single("replaced")));
}

#[test]
fn set_none_removes_and_closes_gap() {
    let mut tree = sample();
    tree.set("b", None);
    assert_eq!(keys(&tree), vec!["a", "c"]);
    assert_eq!(tree.get_index(1).map(|(key, _)| key), Some("c"));
}

#[test]
fn set_none_on_missing_key_is_noop() {
    let mut tree = sample();
    assert_eq!(tree.set("zzz", None), None);
    assert_eq!(tree.len(), 3);
}

#[test]
fn new_key_appends() {
    let mut tree = sample();
    tree.set("d", Some(Node::single('d')));
    assert_eq!(keys(&tree), vec!["a", "b", "c", "d"]);
}

#[test]
fn get_mut_edits_in_place() {
    let mut tree = TreeNode::new().with("inner", TreeNode::new().with("k", Node::single("v")));
    tree.get_mut("inner")
        .and_then(Node::as_tree_mut)
        .unwrap()
        .insert("k2", Node::single("v2"));
    let inner = tree.get("inner").and_then(Node::as_tree).unwrap();
    assert_eq!(inner.len(), 2);
}

// ============================================================================
// Positional access
// ============================================================================

#[test]
fn positional_read() {
    let tree = sample();
    assert_eq!(tree.get_index(2), Some(("c", &Node::single(3.5f64))));
    assert_eq!(tree.node_at(0), Some(&Node::single(1i32)));
    assert_eq!(tree.node_at(3), None);
}

#[test]
fn positional_write_keeps_key() {
    let mut tree = sample();
    tree.set_index(1, Some(Node::single("new"))).unwrap();
    assert_eq!(tree.get_index(1), Some(("b", &Node::single("new"))));
}

#[test]
fn positional_delete() {
    let mut tree = sample();
    tree.set_index(0, None).unwrap();
    assert_eq!(keys(&tree), vec!["b", "c"]);
}

#[test]
fn positional_write_out_of_range_fails() {
    let mut tree = sample();
    let err = tree.set_index(3, Some(Node::single(0i8))).unwrap_err();
    assert!(matches!(err, VkvError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(tree.len(), 3);
}

// ============================================================================
// Predicate access
// ============================================================================

#[test]
fn find_first_match() {
    let tree = sample();
    let found = tree.find(|_, _, node| node.value().and_then(Scalar::as_str) == Some("two"));
    assert_eq!(found.map(|(key, _)| key), Some("b"));
}

#[test]
fn find_by_index() {
    let tree = sample();
    let found = tree.find(|index, _, _| index == 2);
    assert_eq!(found.map(|(key, _)| key), Some("c"));
    assert!(tree.find(|_, key, _| key == "missing").is_none());
}

#[test]
fn replace_where_swaps_key_and_node() {
    let mut tree = sample();
    let count = tree.replace_where(
        |_, key, _| key == "b",
        Some(("beta".to_string(), Node::single("B"))),
    );
    assert_eq!(count, 1);
    assert_eq!(keys(&tree), vec!["a", "beta", "c"]);
}

#[test]
fn replace_where_removes_all_matches() {
    let mut tree = sample();
    let count = tree.replace_where(|_, key, _| key != "b", None);
    assert_eq!(count, 2);
    assert_eq!(keys(&tree), vec!["b"]);
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn sequential_keys() {
    let list: TreeNode = (0..3).map(|i| (i.to_string(), Node::single(i))).collect();
    assert!(list.is_sequential());
    assert!(!sample().is_sequential());

    let gap = TreeNode::new()
        .with("0", Node::single("a"))
        .with("2", Node::single("b"));
    assert!(!gap.is_sequential());
}

#[test]
fn iteration_in_insertion_order() {
    let tree = TreeNode::new()
        .with("z", Node::single(1i32))
        .with("a", Node::single(2i32))
        .with("m", Node::single(3i32));
    let owned: Vec<String> = tree.clone().into_iter().map(|(key, _)| key).collect();
    assert_eq!(owned, vec!["z", "a", "m"]);
    let borrowed: Vec<&String> = (&tree).into_iter().map(|(key, _)| key).collect();
    assert_eq!(borrowed, vec!["z", "a", "m"]);
}
