//! The KeyValues node tree.
//!
//! A document is a single named [`Node`]. A node is either a leaf ([`SingleNode`])
//! holding one typed [`Scalar`], or a group ([`TreeNode`]) holding named children.
//! Group children keep insertion order and keys are unique: writing an existing key
//! replaces the child in place, writing `None` removes it.

use indexmap::IndexMap;

use crate::error::{Result, VkvError};
use crate::scalar::Scalar;

/// A parsed or constructed KeyValues node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Single(SingleNode),
    Tree(TreeNode),
}

/// A leaf node holding one scalar value.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleNode {
    pub value: Scalar,
}

/// A group node: ordered, key-unique children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    children: IndexMap<String, Node>,
}

impl Node {
    /// Shorthand for a leaf node.
    pub fn single(value: impl Into<Scalar>) -> Self {
        Node::Single(SingleNode::new(value))
    }

    pub fn as_single(&self) -> Option<&SingleNode> {
        match self {
            Node::Single(single) => Some(single),
            Node::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeNode> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Single(_) => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut TreeNode> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Single(_) => None,
        }
    }

    /// The leaf value, if this is a leaf.
    pub fn value(&self) -> Option<&Scalar> {
        self.as_single().map(|single| &single.value)
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Node::Tree(_))
    }
}

impl SingleNode {
    pub fn new(value: impl Into<Scalar>) -> Self {
        SingleNode {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Scalar>) {
        self.value = value.into();
    }
}

impl TreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from `(key, child)` pairs, skipping absent children.
    /// Later duplicates overwrite earlier ones in place.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<Node>)>,
    {
        let mut tree = TreeNode::new();
        for (key, node) in entries {
            tree.set(key, node);
        }
        tree
    }

    /// Chaining form of [`TreeNode::insert`].
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(key, node.into());
        self
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Look up a child by key. Absent keys yield `None`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children.get_mut(key)
    }

    /// Upsert or delete.
    ///
    /// `Some` replaces an existing child in place or appends a new one; `None` removes
    /// the child and closes the gap. Returns the previous child.
    pub fn set(&mut self, key: impl Into<String>, node: Option<Node>) -> Option<Node> {
        let key = key.into();
        match node {
            Some(node) => self.children.insert(key, node),
            None => self.children.shift_remove(&key),
        }
    }

    /// Insert or replace a child, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.children.insert(key.into(), node)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.children.shift_remove(key)
    }

    /// Positional lookup in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Node)> {
        self.children
            .get_index(index)
            .map(|(key, node)| (key.as_str(), node))
    }

    /// The child at `index`, without its key.
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.children.get_index(index).map(|(_, node)| node)
    }

    /// Positional write. `Some` replaces the child at `index` keeping its key, `None`
    /// removes it. Fails when `index` is not below [`TreeNode::len`].
    pub fn set_index(&mut self, index: usize, node: Option<Node>) -> Result<()> {
        let len = self.children.len();
        if index >= len {
            return Err(VkvError::IndexOutOfRange { index, len });
        }
        match node {
            Some(node) => {
                if let Some((_, slot)) = self.children.get_index_mut(index) {
                    *slot = node;
                }
            }
            None => {
                self.children.shift_remove_index(index);
            }
        }
        Ok(())
    }

    /// First child whose `(index, key, node)` satisfies `predicate`.
    pub fn find<F>(&self, mut predicate: F) -> Option<(&str, &Node)>
    where
        F: FnMut(usize, &str, &Node) -> bool,
    {
        self.children
            .iter()
            .enumerate()
            .find(|(index, (key, node))| predicate(*index, key, node))
            .map(|(_, (key, node))| (key.as_str(), node))
    }

    /// Replace every matching child with `replacement` (key and node), or remove it
    /// when `replacement` is `None`. Indices passed to `predicate` are positions before
    /// the call. Returns how many children matched.
    pub fn replace_where<F>(&mut self, mut predicate: F, replacement: Option<(String, Node)>) -> usize
    where
        F: FnMut(usize, &str, &Node) -> bool,
    {
        let entries = std::mem::take(&mut self.children);
        let mut matched = 0;
        for (index, (key, node)) in entries.into_iter().enumerate() {
            if predicate(index, &key, &node) {
                matched += 1;
                if let Some((new_key, new_node)) = &replacement {
                    self.children.insert(new_key.clone(), new_node.clone());
                }
            } else {
                self.children.insert(key, node);
            }
        }
        matched
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    /// True when the keys are exactly `"0"`, `"1"`, ... in order, the shape
    /// KeyValues uses for lists.
    pub fn is_sequential(&self) -> bool {
        self.children
            .keys()
            .enumerate()
            .all(|(index, key)| *key == index.to_string())
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Single(SingleNode { value })
    }
}

impl From<SingleNode> for Node {
    fn from(single: SingleNode) -> Self {
        Node::Single(single)
    }
}

impl From<TreeNode> for Node {
    fn from(tree: TreeNode) -> Self {
        Node::Tree(tree)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for TreeNode {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut tree = TreeNode::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Into<String>> Extend<(K, Node)> for TreeNode {
    fn extend<I: IntoIterator<Item = (K, Node)>>(&mut self, iter: I) {
        for (key, node) in iter {
            self.insert(key, node);
        }
    }
}

impl IntoIterator for TreeNode {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a TreeNode {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
