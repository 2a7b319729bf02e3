//! KeyValues encoder: node tree → text.
//!
//! Depth-first, pre-order. Leaves are written as `name<separator>value`, groups as
//! `name`, `{`, children one level deeper, `}`. Every line ends with `\n`.
//!
//! - **Empty groups are elided**: a group with no children writes nothing at all, so
//!   optional nested structures with no fields set leave no `name {}` behind.
//! - **Indentation** is `indent_size` spaces per level; the separator between a leaf's
//!   name and value follows [`SpacingMode`].
//! - Names and values go through the same transform: escape codes first (when
//!   enabled), then quotes (when enabled).
//!
//! # Example
//! ```
//! use vkv_core::{encode, Node, TreeNode, VkvOptions};
//!
//! let tree = TreeNode::new().with("key", Node::single("value"));
//! let options = VkvOptions::quoted();
//! let text = encode(Some(&Node::Tree(tree)), "root", &options);
//! assert_eq!(text, "\"root\"\n{\n    \"key\"\t\t\"value\"\n}\n");
//! ```

use crate::node::{Node, SingleNode, TreeNode};
use crate::options::{SpacingMode, VkvOptions};
use crate::token::encode_token;

/// Encode a named node tree. An absent node encodes to the empty string.
pub fn encode(node: Option<&Node>, name: &str, options: &VkvOptions) -> String {
    let mut out = String::new();
    if let Some(node) = node {
        encode_node(node, name, 0, options, &mut out);
    }
    out
}

fn encode_node(node: &Node, name: &str, indent: usize, options: &VkvOptions, out: &mut String) {
    match node {
        Node::Single(single) => encode_single(single, name, indent, options, out),
        Node::Tree(tree) => encode_tree(tree, name, indent, options, out),
    }
}

fn encode_single(single: &SingleNode, name: &str, indent: usize, options: &VkvOptions, out: &mut String) {
    push_indent(indent, out);
    out.push_str(&encode_token(name, options));
    push_separator(options, out);
    out.push_str(&encode_token(&single.value.to_string(), options));
    out.push('\n');
}

fn encode_tree(tree: &TreeNode, name: &str, indent: usize, options: &VkvOptions, out: &mut String) {
    if tree.is_empty() {
        return;
    }

    push_indent(indent, out);
    out.push_str(&encode_token(name, options));
    out.push('\n');
    push_indent(indent, out);
    out.push_str("{\n");

    for (key, child) in tree.iter() {
        encode_node(child, key, indent + options.indent_size, options, out);
    }

    push_indent(indent, out);
    out.push_str("}\n");
}

fn push_separator(options: &VkvOptions, out: &mut String) {
    match options.spacing {
        SpacingMode::SingleSpace => out.push(' '),
        SpacingMode::IndentSize => push_indent(options.indent_size, out),
        SpacingMode::DoubleTab => out.push_str("\t\t"),
    }
}

fn push_indent(width: usize, out: &mut String) {
    out.extend(std::iter::repeat_n(' ', width));
}
