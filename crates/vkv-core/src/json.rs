//! JSON bridge: node trees ⇄ `serde_json::Value`.
//!
//! - A group keyed exactly `"0".."n-1"` becomes an array, any other group an object in
//!   insertion order.
//! - Booleans, integers and floats are native JSON values. 128-bit integers outside the
//!   64-bit range and all other scalars become strings.
//! - Going back, JSON numbers run through the type cascade like any VKV value, or keep
//!   their text with the `*_raw` functions. Strings stay strings and `null` is absent.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use crate::error::{Result, VkvError};
use crate::node::{Node, TreeNode};
use crate::scalar::{parse_all, Scalar};

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Scalar::Bool(v) => serializer.serialize_bool(v),
            Scalar::I8(v) => serializer.serialize_i8(v),
            Scalar::U8(v) => serializer.serialize_u8(v),
            Scalar::I16(v) => serializer.serialize_i16(v),
            Scalar::U16(v) => serializer.serialize_u16(v),
            Scalar::I32(v) => serializer.serialize_i32(v),
            Scalar::U32(v) => serializer.serialize_u32(v),
            Scalar::I64(v) => serializer.serialize_i64(v),
            Scalar::U64(v) => serializer.serialize_u64(v),
            Scalar::I128(v) => match i64::try_from(v) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.collect_str(&v),
            },
            Scalar::U128(v) => match u64::try_from(v) {
                Ok(small) => serializer.serialize_u64(small),
                Err(_) => serializer.collect_str(&v),
            },
            Scalar::Isize(v) => serializer.serialize_i64(v as i64),
            Scalar::Usize(v) => serializer.serialize_u64(v as u64),
            // serde_json writes non-finite floats as null
            Scalar::F16(v) => serializer.serialize_f32(v.to_f32()),
            Scalar::F32(v) => serializer.serialize_f32(v),
            Scalar::F64(v) => serializer.serialize_f64(v),
            _ => serializer.collect_str(self),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Single(single) => single.value.serialize(serializer),
            Node::Tree(tree) => tree.serialize(serializer),
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if !self.is_empty() && self.is_sequential() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for child in self.values() {
                seq.serialize_element(child)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, child) in self.iter() {
                map.serialize_entry(key, child)?;
            }
            map.end()
        }
    }
}

/// Wrap a named node as `{ name: node }`.
pub fn to_json(node: &Node, name: &str) -> Result<Value> {
    let mut root = Map::new();
    root.insert(name.to_string(), serde_json::to_value(node)?);
    Ok(Value::Object(root))
}

/// Convert a JSON value into a node. `null` converts to `None`, and so do `null`
/// members and elements, which are dropped from their group.
pub fn from_json(value: &Value) -> Option<Node> {
    json_to_node(value, false)
}

/// Like [`from_json`], but numbers keep their JSON text as a string leaf instead of
/// going through the cascade, so `1` stays `1` rather than becoming `true`.
pub fn from_json_raw(value: &Value) -> Option<Node> {
    json_to_node(value, true)
}

/// Inverse of [`to_json`]: the value must be an object with exactly one member,
/// whose key becomes the root name.
pub fn from_json_named(value: &Value) -> Result<Option<(String, Node)>> {
    json_to_named(value, false)
}

/// [`from_json_named`] with the number handling of [`from_json_raw`].
pub fn from_json_raw_named(value: &Value) -> Result<Option<(String, Node)>> {
    json_to_named(value, true)
}

fn json_to_node(value: &Value, raw: bool) -> Option<Node> {
    match value {
        Value::Null => None,
        Value::Bool(v) => Some(Node::single(*v)),
        Value::Number(n) if raw => Some(Node::single(n.to_string())),
        Value::Number(n) => Some(Node::single(parse_all(&n.to_string()))),
        Value::String(s) => Some(Node::single(s.as_str())),
        Value::Array(items) => Some(Node::Tree(TreeNode::from_entries(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), json_to_node(item, raw))),
        ))),
        Value::Object(members) => Some(Node::Tree(TreeNode::from_entries(
            members
                .iter()
                .map(|(key, member)| (key.as_str(), json_to_node(member, raw))),
        ))),
    }
}

fn json_to_named(value: &Value, raw: bool) -> Result<Option<(String, Node)>> {
    match value {
        Value::Object(members) if members.len() == 1 => Ok(members
            .iter()
            .next()
            .and_then(|(name, member)| json_to_node(member, raw).map(|node| (name.clone(), node)))),
        _ => Err(VkvError::mapping(
            "expected a JSON object with exactly one member naming the root",
        )),
    }
}
