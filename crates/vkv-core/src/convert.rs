//! Typed mapping layer: Rust values ⇄ node trees.
//!
//! Encoding ([`ToNode`]) and decoding ([`FromNode`]) follow the shape of the type:
//!
//! | Rust type                                   | Node shape                                  |
//! |---------------------------------------------|---------------------------------------------|
//! | primitives, chrono/uuid types, `String`     | leaf                                        |
//! | `Option<T>`                                 | absent when `None`                          |
//! | `Vec<T>`, `VecDeque<T>`, `[T; N]`           | group keyed `"0"`, `"1"`, ... in order        |
//! | `HashMap`, `BTreeMap`, `IndexMap`           | group keyed by the stringified map key      |
//! | structs declared with [`vkv_object!`]       | group keyed by member name                  |
//! | enums declared with [`vkv_enum!`]           | leaf holding the variant name               |
//! | [`Node`]                                    | itself                                      |
//!
//! A hand-written [`ToNode`]/[`FromNode`] impl replaces all of this for one type.
//!
//! Decoding is lenient about document shape and strict about values: children the
//! target does not know are ignored, members the document lacks keep their default,
//! but a list whose keys are not exactly `"0".."n-1"` or a value that does not fit the
//! target type fails with [`VkvError::Mapping`].
//!
//! [`vkv_object!`]: crate::vkv_object
//! [`vkv_enum!`]: crate::vkv_enum

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use half::f16;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::error::{Result, VkvError};
use crate::node::{Node, TreeNode};
use crate::options::VkvOptions;
use crate::scalar::{parse_all, Scalar};

/// Encode a value as a node tree.
pub trait ToNode {
    /// `None` means "nothing to write": the member is left out of its parent.
    fn to_node(&self, options: &VkvOptions) -> Option<Node>;
}

/// Decode a value from a node tree.
pub trait FromNode: Sized {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self>;
}

/// A type stored as a single leaf value. Also the bound for map keys.
pub trait Primitive: Sized {
    fn to_scalar(&self) -> Scalar;

    /// Coerce an already-typed scalar into `Self`.
    fn from_scalar(scalar: &Scalar) -> Result<Self>;

    /// Decode raw text: run the type cascade, then coerce.
    fn from_text(text: &str) -> Result<Self> {
        Self::from_scalar(&parse_all(text))
    }
}

/// Encode `value`. Returns `None` when there is nothing to write.
pub fn to_node<T: ToNode + ?Sized>(value: &T, options: &VkvOptions) -> Option<Node> {
    value.to_node(options)
}

/// Decode an optional node. An absent node decodes to `Ok(None)`.
pub fn from_node<T: FromNode>(node: Option<&Node>, options: &VkvOptions) -> Result<Option<T>> {
    node.map(|node| T::from_node(node, options)).transpose()
}

/// The error for a scalar that cannot become `target`.
pub fn mismatch(scalar: &Scalar, target: &str) -> VkvError {
    VkvError::mapping(format!(
        "cannot convert {} \"{}\" to {}",
        scalar.kind(),
        scalar,
        target
    ))
}

/// Leaf encoding shared by every [`Primitive`].
pub fn primitive_to_node<T: Primitive>(value: &T) -> Option<Node> {
    Some(Node::from(value.to_scalar()))
}

/// Leaf decoding shared by every [`Primitive`]. Text values go through
/// [`Primitive::from_text`], typed values through [`Primitive::from_scalar`].
pub fn primitive_from_node<T: Primitive>(node: &Node, target: &str) -> Result<T> {
    match node {
        Node::Single(single) => match &single.value {
            Scalar::String(text) => T::from_text(text),
            other => T::from_scalar(other),
        },
        Node::Tree(_) => Err(VkvError::mapping(format!(
            "cannot convert node tree to {target}"
        ))),
    }
}

/// The group behind a node, or an error naming what was expected.
pub fn expect_tree<'a>(node: &'a Node, target: &str) -> Result<&'a TreeNode> {
    node.as_tree().ok_or_else(|| {
        VkvError::mapping(format!("cannot convert single node to {target}"))
    })
}

/// Emit the mapping-trait impls for a [`Primitive`] type.
#[doc(hidden)]
#[macro_export]
macro_rules! impl_primitive_node {
    ($ty:ty) => {
        impl $crate::convert::ToNode for $ty {
            fn to_node(
                &self,
                _options: &$crate::options::VkvOptions,
            ) -> ::std::option::Option<$crate::node::Node> {
                $crate::convert::primitive_to_node(self)
            }
        }

        impl $crate::convert::FromNode for $ty {
            fn from_node(
                node: &$crate::node::Node,
                _options: &$crate::options::VkvOptions,
            ) -> $crate::error::Result<Self> {
                $crate::convert::primitive_from_node(node, stringify!($ty))
            }
        }
    };
}

macro_rules! signed_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                fn to_scalar(&self) -> Scalar {
                    Scalar::from(*self)
                }

                fn from_scalar(scalar: &Scalar) -> Result<Self> {
                    scalar
                        .to_i128()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| mismatch(scalar, stringify!($ty)))
                }
            }

            impl_primitive_node!($ty);
        )*
    };
}

macro_rules! unsigned_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                fn to_scalar(&self) -> Scalar {
                    Scalar::from(*self)
                }

                fn from_scalar(scalar: &Scalar) -> Result<Self> {
                    scalar
                        .to_u128()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| mismatch(scalar, stringify!($ty)))
                }
            }

            impl_primitive_node!($ty);
        )*
    };
}

signed_primitive!(i8, i16, i32, i64, i128, isize);
unsigned_primitive!(u8, u16, u32, u64, u128, usize);

impl Primitive for f64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::F64(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        scalar.to_f64().ok_or_else(|| mismatch(scalar, "f64"))
    }
}

impl Primitive for f32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::F32(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        match scalar {
            Scalar::F32(v) => Ok(*v),
            other => other
                .to_f64()
                .map(|v| v as f32)
                .ok_or_else(|| mismatch(scalar, "f32")),
        }
    }
}

impl Primitive for f16 {
    fn to_scalar(&self) -> Scalar {
        Scalar::F16(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        match scalar {
            Scalar::F16(v) => Ok(*v),
            other => other
                .to_f64()
                .map(f16::from_f64)
                .ok_or_else(|| mismatch(scalar, "f16")),
        }
    }
}

impl_primitive_node!(f64);
impl_primitive_node!(f32);
impl_primitive_node!(f16);

impl Primitive for bool {
    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        match scalar {
            Scalar::Bool(v) => Ok(*v),
            Scalar::Char(_) | Scalar::String(_) => Err(mismatch(scalar, "bool")),
            other => other
                .to_f64()
                .map(|v| v != 0.0)
                .ok_or_else(|| mismatch(scalar, "bool")),
        }
    }
}

impl_primitive_node!(bool);

impl Primitive for char {
    fn to_scalar(&self) -> Scalar {
        Scalar::Char(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        match scalar {
            Scalar::Char(c) => Ok(*c),
            Scalar::Bool(_) => Err(mismatch(scalar, "char")),
            other => other
                .to_u128()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(char::from_u32)
                .ok_or_else(|| mismatch(scalar, "char")),
        }
    }
}

impl_primitive_node!(char);

impl Primitive for String {
    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        Ok(scalar.to_string())
    }

    /// Text the cascade left as a string is kept verbatim.
    fn from_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl_primitive_node!(String);

macro_rules! exact_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                fn to_scalar(&self) -> Scalar {
                    Scalar::$variant(*self)
                }

                fn from_scalar(scalar: &Scalar) -> Result<Self> {
                    match scalar {
                        Scalar::$variant(v) => Ok(*v),
                        other => Err(mismatch(other, stringify!($ty))),
                    }
                }
            }

            impl_primitive_node!($ty);
        )*
    };
}

exact_primitive! {
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    Uuid => Guid,
    NaiveTime => Time,
    Duration => TimeSpan,
}

impl Primitive for Scalar {
    fn to_scalar(&self) -> Scalar {
        self.clone()
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self> {
        Ok(scalar.clone())
    }
}

impl_primitive_node!(Scalar);

impl ToNode for str {
    fn to_node(&self, _options: &VkvOptions) -> Option<Node> {
        Some(Node::single(self))
    }
}

impl ToNode for Node {
    fn to_node(&self, _options: &VkvOptions) -> Option<Node> {
        Some(self.clone())
    }
}

impl FromNode for Node {
    fn from_node(node: &Node, _options: &VkvOptions) -> Result<Self> {
        Ok(node.clone())
    }
}

impl ToNode for TreeNode {
    fn to_node(&self, _options: &VkvOptions) -> Option<Node> {
        Some(Node::Tree(self.clone()))
    }
}

impl FromNode for TreeNode {
    fn from_node(node: &Node, _options: &VkvOptions) -> Result<Self> {
        expect_tree(node, "TreeNode").cloned()
    }
}

impl<T: ToNode + ?Sized> ToNode for &T {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        (**self).to_node(options)
    }
}

impl<T: ToNode + ?Sized> ToNode for Box<T> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        (**self).to_node(options)
    }
}

impl<T: FromNode> FromNode for Box<T> {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        T::from_node(node, options).map(Box::new)
    }
}

impl<T: ToNode> ToNode for Option<T> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        self.as_ref().and_then(|value| value.to_node(options))
    }
}

impl<T: FromNode> FromNode for Option<T> {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        T::from_node(node, options).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Encode items as a group keyed by their 0-based position.
pub fn encode_items<'a, T, I>(items: I, options: &VkvOptions) -> Option<Node>
where
    T: ToNode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let tree = TreeNode::from_entries(
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item.to_node(options))),
    );
    Some(Node::Tree(tree))
}

/// Decode a group keyed `"0".."n-1"` (exactly, in order) into its items.
pub fn decode_items<T: FromNode>(node: &Node, options: &VkvOptions) -> Result<Vec<T>> {
    let tree = expect_tree(node, "array")?;
    let mut items = Vec::with_capacity(tree.len());
    for (index, (key, child)) in tree.iter().enumerate() {
        if key != index.to_string() {
            return Err(VkvError::mapping(format!(
                "cannot convert node tree to array: expected key \"{index}\", found \"{key}\""
            )));
        }
        items.push(T::from_node(child, options)?);
    }
    Ok(items)
}

impl<T: ToNode> ToNode for [T] {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_items(self, options)
    }
}

impl<T: ToNode> ToNode for Vec<T> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_items(self, options)
    }
}

impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        decode_items(node, options)
    }
}

impl<T: ToNode> ToNode for VecDeque<T> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_items(self, options)
    }
}

impl<T: FromNode> FromNode for VecDeque<T> {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        decode_items(node, options).map(VecDeque::from)
    }
}

impl<T: ToNode, const N: usize> ToNode for [T; N] {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_items(self, options)
    }
}

impl<T: FromNode, const N: usize> FromNode for [T; N] {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        let items: Vec<T> = decode_items(node, options)?;
        let len = items.len();
        items.try_into().map_err(|_| {
            VkvError::mapping(format!(
                "cannot convert node tree to array of {N}: found {len} items"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

/// Encode `(key, value)` pairs as a group keyed by each key's text form.
pub fn encode_entries<'a, K, V, I>(entries: I, options: &VkvOptions) -> Option<Node>
where
    K: Primitive + 'a,
    V: ToNode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let tree = TreeNode::from_entries(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_scalar().to_string(), value.to_node(options))),
    );
    Some(Node::Tree(tree))
}

/// Decode every child of a group into a `(key, value)` pair. Keys go through
/// [`Primitive::from_text`].
pub fn decode_entries<K, V>(node: &Node, options: &VkvOptions) -> Result<Vec<(K, V)>>
where
    K: Primitive,
    V: FromNode,
{
    let tree = expect_tree(node, "dictionary")?;
    tree.iter()
        .map(|(key, child)| Ok((K::from_text(key)?, V::from_node(child, options)?)))
        .collect()
}

impl<K: Primitive, V: ToNode, S> ToNode for HashMap<K, V, S> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_entries(self, options)
    }
}

impl<K, V, S> FromNode for HashMap<K, V, S>
where
    K: Primitive + Eq + Hash,
    V: FromNode,
    S: BuildHasher + Default,
{
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        Ok(decode_entries(node, options)?.into_iter().collect())
    }
}

impl<K: Primitive, V: ToNode> ToNode for BTreeMap<K, V> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_entries(self, options)
    }
}

impl<K: Primitive + Ord, V: FromNode> FromNode for BTreeMap<K, V> {
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        Ok(decode_entries(node, options)?.into_iter().collect())
    }
}

impl<K: Primitive, V: ToNode, S> ToNode for IndexMap<K, V, S> {
    fn to_node(&self, options: &VkvOptions) -> Option<Node> {
        encode_entries(self, options)
    }
}

impl<K, V, S> FromNode for IndexMap<K, V, S>
where
    K: Primitive + Eq + Hash,
    V: FromNode,
    S: BuildHasher + Default,
{
    fn from_node(node: &Node, options: &VkvOptions) -> Result<Self> {
        Ok(decode_entries(node, options)?.into_iter().collect())
    }
}
