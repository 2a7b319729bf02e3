//! # vkv-core
//!
//! Pure-Rust reader and writer for **Valve KeyValues** (VKV/VDF), the text format of
//! Steam's `libraryfolders.vdf`, Source engine `gameinfo.txt` and many other game and
//! tool configuration files.
//!
//! A KeyValues document is one named node. A node is either a leaf (`name value`) or a
//! group (`name`, then `{`, children, `}`). There are no type tags: every value is text,
//! and a fixed type-inference cascade decides what it holds. There is no list syntax
//! either: lists are groups keyed `"0"`, `"1"`, ...
//!
//! ## Quick start
//!
//! ```rust
//! use vkv_core::{decode, encode, Node, VkvOptions};
//!
//! let options = VkvOptions::quoted();
//! let text = "\"config\"\n{\n    \"volume\"\t\t\"75\"\n    \"name\"\t\t\"player one\"\n}\n";
//!
//! // VKV → node tree
//! let root = decode(text, &options).unwrap().unwrap();
//! let tree = root.as_tree().unwrap();
//! assert_eq!(tree.get("volume"), Some(&Node::single(75i8)));
//!
//! // node tree → VKV (roundtrip)
//! assert_eq!(encode(Some(&root), "config", &options), text);
//! ```
//!
//! ## Modules
//!
//! - [`node`]: `Node` / `SingleNode` / `TreeNode`, the document model
//! - [`scalar`]: `Scalar` and the type-inference cascade (`parse_all`)
//! - [`decoder`]: VKV text → node tree
//! - [`encoder`]: node tree → VKV text
//! - [`convert`]: `ToNode` / `FromNode` for primitives, collections and maps
//! - [`object`]: member tables for structs (`vkv_object!`) and enums (`vkv_enum!`)
//! - [`serializer`]: `VkvSerializer` over readers, writers and seekable streams
//! - [`json`]: node tree ⇄ `serde_json::Value`
//! - [`options`]: `VkvOptions`, shared by all of the above
//! - [`error`]: error type for parse, mapping and I/O failures

pub mod convert;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod node;
pub mod object;
pub mod options;
pub mod scalar;
pub mod serializer;
mod token;

pub use convert::{FromNode, Primitive, ToNode};
pub use decoder::{decode, decode_named, decode_raw_named, decode_raw_reader, decode_reader};
pub use encoder::encode;
pub use error::{Result, VkvError};
pub use json::{from_json, from_json_named, from_json_raw, from_json_raw_named, to_json};
pub use node::{Node, SingleNode, TreeNode};
pub use object::{Member, MemberKind, VkvObject};
pub use options::{SpacingMode, VkvOptions};
pub use scalar::{parse_all, Scalar};
pub use serializer::{from_str, from_str_named, to_string, to_string_value, VkvSerializer};
pub use token::{escape, unescape};
