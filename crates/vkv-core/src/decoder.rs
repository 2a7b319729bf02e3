//! KeyValues decoder: text lines → node tree.
//!
//! Recursive descent over a line stream. Each node starts with a header line:
//!
//! - two tokens (`name value`) make a leaf and consume nothing further;
//! - one token (`name`) must be followed by a `{` line, then child headers up to a
//!   matching `}` line.
//!
//! # Key design decisions
//!
//! - **One line of lookahead**: the group loop reads a line to test for `}`; when it
//!   is not a closing brace, that same line is handed to the recursive call as the
//!   child's header instead of being read again.
//! - **All or nothing**: any malformed line aborts the whole parse with a
//!   [`VkvError::Parse`] carrying the line number. No partial tree is returned.
//! - **Blank lines are insignificant** anywhere: before the root, between a group name
//!   and its `{`, and between children.
//! - Duplicate child names follow the [`TreeNode`] upsert rule: the later value wins and
//!   the first-seen position is kept.
//! - A UTF-8 byte-order mark at the start of the first line is dropped.
//!
//! The `decode_raw*` functions skip the type cascade and keep every leaf as the exact
//! text it was written with, so reformatting never changes a value.

use std::io::{self, BufRead};

use crate::error::{Result, VkvError};
use crate::node::{Node, SingleNode, TreeNode};
use crate::options::VkvOptions;
use crate::scalar::{parse_all, Scalar};
use crate::token::{decode_token, split_header};

/// Decode KeyValues text into its root node.
///
/// Returns `Ok(None)` when the input holds no node at all (empty or blank).
pub fn decode(text: &str, options: &VkvOptions) -> Result<Option<Node>> {
    Ok(decode_named(text, options)?.map(|(_, node)| node))
}

/// Decode KeyValues text into its root name and node.
pub fn decode_named(text: &str, options: &VkvOptions) -> Result<Option<(String, Node)>> {
    Decoder::new(text_lines(text), options, false).decode_root()
}

/// Decode from any buffered reader, one line at a time.
pub fn decode_reader<R: BufRead>(reader: R, options: &VkvOptions) -> Result<Option<(String, Node)>> {
    Decoder::new(reader.lines(), options, false).decode_root()
}

/// Like [`decode_named`], but every leaf holds its text as [`Scalar::String`].
///
/// ```
/// use vkv_core::{decode_raw_named, encode, VkvOptions};
///
/// let text = "\"state\"\n{\n    \"AutoUpdate\"\t\t\"1\"\n    \"Build\"\t\t\"007\"\n}\n";
/// let options = VkvOptions::quoted();
/// let (name, node) = decode_raw_named(text, &options).unwrap().unwrap();
/// assert_eq!(encode(Some(&node), &name, &options), text);
/// ```
pub fn decode_raw_named(text: &str, options: &VkvOptions) -> Result<Option<(String, Node)>> {
    Decoder::new(text_lines(text), options, true).decode_root()
}

/// Like [`decode_reader`], but every leaf holds its text as [`Scalar::String`].
pub fn decode_raw_reader<R: BufRead>(reader: R, options: &VkvOptions) -> Result<Option<(String, Node)>> {
    Decoder::new(reader.lines(), options, true).decode_root()
}

fn text_lines(text: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
    text.lines().map(|line| Ok(line.to_string()))
}

/// Parser state: the line source and the number of the last line read.
struct Decoder<'o, I> {
    lines: I,
    line_no: usize,
    options: &'o VkvOptions,
    /// Keep leaf text as written instead of running the cascade.
    raw: bool,
}

impl<'o, I> Decoder<'o, I>
where
    I: Iterator<Item = io::Result<String>>,
{
    fn new(lines: I, options: &'o VkvOptions, raw: bool) -> Self {
        Decoder {
            lines,
            line_no: 0,
            options,
            raw,
        }
    }

    /// Next line, trimmed, or `None` at end of input. A byte-order mark opening the
    /// first line is removed.
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                let line = line?;
                let content = match self.line_no {
                    1 => line.strip_prefix('\u{FEFF}').unwrap_or(line.as_str()),
                    _ => line.as_str(),
                };
                Ok(Some(content.trim().to_string()))
            }
            None => Ok(None),
        }
    }

    /// Next non-blank line, or `None` at end of input.
    fn next_content_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            if !line.is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn decode_root(&mut self) -> Result<Option<(String, Node)>> {
        match self.next_content_line()? {
            Some(header) => self.decode_node(header).map(Some),
            None => Ok(None),
        }
    }

    /// Decode one node whose (non-blank, trimmed) header line has already been read.
    fn decode_node(&mut self, header: String) -> Result<(String, Node)> {
        let header_line = self.line_no;
        let tokens = split_header(&header, header_line, self.options)?;
        let raw_name = tokens
            .first()
            .ok_or_else(|| VkvError::parse(header_line, "missing node name"))?;
        let name = decode_token(raw_name, header_line, self.options)?;

        if let Some(raw_value) = tokens.get(1) {
            let value = decode_token(raw_value, header_line, self.options)?;
            let value = if self.raw {
                Scalar::String(value)
            } else {
                parse_all(&value)
            };
            return Ok((name, Node::Single(SingleNode::new(value))));
        }

        match self.next_content_line()? {
            Some(open) if open == "{" => {}
            Some(other) => {
                return Err(VkvError::parse(
                    self.line_no,
                    format!("expected starting '{{', found \"{other}\""),
                ));
            }
            None => {
                return Err(VkvError::parse(
                    self.line_no,
                    "expected starting '{', found end-of-file",
                ));
            }
        }

        let mut tree = TreeNode::new();
        loop {
            let line = self.next_content_line()?.ok_or_else(|| {
                VkvError::parse(
                    self.line_no,
                    format!("reached end-of-file while deserializing group \"{name}\""),
                )
            })?;
            if line == "}" {
                break;
            }
            let (child_name, child) = self.decode_node(line)?;
            tree.insert(child_name, child);
        }

        Ok((name, Node::Tree(tree)))
    }
}
