//! Entry points: read and write whole documents over strings, readers and streams.
//!
//! Readers and writers passed by value are owned by the call and dropped (closed)
//! when it returns. The `*_stream` methods borrow a seekable stream instead, leave it
//! open, and rewind it to where it started when the options ask for it
//! (`close_when_finished == false && reset_stream_position == true`), so one stream can
//! serve several calls.
//!
//! Reading from a borrowed stream goes through a buffer; without a rewind the stream
//! is left wherever buffering stopped, which may be past the end of the root node.

use std::io::{BufReader, Read, Seek, SeekFrom, Write};

use crate::convert::{from_node, FromNode, ToNode};
use crate::decoder::{decode_named, decode_reader};
use crate::encoder::encode;
use crate::error::Result;
use crate::node::Node;
use crate::options::VkvOptions;

/// Reads and writes KeyValues documents with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct VkvSerializer {
    options: VkvOptions,
}

impl VkvSerializer {
    pub fn new(options: VkvOptions) -> Self {
        VkvSerializer { options }
    }

    pub fn options(&self) -> &VkvOptions {
        &self.options
    }

    /// Read the root node.
    pub fn deserialize<R: Read>(&self, reader: R) -> Result<Option<Node>> {
        Ok(self.deserialize_named(reader)?.map(|(_, node)| node))
    }

    /// Read the root node and its name.
    pub fn deserialize_named<R: Read>(&self, reader: R) -> Result<Option<(String, Node)>> {
        decode_reader(BufReader::new(reader), &self.options)
    }

    /// Read the root node and decode it into `T`.
    pub fn deserialize_as<T: FromNode, R: Read>(&self, reader: R) -> Result<Option<T>> {
        let node = self.deserialize(reader)?;
        from_node(node.as_ref(), &self.options)
    }

    /// Write `node` under `name`. An absent node writes nothing.
    pub fn serialize<W: Write>(&self, mut writer: W, node: Option<&Node>, name: &str) -> Result<()> {
        writer.write_all(encode(node, name, &self.options).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Encode `value` and write it under `name`.
    pub fn serialize_value<T, W>(&self, writer: W, value: &T, name: &str) -> Result<()>
    where
        T: ToNode + ?Sized,
        W: Write,
    {
        let node = value.to_node(&self.options);
        self.serialize(writer, node.as_ref(), name)
    }

    /// [`deserialize_named`](Self::deserialize_named) over a borrowed stream.
    pub fn deserialize_stream<S: Read + Seek>(&self, stream: &mut S) -> Result<Option<(String, Node)>> {
        self.with_stream(stream, |stream| {
            decode_reader(BufReader::new(stream), &self.options)
        })
    }

    /// [`deserialize_as`](Self::deserialize_as) over a borrowed stream.
    pub fn deserialize_stream_as<T: FromNode, S: Read + Seek>(&self, stream: &mut S) -> Result<Option<T>> {
        let node = self.deserialize_stream(stream)?.map(|(_, node)| node);
        from_node(node.as_ref(), &self.options)
    }

    /// [`serialize`](Self::serialize) over a borrowed stream.
    pub fn serialize_stream<S: Write + Seek>(&self, stream: &mut S, node: Option<&Node>, name: &str) -> Result<()> {
        self.with_stream(stream, |stream| self.serialize(stream, node, name))
    }

    /// [`serialize_value`](Self::serialize_value) over a borrowed stream.
    pub fn serialize_value_stream<T, S>(&self, stream: &mut S, value: &T, name: &str) -> Result<()>
    where
        T: ToNode + ?Sized,
        S: Write + Seek,
    {
        let node = value.to_node(&self.options);
        self.serialize_stream(stream, node.as_ref(), name)
    }

    /// Run `f` on the stream, then rewind it if the options ask for it. The rewind
    /// also happens when `f` fails.
    fn with_stream<S, F, T>(&self, stream: &mut S, f: F) -> Result<T>
    where
        S: Seek,
        F: FnOnce(&mut S) -> Result<T>,
    {
        if !self.options.rewinds() {
            return f(stream);
        }
        let start = stream.stream_position()?;
        let result = f(stream);
        stream.seek(SeekFrom::Start(start))?;
        result
    }
}

/// Decode KeyValues text straight into `T`.
pub fn from_str<T: FromNode>(text: &str, options: &VkvOptions) -> Result<Option<T>> {
    Ok(from_str_named(text, options)?.map(|(_, value)| value))
}

/// Decode KeyValues text into `T`, keeping the root name.
pub fn from_str_named<T: FromNode>(text: &str, options: &VkvOptions) -> Result<Option<(String, T)>> {
    match decode_named(text, options)? {
        Some((name, node)) => Ok(Some((name, T::from_node(&node, options)?))),
        None => Ok(None),
    }
}

/// Write a node tree as KeyValues text.
pub fn to_string(node: &Node, name: &str, options: &VkvOptions) -> String {
    encode(Some(node), name, options)
}

/// Encode `value` and write it as KeyValues text.
pub fn to_string_value<T: ToNode + ?Sized>(value: &T, name: &str, options: &VkvOptions) -> String {
    encode(value.to_node(options).as_ref(), name, options)
}
