//! Reader/writer options.

use serde::{Deserialize, Serialize};

/// Separator written between a leaf's name and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacingMode {
    /// One space.
    SingleSpace,
    /// As many spaces as [`VkvOptions::indent_size`].
    IndentSize,
    /// Two tab characters, the layout Valve's own tools write.
    #[default]
    DoubleTab,
}

/// Options shared by the parser, the writer and the typed mapping layer.
///
/// Quoting and escape codes apply symmetrically: a document written with
/// `use_quotes` must be read with `use_quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VkvOptions {
    /// Borrowed streams are left where reading or writing stopped unless this is
    /// false and `reset_stream_position` is true.
    pub close_when_finished: bool,
    /// Spaces per nesting level on write.
    pub indent_size: usize,
    /// Rewind a borrowed stream to where it started once the call finishes.
    pub reset_stream_position: bool,
    /// Visit `Property` members during typed mapping, not only `Field` members.
    pub serialize_properties: bool,
    pub spacing: SpacingMode,
    /// Backslash escapes for `\ ' " \0 \a \b \f \n \r \t \v`.
    pub use_escape_codes: bool,
    /// Names and values are wrapped in double quotes.
    pub use_quotes: bool,
}

impl Default for VkvOptions {
    fn default() -> Self {
        VkvOptions {
            close_when_finished: true,
            indent_size: 4,
            reset_stream_position: false,
            serialize_properties: true,
            spacing: SpacingMode::DoubleTab,
            use_escape_codes: false,
            use_quotes: false,
        }
    }
}

impl VkvOptions {
    /// Quotes and escape codes on, everything else default. This is the layout of
    /// Steam's `.vdf` files.
    pub fn quoted() -> Self {
        VkvOptions {
            use_quotes: true,
            use_escape_codes: true,
            ..Self::default()
        }
    }

    pub fn with_quotes(mut self, use_quotes: bool) -> Self {
        self.use_quotes = use_quotes;
        self
    }

    pub fn with_escape_codes(mut self, use_escape_codes: bool) -> Self {
        self.use_escape_codes = use_escape_codes;
        self
    }

    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_spacing(mut self, spacing: SpacingMode) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_properties(mut self, serialize_properties: bool) -> Self {
        self.serialize_properties = serialize_properties;
        self
    }

    pub fn with_close_when_finished(mut self, close_when_finished: bool) -> Self {
        self.close_when_finished = close_when_finished;
        self
    }

    pub fn with_reset_stream_position(mut self, reset_stream_position: bool) -> Self {
        self.reset_stream_position = reset_stream_position;
        self
    }

    /// Whether a borrowed stream should be rewound once a call finishes.
    pub(crate) fn rewinds(&self) -> bool {
        !self.close_when_finished && self.reset_stream_position
    }
}
