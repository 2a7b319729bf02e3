//! `vkv` CLI: format, check and convert Valve KeyValues files from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Re-indent a Steam file, keeping its quoted layout (stdin → stdout)
//! vkv fmt --quotes --escapes < libraryfolders.vdf
//!
//! # Convert a bare file to quoted form, file to file
//! vkv fmt --in-quotes=false --quotes --escapes -i gameinfo.txt -o gameinfo.vdf
//!
//! # Validate a file
//! vkv check --quotes --escapes -i appmanifest_440.acf
//!
//! # VKV → JSON and back
//! vkv to-json --quotes --escapes -i libraryfolders.vdf -o libraryfolders.json
//! vkv from-json --quotes --escapes -i libraryfolders.json
//!
//! # Options from a file, with flags taking precedence
//! vkv fmt --options vkv.json --indent 2 -i config.vdf
//! ```
//!
//! Values are carried as the text they were written with: `fmt`, `to-json` and
//! `from-json` never retype a leaf, so `"1"` stays `"1"` and `"007"` stays `"007"`.
//!
//! Set `RUST_LOG=debug` to see which files are read and written and the options in
//! effect.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vkv_core::{Node, SpacingMode, TreeNode, VkvOptions};

#[derive(Parser)]
#[command(name = "vkv", version, about = "Valve KeyValues (VKV/VDF) CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a KeyValues file and write it back out with the chosen layout
    Fmt {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        format: FormatArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Input is quoted (defaults to the output setting)
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        in_quotes: Option<bool>,
        /// Input uses escape codes (defaults to the output setting)
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        in_escapes: Option<bool>,
    },
    /// Parse a KeyValues file and report the root name
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Convert a KeyValues file to pretty-printed JSON
    ToJson {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Convert JSON to a KeyValues file
    FromJson {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        format: FormatArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Root name; without it the JSON must be an object with exactly one member
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct FormatArgs {
    /// Names and values are wrapped in double quotes
    #[arg(long)]
    quotes: bool,
    /// Backslash escape codes are used inside names and values
    #[arg(long)]
    escapes: bool,
    /// JSON file with base options; flags override it
    #[arg(long)]
    options: Option<String>,
}

/// Output layout, for the commands that write KeyValues text.
#[derive(Args)]
struct LayoutArgs {
    /// Spaces per nesting level
    #[arg(long)]
    indent: Option<usize>,
    /// Separator between a name and its value
    #[arg(long, value_enum)]
    spacing: Option<Spacing>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Spacing {
    Single,
    Indent,
    DoubleTab,
}

impl From<Spacing> for SpacingMode {
    fn from(spacing: Spacing) -> Self {
        match spacing {
            Spacing::Single => SpacingMode::SingleSpace,
            Spacing::Indent => SpacingMode::IndentSize,
            Spacing::DoubleTab => SpacingMode::DoubleTab,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt {
            io,
            format,
            layout,
            in_quotes,
            in_escapes,
        } => {
            let out_options = build_options(&format, Some(&layout))?;
            let mut in_options = out_options.clone();
            in_options.use_quotes = in_quotes.unwrap_or(out_options.use_quotes);
            in_options.use_escape_codes = in_escapes.unwrap_or(out_options.use_escape_codes);
            debug!(?in_options, "input options");

            let text = read_input(io.input.as_deref())?;
            let (name, node) = decode_root_raw(&text, &in_options)?;
            let formatted = vkv_core::encode(Some(&node), &name, &out_options);
            write_output(io.output.as_deref(), &formatted)?;
        }
        Commands::Check { input, format } => {
            let options = build_options(&format, None)?;
            let text = read_input(input.as_deref())?;
            let (name, node) = decode_root(&text, &options)?;
            let children = node.as_tree().map_or(0, TreeNode::len);
            info!(root = %name, children, "document is well-formed");
            println!("ok: {}", name);
        }
        Commands::ToJson { io, format } => {
            let options = build_options(&format, None)?;
            let text = read_input(io.input.as_deref())?;
            let (name, node) = decode_root_raw(&text, &options)?;
            let value = vkv_core::to_json(&node, &name).context("Failed to convert to JSON")?;
            let mut pretty = serde_json::to_string_pretty(&value)?;
            pretty.push('\n');
            write_output(io.output.as_deref(), &pretty)?;
        }
        Commands::FromJson {
            io,
            format,
            layout,
            name,
        } => {
            let options = build_options(&format, Some(&layout))?;
            let text = read_input(io.input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_str(&text).context("Failed to parse JSON input")?;
            let root = match name {
                Some(name) => vkv_core::from_json_raw(&value).map(|node| (name, node)),
                None => vkv_core::from_json_raw_named(&value)
                    .context("Failed to find the root name (pass --name to set one)")?,
            };
            let Some((name, node)) = root else {
                bail!("JSON input is null, nothing to write");
            };
            write_output(io.output.as_deref(), &vkv_core::encode(Some(&node), &name, &options))?;
        }
    }

    Ok(())
}

/// Start from `--options` (or the defaults) and apply the flags on top.
fn build_options(format: &FormatArgs, layout: Option<&LayoutArgs>) -> Result<VkvOptions> {
    let mut options = match format.options.as_deref() {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid options file: {}", path))?
        }
        None => VkvOptions::default(),
    };

    if format.quotes {
        options.use_quotes = true;
    }
    if format.escapes {
        options.use_escape_codes = true;
    }
    if let Some(layout) = layout {
        if let Some(indent) = layout.indent {
            options.indent_size = indent;
        }
        if let Some(spacing) = layout.spacing {
            options.spacing = spacing.into();
        }
    }

    debug!(?options, "options in effect");
    Ok(options)
}

fn decode_root(text: &str, options: &VkvOptions) -> Result<(String, Node)> {
    require_root(vkv_core::decode_named(text, options))
}

/// Decode keeping every leaf's text as written.
fn decode_root_raw(text: &str, options: &VkvOptions) -> Result<(String, Node)> {
    require_root(vkv_core::decode_raw_named(text, options))
}

fn require_root(decoded: vkv_core::Result<Option<(String, Node)>>) -> Result<(String, Node)> {
    match decoded.context("Failed to parse KeyValues input")? {
        Some(root) => Ok(root),
        None => bail!("Input holds no KeyValues node"),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            debug!(path, "reading input file");
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            debug!("reading stdin");
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            debug!(path, bytes = content.len(), "writing output file");
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
