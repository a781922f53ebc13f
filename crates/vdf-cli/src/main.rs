//! `vdf` CLI for converting Valve KeyValues files to and from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Text VDF to JSON (stdin → stdout)
//! cat appmanifest_400.acf | vdf to-json --pretty
//!
//! # Binary shortcuts.vdf to JSON, keeping duplicate keys
//! vdf to-json --format binary --no-merge -i shortcuts.vdf
//!
//! # JSON back to text VDF, file to file
//! vdf from-json -i config.json -o config.vdf --pretty
//!
//! # Binary VDF to text
//! vdf convert --from binary --to text -i appinfo.vdf
//!
//! # Debug logging on stderr
//! vdf -v to-json -i config.vdf
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;
use vdf_core::{
    binary_dumps, binary_parse, dumps, parse, vbkv_dumps, vbkv_loads, BinaryOptions, Document,
    DumpOptions, Mapper, MultiDocument, ParseOptions,
};

#[derive(Parser)]
#[command(
    name = "vdf",
    version,
    about = "Convert Valve KeyValues (VDF) files to and from JSON"
)]
struct Cli {
    /// Log decoder and encoder activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode VDF and print it as JSON
    ToJson {
        #[command(flatten)]
        files: IoArgs,
        /// Encoding of the input
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        #[command(flatten)]
        vdf: VdfArgs,
        /// Keep repeated keys instead of merging them (emitted as repeated JSON keys)
        #[arg(long)]
        no_merge: bool,
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Encode a JSON object as VDF
    FromJson {
        #[command(flatten)]
        files: IoArgs,
        /// Encoding of the output
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        #[command(flatten)]
        vdf: VdfArgs,
        /// Indent nested mappings in text output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Re-encode VDF from one encoding to another
    Convert {
        #[command(flatten)]
        files: IoArgs,
        /// Encoding of the input
        #[arg(long, value_enum)]
        from: Format,
        /// Encoding of the output
        #[arg(long, value_enum)]
        to: Format,
        #[command(flatten)]
        vdf: VdfArgs,
        /// Keep repeated keys instead of merging them
        #[arg(long)]
        no_merge: bool,
        /// Indent nested mappings in text output
        #[arg(short, long)]
        pretty: bool,
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

#[derive(Args, Clone, Copy)]
struct VdfArgs {
    /// Binary mappings end with 0x0B instead of 0x08
    #[arg(long)]
    alt: bool,
    /// Do not decode or encode backslash escapes in text VDF
    #[arg(long)]
    raw: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Brace-delimited KeyValues text
    Text,
    /// Tagged binary records
    Binary,
    /// Binary with a VBKV magic and CRC32
    Vbkv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::ToJson {
            files,
            format,
            vdf,
            no_merge,
            pretty,
        } => {
            let bytes = read_input(files.input.as_deref())?;
            let source = source_name(files.input.as_deref());
            let json = if no_merge {
                let doc: MultiDocument = decode(&bytes, format, vdf, false, &source)?;
                render_json(&doc, pretty)?
            } else {
                let doc: Document = decode(&bytes, format, vdf, true, &source)?;
                render_json(&doc, pretty)?
            };
            write_output(files.output.as_deref(), json.as_bytes())?;
        }
        Commands::FromJson {
            files,
            format,
            vdf,
            pretty,
        } => {
            let bytes = read_input(files.input.as_deref())?;
            let json: serde_json::Value =
                serde_json::from_slice(&bytes).context("Failed to parse JSON input")?;
            let doc = vdf_core::from_json(&json).context("JSON cannot be represented as VDF")?;
            let out = encode(&doc, format, vdf, pretty)?;
            write_output(files.output.as_deref(), &out)?;
        }
        Commands::Convert {
            files,
            from,
            to,
            vdf,
            no_merge,
            pretty,
        } => {
            let bytes = read_input(files.input.as_deref())?;
            let source = source_name(files.input.as_deref());
            let out = if no_merge {
                let doc: MultiDocument = decode(&bytes, from, vdf, false, &source)?;
                encode(&doc, to, vdf, pretty)?
            } else {
                let doc: Document = decode(&bytes, from, vdf, true, &source)?;
                encode(&doc, to, vdf, pretty)?
            };
            write_output(files.output.as_deref(), &out)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn source_name(path: Option<&str>) -> String {
    path.unwrap_or("<stdin>").to_string()
}

fn decode<M: Mapper>(
    bytes: &[u8],
    format: Format,
    vdf: VdfArgs,
    merge: bool,
    source: &str,
) -> Result<M> {
    tracing::debug!(?format, bytes = bytes.len(), merge, "decoding input");
    let doc = match format {
        Format::Text => {
            let options = ParseOptions::default()
                .with_merge_duplicate_keys(merge)
                .with_escaped(!vdf.raw)
                .with_source_name(source);
            parse(bytes, &options).context("Failed to parse VDF text")?
        }
        Format::Binary => {
            let options = BinaryOptions::default()
                .with_merge_duplicate_keys(merge)
                .with_alt_format(vdf.alt);
            binary_parse(bytes, &options)
                .with_context(|| format!("Failed to parse binary VDF from {source}"))?
        }
        Format::Vbkv => vbkv_loads(bytes, merge)
            .with_context(|| format!("Failed to parse VBKV from {source}"))?,
    };
    Ok(doc)
}

fn encode<M: Mapper>(doc: &M, format: Format, vdf: VdfArgs, pretty: bool) -> Result<Vec<u8>> {
    tracing::debug!(?format, entries = doc.len(), "encoding output");
    let out = match format {
        Format::Text => {
            let options = DumpOptions::default()
                .with_pretty(pretty)
                .with_escaped(!vdf.raw);
            dumps(doc, &options).into_bytes()
        }
        Format::Binary => binary_dumps(doc, vdf.alt).context("Failed to encode binary VDF")?,
        Format::Vbkv => vbkv_dumps(doc).context("Failed to encode VBKV")?,
    };
    Ok(out)
}

fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    json.push('\n');
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
