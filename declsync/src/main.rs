//! Declarative sync configuration converter.
//!
//! Reads a configuration-model JSON document and writes its wire form, or
//! hydrates a wire JSON document back into configuration form.
//!
//! # Security Guarantees
//! - Nothing leaves the machine; conversion is purely local
//! - Connection URLs are redacted in logs

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use declsync_core::convert::{FromWire, ToWire};
use declsync_core::logging::init_logging;
use declsync_core::models::{
    ConnectionConfig, Job, JobDestination, JobHook, JobSource, TransformerConfig,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "declsync")]
#[command(about = "Convert declarative sync configuration to and from the wire model")]
#[command(version)]
#[command(long_about = "
declsync - declarative configuration converter

Encodes configuration documents into the wire messages the sync service
accepts, and hydrates wire messages back into configuration documents.

RESOURCE KINDS:
- connection   Postgres, MySQL or object-store connection
- source       job source
- destination  job destination
- transformer  column transformer
- hook         job hook
- job          complete job

EXAMPLES:
  declsync encode --kind connection --input pg.json
  declsync decode --kind job --input job.wire.json --output job.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Configuration document to wire message
    Encode(ConvertArgs),
    /// Wire message to configuration document
    Decode(ConvertArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Resource kind of the input document
    #[arg(short, long, value_enum)]
    pub kind: ResourceKind,

    /// Input JSON file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all logging except errors")]
    pub quiet: bool,
}

/// Resource kinds the converter understands.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Connection,
    Source,
    Destination,
    Transformer,
    Hook,
    Job,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Encode,
    Decode,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let (direction, args) = match &cli.command {
        Command::Encode(args) => (Direction::Encode, args),
        Command::Decode(args) => (Direction::Decode, args),
    };

    let document = read_document(&args.input)?;
    let converted = convert_document(direction, args.kind, document)
        .with_context(|| format!("Failed to {direction:?} {:?} document", args.kind))?;
    write_document(&converted, args.output.as_deref())?;

    info!(kind = ?args.kind, ?direction, "conversion complete");
    Ok(())
}

fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn write_document(document: &Value, output: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(document)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered + "\n")
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            debug!(path = %path.display(), "wrote output");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Converts one JSON document in the given direction.
fn convert_document(direction: Direction, kind: ResourceKind, document: Value) -> Result<Value> {
    match (direction, kind) {
        (Direction::Encode, ResourceKind::Connection) => encode::<ConnectionConfig>(document),
        (Direction::Encode, ResourceKind::Source) => encode::<JobSource>(document),
        (Direction::Encode, ResourceKind::Destination) => encode::<JobDestination>(document),
        (Direction::Encode, ResourceKind::Transformer) => encode::<TransformerConfig>(document),
        (Direction::Encode, ResourceKind::Hook) => encode::<JobHook>(document),
        (Direction::Encode, ResourceKind::Job) => encode::<Job>(document),
        (Direction::Decode, ResourceKind::Connection) => decode::<ConnectionConfig>(document),
        (Direction::Decode, ResourceKind::Source) => decode::<JobSource>(document),
        (Direction::Decode, ResourceKind::Destination) => decode::<JobDestination>(document),
        (Direction::Decode, ResourceKind::Transformer) => decode::<TransformerConfig>(document),
        (Direction::Decode, ResourceKind::Hook) => decode::<JobHook>(document),
        (Direction::Decode, ResourceKind::Job) => decode::<Job>(document),
    }
}

fn encode<T>(document: Value) -> Result<Value>
where
    T: ToWire + DeserializeOwned,
    T::Wire: Serialize,
{
    let config: T = serde_json::from_value(document).context("Invalid configuration document")?;
    let wire = config.to_wire()?;
    Ok(serde_json::to_value(wire)?)
}

fn decode<T>(document: Value) -> Result<Value>
where
    T: FromWire + Serialize,
    T::Wire: DeserializeOwned,
{
    let wire: T::Wire = serde_json::from_value(document).context("Invalid wire document")?;
    let config = T::from_wire(&wire)?;
    Ok(serde_json::to_value(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use declsync_core::ConvertError;
    use serde_json::json;

    #[test]
    fn test_encode_connection_document() {
        let wire = convert_document(
            Direction::Encode,
            ResourceKind::Connection,
            json!({"postgres": {"url": "postgres://x"}}),
        )
        .expect("encode");
        assert_eq!(
            wire,
            json!({"config": {"pg_config": {"connection_config": {"url": "postgres://x"}}}})
        );
    }

    #[test]
    fn test_decode_transformer_document() {
        let config = convert_document(
            Direction::Decode,
            ResourceKind::Transformer,
            json!({"config": {"generate_int64": {"min": 1, "max": 9}}}),
        )
        .expect("decode");
        assert_eq!(config["generate_int64"]["max"], 9);
    }

    #[test]
    fn test_conversion_errors_keep_their_type() {
        let err = convert_document(
            Direction::Decode,
            ResourceKind::Transformer,
            json!({"config": {"generate_future_thing": {}}}),
        )
        .expect_err("unknown tag");
        assert_eq!(
            err.downcast_ref::<ConvertError>(),
            Some(&ConvertError::UnsupportedVariant("generate_future_thing".to_string()))
        );
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "declsync", "encode", "--kind", "hook", "--input", "hook.json", "-vv",
        ])
        .expect("parse");
        assert_eq!(cli.global.verbose, 2);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.kind, ResourceKind::Hook);
        assert_eq!(args.output, None);
    }
}
