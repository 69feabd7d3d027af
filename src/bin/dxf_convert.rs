//! Convert a DXF file to another version or between text and binary.
//!
//! ```text
//! dxf-convert <input> <output> [--version AC1015] [--binary]
//! ```
//!
//! Log output is controlled with `RUST_LOG`, e.g. `RUST_LOG=dxf_codec=debug`.

use anyhow::{bail, Context};
use dxf_codec::{DxfReader, DxfVersion, DxfWriter, DxfWriterConfiguration, EntityType, Handle};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    input: PathBuf,
    output: PathBuf,
    version: Option<DxfVersion>,
    binary: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut paths = Vec::new();
    let mut version = None;
    let mut binary = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--binary" => binary = true,
            "--version" => {
                let value = args.next().context("--version needs a value such as AC1015")?;
                let parsed = DxfVersion::from_version_string(&value);
                if !parsed.is_writable() {
                    bail!("cannot write version {}", value);
                }
                version = Some(parsed);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    let [input, output]: [PathBuf; 2] = paths
        .try_into()
        .map_err(|_| anyhow::anyhow!("usage: dxf-convert <input> <output> [--version ACxxxx] [--binary]"))?;
    Ok(Args {
        input,
        output,
        version,
        binary,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let mut document = DxfReader::from_file(&args.input)
        .and_then(|reader| reader.read())
        .with_context(|| format!("reading {}", args.input.display()))?;

    for notification in &document.notifications {
        warn!(%notification, "read notification");
    }

    let unknown: Vec<Handle> = document
        .entities()
        .filter(|e| matches!(e, EntityType::Unknown(_)))
        .map(|e| e.handle())
        .collect();
    for handle in unknown {
        if let Some(entity) = document.remove_entity(handle) {
            warn!(%handle, kind = entity.dxf_name(), "dropping entity that cannot be written");
        }
    }

    let configuration = DxfWriterConfiguration {
        version: args.version,
        binary: args.binary,
        ..Default::default()
    };
    DxfWriter::new(&document)
        .with_configuration(configuration)
        .write_to_file(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        entities = document.entity_count(),
        "converted"
    );
    Ok(())
}
