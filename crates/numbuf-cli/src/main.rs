use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use numbuf_core::{NumericBuffer, SampleRead, Shape, TypeNameRegistry};
use numbuf_io::{Encoding, load, save};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "numbuf")]
#[command(about = "Pack, inspect and convert typed numeric buffers")]
struct Args {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Wrap a raw byte file as a typed buffer.
    Pack {
        raw: PathBuf,
        out: PathBuf,
        /// Sample type name, e.g. float32, >int16, <uint8.
        #[arg(long)]
        dtype: String,
        /// Comma-separated dimensions, e.g. 2,3. Defaults to one dimension.
        #[arg(long, value_delimiter = ',')]
        shape: Option<Vec<usize>>,
        #[arg(long, default_value_t = Encoding::Tagged)]
        encoding: Encoding,
    },
    /// Print a buffer's type, shape and samples.
    Inspect {
        file: PathBuf,
        /// Print at most this many samples.
        #[arg(long, default_value_t = 64)]
        limit: usize,
    },
    /// Re-encode a buffer file.
    Convert {
        input: PathBuf,
        out: PathBuf,
        #[arg(long)]
        encoding: Encoding,
    },
    /// List known type names.
    Types,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let registry = TypeNameRegistry::standard();
    match args.cmd {
        Cmd::Pack {
            raw,
            out,
            dtype,
            shape,
            encoding,
        } => pack(&registry, &raw, &out, &dtype, shape, encoding),
        Cmd::Inspect { file, limit } => inspect(&file, limit),
        Cmd::Convert {
            input,
            out,
            encoding,
        } => convert(&input, &out, encoding),
        Cmd::Types => {
            for name in registry.names() {
                let dtype = registry.parse(name)?;
                println!("{name:<12} {dtype}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn pack(
    registry: &TypeNameRegistry,
    raw: &Path,
    out: &Path,
    dtype: &str,
    shape: Option<Vec<usize>>,
    encoding: Encoding,
) -> Result<()> {
    let dtype = registry.parse(dtype)?;
    if !dtype.is_readable() {
        tracing::warn!(%dtype, "Samples of this type cannot be read back");
    }
    let bytes = fs::read(raw).with_context(|| format!("reading {}", raw.display()))?;
    let buffer = NumericBuffer::from_vec(bytes, dtype, shape.map(Shape::new))?;
    save(out, &buffer, encoding).with_context(|| format!("writing {}", out.display()))?;
    info!(
        samples = buffer.num_samples(),
        shape = %buffer.shape(),
        %encoding,
        "Packed {}",
        out.display()
    );
    Ok(())
}

fn inspect(file: &Path, limit: usize) -> Result<()> {
    let buffer = load(file).with_context(|| format!("loading {}", file.display()))?;
    let dtype = buffer.dtype();
    println!("type:    {dtype}");
    println!("shape:   {}", buffer.shape());
    println!("samples: {}", buffer.num_samples());
    println!("bytes:   {}", buffer.len());

    if buffer.num_samples() <= limit {
        println!("{}", buffer.describe());
        return Ok(());
    }
    let mut line = String::from("[");
    for sample in buffer.samples().take(limit) {
        match sample {
            Ok(v) => line.push_str(&format!(" {v}")),
            Err(_) => line.push_str(" ?"),
        }
    }
    line.push_str(&format!(" ... ({} more) ]", buffer.num_samples() - limit));
    println!("{line}");
    Ok(())
}

fn convert(input: &Path, out: &Path, encoding: Encoding) -> Result<()> {
    if input == out {
        bail!("input and output must differ");
    }
    let buffer = load(input).with_context(|| format!("loading {}", input.display()))?;
    save(out, &buffer, encoding).with_context(|| format!("writing {}", out.display()))?;
    info!(%encoding, "Converted {} -> {}", input.display(), out.display());
    Ok(())
}
