//! CLI host for the `blocksync` library: `signature` and `delta`
//! subcommands, one encoded stream in, one encoded stream out.

use blocksync::codec::{decode_signature, encode_delta, encode_signature};
use blocksync::delta::{scan_delta_with_config, ScannerConfig};
use blocksync::signature::{build_signature_with_config, BuilderConfig};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "blocksync", version, about = "rsync-style block signature and delta tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a signature of a reference file.
    Signature {
        #[arg(long = "input-file")]
        input_file: PathBuf,
        #[arg(long = "signature-file")]
        signature_file: Option<PathBuf>,
        #[arg(long = "block-size", default_value_t = blocksync::signature::DEFAULT_BLOCK_SIZE)]
        block_size: u32,
    },
    /// Scan a modified file against a reference signature, producing a delta.
    Delta {
        #[arg(long = "input-file")]
        input_file: PathBuf,
        #[arg(long = "signature-file")]
        signature_file: PathBuf,
        #[arg(long = "delta-file")]
        delta_file: Option<PathBuf>,
        #[arg(long = "block-size", default_value_t = blocksync::signature::DEFAULT_BLOCK_SIZE)]
        block_size: u32,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blocksync: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> blocksync::Result<()> {
    match command {
        Command::Signature {
            input_file,
            signature_file,
            block_size,
        } => run_signature(&input_file, signature_file.as_deref(), block_size),
        Command::Delta {
            input_file,
            signature_file,
            delta_file,
            block_size,
        } => run_delta(&input_file, &signature_file, delta_file.as_deref(), block_size),
    }
}

fn open_input(path: &std::path::Path) -> blocksync::Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| blocksync::Error::io("open input", e))
}

fn open_output(path: Option<&std::path::Path>) -> blocksync::Result<Box<dyn Write>> {
    match path {
        Some(path) => File::create(path)
            .map(|f| Box::new(BufWriter::new(f)) as Box<dyn Write>)
            .map_err(|e| blocksync::Error::io("open output", e)),
        None => Ok(Box::new(io::stdout())),
    }
}

fn run_signature(
    input_file: &std::path::Path,
    signature_file: Option<&std::path::Path>,
    block_size: u32,
) -> blocksync::Result<()> {
    let reader = open_input(input_file)?;
    let config = BuilderConfig {
        block_size,
        ..BuilderConfig::default()
    };
    let signature = build_signature_with_config(reader, config)?;
    tracing::info!(blocks = signature.len(), "built signature");

    let encoded = encode_signature(&signature)?;
    let mut writer = open_output(signature_file)?;
    writer
        .write_all(&encoded)
        .map_err(|e| blocksync::Error::io("write signature", e))
}

fn run_delta(
    input_file: &std::path::Path,
    signature_file: &std::path::Path,
    delta_file: Option<&std::path::Path>,
    block_size: u32,
) -> blocksync::Result<()> {
    let signature_bytes =
        std::fs::read(signature_file).map_err(|e| blocksync::Error::io("read signature", e))?;
    let signature = decode_signature(block_size, &signature_bytes)?;

    let reader = open_input(input_file)?;
    let records = scan_delta_with_config(&signature, reader, ScannerConfig::default())?;
    tracing::info!(records = records.len(), "built delta");

    let encoded = encode_delta(&records)?;
    let mut writer = open_output(delta_file)?;
    writer
        .write_all(&encoded)
        .map_err(|e| blocksync::Error::io("write delta", e))
}
