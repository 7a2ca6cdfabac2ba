use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use huffman_compression::{compress, container, decompress};
use log::warn;

const COMPRESSED_EXTENSION: &str = "comp";
const DECOMPRESSED_EXTENSION: &str = "decomp";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file, writing `<INPUT>.comp` unless an output is given
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a file, writing `<INPUT>.decomp` unless an output is given
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the symbol table and codes of a compressed file
    Inspect { input: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Compress { input, output } => {
            let output = output.unwrap_or_else(|| with_suffix(&input, COMPRESSED_EXTENSION));
            transform(&input, &output, |reader, writer| {
                compress(reader, writer).map(|_| ())
            })
            .with_context(|| format!("Failed to compress {}", input.display()))?;
            println!("Compressed file written to {}", output.display());
        }
        Command::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| with_suffix(&input, DECOMPRESSED_EXTENSION));
            transform(&input, &output, |reader, writer| {
                decompress(reader, writer).map(|_| ())
            })
            .with_context(|| format!("Failed to decompress {}", input.display()))?;
            println!("Decompressed file written to {}", output.display());
        }
        Command::Inspect { input } => {
            let content =
                fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            inspect(&content).with_context(|| format!("Failed to inspect {}", input.display()))?;
        }
    }
    Ok(())
}

/// Runs `operation` from `input` into `output`, removing `output` again if the
/// operation fails.
fn transform<F>(input: &Path, output: &Path, operation: F) -> anyhow::Result<()>
where
    F: FnOnce(BufReader<File>, BufWriter<File>) -> huffman_compression::Result<()>,
{
    let reader = File::open(input)
        .map(BufReader::new)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let writer = File::create(output)
        .map(BufWriter::new)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    if let Err(err) = operation(reader, writer) {
        if let Err(remove_err) = fs::remove_file(output) {
            warn!(
                "failed to remove partial output {}: {remove_err}",
                output.display()
            );
        }
        return Err(err.into());
    }
    Ok(())
}

// appends rather than replaces, so `notes.txt` becomes `notes.txt.comp`
fn with_suffix(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn inspect(content: &[u8]) -> anyhow::Result<()> {
    let info = container::inspect(content)?;
    println!(
        "{} symbols, {} header bytes, {} payload bytes",
        info.table.len(),
        info.header_len,
        info.payload_len
    );

    let Some(codes) = info.codes else {
        return Ok(());
    };
    for symbol in info.table.iter() {
        let code = codes
            .get(symbol.value)
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("{:#04x} {:>12} {}", symbol.value, symbol.frequency, code);
    }
    Ok(())
}
