//! Single-file lossless compression with a per-file Huffman code.
//!
//! ```
//! let container = huffman_compression::compress_bytes(b"AAAAABBBCC")?;
//! let restored = huffman_compression::decompress_bytes(&container)?;
//! assert_eq!(restored, b"AAAAABBBCC");
//! # Ok::<(), huffman_compression::Error>(())
//! ```

pub mod bits;
pub mod code;
pub mod code_table;
pub mod container;
pub mod error;
pub mod frequency;
pub mod tree;

use std::io::{Read, Write};

use log::info;

pub use container::{CompressionSummary, ContainerInfo, DecompressionSummary};
pub use error::{Error, Result};

/// Compresses everything `reader` yields into `writer`.
///
/// The input is read fully into memory first since the frequency table has to
/// be written ahead of the payload.
pub fn compress<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<CompressionSummary> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let summary = container::encode(&input, &mut writer)?;
    writer.flush()?;

    info!(
        "compressed {} bytes into {} ({} distinct symbols, {} payload bits)",
        summary.original_len,
        summary.container_len(),
        summary.distinct_symbols,
        summary.payload_bits
    );
    Ok(summary)
}

pub fn decompress<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<DecompressionSummary> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;

    let summary = container::decode(&content, &mut writer)?;
    writer.flush()?;

    info!(
        "restored {} bytes from {} ({} distinct symbols)",
        summary.restored_len, summary.container_len, summary.distinct_symbols
    );
    Ok(summary)
}

pub fn compress_bytes(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    container::encode(input, &mut output)?;
    Ok(output)
}

pub fn decompress_bytes(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    container::decode(compressed, &mut output)?;
    Ok(output)
}
