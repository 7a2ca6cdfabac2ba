//! On-disk layout:
//!
//! ```text
//! u16 symbol_count                      little endian
//! symbol_count x (u8 value, u64 freq)   ascending by value
//! payload                               codes packed msb first, last byte zero padded
//! ```
//!
//! The padding length is not stored. The sum of the frequencies equals the
//! number of encoded symbols, so the decoder stops after exactly that many.

use std::io::Write;

use bytes::{Buf, BufMut, BytesMut};
use log::{debug, warn};

use crate::{
    bits::{BitPacker, BitUnpacker},
    code_table::CodeTable,
    error::{Error, Result},
    frequency::{FrequencyTable, ALPHABET_SIZE},
    tree::HuffmanTree,
};

const COUNT_LEN: usize = 2;
const ENTRY_LEN: usize = 1 + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSummary {
    pub original_len: u64,
    pub header_len: u64,
    pub payload_len: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
}

impl CompressionSummary {
    pub fn container_len(&self) -> u64 {
        self.header_len + self.payload_len
    }

    /// Whether the container came out smaller than the input it encodes.
    pub fn is_smaller(&self) -> bool {
        self.container_len() < self.original_len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressionSummary {
    pub container_len: u64,
    pub restored_len: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
}

/// Header and derived codes of a container, without decoding the payload.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub table: FrequencyTable,
    pub codes: Option<CodeTable>,
    pub header_len: u64,
    pub payload_len: u64,
}

pub fn write_header<W: Write>(writer: &mut W, table: &FrequencyTable) -> Result<u64> {
    let mut header = BytesMut::with_capacity(COUNT_LEN + table.len() * ENTRY_LEN);
    header.put_u16_le(table.len() as u16);
    for symbol in table.iter() {
        header.put_u8(symbol.value);
        header.put_u64_le(symbol.frequency);
    }

    writer.write_all(&header)?;
    Ok(header.len() as u64)
}

/// Reads the symbol table, leaving `buf` positioned at the payload.
pub fn read_header<B: Buf>(buf: &mut B) -> Result<FrequencyTable> {
    if buf.remaining() < COUNT_LEN {
        return Err(Error::format("missing symbol count"));
    }
    let count = buf.get_u16_le() as usize;
    if count > ALPHABET_SIZE {
        return Err(Error::format(format!(
            "symbol count {count} exceeds {ALPHABET_SIZE}"
        )));
    }
    if buf.remaining() < count * ENTRY_LEN {
        return Err(Error::format(format!(
            "header declares {count} symbols but holds only {} bytes of entries",
            buf.remaining()
        )));
    }

    let mut table = FrequencyTable::new();
    let mut previous: Option<u8> = None;
    for _ in 0..count {
        let value = buf.get_u8();
        let frequency = buf.get_u64_le();

        if previous.is_some_and(|previous| value <= previous) {
            return Err(Error::format(format!(
                "symbol {value} is out of ascending order"
            )));
        }
        if frequency == 0 {
            return Err(Error::format(format!("symbol {value} has zero frequency")));
        }
        table.insert(value, frequency);
        previous = Some(value);
    }

    if table.total().is_none() {
        return Err(Error::format("symbol frequencies overflow"));
    }
    Ok(table)
}

/// Writes the container for `input` to `writer`.
pub fn encode<W: Write>(input: &[u8], writer: &mut W) -> Result<CompressionSummary> {
    let table: FrequencyTable = input.iter().collect();
    let header_len = write_header(writer, &table)?;

    let mut summary = CompressionSummary {
        original_len: input.len() as u64,
        header_len,
        payload_len: 0,
        payload_bits: 0,
        distinct_symbols: table.len(),
    };

    let Some(tree) = HuffmanTree::new(&table)? else {
        return Ok(summary);
    };
    let codes = CodeTable::new(&tree);
    debug!(
        "built tree with {} leaves and {} internal nodes",
        tree.leaf_count(),
        tree.internal_count()
    );

    let mut packer = BitPacker::new(writer);
    for &byte in input {
        let code = codes
            .get(byte)
            .ok_or_else(|| Error::format(format!("no code assigned to byte {byte}")))?;
        packer.push_code(code)?;
    }
    let (_, payload_bits) = packer.finish()?;

    summary.payload_bits = payload_bits;
    summary.payload_len = payload_bits.div_ceil(8);
    if !summary.is_smaller() {
        warn!(
            "container of {} bytes is not smaller than the {} byte input",
            summary.container_len(),
            summary.original_len
        );
    }
    Ok(summary)
}

/// Restores the original bytes of `container` into `writer`.
pub fn decode<W: Write>(container: &[u8], writer: &mut W) -> Result<DecompressionSummary> {
    let mut buf = container;
    let table = read_header(&mut buf)?;
    let payload = buf;

    let mut summary = DecompressionSummary {
        container_len: container.len() as u64,
        restored_len: 0,
        payload_bits: 0,
        distinct_symbols: table.len(),
    };

    let Some(tree) = HuffmanTree::new(&table)? else {
        if !payload.is_empty() {
            return Err(Error::format(format!(
                "empty symbol table but {} bytes of payload",
                payload.len()
            )));
        }
        return Ok(summary);
    };

    summary.restored_len = tree.weight();
    summary.payload_bits = BitUnpacker::new(&tree).unpack(payload, tree.weight(), writer)?;
    Ok(summary)
}

pub fn inspect(container: &[u8]) -> Result<ContainerInfo> {
    let mut buf = container;
    let table = read_header(&mut buf)?;
    let codes = HuffmanTree::new(&table)?.map(|tree| CodeTable::new(&tree));

    Ok(ContainerInfo {
        header_len: (container.len() - buf.len()) as u64,
        payload_len: buf.len() as u64,
        table,
        codes,
    })
}
