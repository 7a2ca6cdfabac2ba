use std::io::Write;

use crate::{
    code::Code,
    error::{Error, Result},
    tree::{HuffmanTree, Node, NodeId},
};

const BITS_PER_BYTE: u8 = 8;

/// Packs codes into bytes, most significant bit first.
pub struct BitPacker<W> {
    writer: W,
    buffer: u8,
    filled: u8,
    bits_written: u64,
}

impl<W: Write> BitPacker<W> {
    pub fn new(writer: W) -> Self {
        BitPacker {
            writer,
            buffer: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    pub fn push_bit(&mut self, bit: bool) -> Result<()> {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.filled += 1;
        self.bits_written += 1;

        if self.filled == BITS_PER_BYTE {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    pub fn push_code(&mut self, code: &Code) -> Result<()> {
        code.bits().try_for_each(|bit| self.push_bit(bit))
    }

    /// Flushes a partial byte, zero-filling its low-order bits, and hands back
    /// the writer along with the number of meaningful bits written.
    pub fn finish(mut self) -> Result<(W, u64)> {
        if self.filled > 0 {
            let last = self.buffer << (BITS_PER_BYTE - self.filled);
            self.writer.write_all(&[last])?;
        }
        Ok((self.writer, self.bits_written))
    }
}

/// Bits of `bytes`, most significant bit of each byte first.
pub fn bits(bytes: &[u8]) -> impl Iterator<Item = bool> + '_ {
    bytes
        .iter()
        .flat_map(|byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1 == 1))
}

/// Walks a tree one bit at a time.
pub struct BitUnpacker<'a> {
    tree: &'a HuffmanTree,
    current: NodeId,
}

impl<'a> BitUnpacker<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        BitUnpacker {
            tree,
            current: tree.root(),
        }
    }

    /// Follows `bit` from the current position. Returns the symbol once a
    /// leaf is reached and starts over from the root.
    pub fn step(&mut self, bit: bool) -> Result<Option<u8>> {
        let next = match self.tree.node(self.current) {
            // single-symbol tree, its only code is a single 0
            Node::Leaf(symbol) if bit => {
                return Err(Error::format(format!(
                    "bit 1 in the payload of single-symbol byte {}",
                    symbol.value
                )));
            }
            Node::Leaf(symbol) => return Ok(Some(symbol.value)),
            Node::Internal { left, right, .. } => {
                if bit {
                    *right
                } else {
                    *left
                }
            }
        };

        match self.tree.node(next) {
            Node::Leaf(symbol) => {
                self.current = self.tree.root();
                Ok(Some(symbol.value))
            }
            Node::Internal { .. } => {
                self.current = next;
                Ok(None)
            }
        }
    }

    /// Decodes exactly `symbol_count` symbols from `payload` into `writer`.
    ///
    /// The payload must end in the byte that holds the last meaningful bit and
    /// the padding after it must be zero. Returns the number of bits consumed.
    pub fn unpack<W: Write>(
        mut self,
        payload: &[u8],
        symbol_count: u64,
        writer: &mut W,
    ) -> Result<u64> {
        let mut bits = bits(payload);
        let mut decoded = 0_u64;
        let mut consumed = 0_u64;

        while decoded < symbol_count {
            let bit = bits.next().ok_or_else(|| {
                Error::format(format!(
                    "payload ended after {decoded} of {symbol_count} symbols"
                ))
            })?;
            consumed += 1;

            if let Some(value) = self.step(bit)? {
                writer.write_all(&[value])?;
                decoded += 1;
            }
        }

        let used_bytes = consumed.div_ceil(u64::from(BITS_PER_BYTE));
        let trailing = payload.len() as u64 - used_bytes;
        if trailing > 0 {
            return Err(Error::format(format!(
                "{trailing} unexpected bytes after the final symbol"
            )));
        }
        if bits.any(|bit| bit) {
            return Err(Error::format("padding bits are not zero"));
        }

        Ok(consumed)
    }
}
