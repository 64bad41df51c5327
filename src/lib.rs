//! rsync-style block signature and delta primitive.
//!
//! Four components: a rolling checksum ([`rolling`]), a deterministic wire
//! codec ([`codec`]), a streaming signature builder ([`signature`]), and a
//! streaming delta scanner ([`delta`]). Given a signature of a reference
//! stream, the scanner turns a modified stream into a dense sequence of
//! [`DeltaRecord`]s — one-block matches and one-octet literals — without
//! ever holding the reference content itself in memory.

pub mod codec;
pub mod delta;
pub mod error;
pub mod rolling;
pub mod signature;

use std::collections::HashMap;
use std::io::Read;
use twox_hash::XxHash3_128;

pub use error::{Error, Result};

/// Width, in octets, of the strong per-block hash.
pub const STRONG_HASH_LEN: usize = 16;

/// Reads exactly `buf.len()` octets or until EOF, returning the number
/// read. Mirrors `Read::read_exact` but tolerates a short final read
/// instead of erroring, since a reference or modified stream's length
/// need not be a multiple of the block size.
pub(crate) fn read_exact_or_eof<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    stage: &'static str,
) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::io(stage, e)),
        }
    }
    Ok(total)
}

/// The 128-bit `XxHash3` of `chunk`, as 16 little-endian octets.
#[must_use]
pub(crate) fn strong_hash(chunk: &[u8]) -> [u8; STRONG_HASH_LEN] {
    XxHash3_128::oneshot(chunk).to_le_bytes()
}

/// One fixed-size block of a reference stream's signature.
///
/// `id` is dense and strictly increasing across a single [`Signature`] —
/// the `n`-th block produced has `id == n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockDescriptor {
    pub id: u32,
    pub weak_hash: u32,
    pub strong_hash: [u8; STRONG_HASH_LEN],
}

/// A reference stream's signature: every block descriptor plus a weak-hash
/// index built once at construction time.
///
/// The index maps a weak hash to every block sharing it, in insertion
/// order — a weak hash colliding across several blocks keeps every
/// candidate rather than only the most recent one.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    block_size: u32,
    blocks: Vec<BlockDescriptor>,
    weak_index: HashMap<u32, Vec<u32>>,
}

impl Signature {
    /// Builds a signature from an already-produced, id-ordered sequence of
    /// block descriptors.
    #[must_use]
    pub fn from_blocks(block_size: u32, blocks: Vec<BlockDescriptor>) -> Self {
        let mut weak_index: HashMap<u32, Vec<u32>> = HashMap::with_capacity(blocks.len());
        for block in &blocks {
            weak_index.entry(block.weak_hash).or_default().push(block.id);
        }
        Self {
            block_size,
            blocks,
            weak_index,
        }
    }

    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    #[must_use]
    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn block(&self, id: u32) -> Option<&BlockDescriptor> {
        self.blocks.get(id as usize)
    }

    /// Every block id sharing `weak_hash`, in the order they were appended
    /// to this signature.
    #[must_use]
    pub fn candidates(&self, weak_hash: u32) -> &[u32] {
        self.weak_index.get(&weak_hash).map_or(&[], Vec::as_slice)
    }

    /// The first candidate block (by ascending id) whose strong hash
    /// matches `chunk`, if any.
    #[must_use]
    pub fn find_match(&self, weak_hash: u32, chunk: &[u8]) -> Option<u32> {
        let candidates = self.candidates(weak_hash);
        if candidates.is_empty() {
            return None;
        }
        let strong = strong_hash(chunk);
        candidates
            .iter()
            .copied()
            .find(|&id| self.blocks[id as usize].strong_hash == strong)
    }
}

/// One unit of a delta stream, in strictly increasing `id` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeltaRecord {
    /// A single octet the scanner could not match against any reference
    /// block.
    Literal { id: u32, byte: u8 },
    /// A single reference block, matched in full.
    Match { id: u32, block_id: u32 },
}

impl DeltaRecord {
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            DeltaRecord::Literal { id, .. } | DeltaRecord::Match { id, .. } => *id,
        }
    }
}
