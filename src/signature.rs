//! Streaming signature builder.
//!
//! Reads a reference stream in `BUFFER_MULT * block_size`-sized chunks,
//! hashing each `block_size`-sized window and emitting one
//! [`BlockDescriptor`] per chunk, including a final short block.

use crate::error::{Error, Result};
use crate::rolling::RollingHash;
use crate::{strong_hash, BlockDescriptor, Signature};
use std::io::Read;

const STAGE: &str = "signature";

/// Default block size, the reference source's own default.
pub const DEFAULT_BLOCK_SIZE: u32 = 16;

/// Default working-buffer multiplier.
pub const DEFAULT_BUFFER_MULT: usize = 3;

/// Knobs controlling how a signature is built.
#[derive(Clone, Copy, Debug)]
pub struct BuilderConfig {
    pub block_size: u32,
    pub buffer_mult: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            buffer_mult: DEFAULT_BUFFER_MULT,
        }
    }
}

impl BuilderConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `block_size` is zero or `buffer_mult`
    /// is below one.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::config("block_size must be non-zero"));
        }
        if self.buffer_mult == 0 {
            return Err(Error::config("buffer_mult must be at least 1"));
        }
        Ok(())
    }
}

/// Builds a signature from `reader` using [`BuilderConfig::default`].
///
/// # Errors
/// Returns an error if reading from `reader` fails.
pub fn build_signature<R: Read>(reader: R) -> Result<Signature> {
    build_signature_with_config(reader, BuilderConfig::default())
}

/// Builds a signature from `reader` with an explicit configuration.
///
/// # Errors
/// Returns [`Error::Config`] if `config` is invalid, or an I/O error if
/// reading from `reader` fails.
pub fn build_signature_with_config<R: Read>(reader: R, config: BuilderConfig) -> Result<Signature> {
    let mut blocks = Vec::new();
    build_signature_streaming(reader, config, |block| blocks.push(block))?;
    Ok(Signature::from_blocks(config.block_size, blocks))
}

/// Builds a signature from `reader`, invoking `emit` once per block in id
/// order instead of collecting them into a `Vec`.
///
/// # Errors
/// Returns [`Error::Config`] if `config` is invalid, or an I/O error if
/// reading from `reader` fails.
pub fn build_signature_streaming<R: Read>(
    mut reader: R,
    config: BuilderConfig,
    mut emit: impl FnMut(BlockDescriptor),
) -> Result<()> {
    config.validate()?;
    let block_size = config.block_size as usize;
    let buffer_len = block_size * config.buffer_mult;

    let mut buffer = vec![0u8; buffer_len];
    let mut next_id: u32 = 0;
    let mut total_octets: u64 = 0;

    loop {
        let filled = crate::read_exact_or_eof(&mut reader, &mut buffer, STAGE)?;
        if filled == 0 {
            break;
        }
        total_octets += filled as u64;

        for chunk in buffer[..filled].chunks(block_size) {
            let weak_hash = RollingHash::compute(chunk).map_err(|_| {
                Error::config("block_size must be non-zero to compute a weak hash")
            })?;
            let descriptor = BlockDescriptor {
                id: next_id,
                weak_hash,
                strong_hash: strong_hash(chunk),
            };
            tracing::trace!(id = next_id, len = chunk.len(), "signature block");
            emit(descriptor);
            next_id += 1;
        }

        if filled < buffer.len() {
            break;
        }
    }

    tracing::debug!(
        blocks = next_id,
        octets = total_octets,
        block_size,
        "signature session complete"
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_zero_block_size() {
        let config = BuilderConfig {
            block_size: 0,
            buffer_mult: 3,
        };
        assert!(build_signature_with_config(&b""[..], config).is_err());
    }

    #[test]
    fn rejects_zero_buffer_mult() {
        let config = BuilderConfig {
            block_size: 4,
            buffer_mult: 0,
        };
        assert!(build_signature_with_config(&b"abcd"[..], config).is_err());
    }

    #[test]
    fn empty_input_has_no_blocks() {
        let sig = build_signature(&b""[..]).unwrap();
        assert!(sig.is_empty());
    }

    #[test]
    fn block_count_and_ids_are_dense() {
        let config = BuilderConfig {
            block_size: 4,
            buffer_mult: 2,
        };
        let data = vec![7u8; 4 * 5 + 2];
        let sig = build_signature_with_config(&data[..], config).unwrap();
        assert_eq!(sig.len(), 6);
        for (i, block) in sig.blocks().iter().enumerate() {
            assert_eq!(block.id, i as u32);
        }
        assert_eq!(sig.blocks()[5].id, 5);
    }

    #[test]
    fn short_final_block_is_still_emitted() {
        let config = BuilderConfig {
            block_size: 8,
            buffer_mult: 1,
        };
        let data = vec![1u8; 10];
        let sig = build_signature_with_config(&data[..], config).unwrap();
        assert_eq!(sig.len(), 2);
    }

    #[test]
    fn identical_blocks_share_a_weak_hash_bucket() {
        let config = BuilderConfig {
            block_size: 4,
            buffer_mult: 4,
        };
        let data = vec![42u8; 16];
        let sig = build_signature_with_config(&data[..], config).unwrap();
        let weak = sig.blocks()[0].weak_hash;
        assert_eq!(sig.candidates(weak).len(), 4);
    }
}
