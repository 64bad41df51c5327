//! Streaming delta scanner.
//!
//! Slides a `block_size`-wide rolling hash over a `BUFFER_MULT *
//! block_size` working buffer, compacting the unconsumed tail and
//! refilling from the reader as the window advances. On a weak-hash hit
//! confirmed by the strong hash, emits one [`DeltaRecord::Match`] covering
//! exactly one reference block and re-synchronises the rolling hash past
//! it; otherwise emits exactly one [`DeltaRecord::Literal`] and slides by
//! one octet. At end-of-stream, the residual window (shorter than one
//! block) is tried as a single match against the signature first, falling
//! back to one literal per octet if it does not match.

use crate::error::Result;
use crate::rolling::RollingHash;
use crate::{DeltaRecord, Signature};
use std::io::Read;

const STAGE: &str = "delta";

/// Default working-buffer multiplier.
pub const DEFAULT_BUFFER_MULT: usize = 3;

/// Knobs controlling how a delta scan buffers input.
#[derive(Clone, Copy, Debug)]
pub struct ScannerConfig {
    pub buffer_mult: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            buffer_mult: DEFAULT_BUFFER_MULT,
        }
    }
}

impl ScannerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if `buffer_mult` is below one.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_mult == 0 {
            return Err(crate::Error::config("buffer_mult must be at least 1"));
        }
        Ok(())
    }
}

/// Scans `reader` against `signature` using [`ScannerConfig::default`].
///
/// # Errors
/// Returns an error if reading from `reader` fails.
pub fn scan_delta<R: Read>(signature: &Signature, reader: R) -> Result<Vec<DeltaRecord>> {
    scan_delta_with_config(signature, reader, ScannerConfig::default())
}

/// Scans `reader` against `signature` with an explicit configuration.
///
/// # Errors
/// Returns [`crate::Error::Config`] if `config` or `signature` is invalid,
/// or an I/O error if reading from `reader` fails.
pub fn scan_delta_with_config<R: Read>(
    signature: &Signature,
    reader: R,
    config: ScannerConfig,
) -> Result<Vec<DeltaRecord>> {
    let mut records = Vec::new();
    scan_delta_streaming(signature, reader, config, |record| records.push(record))?;
    Ok(records)
}

/// Scans `reader` against `signature`, invoking `emit` once per record in
/// id order instead of collecting them into a `Vec`.
///
/// # Errors
/// Returns [`crate::Error::Config`] if `config` or `signature` is invalid,
/// or an I/O error if reading from `reader` fails.
pub fn scan_delta_streaming<R: Read>(
    signature: &Signature,
    mut reader: R,
    config: ScannerConfig,
    mut emit: impl FnMut(DeltaRecord),
) -> Result<()> {
    config.validate()?;
    let block_size = signature.block_size() as usize;
    if block_size == 0 {
        return Err(crate::Error::config("signature block_size must be non-zero"));
    }

    let buffer_len = block_size * config.buffer_mult;
    let mut buffer = vec![0u8; buffer_len];

    let mut start = 0usize;
    let mut len = 0usize;
    let mut next_id: u32 = 0;
    let mut match_count: u64 = 0;
    let mut literal_count: u64 = 0;

    let mut rolling = RollingHash::new(block_size)?;
    let mut rolling_loaded = false;
    let mut eof = false;

    loop {
        if !eof {
            if start > 0 {
                buffer.copy_within(start..len, 0);
                len -= start;
                start = 0;
            }
            if len < buffer.len() {
                let filled = crate::read_exact_or_eof(&mut reader, &mut buffer[len..], STAGE)?;
                len += filled;
                if len < buffer.len() {
                    eof = true;
                }
            }
        }

        while len - start >= block_size {
            if !rolling_loaded {
                rolling.reset();
                rolling.add_buffer(&buffer[start..start + block_size]);
                rolling_loaded = true;
            }

            let window = &buffer[start..start + block_size];
            if let Some(block_id) = signature.find_match(rolling.hash(), window) {
                emit(DeltaRecord::Match {
                    id: next_id,
                    block_id,
                });
                next_id += 1;
                match_count += 1;
                start += block_size;
                rolling_loaded = false;
            } else {
                emit(DeltaRecord::Literal {
                    id: next_id,
                    byte: buffer[start],
                });
                next_id += 1;
                literal_count += 1;
                start += 1;
                if len - start >= block_size {
                    rolling.add(buffer[start + block_size - 1]);
                } else {
                    rolling_loaded = false;
                }
            }
        }

        if eof {
            break;
        }
    }

    let residual = &buffer[start..len];
    if !residual.is_empty() {
        let residual_weak = RollingHash::compute(residual)?;
        if let Some(block_id) = signature.find_match(residual_weak, residual) {
            emit(DeltaRecord::Match {
                id: next_id,
                block_id,
            });
            next_id += 1;
            match_count += 1;
        } else {
            for &byte in residual {
                emit(DeltaRecord::Literal { id: next_id, byte });
                next_id += 1;
                literal_count += 1;
            }
        }
    }

    tracing::debug!(
        matches = match_count,
        literals = literal_count,
        records = next_id,
        "delta session complete"
    );
    Ok(())
}
