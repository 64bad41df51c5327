//! Deterministic binary wire format for signature and delta streams.
//!
//! Each encoded stream is a single format-version octet followed by a
//! `bincode`-encoded `Vec<T>`. Signature and delta streams are never
//! interleaved — a caller always knows which kind it is decoding from
//! context (the `signature` or `delta` subcommand, the file it opened).

use crate::error::{Error, Result};
use crate::{BlockDescriptor, DeltaRecord, Signature};

/// Wire format version. Bump and branch on this byte if the encoding ever
/// changes shape.
const FORMAT_VERSION: u8 = 1;

fn bincode_config() -> bincode::Config {
    let mut config = bincode::config();
    config.little_endian();
    config
}

/// Encodes `signature`'s block descriptors as a versioned byte stream.
///
/// # Errors
/// Returns [`Error::Codec`] if serialisation fails.
pub fn encode_signature(signature: &Signature) -> Result<Vec<u8>> {
    encode_records("signature", signature.blocks())
}

/// Decodes a versioned byte stream produced by [`encode_signature`] into a
/// [`Signature`] with `block_size`.
///
/// # Errors
/// Returns [`Error::Codec`] on truncation, an unrecognised format version,
/// or a malformed record.
pub fn decode_signature(block_size: u32, bytes: &[u8]) -> Result<Signature> {
    let blocks: Vec<BlockDescriptor> = decode_records("signature", bytes)?;
    Ok(Signature::from_blocks(block_size, blocks))
}

/// Encodes a delta record sequence as a versioned byte stream.
///
/// # Errors
/// Returns [`Error::Codec`] if serialisation fails.
pub fn encode_delta(records: &[DeltaRecord]) -> Result<Vec<u8>> {
    encode_records("delta", records)
}

/// Decodes a versioned byte stream produced by [`encode_delta`].
///
/// # Errors
/// Returns [`Error::Codec`] on truncation, an unrecognised format version,
/// or a malformed record.
pub fn decode_delta(bytes: &[u8]) -> Result<Vec<DeltaRecord>> {
    decode_records("delta", bytes)
}

fn encode_records<T: serde::Serialize>(stage: &'static str, records: &[T]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(1 + records.len() * 24);
    out.push(FORMAT_VERSION);
    let body = bincode_config()
        .serialize(&records)
        .map_err(|e| Error::codec(stage, e))?;
    out.extend_from_slice(&body);
    Ok(out)
}

fn decode_records<T: serde::de::DeserializeOwned>(stage: &'static str, bytes: &[u8]) -> Result<Vec<T>> {
    let (&version, body) = bytes
        .split_first()
        .ok_or_else(|| Error::codec(stage, "empty stream: missing format-version octet"))?;
    if version != FORMAT_VERSION {
        return Err(Error::codec(
            stage,
            format!("unknown format version {version}"),
        ));
    }
    bincode_config()
        .deserialize(body)
        .map_err(|e| Error::codec(stage, e))
}
