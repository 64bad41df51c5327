//! Test-only delta application: reconstructs a modified stream from a
//! reference and a delta record sequence, used only to assert a
//! round-trip consistency property. Not part of the crate's public API —
//! spec treats application as a testing concern, not a shipped operation.

use blocksync::{DeltaRecord, Signature};

pub fn apply_delta(reference: &[u8], signature: &Signature, records: &[DeltaRecord]) -> Vec<u8> {
    let block_size = signature.block_size() as usize;
    let mut out = Vec::new();
    for record in records {
        match *record {
            DeltaRecord::Literal { byte, .. } => out.push(byte),
            DeltaRecord::Match { block_id, .. } => {
                let start = block_id as usize * block_size;
                let end = (start + block_size).min(reference.len());
                out.extend_from_slice(&reference[start..end]);
            }
        }
    }
    out
}
