//! Property: encoding then decoding a signature or delta stream is the
//! identity function.

use blocksync::codec::{decode_delta, decode_signature, encode_delta, encode_signature};
use blocksync::{BlockDescriptor, DeltaRecord, Signature, STRONG_HASH_LEN};
use proptest::prelude::*;

fn arb_block() -> impl Strategy<Value = (u32, [u8; STRONG_HASH_LEN])> {
    (any::<u32>(), any::<[u8; STRONG_HASH_LEN]>())
}

fn arb_signature(block_size: u32) -> impl Strategy<Value = Signature> {
    proptest::collection::vec(arb_block(), 0..64).prop_map(move |entries| {
        let blocks = entries
            .into_iter()
            .enumerate()
            .map(|(id, (weak_hash, strong_hash))| BlockDescriptor {
                id: id as u32,
                weak_hash,
                strong_hash,
            })
            .collect();
        Signature::from_blocks(block_size, blocks)
    })
}

#[derive(Clone, Debug)]
enum RawRecord {
    Literal(u8),
    Match(u32),
}

fn arb_raw_record() -> impl Strategy<Value = RawRecord> {
    prop_oneof![
        any::<u8>().prop_map(RawRecord::Literal),
        any::<u32>().prop_map(RawRecord::Match),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<DeltaRecord>> {
    proptest::collection::vec(arb_raw_record(), 0..64).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, r)| {
                let id = i as u32;
                match r {
                    RawRecord::Literal(byte) => DeltaRecord::Literal { id, byte },
                    RawRecord::Match(block_id) => DeltaRecord::Match { id, block_id },
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn signature_round_trips(sig in arb_signature(16)) {
        let encoded = encode_signature(&sig).unwrap();
        let decoded = decode_signature(16, &encoded).unwrap();
        prop_assert_eq!(decoded.blocks(), sig.blocks());
    }

    #[test]
    fn delta_round_trips(records in arb_records()) {
        let encoded = encode_delta(&records).unwrap();
        let decoded = decode_delta(&encoded).unwrap();
        prop_assert_eq!(decoded, records);
    }
}
