//! Fuzz target for discriminated union decoding.
//!
//! Run with: cargo +nightly fuzz run fuzz_union_decode
//!
//! Decodes arbitrary bytes as each union and as a full storage snapshot.
//! Decoding must never panic, and anything that decodes must re-encode
//! with the same `$type` and decode again to an equal value.

#![no_main]

use libfuzzer_sys::fuzz_target;
use subiquity_types::codec::{decode, decode_union, decode_union_str};
use subiquity_types::{AnyStep, GuidedStorageTarget, PartitionOrGap, StorageResponseV2, Union};

fn check<U: Union + serde::Serialize + PartialEq + std::fmt::Debug>(text: &str) {
    if let Ok(value) = decode_union_str::<U>(text) {
        let encoded = serde_json::to_value(&value).expect("decoded union re-encodes");
        assert_eq!(encoded["$type"], value.tag());
        let again = decode_union::<U>(encoded).expect("re-encoded union decodes");
        assert_eq!(again, value);
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        check::<PartitionOrGap>(text);
        check::<GuidedStorageTarget>(text);
        check::<AnyStep>(text);
        let _ = decode::<StorageResponseV2>(text);
    }
});
