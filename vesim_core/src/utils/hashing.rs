//! Fingerprints of simulation configurations
//!
//! Hashes use [`DefaultHasher`], so a fingerprint is only reproducible with the toolchain
//! which computed it and should not be persisted across Rust releases.
use std::hash::{DefaultHasher, Hash, Hasher};

use serde_json::Value;

/// Hash of a value as 16 hex digits
pub(crate) fn hash_as_hex_string<T: Hash + ?Sized>(t: &T) -> String {
    let mut hasher = DefaultHasher::new();
    t.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Fingerprint of a JSON document which ignores key order and whitespace
///
/// # Note:
/// Relies on serde_json keeping object keys sorted, which holds while its `preserve_order`
/// feature is off.
pub(crate) fn json_fingerprint(value: &Value) -> String {
    hash_as_hex_string(&value.to_string())
}
