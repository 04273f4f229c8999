//! Key Derivation Module
//!
//! Turns an argument value into a fixed-length cache key.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::KeyError;

/// Derives the cache key for `args`.
///
/// The arguments are first converted into a `serde_json::Value`, whose object
/// maps keep their keys sorted, so two values that differ only in map
/// iteration order produce the same key. The canonical JSON text is then
/// hashed with SHA-256 and hex encoded.
pub fn derive_key<A>(args: &A) -> Result<String, KeyError>
where
    A: Serialize + ?Sized,
{
    let canonical = serde_json::to_value(args).map_err(|e| KeyError::new(e.to_string()))?;
    let bytes = serde_json::to_vec(&canonical).map_err(|e| KeyError::new(e.to_string()))?;

    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Shortened key used in log lines.
pub(crate) fn short(key: &str) -> &str {
    &key[..key.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_key_is_sha256_hex() {
        let key = derive_key(&(1,)).unwrap();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));

        // A one-element tuple serializes like a one-element argument list.
        assert_eq!(key, hex::encode(Sha256::digest(b"[1]")));
    }

    #[test]
    fn test_same_args_same_key() {
        assert_eq!(derive_key(&("a", 1)).unwrap(), derive_key(&("a", 1)).unwrap());
    }

    #[test]
    fn test_different_args_different_key() {
        assert_ne!(derive_key(&1).unwrap(), derive_key(&2).unwrap());
        assert_ne!(derive_key(&"1").unwrap(), derive_key(&1).unwrap());
    }

    #[test]
    fn test_map_ordering_does_not_matter() {
        let mut forward = HashMap::new();
        let mut backward = HashMap::new();
        for i in 0..32 {
            forward.insert(format!("k{i}"), i);
        }
        for i in (0..32).rev() {
            backward.insert(format!("k{i}"), i);
        }
        let sorted: BTreeMap<_, _> = forward.clone().into_iter().collect();

        let key = derive_key(&forward).unwrap();
        assert_eq!(key, derive_key(&backward).unwrap());
        assert_eq!(key, derive_key(&sorted).unwrap());
    }

    #[test]
    fn test_struct_field_order_does_not_matter() {
        #[derive(Serialize)]
        struct Ab {
            a: u8,
            b: u8,
        }
        #[derive(Serialize)]
        struct Ba {
            b: u8,
            a: u8,
        }

        assert_eq!(
            derive_key(&Ab { a: 1, b: 2 }).unwrap(),
            derive_key(&Ba { b: 2, a: 1 }).unwrap()
        );
    }

    #[test]
    fn test_unserializable_args_fail() {
        let mut tuple_keys = HashMap::new();
        tuple_keys.insert((1u8, 2u8), "value");

        let err = derive_key(&tuple_keys).unwrap_err();
        assert!(err.to_string().contains("key must be a string"));
    }

    #[test]
    fn test_short_key() {
        assert_eq!(short("0123456789abcdef"), "0123456789ab");
        assert_eq!(short("abc"), "abc");
    }
}
