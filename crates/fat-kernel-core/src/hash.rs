//! Hashing primitives: chain ID and entry hash derivation.
//!
//! Both constructions are fixed by the Factom protocol, including operand
//! order. Changing either breaks compatibility with every committed chain.

use sha2::{Digest, Sha256, Sha512};

use crate::types::{ChainId, EntryHash};

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 applied twice. Used for address checksums.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Derive a chain ID from the first entry's ExtIDs (the chain's name IDs).
///
/// Each name ID is hashed on its own, the digests are concatenated in order,
/// and the concatenation is hashed again. Order-sensitive.
pub fn chain_id<I, T>(name_ids: I) -> ChainId
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for id in name_ids {
        hasher.update(sha256(id.as_ref()));
    }
    ChainId(hasher.finalize().into())
}

/// Hash raw entry bytes: `sha256(sha512(data) || data)`.
pub fn entry_hash(data: &[u8]) -> EntryHash {
    let salt = Sha512::digest(data);
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(data);
    EntryHash(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_known_value() {
        let id = chain_id([b"a".as_slice(), b"b".as_slice()]);
        assert_eq!(
            id.to_hex(),
            "e5a01fee14e0ed5c48714f22180f25ad8365b53f9779f79dc4a3d7e93963f94a"
        );
    }

    #[test]
    fn test_chain_id_is_order_sensitive() {
        let ab = chain_id([b"a".as_slice(), b"b".as_slice()]);
        let ba = chain_id([b"b".as_slice(), b"a".as_slice()]);
        assert_ne!(ab, ba);
        assert_eq!(
            ba.to_hex(),
            "18d79cb747ea174c59f3a3b41768672526d56fecc58360a99d283d0f9b0a3cc0"
        );
    }

    #[test]
    fn test_entry_hash_known_value() {
        let data = hex::decode(
            "001111111111111111111111111111111111111111111111111111111111111111\
             000e000568656c6c6f0005776f726c64636f6e74656e74",
        )
        .unwrap();
        assert_eq!(
            entry_hash(&data).to_hex(),
            "368d0fb53cb8a6600b1fa3f552a65569916dc33726a0c3f8506bf1a2b2d417fe"
        );
    }

    #[test]
    fn test_entry_hash_is_not_plain_sha256() {
        let data = b"factom";
        assert_ne!(entry_hash(data).0, sha256(data));
    }
}
