//! Entry: the envelope every piece of chain data rides in.

use bytes::Bytes;

use crate::codec::{decode_entry, encode_entry};
use crate::error::FormatError;
use crate::hash::{chain_id, entry_hash};
use crate::types::{ChainId, EntryHash};

/// A Factom entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Assigned once committed. Never read by the codec.
    pub hash: Option<EntryHash>,

    /// Block time of the entry (Unix seconds). Absent before commitment.
    pub timestamp: Option<i64>,

    /// The chain this entry belongs to. `None` for the first entry of a
    /// chain that does not exist yet.
    pub chain_id: Option<ChainId>,

    /// Directory block height. Populated by retrieval only.
    pub height: u64,

    /// External IDs, each at most `u16::MAX` bytes.
    pub ext_ids: Vec<Bytes>,

    /// Opaque payload.
    pub content: Bytes,
}

impl Entry {
    /// Create an empty entry on an existing chain.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id: Some(chain_id),
            ..Self::default()
        }
    }

    /// The explicit chain ID, or the one derived from `ext_ids` when this is
    /// the first entry of a new chain.
    pub fn resolved_chain_id(&self) -> ChainId {
        self.chain_id.unwrap_or_else(|| chain_id(&self.ext_ids))
    }

    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        encode_entry(self)
    }

    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        decode_entry(data)
    }

    /// `entry_hash(encode(self))`. Does not touch `self.hash`.
    pub fn compute_hash(&self) -> Result<EntryHash, FormatError> {
        Ok(entry_hash(&self.encode()?))
    }
}

/// An entry that may not have been fetched yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRef {
    /// Only the hash is known.
    Reference(EntryHash),
    /// ExtIDs and content are loaded.
    Populated(Entry),
}

impl EntryRef {
    pub fn is_populated(&self) -> bool {
        matches!(self, EntryRef::Populated(_))
    }

    /// The entry hash, when known.
    pub fn hash(&self) -> Option<EntryHash> {
        match self {
            EntryRef::Reference(hash) => Some(*hash),
            EntryRef::Populated(entry) => entry.hash,
        }
    }

    pub fn entry(&self) -> Option<&Entry> {
        match self {
            EntryRef::Reference(_) => None,
            EntryRef::Populated(entry) => Some(entry),
        }
    }

    pub fn into_entry(self) -> Option<Entry> {
        match self {
            EntryRef::Reference(_) => None,
            EntryRef::Populated(entry) => Some(entry),
        }
    }
}

impl From<EntryHash> for EntryRef {
    fn from(hash: EntryHash) -> Self {
        EntryRef::Reference(hash)
    }
}

impl From<Entry> for EntryRef {
    fn from(entry: Entry) -> Self {
        EntryRef::Populated(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash_known_value() {
        let entry = Entry {
            chain_id: Some(ChainId([0x11; 32])),
            ext_ids: vec![Bytes::from_static(b"hello"), Bytes::from_static(b"world")],
            content: Bytes::from_static(b"content"),
            ..Entry::default()
        };
        assert_eq!(
            entry.compute_hash().unwrap().to_hex(),
            "368d0fb53cb8a6600b1fa3f552a65569916dc33726a0c3f8506bf1a2b2d417fe"
        );
    }

    #[test]
    fn test_empty_entry_hash() {
        let entry = Entry::new(ChainId::ZERO);
        assert_eq!(
            entry.compute_hash().unwrap().to_hex(),
            "987963a268d0dc589402a29eaacb811b5eacb57369344313188743c693d4480b"
        );
    }

    #[test]
    fn test_first_entry_resolves_chain_from_ext_ids() {
        let entry = Entry {
            ext_ids: vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")],
            ..Entry::default()
        };
        assert_eq!(
            entry.resolved_chain_id().to_hex(),
            "e5a01fee14e0ed5c48714f22180f25ad8365b53f9779f79dc4a3d7e93963f94a"
        );
        let decoded = Entry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(decoded.chain_id, Some(entry.resolved_chain_id()));
    }

    #[test]
    fn test_compute_hash_ignores_metadata_fields() {
        let mut entry = Entry::new(ChainId([0x33; 32]));
        let before = entry.compute_hash().unwrap();
        entry.hash = Some(EntryHash([0xff; 32]));
        entry.timestamp = Some(1_700_000_000);
        entry.height = 42;
        assert_eq!(entry.compute_hash().unwrap(), before);
    }

    #[test]
    fn test_entry_ref_states() {
        let hash = EntryHash([0x01; 32]);
        let reference = EntryRef::from(hash);
        assert!(!reference.is_populated());
        assert_eq!(reference.hash(), Some(hash));
        assert!(reference.entry().is_none());

        let mut entry = Entry::new(ChainId::ZERO);
        entry.hash = Some(hash);
        let populated = EntryRef::from(entry.clone());
        assert!(populated.is_populated());
        assert_eq!(populated.hash(), Some(hash));
        assert_eq!(populated.into_entry(), Some(entry));
    }
}
