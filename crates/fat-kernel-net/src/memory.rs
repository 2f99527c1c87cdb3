//! In-memory implementation of the node contracts.
//!
//! This is primarily for testing and offline composition. Submitted entries
//! become fetchable immediately; there are no blocks, fees or confirmations.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use fat_kernel_core::hash::sha256;
use fat_kernel_core::{entry_hash, ChainId, Entry, EntryHash, RcdHash, TxId};

use crate::error::{NetError, Result};
use crate::traits::{EntrySource, EntrySubmitter, FetchedEntry, IssuerLookup};

/// A submission accepted by a [`MemoryNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub tx_id: TxId,
    pub entry_hash: EntryHash,
    pub chain_id: ChainId,
    pub ec_pub: String,
}

/// In-memory node.
///
/// All data is lost when the node is dropped. Thread-safe via RwLock.
pub struct MemoryNode {
    inner: RwLock<MemoryNodeInner>,
}

#[derive(Default)]
struct MemoryNodeInner {
    /// Entries indexed by hash.
    entries: HashMap<EntryHash, FetchedEntry>,

    /// Entry hashes per chain, in commit order.
    chains: HashMap<ChainId, Vec<EntryHash>>,

    /// Current signing key per identity chain.
    identities: HashMap<ChainId, RcdHash>,

    /// Accepted submissions, in order.
    submissions: Vec<Submitted>,

    /// Height assigned to the next entry.
    height: u64,

    /// Timestamp assigned to entries submitted without one.
    clock: Option<i64>,
}

impl MemoryNode {
    /// Create a new empty node.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryNodeInner::default()),
        }
    }

    /// Stamp entries that arrive without a timestamp with `timestamp`.
    pub async fn set_clock(&self, timestamp: i64) {
        self.inner.write().await.clock = Some(timestamp);
    }

    /// Record `rcd_hash` as the current key of an identity chain.
    pub async fn set_identity_key(&self, identity_chain_id: ChainId, rcd_hash: RcdHash) {
        let mut inner = self.inner.write().await;
        inner.identities.insert(identity_chain_id, rcd_hash);
    }

    /// Commit an entry without a submission record. Creates its chain if needed.
    pub async fn insert_entry(&self, entry: &Entry) -> Result<EntryHash> {
        let mut inner = self.inner.write().await;
        inner.commit(entry).map(|(hash, _)| hash)
    }

    /// Overwrite the stored bytes of an entry, leaving its hash index alone.
    pub async fn corrupt_entry(&self, hash: &EntryHash, data: Vec<u8>) -> Result<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .entries
            .get_mut(hash)
            .ok_or(NetError::EntryNotFound(*hash))?;
        stored.data = data;
        Ok(())
    }

    /// Entry hashes of a chain, in commit order.
    pub async fn chain_entries(&self, chain_id: &ChainId) -> Vec<EntryHash> {
        let inner = self.inner.read().await;
        inner.chains.get(chain_id).cloned().unwrap_or_default()
    }

    /// Every accepted submission, oldest first.
    pub async fn submissions(&self) -> Vec<Submitted> {
        self.inner.read().await.submissions.clone()
    }
}

impl Default for MemoryNode {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNodeInner {
    fn commit(&mut self, entry: &Entry) -> Result<(EntryHash, ChainId)> {
        let chain_id = entry.resolved_chain_id();
        let exists = self.chains.contains_key(&chain_id);
        match (entry.chain_id, exists) {
            (None, true) => return Err(NetError::ChainExists(chain_id)),
            (Some(_), false) => return Err(NetError::ChainNotFound(chain_id)),
            _ => {}
        }

        let data = entry.encode()?;
        let hash = entry_hash(&data);
        let fetched = FetchedEntry {
            data,
            timestamp: entry.timestamp.or(self.clock),
            height: self.height,
        };
        self.height += 1;
        self.entries.insert(hash, fetched);
        self.chains.entry(chain_id).or_default().push(hash);

        debug!(chain_id = %chain_id, entry_hash = %hash, "committed entry");
        Ok((hash, chain_id))
    }
}

#[async_trait]
impl EntrySource for MemoryNode {
    async fn raw_entry(&self, hash: &EntryHash) -> Result<Option<FetchedEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.entries.get(hash).cloned())
    }

    async fn first_entry_hash(&self, chain_id: &ChainId) -> Result<Option<EntryHash>> {
        let inner = self.inner.read().await;
        Ok(inner
            .chains
            .get(chain_id)
            .and_then(|hashes| hashes.first().copied()))
    }
}

#[async_trait]
impl EntrySubmitter for MemoryNode {
    async fn submit(&self, entry: &Entry, ec_pub: &str) -> Result<TxId> {
        if ec_pub.is_empty() {
            return Err(NetError::Rejected("missing entry credit address".into()));
        }

        let mut inner = self.inner.write().await;
        let (entry_hash, chain_id) = inner.commit(entry)?;

        let mut preimage = entry_hash.as_bytes().to_vec();
        preimage.extend_from_slice(ec_pub.as_bytes());
        let tx_id = TxId(sha256(&preimage));

        inner.submissions.push(Submitted {
            tx_id,
            entry_hash,
            chain_id,
            ec_pub: ec_pub.to_string(),
        });
        Ok(tx_id)
    }
}

#[async_trait]
impl IssuerLookup for MemoryNode {
    async fn issuer_key(&self, identity_chain_id: &ChainId) -> Result<Option<RcdHash>> {
        let inner = self.inner.read().await;
        Ok(inner.identities.get(identity_chain_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use fat_kernel_core::{chain_creation_entry, Address};

    const EC: &str = "EC2DKSYyRcNWf7RS963VFYgMExoHRYLHVeCfQ9PGPmNzwrcmgm2r";

    fn make_first_entry() -> Entry {
        chain_creation_entry("test", &ChainId([0x88; 32]))
    }

    #[tokio::test]
    async fn test_submit_then_fetch() {
        let node = MemoryNode::new();
        let first = make_first_entry();
        let chain_id = first.resolved_chain_id();

        let tx_id = node.submit(&first, EC).await.unwrap();
        let submissions = node.submissions().await;
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].tx_id, tx_id);
        assert_eq!(submissions[0].chain_id, chain_id);

        let hash = node.first_entry_hash(&chain_id).await.unwrap().unwrap();
        assert_eq!(hash, submissions[0].entry_hash);

        let fetched = node.raw_entry(&hash).await.unwrap().unwrap();
        assert_eq!(entry_hash(&fetched.data), hash);
        let decoded = Entry::decode(&fetched.data).unwrap();
        assert_eq!(decoded.ext_ids, first.ext_ids);
    }

    #[tokio::test]
    async fn test_entry_on_missing_chain() {
        let node = MemoryNode::new();
        let entry = Entry::new(ChainId([0x01; 32]));
        assert!(matches!(
            node.submit(&entry, EC).await,
            Err(NetError::ChainNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_chain_created_once() {
        let node = MemoryNode::new();
        node.insert_entry(&make_first_entry()).await.unwrap();
        assert!(matches!(
            node.insert_entry(&make_first_entry()).await,
            Err(NetError::ChainExists(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_requires_payment() {
        let node = MemoryNode::new();
        assert!(matches!(
            node.submit(&make_first_entry(), "").await,
            Err(NetError::Rejected(_))
        ));
        assert!(node.submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_chain_entries_and_clock() {
        let node = MemoryNode::new();
        node.set_clock(1_700_000_000).await;
        let first = make_first_entry();
        let chain_id = first.resolved_chain_id();
        let h0 = node.insert_entry(&first).await.unwrap();

        let mut next = Entry::new(chain_id);
        next.content = Bytes::from_static(b"next");
        next.timestamp = Some(42);
        let h1 = node.insert_entry(&next).await.unwrap();

        assert_eq!(node.chain_entries(&chain_id).await, vec![h0, h1]);
        let f0 = node.raw_entry(&h0).await.unwrap().unwrap();
        let f1 = node.raw_entry(&h1).await.unwrap().unwrap();
        assert_eq!(f0.timestamp, Some(1_700_000_000));
        assert_eq!(f1.timestamp, Some(42));
        assert_eq!((f0.height, f1.height), (0, 1));
    }

    #[tokio::test]
    async fn test_issuer_lookup() {
        let node = MemoryNode::new();
        let identity = ChainId([0x88; 32]);
        assert_eq!(node.issuer_key(&identity).await.unwrap(), None);

        let key = Address::from_seed(&[7; 32]).rcd_hash();
        node.set_identity_key(identity, key).await;
        assert_eq!(node.issuer_key(&identity).await.unwrap(), Some(key));
    }

    #[tokio::test]
    async fn test_unknown_entry() {
        let node = MemoryNode::new();
        assert_eq!(node.raw_entry(&EntryHash::ZERO).await.unwrap(), None);
        assert!(matches!(
            node.corrupt_entry(&EntryHash::ZERO, vec![]).await,
            Err(NetError::EntryNotFound(_))
        ));
    }
}
