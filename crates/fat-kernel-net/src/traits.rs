//! Node contracts: what the kernel needs from a Factom node and wallet.
//!
//! The kernel is transport-agnostic. A JSON-RPC client, a test double and
//! [`MemoryNode`](crate::MemoryNode) all plug in through these traits.
//! Retries and timeouts belong to implementations, never to callers.

use async_trait::async_trait;
use fat_kernel_core::{ChainId, Entry, EntryHash, RcdHash, TxId};

use crate::error::Result;

/// Raw entry bytes plus the block context they were committed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEntry {
    /// The binary entry, exactly as hashed.
    pub data: Vec<u8>,
    /// Block timestamp (Unix seconds), if the entry is committed.
    pub timestamp: Option<i64>,
    /// Directory block height.
    pub height: u64,
}

/// Entry retrieval.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch the entry with this hash. `None` if the node does not know it.
    async fn raw_entry(&self, hash: &EntryHash) -> Result<Option<FetchedEntry>>;

    /// Hash of a chain's first entry. `None` if the chain does not exist.
    async fn first_entry_hash(&self, chain_id: &ChainId) -> Result<Option<EntryHash>>;
}

/// Entry submission.
#[async_trait]
pub trait EntrySubmitter: Send + Sync {
    /// Commit and reveal `entry`, paid for by the entry-credit address
    /// `ec_pub`. An entry without a chain ID creates its chain.
    async fn submit(&self, entry: &Entry, ec_pub: &str) -> Result<TxId>;
}

/// Authorized-issuer lookup.
#[async_trait]
pub trait IssuerLookup: Send + Sync {
    /// The RCD hash of the identity chain's current signing key. `None` if the
    /// identity chain is absent or not yet populated.
    async fn issuer_key(&self, identity_chain_id: &ChainId) -> Result<Option<RcdHash>>;
}

/// Everything the kernel needs from one node.
pub trait Node: EntrySource + EntrySubmitter + IssuerLookup {}

impl<T: EntrySource + EntrySubmitter + IssuerLookup + ?Sized> Node for T {}
