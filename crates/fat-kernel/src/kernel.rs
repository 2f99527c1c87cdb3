//! The Kernel: one handle over a node for reading and writing token chains.
//!
//! Reads go through [`EntrySource`] and [`IssuerLookup`], writes through
//! [`EntrySubmitter`]. Every entry the kernel composes is run through the
//! same validation a receiving node would apply before it is submitted.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tracing::{debug, info, warn};

use fat_kernel_core::{
    chain_creation_entry, entry_hash, token_chain_id, validate_issuance_with,
    validate_transaction_with, Address, ChainId, Entry, EntryHash, EntryRef, Issuance,
    IssuanceBuilder, RcdHash, TokenNameIds, TransactionBuilder, TxId, ValidatedTransaction,
    ValidationError, ValidationParams,
};
use fat_kernel_net::Node;

use crate::error::{KernelError, Result};

/// Configuration for the Kernel.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Validate every composed entry before handing it to the node.
    pub validate_before_submit: bool,
    /// Reject fetched entries whose bytes do not hash to the requested hash.
    pub verify_entry_hashes: bool,
    /// Parameters for transaction and issuance validation.
    pub validation: ValidationParams,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            validate_before_submit: true,
            verify_entry_hashes: true,
            validation: ValidationParams::default(),
        }
    }
}

/// A token chain resolved against its issuer's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChain {
    pub chain_id: ChainId,
    pub token_id: Bytes,
    pub identity_chain_id: ChainId,
    /// Hash of the chain's first entry, the one that named it.
    pub first_entry_hash: EntryHash,
    /// Key authorized to sign issuance and coinbase entries, if the identity
    /// chain has one.
    pub issuer_key: Option<RcdHash>,
}

impl TokenChain {
    /// The token ID as text, if it is valid UTF-8.
    pub fn token_id_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.token_id).ok()
    }
}

/// The outcome of handing an entry to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub tx_id: TxId,
    pub entry_hash: EntryHash,
    pub chain_id: ChainId,
}

/// The main Kernel struct.
///
/// Provides a unified API for:
/// - Fetching and populating entries
/// - Resolving token chains and their issuers
/// - Validating transactions and issuances
/// - Composing, signing and submitting new entries
pub struct Kernel<N: Node> {
    node: Arc<N>,
    config: KernelConfig,
}

impl<N: Node> Kernel<N> {
    /// Create a new kernel over `node`.
    pub fn new(node: N, config: KernelConfig) -> Self {
        Self::with_shared(Arc::new(node), config)
    }

    /// Create a kernel over a node shared with other owners.
    pub fn with_shared(node: Arc<N>, config: KernelConfig) -> Self {
        Self { node, config }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch and decode the entry with `hash`.
    ///
    /// The returned entry carries its hash, block timestamp and height.
    pub async fn get_entry(&self, hash: &EntryHash) -> Result<Entry> {
        let fetched = self
            .node
            .raw_entry(hash)
            .await?
            .ok_or(KernelError::EntryNotFound(*hash))?;

        if self.config.verify_entry_hashes {
            let got = entry_hash(&fetched.data);
            if got != *hash {
                warn!(entry_hash = %hash, got = %got, "fetched entry hash mismatch");
                return Err(KernelError::HashMismatch {
                    expected: *hash,
                    got,
                });
            }
        }

        let mut entry = Entry::decode(&fetched.data)?;
        entry.hash = Some(*hash);
        entry.timestamp = fetched.timestamp;
        entry.height = fetched.height;
        debug!(entry_hash = %hash, chain_id = %entry.resolved_chain_id(), "fetched entry");
        Ok(entry)
    }

    /// Return a populated entry, fetching it if only its hash is known.
    pub async fn populate(&self, entry: EntryRef) -> Result<Entry> {
        match entry {
            EntryRef::Populated(entry) => Ok(entry),
            EntryRef::Reference(hash) => self.get_entry(&hash).await,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Token Chains
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve a token chain: read its name from the first entry and look up
    /// the issuer's current key.
    pub async fn load_token_chain(&self, chain_id: &ChainId) -> Result<TokenChain> {
        let first_entry_hash = self
            .node
            .first_entry_hash(chain_id)
            .await?
            .ok_or(KernelError::ChainNotFound(*chain_id))?;
        let first = self.get_entry(&first_entry_hash).await?;

        let names = TokenNameIds::from_name_ids(&first.ext_ids)
            .ok_or(KernelError::NotTokenChain(*chain_id))?;
        let issuer_key = self.node.issuer_key(&names.identity_chain_id).await?;
        debug!(
            chain_id = %chain_id,
            identity_chain_id = %names.identity_chain_id,
            has_issuer_key = issuer_key.is_some(),
            "loaded token chain"
        );

        Ok(TokenChain {
            chain_id: *chain_id,
            token_id: names.token_id,
            identity_chain_id: names.identity_chain_id,
            first_entry_hash,
            issuer_key,
        })
    }

    /// Load the token chain for `token_id` issued by `identity_chain_id`.
    pub async fn load_token(
        &self,
        token_id: &str,
        identity_chain_id: &ChainId,
    ) -> Result<TokenChain> {
        self.load_token_chain(&token_chain_id(token_id, identity_chain_id))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate a transaction entry against the chain's issuer.
    pub fn validate_transaction(
        &self,
        entry: &Entry,
        chain: &TokenChain,
    ) -> Result<ValidatedTransaction> {
        validate_transaction_with(entry, chain.issuer_key.as_ref(), &self.config.validation)
            .map_err(|e| {
                warn!(chain_id = %chain.chain_id, error = %e, "rejected transaction");
                KernelError::from(e)
            })
    }

    /// Validate an issuance entry against the chain's issuer.
    pub fn validate_issuance(&self, entry: &Entry, chain: &TokenChain) -> Result<Issuance> {
        validate_issuance_with(entry, chain.issuer_key.as_ref(), &self.config.validation)
            .map_err(|e| {
                warn!(chain_id = %chain.chain_id, error = %e, "rejected issuance");
                KernelError::from(e)
            })
    }

    /// Populate an entry, then validate it as a transaction.
    pub async fn validate_entry(
        &self,
        entry: impl Into<EntryRef>,
        chain: &TokenChain,
    ) -> Result<ValidatedTransaction> {
        let entry = self.populate(entry.into()).await?;
        self.validate_transaction(&entry, chain)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Composition
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a token chain for `token_id` under an identity.
    pub async fn create_token_chain(
        &self,
        token_id: &str,
        identity_chain_id: &ChainId,
        ec_pub: &str,
    ) -> Result<Submission> {
        let entry = chain_creation_entry(token_id, identity_chain_id);
        let chain_id = entry.resolved_chain_id();
        if self.node.first_entry_hash(&chain_id).await?.is_some() {
            return Err(KernelError::ChainExists(chain_id));
        }
        self.submit(&entry, ec_pub).await
    }

    /// Sign and submit the token's issuance.
    pub async fn issue(
        &self,
        chain: &TokenChain,
        builder: IssuanceBuilder,
        issuer: &Address,
        ec_pub: &str,
    ) -> Result<Submission> {
        check_issuer(chain, issuer)?;
        let entry = builder.sign(now_secs(), issuer)?;
        if self.config.validate_before_submit {
            self.validate_issuance(&entry, chain)?;
        }
        self.submit(&entry, ec_pub).await
    }

    /// Sign and submit a transaction.
    ///
    /// A coinbase transaction must be signed by the issuer; the first signer
    /// is checked against the identity's key before anything is signed.
    pub async fn transact(
        &self,
        chain: &TokenChain,
        builder: TransactionBuilder,
        signers: &[Address],
        ec_pub: &str,
    ) -> Result<Submission> {
        if builder.clone().build()?.is_coinbase() {
            let issuer = signers.first().ok_or(ValidationError::InvalidRcds)?;
            check_issuer(chain, issuer)?;
        }

        let entry = builder.sign(now_secs(), signers)?;
        if self.config.validate_before_submit {
            self.validate_transaction(&entry, chain)?;
        }
        self.submit(&entry, ec_pub).await
    }

    async fn submit(&self, entry: &Entry, ec_pub: &str) -> Result<Submission> {
        let entry_hash = entry.compute_hash()?;
        let chain_id = entry.resolved_chain_id();
        let tx_id = self.node.submit(entry, ec_pub).await?;
        info!(chain_id = %chain_id, entry_hash = %entry_hash, tx_id = %tx_id, "submitted entry");
        Ok(Submission {
            tx_id,
            entry_hash,
            chain_id,
        })
    }
}

fn check_issuer(chain: &TokenChain, signer: &Address) -> Result<()> {
    let expected = chain.issuer_key.ok_or(ValidationError::IssuerUnknown)?;
    let got = signer.rcd_hash();
    if got != expected {
        return Err(ValidationError::InvalidIssuerRcd { expected, got }.into());
    }
    Ok(())
}

/// Current Unix time in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
