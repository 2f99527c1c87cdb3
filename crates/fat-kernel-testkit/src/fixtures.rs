//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Every key is derived from a fixed
//! seed, so fixtures produce the same addresses on every run.

use fat_kernel_core::{
    chain_creation_entry, token_chain_id, Address, ChainId, Entry, IssuanceBuilder, RcdHash,
    TransactionBuilder, ValidationError,
};
use fat_kernel_net::{MemoryNode, Result as NetResult};

/// Fixed "current time" for signed fixtures (2023-11-14T22:13:20Z).
pub const NOW: i64 = 1_700_000_000;

/// An entry-credit address to pay for submissions with.
pub const EC_ADDRESS: &str = "EC2DKSYyRcNWf7RS963VFYgMExoHRYLHVeCfQ9PGPmNzwrcmgm2r";

/// The identity chain used by the default fixture.
pub const IDENTITY_CHAIN_ID: ChainId = ChainId([
    0x88, 0x88, 0x88, 0x07, 0xe4, 0xf3, 0xbb, 0xb9, 0xa2, 0xb2, 0x29, 0x64, 0x5a, 0xb6, 0xd2,
    0xf1, 0x84, 0x22, 0x41, 0x90, 0xf8, 0x3e, 0x78, 0x76, 0x16, 0x74, 0xc2, 0x36, 0x2a, 0xca,
    0x44, 0x25,
]);

/// Deterministic address whose seed is 32 copies of `seed`.
///
/// Seed 0 is the coinbase key.
pub fn address(seed: u8) -> Address {
    Address::from_seed(&[seed; 32])
}

/// `n` distinct deterministic addresses, seeds 1..=n.
pub fn multi_party_fixtures(n: u8) -> Vec<Address> {
    (1..=n).map(address).collect()
}

/// A token chain with a known issuer.
#[derive(Debug, Clone)]
pub struct TestFixture {
    pub token_id: String,
    pub identity_chain_id: ChainId,
    pub chain_id: ChainId,
    pub issuer: Address,
}

impl TestFixture {
    /// Token "test" under [`IDENTITY_CHAIN_ID`], issued by seed 0x99.
    pub fn new() -> Self {
        Self::with_token("test", IDENTITY_CHAIN_ID, address(0x99))
    }

    pub fn with_token(token_id: &str, identity_chain_id: ChainId, issuer: Address) -> Self {
        Self {
            token_id: token_id.to_string(),
            identity_chain_id,
            chain_id: token_chain_id(token_id, &identity_chain_id),
            issuer,
        }
    }

    pub fn issuer_rcd_hash(&self) -> RcdHash {
        self.issuer.rcd_hash()
    }

    /// The entry that creates the token chain.
    pub fn creation_entry(&self) -> Entry {
        chain_creation_entry(&self.token_id, &self.identity_chain_id)
    }

    /// A signed issuance entry, stamped at [`NOW`].
    pub fn issuance_entry(&self, supply: i64) -> Result<Entry, ValidationError> {
        IssuanceBuilder::new(self.chain_id, supply)
            .symbol("TEST")
            .name("Test Token")
            .sign(NOW, &self.issuer)
    }

    /// A coinbase entry minting `amount` to `to`, signed by the issuer.
    pub fn coinbase_entry(&self, to: &RcdHash, amount: u64) -> Result<Entry, ValidationError> {
        TransactionBuilder::new(self.chain_id)
            .coinbase(amount)
            .output(*to, amount)
            .sign(NOW, std::slice::from_ref(&self.issuer))
    }

    /// A transfer of `amount` from `from` to `to`, signed by `from`.
    pub fn transfer_entry(
        &self,
        from: &Address,
        to: &RcdHash,
        amount: u64,
    ) -> Result<Entry, ValidationError> {
        TransactionBuilder::new(self.chain_id)
            .input(from.rcd_hash(), amount)
            .output(*to, amount)
            .sign(NOW, std::slice::from_ref(from))
    }

    /// Register the issuer's key and create the token chain on `node`.
    pub async fn install(&self, node: &MemoryNode) -> NetResult<()> {
        node.set_identity_key(self.identity_chain_id, self.issuer_rcd_hash())
            .await;
        node.insert_entry(&self.creation_entry()).await?;
        Ok(())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fat_kernel_core::{validate_issuance, validate_transaction};
    use fat_kernel_net::EntrySource;

    #[test]
    fn test_identity_chain_id_hex() {
        assert_eq!(
            IDENTITY_CHAIN_ID.to_hex(),
            "88888807e4f3bbb9a2b229645ab6d2f184224190f83e78761674c2362aca4425"
        );
    }

    #[test]
    fn test_addresses_are_deterministic_and_distinct() {
        let parties = multi_party_fixtures(3);
        assert_eq!(parties[0], address(1));
        assert_ne!(parties[0].rcd_hash(), parties[1].rcd_hash());
        assert!(address(0).rcd_hash().is_coinbase());
    }

    #[test]
    fn test_fixture_entries_validate() {
        let fixture = TestFixture::new();
        let issuer = fixture.issuer_rcd_hash();
        let alice = address(1);
        let bob = address(2);

        let coinbase = fixture.coinbase_entry(&alice.rcd_hash(), 100).unwrap();
        assert!(validate_transaction(&coinbase, Some(&issuer)).unwrap().is_coinbase);

        let transfer = fixture.transfer_entry(&alice, &bob.rcd_hash(), 40).unwrap();
        let valid = validate_transaction(&transfer, None).unwrap();
        assert_eq!(valid.signers, vec![alice.rcd_hash()]);

        let issuance = fixture.issuance_entry(1_000).unwrap();
        assert_eq!(validate_issuance(&issuance, Some(&issuer)).unwrap().supply, 1_000);
    }

    #[tokio::test]
    async fn test_install_creates_chain() {
        let fixture = TestFixture::new();
        let node = MemoryNode::new();
        fixture.install(&node).await.unwrap();
        assert!(node
            .first_entry_hash(&fixture.chain_id)
            .await
            .unwrap()
            .is_some());
    }
}
