//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use fat_kernel_core::{Address, ChainId, Entry, RcdHash, TransactionBuilder, ValidationError};

use crate::fixtures::address;

/// Generate a random signing address.
pub fn signer() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(|seed| Address::from_seed(&seed))
}

/// Generate a random RcdHash. Almost never the coinbase.
pub fn rcd_hash() -> impl Strategy<Value = RcdHash> {
    any::<[u8; 32]>().prop_map(RcdHash)
}

/// Generate a random ChainId.
pub fn chain_id() -> impl Strategy<Value = ChainId> {
    any::<[u8; 32]>().prop_map(ChainId)
}

/// Generate a list of ExtIDs, each up to `max_len` bytes.
pub fn ext_ids(max_len: usize) -> impl Strategy<Value = Vec<Bytes>> {
    prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Bytes::from),
        0..8,
    )
}

/// Generate content bytes of at most `max_len`.
pub fn content(max_len: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Bytes::from)
}

/// Generate an entry on an explicit chain, small enough to always encode.
pub fn entry() -> impl Strategy<Value = Entry> {
    (chain_id(), ext_ids(64), content(512)).prop_map(|(chain_id, ext_ids, content)| Entry {
        chain_id: Some(chain_id),
        ext_ids,
        content,
        ..Entry::default()
    })
}

/// Parameters for a balanced transfer between fixture addresses.
///
/// Input seeds are drawn from 1..=127 and output seeds from 128..=255, so no
/// address is on both sides and none is the coinbase.
#[derive(Debug, Clone)]
pub struct TransferParams {
    pub chain_id: ChainId,
    /// `(seed, amount)` per input, seeds distinct.
    pub inputs: Vec<(u8, u64)>,
    /// Output seeds, distinct.
    pub outputs: Vec<u8>,
    pub timestamp: i64,
}

impl TransferParams {
    pub fn signers(&self) -> Vec<Address> {
        self.inputs.iter().map(|(seed, _)| address(*seed)).collect()
    }

    /// Input total spread over the outputs, remainder to the first.
    pub fn output_amounts(&self) -> Vec<u64> {
        let total: u64 = self.inputs.iter().map(|(_, amount)| amount).sum();
        let count = self.outputs.len() as u64;
        let share = total / count;
        let mut amounts = vec![share; self.outputs.len()];
        amounts[0] += total - share * count;
        amounts
    }

    pub fn builder(&self) -> TransactionBuilder {
        let mut builder = TransactionBuilder::new(self.chain_id);
        for (seed, amount) in &self.inputs {
            builder = builder.input(address(*seed).rcd_hash(), *amount);
        }
        for (seed, amount) in self.outputs.iter().zip(self.output_amounts()) {
            builder = builder.output(address(*seed).rcd_hash(), amount);
        }
        builder
    }
}

impl Arbitrary for TransferParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            chain_id(),
            prop::collection::btree_map(1u8..=127, 3u64..=1_000_000, 1..4),
            prop::collection::btree_set(128u8..=255, 1..4),
            1_600_000_000i64..1_800_000_000,
        )
            .prop_map(|(chain_id, inputs, outputs, timestamp)| Self {
                chain_id,
                inputs: inputs.into_iter().collect(),
                outputs: outputs.into_iter().collect(),
                timestamp,
            })
            .boxed()
    }
}

/// Sign the transfer described by `params`.
pub fn transfer_from_params(params: &TransferParams) -> Result<Entry, ValidationError> {
    params
        .builder()
        .sign(params.timestamp, &params.signers())
}
