//! FAT-0 transactions: the JSON content of a transfer or coinbase entry.
//!
//! ```json
//! {"inputs": {"FA...": 110}, "outputs": {"FA...": 100, "FA...": 10}, "metadata": ...}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::address::{Address, RcdHash, COINBASE};
use crate::amount::AmountMap;
use crate::entry::Entry;
use crate::error::{DecodeError, DecodeErrorKind, Field, ValidationError};
use crate::signing::sign_entry;
use crate::types::ChainId;

/// A parsed or composed transaction.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub inputs: AmountMap,
    pub outputs: AmountMap,
    /// Passed through uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Box<RawValue>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTransaction<'a> {
    #[serde(borrow)]
    inputs: Option<&'a RawValue>,
    #[serde(borrow)]
    outputs: Option<&'a RawValue>,
    /// A literal `null` is kept as metadata; only an absent field is `None`.
    #[serde(default, borrow, deserialize_with = "present")]
    metadata: Option<&'a RawValue>,
}

fn present<'de: 'a, 'a, D>(deserializer: D) -> Result<Option<&'a RawValue>, D::Error>
where
    D: Deserializer<'de>,
{
    <&'a RawValue>::deserialize(deserializer).map(Some)
}

impl Transaction {
    /// Parse entry content. Unknown or repeated top-level fields are rejected.
    pub fn parse(content: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawTransaction<'_> = serde_json::from_slice(content)
            .map_err(|e| DecodeError::json(Field::Transaction, e))?;

        let inputs = raw
            .inputs
            .ok_or(DecodeError::new(Field::Inputs, DecodeErrorKind::Missing))?;
        let inputs = AmountMap::from_json(inputs, Field::Inputs)?;

        let outputs = raw
            .outputs
            .ok_or(DecodeError::new(Field::Outputs, DecodeErrorKind::Missing))?;
        let outputs = AmountMap::from_json(outputs, Field::Outputs)?;

        Ok(Self {
            inputs,
            outputs,
            metadata: raw.metadata.map(ToOwned::to_owned),
        })
    }

    /// True iff the sole input is the coinbase address.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs.contains(&COINBASE)
    }

    /// No address both pays and is paid, and the two sides balance.
    pub fn check_amounts(&self) -> Result<(), ValidationError> {
        if let Some(rcd_hash) = self.outputs.find_overlap(&self.inputs) {
            return Err(ValidationError::DuplicateAddress(rcd_hash));
        }
        match (self.inputs.sum(), self.outputs.sum()) {
            (Some(sum_in), Some(sum_out)) if sum_in == sum_out => Ok(()),
            _ => Err(ValidationError::SumMismatch),
        }
    }

    /// Every check on the content alone: both sides non-empty with no zero
    /// amounts, [`check_amounts`](Self::check_amounts), and a coinbase input
    /// only ever on its own.
    pub fn check(&self) -> Result<(), ValidationError> {
        for (field, map) in [(Field::Inputs, &self.inputs), (Field::Outputs, &self.outputs)] {
            if map.is_empty() {
                return Err(DecodeError::new(field, DecodeErrorKind::Empty).into());
            }
            if let Some((rcd_hash, _)) = map.iter().find(|(_, amount)| **amount == 0) {
                return Err(DecodeError::new(field, DecodeErrorKind::ZeroAmount(*rcd_hash)).into());
            }
        }
        self.check_amounts()?;
        if self.inputs.contains(&COINBASE) && !self.is_coinbase() {
            return Err(ValidationError::InvalidCoinbase);
        }
        Ok(())
    }

    /// Canonical JSON: `inputs`, `outputs`, then `metadata` when present,
    /// with map keys in address-string order. Fails on content that
    /// [`check`](Self::check) rejects.
    pub fn to_content(&self) -> Result<Vec<u8>, ValidationError> {
        self.check()?;
        serde_json::to_vec(self)
            .map_err(|e| DecodeError::json(Field::Transaction, e).into())
    }

    pub fn metadata_str(&self) -> Option<&str> {
        self.metadata.as_deref().map(RawValue::get)
    }
}

/// Composes a transaction and signs it into an entry.
///
/// Every check that acceptance-side validation makes on the amounts is made
/// here first, with the same errors.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    chain_id: ChainId,
    inputs: AmountMap,
    outputs: AmountMap,
    metadata: Option<String>,
}

impl TransactionBuilder {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            inputs: AmountMap::new(),
            outputs: AmountMap::new(),
            metadata: None,
        }
    }

    /// Set the amount paid by `rcd_hash`. Zero amounts are dropped on build.
    pub fn input(mut self, rcd_hash: RcdHash, amount: u64) -> Self {
        self.inputs.insert(rcd_hash, amount);
        self
    }

    /// Set the amount paid to `rcd_hash`. Zero amounts are dropped on build.
    pub fn output(mut self, rcd_hash: RcdHash, amount: u64) -> Self {
        self.outputs.insert(rcd_hash, amount);
        self
    }

    /// Mint `amount` new tokens.
    pub fn coinbase(self, amount: u64) -> Self {
        self.input(COINBASE, amount)
    }

    /// Attach metadata as raw JSON text. Checked on build.
    pub fn metadata(mut self, json: impl Into<String>) -> Self {
        self.metadata = Some(json.into());
        self
    }

    pub fn metadata_value(self, value: &serde_json::Value) -> Self {
        self.metadata(value.to_string())
    }

    pub fn build(self) -> Result<Transaction, ValidationError> {
        self.into_parts().map(|(_, tx)| tx)
    }

    /// Build and sign with the given keys.
    ///
    /// Signers may be passed in any order; they are matched to inputs in
    /// canonical order. A coinbase transaction is signed by the first key.
    pub fn sign(self, timestamp: i64, signers: &[Address]) -> Result<Entry, ValidationError> {
        let (chain_id, tx) = self.into_parts()?;

        let ordered: Vec<&Address> = if tx.is_coinbase() {
            signers.first().into_iter().collect()
        } else {
            tx.inputs
                .canonical_keys()
                .iter()
                .map(|input| {
                    signers
                        .iter()
                        .find(|signer| signer.rcd_hash() == *input)
                        .ok_or(ValidationError::InvalidRcds)
                })
                .collect::<Result<_, _>>()?
        };
        if ordered.is_empty() {
            return Err(ValidationError::InvalidRcds);
        }

        let mut entry = Entry::new(chain_id);
        entry.content = tx.to_content()?.into();
        sign_entry(&mut entry, timestamp, &ordered)?;
        Ok(entry)
    }

    fn into_parts(mut self) -> Result<(ChainId, Transaction), ValidationError> {
        self.inputs.retain_nonzero();
        self.outputs.retain_nonzero();

        let metadata = self
            .metadata
            .map(RawValue::from_string)
            .transpose()
            .map_err(|e| DecodeError::json(Field::Metadata, e))?;

        let tx = Transaction {
            inputs: self.inputs,
            outputs: self.outputs,
            metadata,
        };
        tx.check()?;
        Ok((self.chain_id, tx))
    }
}
