//! Transaction validation: an ordered pipeline of checks.
//!
//! The first failing check decides the error. Callers and tests depend on
//! which error is reported, so the order below is part of the contract:
//!
//! 1. content parses as a transaction
//! 2. no address is both an input and an output
//! 3. inputs and outputs balance
//! 4. one salt plus one RCD/signature ExtID per input, salt within the window
//! 5. coinbase shape and issuer (coinbase only)
//! 6. RCDs match inputs, then signatures verify (transfers only)

use bytes::Bytes;

use crate::address::{RcdHash, COINBASE};
use crate::amount::AmountMap;
use crate::codec::signing_message;
use crate::entry::Entry;
use crate::error::ValidationError;
use crate::rcd::RcdSig;
use crate::signing::check_timestamp_salt;
use crate::transaction::Transaction;

/// Default replay window: a salt may be at most 12 hours from the entry's timestamp.
pub const DEFAULT_REPLAY_WINDOW_SECS: u64 = 12 * 60 * 60;

/// Tunables for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationParams {
    /// Maximum distance, in seconds, between the salt and `entry.timestamp`.
    pub replay_window_secs: u64,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
        }
    }
}

/// A transaction that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedTransaction {
    pub transaction: Transaction,
    pub is_coinbase: bool,
    /// `ext_ids[0]`.
    pub timestamp_salt: Bytes,
    /// RCD hashes that signed, in ExtID order.
    pub signers: Vec<RcdHash>,
}

impl ValidatedTransaction {
    pub fn inputs(&self) -> &AmountMap {
        &self.transaction.inputs
    }

    pub fn outputs(&self) -> &AmountMap {
        &self.transaction.outputs
    }

    pub fn metadata(&self) -> Option<&str> {
        self.transaction.metadata_str()
    }
}

/// Validate a transaction entry with default parameters.
///
/// `issuer` is the RCD hash authorized to sign coinbase transactions on this
/// chain, or `None` when it is not known.
pub fn validate_transaction(
    entry: &Entry,
    issuer: Option<&RcdHash>,
) -> Result<ValidatedTransaction, ValidationError> {
    validate_transaction_with(entry, issuer, &ValidationParams::default())
}

/// Validate a transaction entry.
pub fn validate_transaction_with(
    entry: &Entry,
    issuer: Option<&RcdHash>,
    params: &ValidationParams,
) -> Result<ValidatedTransaction, ValidationError> {
    // 1. Parse content
    let transaction = Transaction::parse(&entry.content)?;

    // 2-3. Overlap and conservation
    transaction.check_amounts()?;

    // 4. ExtIDs shape and salt
    let expected = 1 + transaction.inputs.len();
    if entry.ext_ids.len() != expected {
        return Err(ValidationError::InvalidExtIdCount {
            expected,
            got: entry.ext_ids.len(),
        });
    }
    check_timestamp_salt(entry, params)?;

    let message = signing_message(entry)?;

    let signers = if transaction.inputs.contains(&COINBASE) {
        // 5. Coinbase
        if transaction.inputs.len() != 1 {
            return Err(ValidationError::InvalidCoinbase);
        }
        if transaction.outputs.contains(&COINBASE) {
            return Err(ValidationError::DuplicateAddress(COINBASE));
        }
        vec![verify_issuer_signature(entry, 1, issuer, &message)?]
    } else {
        // 6. Transfer
        verify_input_signatures(entry, &transaction.inputs, &message)?
    };

    Ok(ValidatedTransaction {
        is_coinbase: transaction.is_coinbase(),
        transaction,
        timestamp_salt: entry.ext_ids[0].clone(),
        signers,
    })
}

/// Check that `ext_ids[index]` is signed by `issuer`.
pub(crate) fn verify_issuer_signature(
    entry: &Entry,
    index: usize,
    issuer: Option<&RcdHash>,
    message: &[u8],
) -> Result<RcdHash, ValidationError> {
    let issuer = issuer.ok_or(ValidationError::IssuerUnknown)?;
    let pair = entry
        .ext_ids
        .get(index)
        .and_then(|ext_id| RcdSig::from_ext_id(ext_id))
        .ok_or(ValidationError::InvalidRcds)?;
    let got = pair.rcd.hash();
    if got != *issuer {
        return Err(ValidationError::InvalidIssuerRcd {
            expected: *issuer,
            got,
        });
    }
    pair.verify(message)
        .map_err(|source| ValidationError::InvalidSignature {
            ext_id: index,
            source,
        })?;
    Ok(got)
}

fn verify_input_signatures(
    entry: &Entry,
    inputs: &AmountMap,
    message: &[u8],
) -> Result<Vec<RcdHash>, ValidationError> {
    let inputs = inputs.canonical_keys();

    // Every pair must name its input before any signature is checked.
    let mut pairs = Vec::with_capacity(inputs.len());
    for (input, ext_id) in inputs.iter().zip(&entry.ext_ids[1..]) {
        let pair = RcdSig::from_ext_id(ext_id).ok_or(ValidationError::InvalidRcds)?;
        if pair.rcd.hash() != *input {
            return Err(ValidationError::InvalidRcds);
        }
        pairs.push(pair);
    }

    for (i, pair) in pairs.iter().enumerate() {
        pair.verify(message)
            .map_err(|source| ValidationError::InvalidSignature {
                ext_id: i + 1,
                source,
            })?;
    }
    Ok(inputs)
}
