//! # FAT Kernel Core
//!
//! Pure primitives for Factom Asset Tokens: entries, RCDs, transactions and
//! issuance.
//!
//! This crate contains no I/O, no storage, no networking. Every operation is
//! a deterministic function of its inputs, safe to call from any thread.
//!
//! ## Key Types
//!
//! - [`Entry`] - The envelope all chain data rides in
//! - [`EntryRef`] - An entry that may only be known by hash
//! - [`Address`] / [`RcdHash`] - ed25519 identities and the account IDs derived from them
//! - [`AmountMap`] - Strictly positive amounts keyed by account
//! - [`Transaction`] - Inputs, outputs and metadata of a transfer or coinbase
//! - [`Issuance`] - A token declaration
//!
//! ## Validation
//!
//! [`validate_transaction`] and [`validate_issuance`] run an ordered list of
//! checks and report the first that fails. [`TransactionBuilder`] and
//! [`IssuanceBuilder`] make the same checks before signing.

pub mod address;
pub mod amount;
pub mod codec;
pub mod crypto;
pub mod entry;
pub mod error;
pub mod hash;
pub mod issuance;
pub mod rcd;
pub mod signing;
pub mod transaction;
pub mod types;
pub mod validation;

pub use address::{Address, RcdHash, COINBASE};
pub use amount::AmountMap;
pub use codec::{decode_entry, encode_entry, signing_message};
pub use crypto::{Ed25519PublicKey, Ed25519Signature};
pub use entry::{Entry, EntryRef};
pub use error::{
    AddressError, CryptoError, DecodeError, DecodeErrorKind, Field, FormatError, ValidationError,
};
pub use hash::{chain_id, entry_hash};
pub use issuance::{
    chain_creation_entry, token_chain_id, valid_token_name_ids, validate_issuance,
    validate_issuance_with, Issuance, IssuanceBuilder, TokenNameIds,
};
pub use rcd::{rcd_hash, Rcd, RcdSig};
pub use signing::{sign_entry, timestamp_salt};
pub use transaction::{Transaction, TransactionBuilder};
pub use types::{ChainId, EntryHash, TxId};
pub use validation::{
    validate_transaction, validate_transaction_with, ValidatedTransaction, ValidationParams,
};
