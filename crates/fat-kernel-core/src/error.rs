//! Error types for the FAT kernel core.
//!
//! Building a transaction and accepting one share this vocabulary, so both
//! directions of the protocol are tested against one rule set.

use std::fmt;

use thiserror::Error;

use crate::address::RcdHash;

/// Malformed binary Entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("insufficient length: {0} bytes")]
    InsufficientLength(usize),

    #[error("invalid version byte: {0:#04x}")]
    InvalidVersion(u8),

    #[error("invalid ExtIDs length")]
    InvalidExtIdsLength,

    #[error("error parsing ExtIDs")]
    MalformedExtIds,

    #[error("ExtID too long: {0} bytes")]
    ExtIdTooLong(usize),

    #[error("ExtIDs too long: {0} bytes")]
    ExtIdsTooLong(usize),
}

/// The JSON field a [`DecodeError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Transaction,
    Inputs,
    Outputs,
    Metadata,
    Issuance,
    Type,
    Supply,
    Symbol,
    Name,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Transaction => "transaction",
            Field::Inputs => "inputs",
            Field::Outputs => "outputs",
            Field::Metadata => "metadata",
            Field::Issuance => "issuance",
            Field::Type => "type",
            Field::Supply => "supply",
            Field::Symbol => "symbol",
            Field::Name => "name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong while decoding a JSON field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("{0}")]
    Json(String),

    #[error("missing")]
    Missing,

    #[error("empty")]
    Empty,

    #[error("{0}: invalid amount (0)")]
    ZeroAmount(RcdHash),

    #[error("duplicate address: {0}")]
    DuplicateAddress(RcdHash),

    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Malformed or semantically invalid transaction/issuance JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind}")]
pub struct DecodeError {
    pub field: Field,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(field: Field, kind: DecodeErrorKind) -> Self {
        Self { field, kind }
    }

    pub(crate) fn json(field: Field, err: serde_json::Error) -> Self {
        Self::new(field, DecodeErrorKind::Json(err.to_string()))
    }
}

/// Errors parsing human-readable `FA`/`Fs` address strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid base58")]
    InvalidBase58,

    #[error("invalid length: {0} bytes")]
    InvalidLength(usize),

    #[error("invalid prefix")]
    InvalidPrefix,

    #[error("invalid checksum")]
    InvalidChecksum,
}

/// Signature and RCD failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("unsupported RCD type: {0:#04x}")]
    UnsupportedRcdType(u8),

    #[error("missing private key for {0}")]
    MissingPrivateKey(RcdHash),
}

/// A named rule violation. Exactly one is reported per call: the first
/// failing check in validation order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("duplicate address: {0}")]
    DuplicateAddress(RcdHash),

    #[error("sum(inputs) != sum(outputs)")]
    SumMismatch,

    #[error("invalid number of ExtIDs: expected {expected}, got {got}")]
    InvalidExtIdCount { expected: usize, got: usize },

    #[error("timestamp salt expired")]
    TimestampSaltExpired,

    #[error("invalid coinbase transaction")]
    InvalidCoinbase,

    #[error("issuer unknown")]
    IssuerUnknown,

    #[error("invalid RCD: expected issuer {expected}, got {got}")]
    InvalidIssuerRcd { expected: RcdHash, got: RcdHash },

    #[error("invalid RCDs")]
    InvalidRcds,

    #[error("invalid signature at ExtID {ext_id}")]
    InvalidSignature {
        ext_id: usize,
        #[source]
        source: CryptoError,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
