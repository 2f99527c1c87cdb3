//! Factoid addresses: RCD hashes and their human-readable encodings.
//!
//! The RCD hash is the account identifier used in every amount map. It is
//! shown to people as an `FA...` string:
//!
//! `base58(0x5f 0xb1 || rcd_hash || sha256d(0x5f 0xb1 || rcd_hash)[..4])`
//!
//! Private keys use the same scheme with prefix `0x64 0x78` (`Fs...`) over
//! the 32-byte ed25519 seed.

use ed25519_dalek::{Signer, SigningKey};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::error::{AddressError, CryptoError};
use crate::hash::sha256d;
use crate::rcd::Rcd;

/// Prefix of public factoid addresses (`FA...`).
pub const FA_PREFIX: [u8; 2] = [0x5f, 0xb1];

/// Prefix of private factoid addresses (`Fs...`).
pub const FS_PREFIX: [u8; 2] = [0x64, 0x78];

const CHECKSUM_LEN: usize = 4;
const DECODED_LEN: usize = 2 + 32 + CHECKSUM_LEN;

/// The reserved coinbase address: the RCD hash of the key with an all-zero seed.
///
/// A transaction whose sole input is this address mints new tokens.
pub const COINBASE: RcdHash = RcdHash([
    0x46, 0x54, 0xa0, 0x9c, 0x37, 0x96, 0xd4, 0x09, 0x44, 0x86, 0x89, 0xfd, 0x19, 0x26, 0xcd,
    0xdf, 0x48, 0xb9, 0x8b, 0x7d, 0xcc, 0x32, 0x45, 0xf7, 0x4a, 0x02, 0x07, 0x3c, 0xbb, 0xc4,
    0x4c, 0x7b,
]);

/// The 32-byte hash of an RCD; the canonical account identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RcdHash(pub [u8; 32]);

impl RcdHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether this is the reserved coinbase address.
    pub fn is_coinbase(&self) -> bool {
        *self == COINBASE
    }

    /// The `FA...` string form.
    pub fn to_address_string(&self) -> String {
        encode_check(FA_PREFIX, &self.0)
    }

    /// Parse an `FA...` string.
    pub fn from_address_str(s: &str) -> Result<Self, AddressError> {
        decode_check(FA_PREFIX, s).map(Self)
    }
}

impl fmt::Debug for RcdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RcdHash({})", self.to_address_string())
    }
}

impl fmt::Display for RcdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address_string())
    }
}

impl FromStr for RcdHash {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address_str(s)
    }
}

impl AsRef<[u8]> for RcdHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for RcdHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for RcdHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RcdHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// An ed25519 identity: a public key and, when signing, its private key.
#[derive(Clone)]
pub struct Address {
    public_key: Ed25519PublicKey,
    signing_key: Option<SigningKey>,
}

impl Address {
    /// Generate a new random signing address.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_signing_key(SigningKey::generate(&mut rng))
    }

    /// Create a signing address from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Create a verify-only address.
    pub fn from_public_key(public_key: Ed25519PublicKey) -> Self {
        Self {
            public_key,
            signing_key: None,
        }
    }

    /// Parse an `Fs...` private address.
    pub fn from_private_str(s: &str) -> Result<Self, AddressError> {
        decode_check(FS_PREFIX, s).map(|seed| Self::from_seed(&seed))
    }

    /// The coinbase address, with its well-known private key.
    pub fn coinbase() -> Self {
        Self::from_seed(&[0u8; 32])
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        Self {
            public_key: Ed25519PublicKey(signing_key.verifying_key().to_bytes()),
            signing_key: Some(signing_key),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.public_key
    }

    /// The type 0x01 RCD embedding this public key.
    pub fn rcd(&self) -> Rcd {
        Rcd::Type1(self.public_key)
    }

    pub fn rcd_hash(&self) -> RcdHash {
        self.rcd().hash()
    }

    pub fn has_private_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Drop the private key, keeping a verify-only address.
    pub fn public_only(&self) -> Self {
        Self::from_public_key(self.public_key)
    }

    /// The `Fs...` string form, if the private key is known.
    pub fn private_string(&self) -> Option<String> {
        self.signing_key
            .as_ref()
            .map(|key| encode_check(FS_PREFIX, &key.to_bytes()))
    }

    /// Sign the exact message bytes.
    pub fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, CryptoError> {
        let key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| CryptoError::MissingPrivateKey(self.rcd_hash()))?;
        Ok(Ed25519Signature(key.sign(message).to_bytes()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Address")
            .field("rcd_hash", &self.rcd_hash())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rcd_hash(), f)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for Address {}

fn encode_check(prefix: [u8; 2], payload: &[u8; 32]) -> String {
    let mut buf = Vec::with_capacity(DECODED_LEN);
    buf.extend_from_slice(&prefix);
    buf.extend_from_slice(payload);
    let checksum = sha256d(&buf);
    buf.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(buf).into_string()
}

fn decode_check(prefix: [u8; 2], s: &str) -> Result<[u8; 32], AddressError> {
    let buf = bs58::decode(s)
        .into_vec()
        .map_err(|_| AddressError::InvalidBase58)?;
    if buf.len() != DECODED_LEN {
        return Err(AddressError::InvalidLength(buf.len()));
    }
    if buf[..2] != prefix {
        return Err(AddressError::InvalidPrefix);
    }
    let (body, checksum) = buf.split_at(DECODED_LEN - CHECKSUM_LEN);
    if sha256d(body)[..CHECKSUM_LEN] != *checksum {
        return Err(AddressError::InvalidChecksum);
    }
    let mut payload = [0u8; 32];
    payload.copy_from_slice(&body[2..]);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coinbase_constant_matches_zero_seed() {
        assert_eq!(Address::coinbase().rcd_hash(), COINBASE);
        assert!(COINBASE.is_coinbase());
        assert_eq!(
            COINBASE.to_string(),
            "FA2W44HT72C6jcottXi4W3wYGoytsxqXaiYr1XkcZEpgHg4Zmy3w"
        );
        assert_eq!(
            Address::coinbase().private_string().unwrap(),
            "Fs1KWJrpLdfucvmYwN2nWrwepLn8ercpMbzXshd1g8zyhKXLVLWj"
        );
    }

    #[test]
    fn test_known_addresses() {
        let address = Address::from_seed(&[0x42; 32]);
        assert_eq!(
            address.rcd_hash().to_hex(),
            "53fe3d959cf098d9fbe4392d3228793c67ac6bf46ec861aebddbf15db34f2b92"
        );
        assert_eq!(
            address.to_string(),
            "FA2c53nzadDDwZZyEqgsBJKf1hAfi1Tfxe5NxXuUsM2d5Ev4NEZy"
        );
        assert_eq!(
            address.private_string().unwrap(),
            "Fs1pgoSKbSahFmC9bFAoeMbDhYUjpxHN7TLN297saVP6cuXmduzw"
        );
        assert_eq!(
            RcdHash([0u8; 32]).to_string(),
            "FA1y5ZGuHSLmf2TqNf6hVMkPiNGyQpQDTFJvDLRkKQaoPo4bmbgu"
        );
    }

    #[test]
    fn test_address_string_roundtrip() {
        let address = Address::from_seed(&[0x01; 32]);
        let parsed: RcdHash = "FA3ZwpWEJYD8twT9v3ekpWjj17VMzmHcK9uj2YEio1m6YGoQNB33"
            .parse()
            .unwrap();
        assert_eq!(parsed, address.rcd_hash());

        let private = address.private_string().unwrap();
        let recovered = Address::from_private_str(&private).unwrap();
        assert_eq!(recovered, address);
        assert!(recovered.has_private_key());
    }

    #[test]
    fn test_parse_rejects_bad_strings() {
        let good = "FA2c53nzadDDwZZyEqgsBJKf1hAfi1Tfxe5NxXuUsM2d5Ev4NEZy";

        // Last character altered: checksum no longer matches.
        let bad_checksum = format!("{}z", &good[..good.len() - 1]);
        assert_eq!(
            bad_checksum.parse::<RcdHash>(),
            Err(AddressError::InvalidChecksum)
        );

        // A private address is not a public one.
        let private = Address::from_seed(&[0x42; 32]).private_string().unwrap();
        assert_eq!(
            private.parse::<RcdHash>(),
            Err(AddressError::InvalidPrefix)
        );

        assert_eq!("FA0".parse::<RcdHash>(), Err(AddressError::InvalidBase58));
        assert!(matches!(
            "FA2c53".parse::<RcdHash>(),
            Err(AddressError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_verify_only_address_cannot_sign() {
        let address = Address::from_seed(&[0x42; 32]).public_only();
        assert!(!address.has_private_key());
        assert_eq!(
            address.sign(b"msg"),
            Err(CryptoError::MissingPrivateKey(address.rcd_hash()))
        );
    }

    #[test]
    fn test_rcd_hash_serde_as_address_string() {
        let hash = Address::from_seed(&[0x42; 32]).rcd_hash();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"FA2c53nzadDDwZZyEqgsBJKf1hAfi1Tfxe5NxXuUsM2d5Ev4NEZy\"");
        let back: RcdHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
