//! Redeem Condition Datastructures.
//!
//! An RCD is a typed encoding of what authorizes spending from an address.
//! Only type 0x01 (a single ed25519 key) is defined; every other type byte
//! is carried as [`Rcd::Unsupported`] and fails verification closed.

use bytes::Bytes;

use crate::address::RcdHash;
use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::error::CryptoError;
use crate::hash::sha256;

/// Type byte of a single-key ed25519 RCD.
pub const RCD_TYPE_1: u8 = 0x01;

/// Encoded length of a type 0x01 RCD.
pub const RCD_TYPE_1_LEN: usize = 1 + 32;

/// Length of the detached signature that follows an RCD in its ExtID.
pub const SIGNATURE_LEN: usize = 64;

/// `sha256(rcd_bytes)`.
pub fn rcd_hash(rcd_bytes: &[u8]) -> RcdHash {
    RcdHash(sha256(rcd_bytes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rcd {
    /// `0x01 || public_key`.
    Type1(Ed25519PublicKey),
    /// Raw bytes of any other RCD, type byte included.
    Unsupported(Bytes),
}

impl Rcd {
    /// Interpret raw RCD bytes. Never fails: unknown layouts are `Unsupported`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() == RCD_TYPE_1_LEN && bytes[0] == RCD_TYPE_1 {
            let mut key = [0u8; 32];
            key.copy_from_slice(&bytes[1..]);
            Rcd::Type1(Ed25519PublicKey(key))
        } else {
            Rcd::Unsupported(Bytes::copy_from_slice(bytes))
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Rcd::Type1(key) => {
                let mut buf = Vec::with_capacity(RCD_TYPE_1_LEN);
                buf.push(RCD_TYPE_1);
                buf.extend_from_slice(key.as_bytes());
                buf
            }
            Rcd::Unsupported(raw) => raw.to_vec(),
        }
    }

    pub fn type_byte(&self) -> u8 {
        match self {
            Rcd::Type1(_) => RCD_TYPE_1,
            Rcd::Unsupported(raw) => raw.first().copied().unwrap_or(0),
        }
    }

    pub fn hash(&self) -> RcdHash {
        rcd_hash(&self.to_bytes())
    }

    /// Verify a detached signature over `message` with the embedded key.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        match self {
            Rcd::Type1(key) => key.verify(message, signature),
            Rcd::Unsupported(_) => Err(CryptoError::UnsupportedRcdType(self.type_byte())),
        }
    }
}

/// One signer's ExtID: the RCD followed by its 64-byte signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcdSig {
    pub rcd: Rcd,
    pub signature: Ed25519Signature,
}

impl RcdSig {
    pub fn new(rcd: Rcd, signature: Ed25519Signature) -> Self {
        Self { rcd, signature }
    }

    /// Split an ExtID into its RCD and trailing signature.
    ///
    /// Returns `None` when there is no room for a non-empty RCD.
    pub fn from_ext_id(ext_id: &[u8]) -> Option<Self> {
        if ext_id.len() <= SIGNATURE_LEN {
            return None;
        }
        let (rcd, sig) = ext_id.split_at(ext_id.len() - SIGNATURE_LEN);
        let signature = Ed25519Signature::try_from(sig).ok()?;
        Some(Self {
            rcd: Rcd::from_bytes(rcd),
            signature,
        })
    }

    pub fn to_ext_id(&self) -> Bytes {
        let mut buf = self.rcd.to_bytes();
        buf.extend_from_slice(self.signature.as_bytes());
        Bytes::from(buf)
    }

    pub fn verify(&self, message: &[u8]) -> Result<(), CryptoError> {
        self.rcd.verify(message, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    #[test]
    fn test_type1_rcd_hash() {
        let address = Address::from_seed(&[0x01; 32]);
        let rcd = address.rcd();
        assert_eq!(rcd.to_bytes().len(), RCD_TYPE_1_LEN);
        assert_eq!(rcd.to_bytes()[0], RCD_TYPE_1);
        assert_eq!(
            rcd.hash().to_hex(),
            "d2dd6e81a001b70a13607f6fbbb3b129ff367216fc1f8e3ae53e63976bf573a2"
        );
        assert_eq!(rcd.hash(), rcd_hash(&rcd.to_bytes()));
    }

    #[test]
    fn test_from_bytes_roundtrip() {
        let rcd = Address::from_seed(&[0x02; 32]).rcd();
        assert_eq!(Rcd::from_bytes(&rcd.to_bytes()), rcd);
    }

    #[test]
    fn test_unsupported_rcd_fails_closed() {
        let address = Address::from_seed(&[0x02; 32]);
        let signature = address.sign(b"message").unwrap();

        let mut raw = address.rcd().to_bytes();
        raw[0] = 0x02;
        let rcd = Rcd::from_bytes(&raw);
        assert!(matches!(rcd, Rcd::Unsupported(_)));
        assert_eq!(
            rcd.verify(b"message", &signature),
            Err(CryptoError::UnsupportedRcdType(0x02))
        );
    }

    #[test]
    fn test_rcd_sig_ext_id_roundtrip() {
        let address = Address::from_seed(&[0x03; 32]);
        let pair = RcdSig::new(address.rcd(), address.sign(b"data").unwrap());
        let ext_id = pair.to_ext_id();
        assert_eq!(ext_id.len(), RCD_TYPE_1_LEN + SIGNATURE_LEN);

        let parsed = RcdSig::from_ext_id(&ext_id).unwrap();
        assert_eq!(parsed, pair);
        assert!(parsed.verify(b"data").is_ok());
        assert_eq!(parsed.verify(b"Data"), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn test_rcd_sig_too_short() {
        assert!(RcdSig::from_ext_id(&[0u8; SIGNATURE_LEN]).is_none());
        assert!(RcdSig::from_ext_id(&[]).is_none());
    }
}
