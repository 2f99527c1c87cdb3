//! Token chains and their issuance entry.
//!
//! A token chain is named `["token", token_id, "issuer", identity_chain_id]`.
//! Its issuance entry declares the token and is signed by the identity's key,
//! the same key that must sign every coinbase transaction on the chain.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::address::{Address, RcdHash};
use crate::codec::signing_message;
use crate::entry::Entry;
use crate::error::{DecodeError, DecodeErrorKind, Field, ValidationError};
use crate::hash::chain_id;
use crate::signing::{check_timestamp_salt, sign_entry};
use crate::types::ChainId;
use crate::validation::{verify_issuer_signature, ValidationParams};

/// The only supported token type.
pub const FAT0_TYPE: &str = "FAT-0";

/// Supply value meaning "no cap".
pub const UNLIMITED_SUPPLY: i64 = -1;

const TOKEN_TAG: &[u8] = b"token";
const ISSUER_TAG: &[u8] = b"issuer";

/// The four name IDs of a token chain.
pub fn token_name_ids(token_id: &str, identity_chain_id: &ChainId) -> Vec<Bytes> {
    vec![
        Bytes::from_static(TOKEN_TAG),
        Bytes::copy_from_slice(token_id.as_bytes()),
        Bytes::from_static(ISSUER_TAG),
        Bytes::copy_from_slice(identity_chain_id.as_bytes()),
    ]
}

/// Chain ID of the token chain for `token_id` issued by `identity_chain_id`.
pub fn token_chain_id(token_id: &str, identity_chain_id: &ChainId) -> ChainId {
    chain_id(token_name_ids(token_id, identity_chain_id))
}

/// Whether a chain's first-entry ExtIDs name a token chain.
pub fn valid_token_name_ids(name_ids: &[Bytes]) -> bool {
    TokenNameIds::from_name_ids(name_ids).is_some()
}

/// The parts of a token chain's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNameIds {
    pub token_id: Bytes,
    pub identity_chain_id: ChainId,
}

impl TokenNameIds {
    pub fn from_name_ids(name_ids: &[Bytes]) -> Option<Self> {
        match name_ids {
            [token, token_id, issuer, identity]
                if token.as_ref() == TOKEN_TAG && issuer.as_ref() == ISSUER_TAG =>
            {
                let identity_chain_id = ChainId::try_from(identity.as_ref()).ok()?;
                Some(Self {
                    token_id: token_id.clone(),
                    identity_chain_id,
                })
            }
            _ => None,
        }
    }
}

/// The first entry of a new token chain. Its chain ID is derived on encode.
pub fn chain_creation_entry(token_id: &str, identity_chain_id: &ChainId) -> Entry {
    Entry {
        ext_ids: token_name_ids(token_id, identity_chain_id),
        ..Entry::default()
    }
}

/// A token declaration.
#[derive(Debug, Clone, Serialize)]
pub struct Issuance {
    #[serde(rename = "type")]
    pub token_type: String,
    /// Maximum number of tokens, or [`UNLIMITED_SUPPLY`].
    pub supply: i64,
    pub symbol: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Box<RawValue>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIssuance<'a> {
    #[serde(rename = "type", borrow)]
    token_type: Option<&'a RawValue>,
    #[serde(borrow)]
    supply: Option<&'a RawValue>,
    #[serde(borrow)]
    symbol: Option<&'a RawValue>,
    #[serde(borrow)]
    name: Option<&'a RawValue>,
    #[serde(borrow)]
    metadata: Option<&'a RawValue>,
}

fn required<T: DeserializeOwned>(raw: Option<&RawValue>, field: Field) -> Result<T, DecodeError> {
    let raw = raw.ok_or(DecodeError::new(field, DecodeErrorKind::Missing))?;
    serde_json::from_str(raw.get()).map_err(|e| DecodeError::json(field, e))
}

impl Issuance {
    pub fn parse(content: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawIssuance<'_> =
            serde_json::from_slice(content).map_err(|e| DecodeError::json(Field::Issuance, e))?;
        let issuance = Self {
            token_type: required(raw.token_type, Field::Type)?,
            supply: required(raw.supply, Field::Supply)?,
            symbol: required(raw.symbol, Field::Symbol)?,
            name: required(raw.name, Field::Name)?,
            metadata: raw.metadata.map(ToOwned::to_owned),
        };
        issuance.check()?;
        Ok(issuance)
    }

    /// Type is FAT-0 and supply is positive or unlimited.
    pub fn check(&self) -> Result<(), DecodeError> {
        if self.token_type != FAT0_TYPE {
            return Err(DecodeError::new(
                Field::Type,
                DecodeErrorKind::InvalidValue(format!("unsupported token type {:?}", self.token_type)),
            ));
        }
        if self.supply == 0 || self.supply < UNLIMITED_SUPPLY {
            return Err(DecodeError::new(
                Field::Supply,
                DecodeErrorKind::InvalidValue(self.supply.to_string()),
            ));
        }
        Ok(())
    }

    pub fn is_unlimited(&self) -> bool {
        self.supply == UNLIMITED_SUPPLY
    }

    pub fn to_content(&self) -> Result<Vec<u8>, DecodeError> {
        serde_json::to_vec(self).map_err(|e| DecodeError::json(Field::Issuance, e))
    }
}

/// Validate an issuance entry with default parameters.
pub fn validate_issuance(entry: &Entry, issuer: Option<&RcdHash>) -> Result<Issuance, ValidationError> {
    validate_issuance_with(entry, issuer, &ValidationParams::default())
}

/// Validate an issuance entry: content, `[salt, rcd||sig]`, salt age, then
/// the issuer's signature.
pub fn validate_issuance_with(
    entry: &Entry,
    issuer: Option<&RcdHash>,
    params: &ValidationParams,
) -> Result<Issuance, ValidationError> {
    let issuance = Issuance::parse(&entry.content)?;

    if entry.ext_ids.len() != 2 {
        return Err(ValidationError::InvalidExtIdCount {
            expected: 2,
            got: entry.ext_ids.len(),
        });
    }
    check_timestamp_salt(entry, params)?;

    let message = signing_message(entry)?;
    verify_issuer_signature(entry, 1, issuer, &message)?;
    Ok(issuance)
}

/// Composes and signs an issuance entry.
#[derive(Debug, Clone)]
pub struct IssuanceBuilder {
    chain_id: ChainId,
    supply: i64,
    symbol: String,
    name: String,
    metadata: Option<String>,
}

impl IssuanceBuilder {
    pub fn new(chain_id: ChainId, supply: i64) -> Self {
        Self {
            chain_id,
            supply,
            symbol: String::new(),
            name: String::new(),
            metadata: None,
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach metadata as raw JSON text. Checked on build.
    pub fn metadata(mut self, json: impl Into<String>) -> Self {
        self.metadata = Some(json.into());
        self
    }

    pub fn build(self) -> Result<Issuance, ValidationError> {
        let metadata = self
            .metadata
            .map(RawValue::from_string)
            .transpose()
            .map_err(|e| DecodeError::json(Field::Metadata, e))?;
        let issuance = Issuance {
            token_type: FAT0_TYPE.to_string(),
            supply: self.supply,
            symbol: self.symbol,
            name: self.name,
            metadata,
        };
        issuance.check()?;
        Ok(issuance)
    }

    pub fn sign(self, timestamp: i64, issuer: &Address) -> Result<Entry, ValidationError> {
        let chain_id = self.chain_id;
        let issuance = self.build()?;
        let mut entry = Entry::new(chain_id);
        entry.content = issuance.to_content()?.into();
        sign_entry(&mut entry, timestamp, &[issuer])?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    const NOW: i64 = 1_700_000_000;

    fn identity() -> ChainId {
        ChainId::from_hex("88888807e4f3bbb9a2b229645ab6d2f184224190f83e78761674c2362aca4425").unwrap()
    }

    fn make_issuer() -> Address {
        Address::from_seed(&[0x99; 32])
    }

    fn make_issuance_entry(issuer: &Address) -> Entry {
        IssuanceBuilder::new(token_chain_id("test", &identity()), 100_000)
            .symbol("TEST")
            .name("Test Token")
            .sign(NOW, issuer)
            .unwrap()
    }

    #[test]
    fn test_token_chain_id_known_value() {
        assert_eq!(
            token_chain_id("test", &identity()).to_hex(),
            "b54c4310530dc4dd361101644fa55cb10aec561e7874a7b786ea3b66f2c6fdfb"
        );
    }

    #[test]
    fn test_token_name_ids() {
        let ids = token_name_ids("test", &identity());
        assert!(valid_token_name_ids(&ids));
        let parsed = TokenNameIds::from_name_ids(&ids).unwrap();
        assert_eq!(parsed.token_id.as_ref(), b"test");
        assert_eq!(parsed.identity_chain_id, identity());

        assert!(!valid_token_name_ids(&ids[..3]));
        let mut bad = ids.clone();
        bad[0] = Bytes::from_static(b"Token");
        assert!(!valid_token_name_ids(&bad));
        let mut bad = ids.clone();
        bad[2] = Bytes::from_static(b"issuers");
        assert!(!valid_token_name_ids(&bad));
        let mut bad = ids;
        bad[3] = Bytes::from_static(&[0u8; 31]);
        assert!(!valid_token_name_ids(&bad));
    }

    #[test]
    fn test_chain_creation_entry_resolves_token_chain() {
        let entry = chain_creation_entry("test", &identity());
        assert!(entry.chain_id.is_none());
        assert_eq!(entry.resolved_chain_id(), token_chain_id("test", &identity()));
    }

    #[test]
    fn test_valid_issuance() {
        let issuer = make_issuer();
        let entry = make_issuance_entry(&issuer);
        let issuance = validate_issuance(&entry, Some(&issuer.rcd_hash())).unwrap();
        assert_eq!(issuance.token_type, FAT0_TYPE);
        assert_eq!(issuance.supply, 100_000);
        assert_eq!(issuance.symbol, "TEST");
        assert_eq!(issuance.name, "Test Token");
        assert!(!issuance.is_unlimited());
    }

    #[test]
    fn test_issuance_content() {
        let issuance = IssuanceBuilder::new(ChainId::ZERO, UNLIMITED_SUPPLY)
            .symbol("T")
            .name("Token")
            .metadata(r#"{"a":1}"#)
            .build()
            .unwrap();
        assert_eq!(
            String::from_utf8(issuance.to_content().unwrap()).unwrap(),
            r#"{"type":"FAT-0","supply":-1,"symbol":"T","name":"Token","metadata":{"a":1}}"#
        );
        assert!(issuance.is_unlimited());
    }

    #[test]
    fn test_parse_missing_field() {
        let err = Issuance::parse(br#"{"type":"FAT-0","supply":1,"name":"x"}"#).unwrap_err();
        assert_eq!(err, DecodeError::new(Field::Symbol, DecodeErrorKind::Missing));
    }

    #[test]
    fn test_parse_wrong_type() {
        let err =
            Issuance::parse(br#"{"type":"FAT-1","supply":1,"symbol":"x","name":"x"}"#).unwrap_err();
        assert_eq!(err.field, Field::Type);
    }

    #[test]
    fn test_parse_bad_supply() {
        for supply in ["0", "-2", "\"10\""] {
            let json = format!(r#"{{"type":"FAT-0","supply":{},"symbol":"x","name":"x"}}"#, supply);
            let err = Issuance::parse(json.as_bytes()).unwrap_err();
            assert_eq!(err.field, Field::Supply);
        }
    }

    #[test]
    fn test_parse_unknown_field() {
        let err = Issuance::parse(
            br#"{"type":"FAT-0","supply":1,"symbol":"x","name":"x","precision":2}"#,
        )
        .unwrap_err();
        assert_eq!(err.field, Field::Issuance);
    }

    #[test]
    fn test_issuance_ext_id_count() {
        let issuer = make_issuer();
        let mut entry = make_issuance_entry(&issuer);
        entry.ext_ids.push(Bytes::new());
        assert_eq!(
            validate_issuance(&entry, Some(&issuer.rcd_hash())).unwrap_err(),
            ValidationError::InvalidExtIdCount {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_issuance_issuer_checks() {
        let issuer = make_issuer();
        let entry = make_issuance_entry(&issuer);

        assert_eq!(
            validate_issuance(&entry, None).unwrap_err(),
            ValidationError::IssuerUnknown
        );

        let other = Address::from_seed(&[0x98; 32]).rcd_hash();
        assert_eq!(
            validate_issuance(&entry, Some(&other)).unwrap_err(),
            ValidationError::InvalidIssuerRcd {
                expected: other,
                got: issuer.rcd_hash()
            }
        );
    }

    #[test]
    fn test_issuance_tampered() {
        let issuer = make_issuer();
        let mut entry = make_issuance_entry(&issuer);
        let content = String::from_utf8(entry.content.to_vec())
            .unwrap()
            .replace("100000", "100001");
        entry.content = content.into();
        assert_eq!(
            validate_issuance(&entry, Some(&issuer.rcd_hash())).unwrap_err(),
            ValidationError::InvalidSignature {
                ext_id: 1,
                source: CryptoError::InvalidSignature
            }
        );
    }
}
