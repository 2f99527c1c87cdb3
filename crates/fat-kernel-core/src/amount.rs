//! The amount ledger map: RCD hash to a strictly positive token amount.
//!
//! Keyed by [`RcdHash`] for validation. Canonical order (used when
//! serializing and when pairing inputs with signatures) is the sort order of
//! the human-readable address strings, derived at the boundary.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;

use crate::address::RcdHash;
use crate::error::{DecodeError, DecodeErrorKind, Field};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountMap(BTreeMap<RcdHash, u64>);

impl AmountMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from address strings in document order.
    ///
    /// Rejects an empty list, unparseable addresses, zero amounts and
    /// repeated addresses, reporting the first offender.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, DecodeErrorKind>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (address, amount) in pairs {
            let address = address.as_ref();
            let rcd_hash: RcdHash =
                address
                    .parse()
                    .map_err(|source| DecodeErrorKind::InvalidAddress {
                        address: address.to_string(),
                        source,
                    })?;
            if amount == 0 {
                return Err(DecodeErrorKind::ZeroAmount(rcd_hash));
            }
            if map.insert(rcd_hash, amount).is_some() {
                return Err(DecodeErrorKind::DuplicateAddress(rcd_hash));
            }
        }
        if map.is_empty() {
            return Err(DecodeErrorKind::Empty);
        }
        Ok(Self(map))
    }

    /// Decode one JSON field, attributing failures to `field`.
    pub fn from_json(raw: &RawValue, field: Field) -> Result<Self, DecodeError> {
        let pairs: PairList =
            serde_json::from_str(raw.get()).map_err(|e| DecodeError::json(field, e))?;
        Self::from_pairs(pairs.0).map_err(|kind| DecodeError::new(field, kind))
    }

    /// Set an amount, returning the previous one.
    pub fn insert(&mut self, rcd_hash: RcdHash, amount: u64) -> Option<u64> {
        self.0.insert(rcd_hash, amount)
    }

    pub fn remove(&mut self, rcd_hash: &RcdHash) -> Option<u64> {
        self.0.remove(rcd_hash)
    }

    pub fn get(&self, rcd_hash: &RcdHash) -> Option<u64> {
        self.0.get(rcd_hash).copied()
    }

    pub fn contains(&self, rcd_hash: &RcdHash) -> bool {
        self.0.contains_key(rcd_hash)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in RCD-hash byte order. Use [`canonical_keys`](Self::canonical_keys)
    /// where order is observable.
    pub fn iter(&self) -> btree_map::Iter<'_, RcdHash, u64> {
        self.0.iter()
    }

    /// Drop every zero amount.
    pub fn retain_nonzero(&mut self) {
        self.0.retain(|_, amount| *amount != 0);
    }

    /// Total of all amounts, or `None` on `u64` overflow.
    pub fn sum(&self) -> Option<u64> {
        self.0.values().try_fold(0u64, |acc, amount| acc.checked_add(*amount))
    }

    /// Keys sorted by their address string.
    pub fn canonical_keys(&self) -> Vec<RcdHash> {
        self.canonical_entries()
            .into_iter()
            .map(|(_, rcd_hash, _)| rcd_hash)
            .collect()
    }

    /// The first key of `self`, in canonical order, that also appears in `other`.
    pub fn find_overlap(&self, other: &AmountMap) -> Option<RcdHash> {
        self.canonical_keys()
            .into_iter()
            .find(|rcd_hash| other.contains(rcd_hash))
    }

    fn canonical_entries(&self) -> Vec<(String, RcdHash, u64)> {
        let mut entries: Vec<_> = self
            .0
            .iter()
            .map(|(rcd_hash, amount)| (rcd_hash.to_address_string(), *rcd_hash, *amount))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl FromIterator<(RcdHash, u64)> for AmountMap {
    fn from_iter<T: IntoIterator<Item = (RcdHash, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AmountMap {
    type Item = (&'a RcdHash, &'a u64);
    type IntoIter = btree_map::Iter<'a, RcdHash, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for AmountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.canonical_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (address, _, amount) in &entries {
            map.serialize_entry(address, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AmountMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = PairList::deserialize(deserializer)?;
        Self::from_pairs(pairs.0).map_err(de::Error::custom)
    }
}

/// A JSON object read as its key/value pairs in document order, so repeated
/// keys survive to be rejected.
struct PairList(Vec<(String, u64)>);

impl<'de> Deserialize<'de> for PairList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = PairList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of address strings to amounts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PairList, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((address, amount)) = access.next_entry::<String, u64>()? {
                    pairs.push((address, amount));
                }
                Ok(PairList(pairs))
            }
        }

        deserializer.deserialize_map(PairVisitor)
    }
}
