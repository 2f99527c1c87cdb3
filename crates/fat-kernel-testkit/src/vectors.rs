//! Golden test vectors for deterministic verification.
//!
//! Every value here was computed independently of this crate, from the
//! published hash and address definitions. An implementation that disagrees
//! with any of them does not interoperate with the network.

use bytes::Bytes;
use serde::Serialize;

use fat_kernel_core::{chain_id, entry_hash, token_chain_id, Address, ChainId, Entry, TransactionBuilder};

use crate::fixtures::address;

/// A key derived from a fixed seed, and what it maps to.
#[derive(Debug, Clone, Serialize)]
pub struct AddressVector {
    pub name: &'static str,
    /// Every byte of the ed25519 seed.
    pub seed: u8,
    pub public_key: &'static str,
    pub rcd_hash: &'static str,
    pub public_address: &'static str,
}

/// An entry and its hash.
#[derive(Debug, Clone, Serialize)]
pub struct EntryVector {
    pub name: &'static str,
    pub chain_id: &'static str,
    pub ext_ids: &'static [&'static str],
    pub content: &'static str,
    pub entry_hash: &'static str,
}

/// Name IDs and the chain ID they derive.
#[derive(Debug, Clone, Serialize)]
pub struct ChainIdVector {
    pub name: &'static str,
    pub name_ids: &'static [&'static str],
    pub chain_id: &'static str,
}

/// A one-input transfer signed at a fixed time.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionVector {
    pub name: &'static str,
    pub chain_id: &'static str,
    pub input_seed: u8,
    pub output_seed: u8,
    pub amount: u64,
    pub timestamp: i64,
    pub content: &'static str,
    pub signature: &'static str,
    pub entry_hash: &'static str,
}

pub fn address_vectors() -> Vec<AddressVector> {
    vec![
        AddressVector {
            name: "seed 0x01",
            seed: 0x01,
            public_key: "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c",
            rcd_hash: "d2dd6e81a001b70a13607f6fbbb3b129ff367216fc1f8e3ae53e63976bf573a2",
            public_address: "FA3ZwpWEJYD8twT9v3ekpWjj17VMzmHcK9uj2YEio1m6YGoQNB33",
        },
        AddressVector {
            name: "seed 0x02",
            seed: 0x02,
            public_key: "8139770ea87d175f56a35466c34c7ecccb8d8a91b4ee37a25df60f5b8fc9b394",
            rcd_hash: "b7aad8bfb5dfa91211a3e3f1be1a65bce503a7c436837f0f4875bb4d0774431c",
            public_address: "FA3My6PXzh7yBMmZgjTek7fTaoaZy399ZeTRupJwt2CeNoRyAPkG",
        },
        AddressVector {
            name: "seed 0x42",
            seed: 0x42,
            public_key: "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12",
            rcd_hash: "53fe3d959cf098d9fbe4392d3228793c67ac6bf46ec861aebddbf15db34f2b92",
            public_address: "FA2c53nzadDDwZZyEqgsBJKf1hAfi1Tfxe5NxXuUsM2d5Ev4NEZy",
        },
        AddressVector {
            name: "coinbase",
            seed: 0x00,
            public_key: "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29",
            rcd_hash: "4654a09c3796d409448689fd1926cddf48b98b7dcc3245f74a02073cbbc44c7b",
            public_address: "FA2W44HT72C6jcottXi4W3wYGoytsxqXaiYr1XkcZEpgHg4Zmy3w",
        },
    ]
}

pub fn entry_vectors() -> Vec<EntryVector> {
    vec![
        EntryVector {
            name: "empty entry on the zero chain",
            chain_id: "0000000000000000000000000000000000000000000000000000000000000000",
            ext_ids: &[],
            content: "",
            entry_hash: "987963a268d0dc589402a29eaacb811b5eacb57369344313188743c693d4480b",
        },
        EntryVector {
            name: "two ExtIDs and content",
            chain_id: "1111111111111111111111111111111111111111111111111111111111111111",
            ext_ids: &["hello", "world"],
            content: "content",
            entry_hash: "368d0fb53cb8a6600b1fa3f552a65569916dc33726a0c3f8506bf1a2b2d417fe",
        },
    ]
}

pub fn chain_id_vectors() -> Vec<ChainIdVector> {
    vec![
        ChainIdVector {
            name: "a then b",
            name_ids: &["a", "b"],
            chain_id: "e5a01fee14e0ed5c48714f22180f25ad8365b53f9779f79dc4a3d7e93963f94a",
        },
        ChainIdVector {
            name: "b then a",
            name_ids: &["b", "a"],
            chain_id: "18d79cb747ea174c59f3a3b41768672526d56fecc58360a99d283d0f9b0a3cc0",
        },
    ]
}

/// Token "test" issued by identity 888888...4425.
pub const TOKEN_CHAIN_ID: &str = "b54c4310530dc4dd361101644fa55cb10aec561e7874a7b786ea3b66f2c6fdfb";

pub fn transaction_vectors() -> Vec<TransactionVector> {
    vec![TransactionVector {
        name: "seed 0x01 pays seed 0x02",
        chain_id: "1111111111111111111111111111111111111111111111111111111111111111",
        input_seed: 0x01,
        output_seed: 0x02,
        amount: 10,
        timestamp: 1_700_000_000,
        content: r#"{"inputs":{"FA3ZwpWEJYD8twT9v3ekpWjj17VMzmHcK9uj2YEio1m6YGoQNB33":10},"outputs":{"FA3My6PXzh7yBMmZgjTek7fTaoaZy399ZeTRupJwt2CeNoRyAPkG":10}}"#,
        signature: "d44eec0a154f1fd67476ea7fbd6b9a06fd91694e68455f3817c9f04149a4e0ef451eae82e60c9f0eb5012bde91f7c61e0d33367d5a7ce231f13211e04ea23c0a",
        entry_hash: "9b2cca8873063e3d5837ad5c023ad61890f203785c74cd843a4c16e823c6decf",
    }]
}

fn hex_chain_id(s: &str) -> ChainId {
    ChainId::from_hex(s).unwrap_or(ChainId::ZERO)
}

/// Build the entry an [`EntryVector`] describes.
pub fn entry_from_vector(vector: &EntryVector) -> Entry {
    Entry {
        chain_id: Some(hex_chain_id(vector.chain_id)),
        ext_ids: vector
            .ext_ids
            .iter()
            .map(|ext_id| Bytes::from_static(ext_id.as_bytes()))
            .collect(),
        content: Bytes::from_static(vector.content.as_bytes()),
        ..Entry::default()
    }
}

/// Sign the entry a [`TransactionVector`] describes.
pub fn entry_from_transaction_vector(vector: &TransactionVector) -> Option<Entry> {
    let from = address(vector.input_seed);
    let to = address(vector.output_seed);
    TransactionBuilder::new(hex_chain_id(vector.chain_id))
        .input(from.rcd_hash(), vector.amount)
        .output(to.rcd_hash(), vector.amount)
        .sign(vector.timestamp, &[from])
        .ok()
}

fn check_address(vector: &AddressVector) -> (bool, String) {
    let addr = Address::from_seed(&[vector.seed; 32]);
    let got = addr.rcd_hash().to_address_string();
    let matches = addr.public_key().to_hex() == vector.public_key
        && addr.rcd_hash().to_hex() == vector.rcd_hash
        && got == vector.public_address;
    (matches, got)
}

fn check_entry(vector: &EntryVector) -> (bool, String) {
    match entry_from_vector(vector).compute_hash() {
        Ok(hash) => (hash.to_hex() == vector.entry_hash, hash.to_hex()),
        Err(e) => (false, e.to_string()),
    }
}

fn check_chain_id(vector: &ChainIdVector) -> (bool, String) {
    let got = chain_id(vector.name_ids.iter().map(|id| id.as_bytes())).to_hex();
    (got == vector.chain_id, got)
}

fn check_transaction(vector: &TransactionVector) -> (bool, String) {
    let Some(entry) = entry_from_transaction_vector(vector) else {
        return (false, "could not sign".to_string());
    };
    let signature = entry
        .ext_ids
        .get(1)
        .and_then(|pair| pair.get(33..))
        .map(hex::encode)
        .unwrap_or_default();
    let got = entry_hash(&entry.encode().unwrap_or_default()).to_hex();
    let matches = entry.content.as_ref() == vector.content.as_bytes()
        && signature == vector.signature
        && got == vector.entry_hash;
    (matches, got)
}

/// Check every vector. Returns `(name, matches, computed)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();
    for v in address_vectors() {
        let (ok, got) = check_address(&v);
        results.push((v.name.to_string(), ok, got));
    }
    for v in entry_vectors() {
        let (ok, got) = check_entry(&v);
        results.push((v.name.to_string(), ok, got));
    }
    for v in chain_id_vectors() {
        let (ok, got) = check_chain_id(&v);
        results.push((v.name.to_string(), ok, got));
    }
    let token = token_chain_id("test", &crate::fixtures::IDENTITY_CHAIN_ID).to_hex();
    results.push(("token chain".to_string(), token == TOKEN_CHAIN_ID, token));
    for v in transaction_vectors() {
        let (ok, got) = check_transaction(&v);
        results.push((v.name.to_string(), ok, got));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, ok, got) in verify_all_vectors() {
            assert!(ok, "vector '{}' computed {}", name, got);
        }
    }

    #[test]
    fn test_vectors_serialize() {
        let json = serde_json::to_string(&address_vectors()).unwrap();
        assert!(json.contains("FA2W44HT72C6jcottXi4W3wYGoytsxqXaiYr1XkcZEpgHg4Zmy3w"));
    }
}
