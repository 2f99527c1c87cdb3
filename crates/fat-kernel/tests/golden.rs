//! Golden vectors through the public API.
//!
//! Every implementation must agree on entry bytes, entry hashes, chain IDs,
//! RCD hashes, address strings and the bytes a signer signs.

use fat_kernel::core::{
    chain_id, decode_entry, entry_hash, signing_message, token_chain_id, validate_transaction,
    Address, ChainId, Entry, RcdHash, COINBASE,
};
use fat_kernel_testkit::vectors::{
    address_vectors, entry_from_transaction_vector, entry_from_vector, entry_vectors,
    transaction_vectors, TOKEN_CHAIN_ID,
};
use fat_kernel_testkit::{verify_all_vectors, IDENTITY_CHAIN_ID};

#[test]
fn all_golden_vectors_match() {
    let results = verify_all_vectors();
    assert!(!results.is_empty());
    for (name, ok, computed) in results {
        assert!(ok, "vector '{}' computed {}", name, computed);
    }
}

#[test]
fn entry_bytes_are_exact() {
    let vector = &entry_vectors()[1];
    let data = entry_from_vector(vector).encode().unwrap();
    assert_eq!(
        hex::encode(&data),
        "00\
         1111111111111111111111111111111111111111111111111111111111111111\
         000e\
         000568656c6c6f\
         0005776f726c64\
         636f6e74656e74"
    );
    assert_eq!(entry_hash(&data).to_hex(), vector.entry_hash);

    let decoded = decode_entry(&data).unwrap();
    assert_eq!(decoded.ext_ids, entry_from_vector(vector).ext_ids);
    assert_eq!(decoded.content.as_ref(), b"content");
}

#[test]
fn address_strings_parse_back() {
    for vector in address_vectors() {
        let rcd_hash: RcdHash = vector.public_address.parse().unwrap();
        assert_eq!(rcd_hash.to_hex(), vector.rcd_hash, "{}", vector.name);
    }
}

#[test]
fn coinbase_is_the_zero_seed_key() {
    assert_eq!(Address::from_seed(&[0; 32]).rcd_hash(), COINBASE);
    assert_eq!(
        COINBASE.to_address_string(),
        "FA2W44HT72C6jcottXi4W3wYGoytsxqXaiYr1XkcZEpgHg4Zmy3w"
    );
    assert_eq!(
        Address::coinbase().private_string().as_deref(),
        Some("Fs1KWJrpLdfucvmYwN2nWrwepLn8ercpMbzXshd1g8zyhKXLVLWj")
    );
}

#[test]
fn private_address_roundtrip() {
    let addr = Address::from_private_str("Fs1pgoSKbSahFmC9bFAoeMbDhYUjpxHN7TLN297saVP6cuXmduzw")
        .unwrap();
    assert_eq!(
        addr.rcd_hash().to_address_string(),
        "FA2c53nzadDDwZZyEqgsBJKf1hAfi1Tfxe5NxXuUsM2d5Ev4NEZy"
    );
}

#[test]
fn chain_ids_are_order_sensitive() {
    assert_ne!(chain_id([b"a", b"b"]), chain_id([b"b", b"a"]));
    assert_eq!(
        token_chain_id("test", &IDENTITY_CHAIN_ID),
        ChainId::from_hex(TOKEN_CHAIN_ID).unwrap()
    );
}

#[test]
fn signed_transfer_matches() {
    let vector = &transaction_vectors()[0];
    let mut entry = entry_from_transaction_vector(vector).unwrap();

    assert_eq!(entry.ext_ids.len(), 2);
    assert_eq!(entry.ext_ids[0].as_ref(), b"1700000000");
    assert_eq!(entry.ext_ids[1].len(), 33 + 64);
    assert_eq!(entry.compute_hash().unwrap().to_hex(), vector.entry_hash);

    let message = signing_message(&entry).unwrap();
    let expected_prefix = hex::decode(
        "001111111111111111111111111111111111111111111111111111111111111111000c000a31373030303030303030",
    )
    .unwrap();
    assert!(message.starts_with(&expected_prefix));
    assert!(message.ends_with(vector.content.as_bytes()));

    entry.timestamp = Some(vector.timestamp);
    let valid = validate_transaction(&entry, None).unwrap();
    assert_eq!(valid.signers.len(), 1);
    assert!(!valid.is_coinbase);
}

#[test]
fn empty_entry_hash() {
    let entry = Entry::new(ChainId::ZERO);
    assert_eq!(
        entry.compute_hash().unwrap().to_hex(),
        "987963a268d0dc589402a29eaacb811b5eacb57369344313188743c693d4480b"
    );
}
