//! # FAT Kernel Testkit
//!
//! Testing utilities for the FAT Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known hashes, addresses and a signed transfer, computed independently
//! - **Generators**: Proptest strategies for entries and balanced transfers
//! - **Fixtures**: Seeded keys and a ready-made token chain
//!
//! ## Golden Vectors
//!
//! ```rust
//! use fat_kernel_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, computed) in verify_all_vectors() {
//!     assert!(ok, "{}: {}", name, computed);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use fat_kernel_testkit::generators::{transfer_from_params, TransferParams};
//!
//! proptest! {
//!     #[test]
//!     fn transfers_validate(params: TransferParams) {
//!         let entry = transfer_from_params(&params).unwrap();
//!         prop_assert!(fat_kernel_core::validate_transaction(&entry, None).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use fat_kernel_testkit::fixtures::{address, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let entry = fixture.coinbase_entry(&address(1).rcd_hash(), 100).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{address, multi_party_fixtures, TestFixture, EC_ADDRESS, IDENTITY_CHAIN_ID, NOW};
pub use generators::{transfer_from_params, TransferParams};
pub use vectors::verify_all_vectors;
