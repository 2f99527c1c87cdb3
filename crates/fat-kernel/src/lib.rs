//! # FAT Kernel
//!
//! Read, validate, compose and submit Factom Asset Token (FAT-0) entries.
//!
//! ## Overview
//!
//! - **Entries**: Binary records on Factom chains, addressed by hash
//! - **Token chains**: Chains named `["token", <id>, "issuer", <identity>]`
//! - **Transactions**: JSON in entry content, signed by every input's key
//! - **Issuance**: The token declaration, signed by the identity's key
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fat_kernel::{Kernel, KernelConfig};
//! use fat_kernel::core::{Address, ChainId, TransactionBuilder};
//! use fat_kernel::net::MemoryNode;
//!
//! async fn example() {
//!     let kernel = Kernel::new(MemoryNode::new(), KernelConfig::default());
//!     let identity = ChainId([0x88; 32]);
//!     let chain = kernel.load_token("test", &identity).await.unwrap();
//!
//!     let alice = Address::generate();
//!     let bob = Address::generate();
//!     let builder = TransactionBuilder::new(chain.chain_id)
//!         .input(alice.rcd_hash(), 10)
//!         .output(bob.rcd_hash(), 10);
//!     let submission = kernel
//!         .transact(&chain, builder, &[alice], "EC2DKSYyRcNWf7RS963VFYgMExoHRYLHVeCfQ9PGPmNzwrcmgm2r")
//!         .await
//!         .unwrap();
//!     println!("{}", submission.tx_id);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `fat_kernel::core` - Primitives and validation (Entry, Address, Transaction, ...)
//! - `fat_kernel::net` - Node contracts and the in-memory node

pub mod error;
pub mod kernel;

pub use fat_kernel_core as core;
pub use fat_kernel_net as net;

pub use error::{KernelError, Result};
pub use kernel::{Kernel, KernelConfig, Submission, TokenChain};

pub use fat_kernel_core::{
    validate_issuance, validate_transaction, Address, AmountMap, ChainId, Entry, EntryHash,
    EntryRef, Issuance, IssuanceBuilder, RcdHash, Transaction, TransactionBuilder, TxId,
    ValidatedTransaction, ValidationError, ValidationParams, COINBASE,
};
pub use fat_kernel_net::{MemoryNode, Node};
