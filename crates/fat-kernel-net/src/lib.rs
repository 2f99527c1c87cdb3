//! # FAT Kernel Net
//!
//! The contracts the kernel consumes from the outside world, as async traits,
//! plus an in-memory node implementing all of them.
//!
//! ## Key Types
//!
//! - [`EntrySource`] - Fetch raw entries and chain heads by hash
//! - [`EntrySubmitter`] - Commit and reveal an entry, returning its TxID
//! - [`IssuerLookup`] - Resolve an identity chain to its current signing key
//! - [`Node`] - All three at once
//! - [`MemoryNode`] - In-memory node for tests and offline use
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fat_kernel_net::{EntrySource, MemoryNode};
//! use fat_kernel_core::ChainId;
//!
//! async fn example() {
//!     let node = MemoryNode::new();
//!     let first = node.first_entry_hash(&ChainId::ZERO).await.unwrap();
//!     assert!(first.is_none());
//! }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{NetError, Result};
pub use memory::{MemoryNode, Submitted};
pub use traits::{EntrySource, EntrySubmitter, FetchedEntry, IssuerLookup, Node};
