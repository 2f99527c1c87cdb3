//! Error types for node operations.

use fat_kernel_core::{ChainId, EntryHash, FormatError};
use thiserror::Error;

/// Errors that can occur talking to a node.
#[derive(Debug, Error)]
pub enum NetError {
    /// No entry with this hash.
    #[error("entry not found: {0}")]
    EntryNotFound(EntryHash),

    /// No chain with this ID.
    #[error("chain not found: {0}")]
    ChainNotFound(ChainId),

    /// A chain-creation entry names a chain that already exists.
    #[error("chain already exists: {0}")]
    ChainExists(ChainId),

    /// The node refused the submission.
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The entry cannot be encoded.
    #[error("invalid entry: {0}")]
    Format(#[from] FormatError),

    /// Transport or RPC failure. Retry policy belongs to the implementation.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NetError>;
