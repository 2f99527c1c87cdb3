//! Error types for the Kernel.

use fat_kernel_core::{ChainId, EntryHash, FormatError, ValidationError};
use fat_kernel_net::NetError;
use thiserror::Error;

/// Errors that can occur during Kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// An entry failed validation, or could not be composed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Fetched bytes are not a well-formed entry.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The node could not serve the request.
    #[error("node error: {0}")]
    Net(#[from] NetError),

    #[error("entry not found: {0}")]
    EntryNotFound(EntryHash),

    /// The node returned bytes that hash to something else.
    #[error("entry hash mismatch: requested {expected}, got {got}")]
    HashMismatch { expected: EntryHash, got: EntryHash },

    #[error("chain not found: {0}")]
    ChainNotFound(ChainId),

    #[error("chain already exists: {0}")]
    ChainExists(ChainId),

    /// The chain's first entry does not name a token and issuer.
    #[error("not a token chain: {0}")]
    NotTokenChain(ChainId),
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
