//! Timestamp salts and RCD/signature ExtIDs.
//!
//! A signed entry carries `ext_ids = [salt, rcd||sig, ...]`. Every signer
//! signs [`signing_message`], which covers the chain ID, the salt and the
//! content, so one signature cannot be lifted onto another entry or replayed
//! outside the salt's window.

use bytes::Bytes;

use crate::address::Address;
use crate::codec::signing_message;
use crate::entry::Entry;
use crate::error::ValidationError;
use crate::rcd::RcdSig;
use crate::validation::ValidationParams;

/// The salt for `timestamp` (Unix seconds): its decimal ASCII form.
pub fn timestamp_salt(timestamp: i64) -> Bytes {
    Bytes::from(timestamp.to_string())
}

/// Parse a salt back into Unix seconds.
pub fn parse_timestamp_salt(salt: &[u8]) -> Option<i64> {
    std::str::from_utf8(salt).ok()?.parse().ok()
}

/// Check that `ext_ids[0]` lies within the replay window around the entry's
/// own timestamp. An entry without a timestamp cannot be bounded and fails.
pub fn check_timestamp_salt(entry: &Entry, params: &ValidationParams) -> Result<(), ValidationError> {
    let timestamp = entry.timestamp.ok_or(ValidationError::TimestampSaltExpired)?;
    let salt = entry
        .ext_ids
        .first()
        .and_then(|salt| parse_timestamp_salt(salt))
        .ok_or(ValidationError::TimestampSaltExpired)?;
    if timestamp.abs_diff(salt) > params.replay_window_secs {
        return Err(ValidationError::TimestampSaltExpired);
    }
    Ok(())
}

/// Replace the entry's ExtIDs with a fresh salt followed by one RCD/signature
/// pair per signer, in the order given, and stamp it with `timestamp`.
pub fn sign_entry(
    entry: &mut Entry,
    timestamp: i64,
    signers: &[&Address],
) -> Result<(), ValidationError> {
    entry.timestamp = Some(timestamp);
    entry.ext_ids = vec![timestamp_salt(timestamp)];
    let message = signing_message(entry)?;

    let mut pairs = Vec::with_capacity(signers.len());
    for signer in signers {
        let signature = signer.sign(&message)?;
        pairs.push(RcdSig::new(signer.rcd(), signature).to_ext_id());
    }
    entry.ext_ids.extend(pairs);
    Ok(())
}
