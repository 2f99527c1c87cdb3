//! Binary Entry encoding.
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! [1]  version (0x00)
//! [32] chain ID
//! [2]  encoded length of all ExtIDs
//!      repeated: [2] ExtID length || ExtID
//! [..] content
//! ```
//!
//! This is the one format that must match the network byte for byte:
//! entry hashes and signatures are computed over it.

use bytes::Bytes;

use crate::entry::Entry;
use crate::error::FormatError;
use crate::types::ChainId;

/// The only defined entry version.
pub const ENTRY_VERSION: u8 = 0x00;

/// Version byte, chain ID, ExtIDs total length.
pub const HEADER_LEN: usize = 1 + 32 + 2;

/// Encode an entry. Entries without a chain ID encode under `chain_id(ext_ids)`.
pub fn encode_entry(entry: &Entry) -> Result<Vec<u8>, FormatError> {
    encode_parts(&entry.resolved_chain_id(), &entry.ext_ids, &entry.content)
}

/// Decode raw entry bytes. The hash, timestamp and height are left unset.
pub fn decode_entry(data: &[u8]) -> Result<Entry, FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::InsufficientLength(data.len()));
    }
    if data[0] != ENTRY_VERSION {
        return Err(FormatError::InvalidVersion(data[0]));
    }

    let mut chain = [0u8; 32];
    chain.copy_from_slice(&data[1..33]);

    let ext_total = read_u16(&data[33..35]);
    if ext_total == 1 || HEADER_LEN + ext_total > data.len() {
        return Err(FormatError::InvalidExtIdsLength);
    }

    let end = HEADER_LEN + ext_total;
    let mut ext_ids = Vec::new();
    let mut pos = HEADER_LEN;
    while pos < end {
        if pos + 2 > end {
            return Err(FormatError::MalformedExtIds);
        }
        let len = read_u16(&data[pos..pos + 2]);
        pos += 2;
        if pos + len > end {
            return Err(FormatError::MalformedExtIds);
        }
        ext_ids.push(Bytes::copy_from_slice(&data[pos..pos + len]));
        pos += len;
    }

    Ok(Entry {
        chain_id: Some(ChainId(chain)),
        ext_ids,
        content: Bytes::copy_from_slice(&data[end..]),
        ..Entry::default()
    })
}

/// The bytes a transaction or issuance signer signs: the entry encoded with
/// only its first ExtID (the timestamp salt).
pub fn signing_message(entry: &Entry) -> Result<Vec<u8>, FormatError> {
    let salt = &entry.ext_ids[..entry.ext_ids.len().min(1)];
    encode_parts(&entry.resolved_chain_id(), salt, &entry.content)
}

fn encode_parts(chain_id: &ChainId, ext_ids: &[Bytes], content: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut ext_total = 0usize;
    for ext_id in ext_ids {
        if ext_id.len() > u16::MAX as usize {
            return Err(FormatError::ExtIdTooLong(ext_id.len()));
        }
        ext_total += 2 + ext_id.len();
    }
    if ext_total > u16::MAX as usize {
        return Err(FormatError::ExtIdsTooLong(ext_total));
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + ext_total + content.len());
    buf.push(ENTRY_VERSION);
    buf.extend_from_slice(chain_id.as_bytes());
    buf.extend_from_slice(&(ext_total as u16).to_be_bytes());
    for ext_id in ext_ids {
        buf.extend_from_slice(&(ext_id.len() as u16).to_be_bytes());
        buf.extend_from_slice(ext_id);
    }
    buf.extend_from_slice(content);
    Ok(buf)
}

fn read_u16(bytes: &[u8]) -> usize {
    ((bytes[0] as usize) << 8) | bytes[1] as usize
}
