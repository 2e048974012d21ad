//! Stored tile object format.
//!
//! A cached tile is `zstd(postcard(EntryBatch))`. Objects are written once
//! and read many times, so the compact binary form wins over JSON. The
//! format is private to this crate: only ctile writes and reads it.

use bytes::Bytes;

use crate::error::CodecError;
use crate::log::EntryBatch;

/// zstd level used for stored tiles.
pub const COMPRESSION_LEVEL: i32 = 3;

/// Serialize then compress a batch.
pub fn encode(batch: &EntryBatch) -> Result<Bytes, CodecError> {
    let raw = postcard::to_stdvec(batch).map_err(|e| CodecError::Encode(e.to_string()))?;
    let compressed = zstd::encode_all(raw.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(Bytes::from(compressed))
}

/// Decompress then deserialize a batch.
pub fn decode(data: &[u8]) -> Result<EntryBatch, CodecError> {
    let raw = zstd::decode_all(data).map_err(|e| CodecError::Decode(e.to_string()))?;
    postcard::from_bytes(&raw).map_err(|e| CodecError::Decode(e.to_string()))
}
