//! CT get-entries payload types.
//!
//! These correspond to the JSON response of the CT get-entries endpoint and
//! double as the binary form stored in the tile cache. In JSON the byte
//! fields are base64 strings; in binary formats they are raw bytes.

use serde::{Deserialize, Serialize};

/// A single log entry. Contents are opaque and passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(with = "base64_bytes")]
    pub leaf_input: Vec<u8>,

    #[serde(with = "base64_bytes")]
    pub extra_data: Vec<u8>,
}

/// An ordered run of log entries, in log order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryBatch {
    pub entries: Vec<Entry>,
}

impl EntryBatch {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep `len` entries starting at `offset`.
    ///
    /// Returns `false`, leaving the batch untouched, when `offset` is not
    /// inside the batch.
    pub fn window(&mut self, offset: usize, len: usize) -> bool {
        if offset >= self.entries.len() {
            return false;
        }
        self.entries.drain(..offset);
        self.entries.truncate(len);
        true
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use serde_bytes::ByteBuf;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&STANDARD.encode(bytes))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let encoded = String::deserialize(deserializer)?;
            STANDARD.decode(encoded.as_bytes()).map_err(de::Error::custom)
        } else {
            ByteBuf::deserialize(deserializer).map(ByteBuf::into_vec)
        }
    }
}
