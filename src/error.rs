use bytes::Bytes;
use thiserror::Error;

/// Errors from the durable object store holding cached tiles
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Errors encoding or decoding a stored tile object
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// Batch could not be serialized
    #[error("encoding tile: {0}")]
    Encode(String),

    /// Stored bytes could not be decompressed or deserialized
    #[error("decoding tile: {0}")]
    Decode(String),
}

/// Errors from the blob cache adapter
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The underlying object store failed
    #[error("{key}: {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The stored object could not be (de)serialized
    #[error("{key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: CodecError,
    },

    /// Batch length or tile bounds disagree with the tile size
    #[error("internal inconsistency: len(entries) == {len}; tile = [{start}, {end}) size {size}")]
    Inconsistent {
        len: usize,
        start: u64,
        end: u64,
        size: u64,
    },
}

/// Errors from the upstream CT log
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The log answered with a non-200 status; passed through to the caller
    #[error("backend responded with status code {status} and body:\n{}", String::from_utf8_lossy(.body))]
    Status { status: u16, body: Bytes },

    /// The request could not be sent or its body could not be read
    #[error("fetching {url}: {message}")]
    Request { url: String, message: String },

    /// The log answered 200 with a body that breaks the get-entries contract
    #[error("reading body from {url}: {message}")]
    Protocol { url: String, message: String },
}

/// Request-level errors for the get-entries endpoint.
///
/// Each variant maps to one HTTP status in the server layer.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// A required query parameter is absent
    #[error("missing {0} parameter")]
    MissingParameter(&'static str),

    /// A query parameter is not a non-negative integer
    #[error("invalid {name} parameter: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    /// `end` is before `start`
    #[error("end must be greater than or equal to start")]
    InvertedRange { start: u64, end: u64 },

    /// The requested offset lies beyond the entries of a partial tile
    #[error("requested range is past the end of the log")]
    PastEndOfLog,

    /// Reading the cached tile failed
    #[error("reading from s3: {0}")]
    CacheRead(CacheError),

    /// Writing a full tile to the cache failed
    #[error("writing to s3: {0}")]
    CacheWrite(CacheError),

    /// Fetching the tile from the CT log failed
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// The tile arithmetic cannot be carried out
    #[error("invalid tile: start {start}, size {size}")]
    InvalidTile { start: u64, size: u64 },

    /// The response body could not be encoded
    #[error("encoding response: {0}")]
    Encode(String),

    /// The per-request deadline expired
    #[error("full request timeout")]
    Timeout,
}
