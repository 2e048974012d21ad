//! CT log layer.
//!
//! - [`Entry`] / [`EntryBatch`]: the get-entries payload
//! - [`LogBackend`]: fetches a tile from the upstream log
//! - [`HttpLogBackend`]: reqwest-based implementation

mod backend;
mod entries;

pub use backend::{HttpLogBackend, LogBackend};
pub use entries::{Entry, EntryBatch};
