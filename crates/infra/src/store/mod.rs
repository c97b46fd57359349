//! Whole-document storage boundary.
//!
//! The ledger is always read and replaced as a single document; stores never
//! perform partial updates.

pub mod in_memory;
pub mod json_file;

use std::sync::Arc;

use thiserror::Error;
use vivaha_ledger::LedgerDocument;

pub use in_memory::InMemoryLedgerStore;
pub use json_file::JsonFileLedgerStore;

/// Storage operation error.
///
/// These are **infrastructure errors** as opposed to domain errors (lookups,
/// validation). The service layer reports all of them as persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("document could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("document could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Load/save collaborator for the ledger document.
pub trait LedgerStore: Send + Sync {
    /// Read the full current document.
    fn load(&self) -> Result<LedgerDocument, StoreError>;

    /// Replace the stored document with `document` (last write wins).
    fn save(&self, document: &LedgerDocument) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load(&self) -> Result<LedgerDocument, StoreError> {
        (**self).load()
    }

    fn save(&self, document: &LedgerDocument) -> Result<(), StoreError> {
        (**self).save(document)
    }
}
