use std::sync::RwLock;

use vivaha_ledger::LedgerDocument;

use super::{LedgerStore, StoreError};

/// In-memory document store.
///
/// Intended for tests/dev; contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    document: RwLock<LedgerDocument>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: LedgerDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<LedgerDocument, StoreError> {
        let document = self.document.read().map_err(|_| StoreError::Poisoned)?;
        Ok(document.clone())
    }

    fn save(&self, document: &LedgerDocument) -> Result<(), StoreError> {
        let mut stored = self.document.write().map_err(|_| StoreError::Poisoned)?;
        *stored = document.clone();
        Ok(())
    }
}
