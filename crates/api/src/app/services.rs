//! Store selection and service wiring for the HTTP layer.

use std::sync::Arc;

use vivaha_infra::{
    Config, InMemoryLedgerStore, JsonFileLedgerStore, LedgerService, LedgerStore, StoreError,
    StoreKind,
};
use vivaha_ledger::LedgerDocument;

/// Store handle shared by every request.
pub type DynLedgerStore = Arc<dyn LedgerStore>;

pub struct AppServices {
    pub ledger: LedgerService<DynLedgerStore>,
}

impl AppServices {
    pub fn new(store: DynLedgerStore) -> Self {
        Self {
            ledger: LedgerService::new(store),
        }
    }

    /// Services over a fresh in-memory document (tests, demos).
    pub fn in_memory(initial_budget: vivaha_ledger::Amount) -> Self {
        Self::new(Arc::new(InMemoryLedgerStore::with_document(
            LedgerDocument::new(initial_budget),
        )))
    }
}

/// Build services for `config`, creating the data file on first run.
pub fn build_services(config: &Config) -> Result<AppServices, StoreError> {
    match config.store {
        StoreKind::File => {
            let store = JsonFileLedgerStore::new(&config.data_file, config.initial_budget);
            store.init()?;
            tracing::info!(path = %store.path().display(), "using json file store");
            Ok(AppServices::new(Arc::new(store)))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on shutdown");
            Ok(AppServices::in_memory(config.initial_budget))
        }
    }
}
