//! Infrastructure layer: document storage, configuration, and the service
//! that runs ledger operations against a store.

pub mod config;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError, StoreKind};
pub use service::{LedgerService, ServiceError, ServiceResult};
pub use store::{InMemoryLedgerStore, JsonFileLedgerStore, LedgerStore, StoreError};
