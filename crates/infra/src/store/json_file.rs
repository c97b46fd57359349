use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use vivaha_ledger::{Amount, LedgerDocument};

use super::{LedgerStore, StoreError};

/// Whole-document JSON file store.
///
/// Saves go to a sibling temp file which is then renamed over the target, so
/// readers see either the previous or the new document, never a torn one.
#[derive(Debug, Clone)]
pub struct JsonFileLedgerStore {
    path: PathBuf,
    initial_budget: Amount,
}

impl JsonFileLedgerStore {
    pub fn new(path: impl Into<PathBuf>, initial_budget: Amount) -> Self {
        Self {
            path: path.into(),
            initial_budget,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data file with an empty document if it does not exist yet.
    ///
    /// Returns whether a new file was written.
    pub fn init(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&LedgerDocument::new(self.initial_budget))?;
        tracing::info!(path = %self.path.display(), "created initial data file");
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for JsonFileLedgerStore {
    fn load(&self) -> Result<LedgerDocument, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(LedgerDocument::new(self.initial_budget));
            }
            Err(e) => return Err(e.into()),
        };
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(StoreError::Decode)?;
        LedgerDocument::from_json_value(value).map_err(StoreError::Decode)
    }

    fn save(&self, document: &LedgerDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(document).map_err(StoreError::Encode)?;

        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivaha_ledger::CreateExpense;

    #[test]
    fn init_writes_the_initial_document_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileLedgerStore::new(dir.path().join("data").join("expenses.json"), 50_000.0);

        assert!(store.init().unwrap());
        assert!(!store.init().unwrap());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["budget"], 50_000.0);
        assert_eq!(raw["moneyReceived"]["ranjana"], 0.0);
        assert!(raw["guests"].as_array().unwrap().is_empty());
    }

    #[test]
    fn missing_file_loads_as_initial_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileLedgerStore::new(dir.path().join("nope.json"), 10.0);
        assert_eq!(store.load().unwrap(), LedgerDocument::new(10.0));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileLedgerStore::new(dir.path().join("expenses.json"), 0.0);

        let mut doc = store.load().unwrap();
        doc.expenses
            .create_expense(CreateExpense {
                category: "Venue".to_string(),
                advance_amount: 500.0,
                paid_by: "Ranjana".to_string(),
                has_remaining: true,
                remaining_amount: Some(500.0),
                ..CreateExpense::default()
            })
            .unwrap();
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn load_upgrades_legacy_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.json");
        fs::write(
            &path,
            r#"{"budget":100,"expenses":[{"id":"1","cost":40,"paidBy":"Mummy","hasRemaining":true,"remainingPayment":{"amount":60}}]}"#,
        )
        .unwrap();

        let doc = JsonFileLedgerStore::new(&path, 0.0).load().unwrap();
        let e = &doc.expenses.expenses()[0];
        assert_eq!(e.total_cost(), 100.0);
        assert_eq!(e.remaining_balance(), 60.0);
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileLedgerStore::new(&path, 0.0).load().unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
