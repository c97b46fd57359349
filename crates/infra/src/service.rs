//! Ledger service: runs one operation against the stored document.
//!
//! Every write follows the same pipeline:
//!
//! ```text
//! lock -> load -> apply (domain) -> save
//! ```
//!
//! The document is saved only when the domain step succeeds, so a rejected
//! operation never touches storage. Writes are serialized through a single
//! mutex; reads load the latest saved document without taking it.

use std::sync::Mutex;

use thiserror::Error;
use vivaha_core::{DomainError, DomainResult, ExpenseId, GuestId};
use vivaha_ledger::{
    AddPayment, Amount, CreateExpense, Expense, Guest, GuestDetails, GuestSummary,
    LedgerDocument, LedgerSummary, MoneyReceived, UpdateExpense, UpdatePayment,
};

use crate::store::{LedgerStore, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(what) => Self::NotFound(what),
            DomainError::InvalidInput(msg) => Self::InvalidInput(msg),
        }
    }
}

pub struct LedgerService<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S> LedgerService<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The full stored document.
    pub fn document(&self) -> ServiceResult<LedgerDocument> {
        self.load()
    }

    pub fn get_expense(&self, id: &ExpenseId) -> ServiceResult<Expense> {
        self.load()?
            .expenses
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("expense {id}")))
    }

    pub fn create_expense(&self, cmd: CreateExpense) -> ServiceResult<Expense> {
        let expense = self.mutate("create_expense", |doc| doc.expenses.create_expense(cmd))?;
        tracing::info!(
            expense_id = %expense.id_typed(),
            total_cost = expense.total_cost(),
            "expense created"
        );
        Ok(expense)
    }

    pub fn update_expense(&self, id: &ExpenseId, cmd: UpdateExpense) -> ServiceResult<Expense> {
        self.mutate("update_expense", |doc| doc.expenses.update_expense(id, cmd))
    }

    /// Delete an expense and its legacy children; returns how many records went.
    pub fn delete_expense(&self, id: &ExpenseId) -> ServiceResult<usize> {
        let removed = self.mutate("delete_expense", |doc| {
            match doc.expenses.delete_expense(id) {
                0 => Err(DomainError::not_found(format!("expense {id}"))),
                n => Ok(n),
            }
        })?;
        tracing::info!(expense_id = %id, removed, "expense deleted");
        Ok(removed)
    }

    /// Append a payment. `amount` must be a positive number.
    pub fn add_payment(&self, id: &ExpenseId, cmd: AddPayment) -> ServiceResult<Expense> {
        ensure_positive(cmd.amount)?;
        let expense = self.mutate("add_payment", |doc| doc.expenses.add_payment(id, cmd))?;
        tracing::info!(
            expense_id = %id,
            remaining_balance = expense.remaining_balance(),
            fully_paid = expense.fully_paid(),
            "payment added"
        );
        Ok(expense)
    }

    /// Edit the payment at `index`. A supplied amount must be positive.
    pub fn update_payment(
        &self,
        id: &ExpenseId,
        index: usize,
        cmd: UpdatePayment,
    ) -> ServiceResult<Expense> {
        if let Some(amount) = cmd.amount.filter(|a| a.is_finite()) {
            ensure_positive(amount)?;
        }
        self.mutate("update_payment", |doc| {
            doc.expenses.update_payment(id, index, cmd)
        })
    }

    pub fn delete_payment(&self, id: &ExpenseId, index: usize) -> ServiceResult<Expense> {
        self.mutate("delete_payment", |doc| doc.expenses.delete_payment(id, index))
    }

    pub fn set_budget(&self, budget: Amount) -> ServiceResult<Amount> {
        self.mutate("set_budget", |doc| doc.set_budget(budget))
    }

    pub fn set_money_received(&self, received: MoneyReceived) -> ServiceResult<MoneyReceived> {
        self.mutate("set_money_received", |doc| doc.set_money_received(received))
    }

    pub fn summary(&self) -> ServiceResult<LedgerSummary> {
        Ok(self.load()?.summary())
    }

    pub fn list_guests(&self) -> ServiceResult<Vec<Guest>> {
        Ok(self.load()?.guests.guests().to_vec())
    }

    pub fn get_guest(&self, id: &GuestId) -> ServiceResult<Guest> {
        self.load()?
            .guests
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("guest {id}")))
    }

    pub fn create_guest(&self, details: GuestDetails) -> ServiceResult<Guest> {
        self.mutate("create_guest", |doc| doc.guests.create(details))
    }

    pub fn update_guest(&self, id: &GuestId, details: GuestDetails) -> ServiceResult<Guest> {
        self.mutate("update_guest", |doc| doc.guests.update(id, details))
    }

    pub fn delete_guest(&self, id: &GuestId) -> ServiceResult<Guest> {
        self.mutate("delete_guest", |doc| doc.guests.delete(id))
    }

    pub fn guest_summary(&self) -> ServiceResult<GuestSummary> {
        Ok(self.load()?.guests.summary())
    }

    fn load(&self) -> ServiceResult<LedgerDocument> {
        self.store.load().map_err(|e| {
            tracing::error!(error = %e, "failed to load ledger document");
            ServiceError::from(e)
        })
    }

    fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut LedgerDocument) -> DomainResult<T>,
    ) -> ServiceResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ServiceError::Persistence(StoreError::Poisoned))?;

        let mut document = self.load()?;
        let output = apply(&mut document).map_err(|e| {
            tracing::warn!(operation, error = %e, "operation rejected");
            ServiceError::from(e)
        })?;

        self.store.save(&document).map_err(|e| {
            tracing::error!(operation, error = %e, "failed to save ledger document");
            ServiceError::from(e)
        })?;
        tracing::info!(operation, "ledger document saved");
        Ok(output)
    }
}

fn ensure_positive(amount: Amount) -> Result<(), ServiceError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(
            "payment amount must be a positive number".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::store::InMemoryLedgerStore;

    /// Counts saves and can be told to fail them.
    struct RecordingStore {
        inner: InMemoryLedgerStore,
        saves: AtomicUsize,
        fail_saves: bool,
    }

    impl RecordingStore {
        fn new(fail_saves: bool) -> Self {
            Self {
                inner: InMemoryLedgerStore::new(),
                saves: AtomicUsize::new(0),
                fail_saves,
            }
        }
    }

    impl LedgerStore for RecordingStore {
        fn load(&self) -> Result<LedgerDocument, StoreError> {
            self.inner.load()
        }

        fn save(&self, document: &LedgerDocument) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(document)
        }
    }

    fn service() -> LedgerService<Arc<RecordingStore>> {
        LedgerService::new(Arc::new(RecordingStore::new(false)))
    }

    fn venue(advance: Amount, remaining: Option<Amount>) -> CreateExpense {
        CreateExpense {
            category: "Venue".to_string(),
            advance_amount: advance,
            paid_by: "Ranjana".to_string(),
            has_remaining: remaining.is_some(),
            remaining_amount: remaining,
            ..CreateExpense::default()
        }
    }

    fn pay(amount: Amount) -> AddPayment {
        AddPayment {
            amount,
            paid_by: "Mummy".to_string(),
            ..AddPayment::default()
        }
    }

    #[test]
    fn operations_persist_through_the_store() {
        let svc = service();
        let created = svc.create_expense(venue(400.0, Some(600.0))).unwrap();
        svc.add_payment(created.id_typed(), pay(300.0)).unwrap();

        let stored = svc.get_expense(created.id_typed()).unwrap();
        assert_eq!(stored.payments().len(), 2);
        assert_eq!(stored.remaining_balance(), 300.0);
        assert_eq!(svc.store().saves.load(Ordering::SeqCst), 2);
        assert_eq!(svc.summary().unwrap().total_paid, 700.0);
    }

    #[test]
    fn rejected_operations_do_not_save() {
        let svc = service();
        let created = svc.create_expense(venue(100.0, None)).unwrap();

        let err = svc.add_payment(created.id_typed(), pay(0.0)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = svc
            .add_payment(&ExpenseId::from_string("missing"), pay(10.0))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = svc.delete_payment(created.id_typed(), 5).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        assert_eq!(svc.store().saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn update_payment_rejects_non_positive_amounts() {
        let svc = service();
        let created = svc.create_expense(venue(100.0, None)).unwrap();
        let err = svc
            .update_payment(
                created.id_typed(),
                0,
                UpdatePayment {
                    amount: Some(-5.0),
                    ..UpdatePayment::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let updated = svc
            .update_payment(
                created.id_typed(),
                0,
                UpdatePayment {
                    amount: Some(f64::NAN),
                    notes: Some("settled".to_string()),
                    ..UpdatePayment::default()
                },
            )
            .unwrap();
        assert_eq!(updated.payments()[0].amount, 100.0);
        assert_eq!(updated.payments()[0].notes, "settled");
    }

    #[test]
    fn delete_unknown_expense_is_not_found() {
        let svc = service();
        let err = svc.delete_expense(&ExpenseId::from_string("nope")).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let created = svc.create_expense(venue(50.0, None)).unwrap();
        assert_eq!(svc.delete_expense(created.id_typed()).unwrap(), 1);
        assert!(svc.document().unwrap().expenses.is_empty());
    }

    #[test]
    fn save_failures_surface_as_persistence_errors() {
        let svc = LedgerService::new(RecordingStore::new(true));
        let err = svc.create_expense(venue(10.0, None)).unwrap_err();
        assert!(matches!(err, ServiceError::Persistence(StoreError::Io(_))));
        assert!(svc.document().unwrap().expenses.is_empty());
    }

    #[test]
    fn budget_money_and_guests_round_trip() {
        let svc = service();
        assert_eq!(svc.set_budget(80_000.0).unwrap(), 80_000.0);
        assert!(matches!(
            svc.set_budget(-1.0).unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
        svc.set_money_received(MoneyReceived {
            ranjana: 1_000.0,
            mummy: 500.0,
            choti: 0.0,
        })
        .unwrap();

        let guest = svc
            .create_guest(GuestDetails {
                name: Some("Kapoor".to_string()),
                count: Some(4),
                ..GuestDetails::default()
            })
            .unwrap();
        assert_eq!(svc.get_guest(guest.id_typed()).unwrap(), guest);
        assert_eq!(svc.guest_summary().unwrap().total_guests, 4);
        svc.delete_guest(guest.id_typed()).unwrap();
        assert!(svc.list_guests().unwrap().is_empty());

        let summary = svc.summary().unwrap();
        assert_eq!(summary.budget, 80_000.0);
        assert_eq!(summary.total_received, 1_500.0);
    }

    #[test]
    fn concurrent_payments_are_all_applied() {
        let svc = Arc::new(service());
        let created = svc.create_expense(venue(10.0, Some(1_000.0))).unwrap();
        let id = created.id_typed().clone();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = Arc::clone(&svc);
                let id = id.clone();
                std::thread::spawn(move || svc.add_payment(&id, pay(10.0)).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stored = svc.get_expense(&id).unwrap();
        assert_eq!(stored.payments().len(), 9);
        assert_eq!(stored.remaining_balance(), 920.0);
    }
}
