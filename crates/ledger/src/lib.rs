//! Expense ledger domain module.
//!
//! This crate contains the payment-history reconciliation rules for expenses,
//! the summary computations over a ledger, and the guest list that shares the
//! same stored document. Everything here is deterministic in-memory logic (no
//! IO, no HTTP, no storage).

pub mod document;
pub mod expense;
pub mod guest;
pub mod ledger;
pub mod legacy;
pub mod money;
pub mod summary;

pub use document::{LedgerDocument, DEFAULT_BUDGET};
pub use expense::{
    AddPayment, Amount, CreateExpense, Expense, Payment, RemainderPlan,
    UpdateExpense, UpdatePayment, FULL_PAYMENT_NOTE, INITIAL_ADVANCE_NOTE, UNKNOWN_PAYER,
};
pub use guest::{
    Availability, Guest, GuestDetails, GuestList, GuestSummary, Meal, MealCounts, PeakDay,
    MAX_GUEST_COUNT,
};
pub use ledger::ExpenseLedger;
pub use money::MoneyReceived;
pub use summary::LedgerSummary;
