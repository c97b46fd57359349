//! Summary computations over the whole ledger.
//!
//! Pure functions: nothing here mutates or clamps the underlying totals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::expense::{Amount, Expense};
use crate::money::MoneyReceived;

/// Sum of payment amounts grouped by payer, across every expense.
pub fn paid_by_person(expenses: &[Expense]) -> BTreeMap<String, Amount> {
    let mut totals = BTreeMap::new();
    for payment in expenses.iter().flat_map(|e| e.payments()) {
        *totals.entry(payment.paid_by.clone()).or_insert(0.0) += payment.amount;
    }
    totals
}

pub fn total_paid(expenses: &[Expense]) -> Amount {
    expenses.iter().map(Expense::amount_paid).sum()
}

/// Sum of stored remaining balances (negative balances included).
pub fn total_remaining(expenses: &[Expense]) -> Amount {
    expenses.iter().map(Expense::remaining_balance).sum()
}

pub fn total_cost(expenses: &[Expense]) -> Amount {
    expenses.iter().map(Expense::total_cost).sum()
}

pub fn remaining_cash(received: &MoneyReceived, total_paid: Amount) -> Amount {
    received.total() - total_paid
}

/// Share of the budget committed so far, capped at 100 for display.
pub fn budget_percent_spent(budget: Amount, total_paid: Amount, total_remaining: Amount) -> f64 {
    if budget > 0.0 {
        ((total_paid + total_remaining) / budget * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// Every summary figure shown on the dashboard, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub budget: Amount,
    pub total_received: Amount,
    pub total_cost: Amount,
    pub total_paid: Amount,
    pub total_remaining: Amount,
    pub remaining_cash: Amount,
    pub remaining_budget: Amount,
    pub percent_spent: f64,
    pub paid_by_person: BTreeMap<String, Amount>,
}

impl LedgerSummary {
    pub fn compute(expenses: &[Expense], budget: Amount, received: &MoneyReceived) -> Self {
        let paid = total_paid(expenses);
        let remaining = total_remaining(expenses);
        Self {
            budget,
            total_received: received.total(),
            total_cost: total_cost(expenses),
            total_paid: paid,
            total_remaining: remaining,
            remaining_cash: remaining_cash(received, paid),
            remaining_budget: budget - (paid + remaining),
            percent_spent: budget_percent_spent(budget, paid, remaining),
            paid_by_person: paid_by_person(expenses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::{AddPayment, CreateExpense};
    use crate::ledger::ExpenseLedger;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn expense(ledger: &mut ExpenseLedger, by: &str, advance: Amount, remaining: Amount) -> Expense {
        ledger
            .create_expense(CreateExpense {
                category: "Misc".to_string(),
                date: Some(day()),
                advance_amount: advance,
                paid_by: by.to_string(),
                has_remaining: remaining > 0.0,
                remaining_amount: Some(remaining),
                ..CreateExpense::default()
            })
            .unwrap()
    }

    fn sample() -> ExpenseLedger {
        let mut ledger = ExpenseLedger::new();
        expense(&mut ledger, "A", 100.0, 0.0);
        let second = expense(&mut ledger, "A", 50.0, 70.0);
        ledger
            .add_payment(
                second.id_typed(),
                AddPayment {
                    amount: 20.0,
                    paid_by: "B".to_string(),
                    date: Some(day()),
                    notes: None,
                },
            )
            .unwrap();
        ledger
    }

    #[test]
    fn paid_by_person_groups_every_payment() {
        let ledger = sample();
        let totals = paid_by_person(ledger.expenses());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["A"], 150.0);
        assert_eq!(totals["B"], 20.0);
    }

    #[test]
    fn totals_and_cash() {
        let ledger = sample();
        let received = MoneyReceived {
            ranjana: 100.0,
            mummy: 50.0,
            choti: 25.0,
        };
        let s = LedgerSummary::compute(ledger.expenses(), 440.0, &received);
        assert_eq!(s.total_paid, 170.0);
        assert_eq!(s.total_remaining, 50.0);
        assert_eq!(s.total_cost, 220.0);
        assert_eq!(s.total_received, 175.0);
        assert_eq!(s.remaining_cash, 5.0);
        assert_eq!(s.remaining_budget, 220.0);
        assert_eq!(s.percent_spent, 50.0);
    }

    #[test]
    fn percent_spent_is_capped_but_totals_are_not() {
        let ledger = sample();
        let s = LedgerSummary::compute(ledger.expenses(), 100.0, &MoneyReceived::default());
        assert_eq!(s.percent_spent, 100.0);
        assert_eq!(s.remaining_budget, -120.0);
        assert_eq!(s.remaining_cash, -170.0);
    }

    #[test]
    fn zero_budget_reports_zero_percent() {
        assert_eq!(budget_percent_spent(0.0, 10.0, 10.0), 0.0);
        assert_eq!(budget_percent_spent(-5.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn empty_ledger_summarises_to_zero() {
        let s = LedgerSummary::compute(&[], 50_000.0, &MoneyReceived::default());
        assert_eq!(s.total_paid, 0.0);
        assert_eq!(s.total_remaining, 0.0);
        assert!(s.paid_by_person.is_empty());
        assert_eq!(s.remaining_budget, 50_000.0);
    }
}
