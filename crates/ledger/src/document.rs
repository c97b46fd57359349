//! The whole stored document: budget, expenses, guests and money received.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vivaha_core::{DomainError, DomainResult};

use crate::expense::Amount;
use crate::guest::GuestList;
use crate::ledger::ExpenseLedger;
use crate::legacy;
use crate::money::MoneyReceived;
use crate::summary::LedgerSummary;

/// Budget written into a brand-new document.
pub const DEFAULT_BUDGET: Amount = 50_000.0;

/// Unit of persistence: always read and replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    #[serde(default)]
    pub budget: Amount,
    #[serde(default)]
    pub expenses: ExpenseLedger,
    #[serde(default)]
    pub guests: GuestList,
    #[serde(default)]
    pub money_received: MoneyReceived,
}

impl Default for LedgerDocument {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

impl LedgerDocument {
    pub fn new(budget: Amount) -> Self {
        Self {
            budget,
            expenses: ExpenseLedger::new(),
            guests: GuestList::new(),
            money_received: MoneyReceived::default(),
        }
    }

    /// Decode a stored document, upgrading flat legacy expense records first.
    pub fn from_json_value(mut value: Value) -> serde_json::Result<Self> {
        legacy::upgrade_document(&mut value);
        serde_json::from_value(value)
    }

    pub fn set_budget(&mut self, budget: Amount) -> DomainResult<Amount> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(DomainError::invalid_input("budget must be a non-negative number"));
        }
        self.budget = budget;
        Ok(budget)
    }

    pub fn set_money_received(&mut self, received: MoneyReceived) -> DomainResult<MoneyReceived> {
        let all_finite = [received.ranjana, received.mummy, received.choti]
            .iter()
            .all(|a| a.is_finite());
        if !all_finite {
            return Err(DomainError::invalid_input("money received must be numeric"));
        }
        self.money_received = received;
        Ok(received)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::compute(self.expenses.expenses(), self.budget, &self.money_received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_sections_default() {
        let doc = LedgerDocument::from_json_value(json!({ "budget": 1000, "expenses": [] })).unwrap();
        assert_eq!(doc.budget, 1000.0);
        assert!(doc.guests.guests().is_empty());
        assert_eq!(doc.money_received, MoneyReceived::default());
    }

    #[test]
    fn decodes_legacy_expenses() {
        let doc = LedgerDocument::from_json_value(json!({
            "budget": 1000,
            "expenses": [{ "id": "1", "cost": 250, "paidBy": "Choti", "hasRemaining": false }],
            "moneyReceived": { "ranjana": 100, "mummy": 0, "choti": 0 }
        }))
        .unwrap();
        assert_eq!(doc.expenses.len(), 1);
        assert_eq!(doc.summary().total_paid, 250.0);
        assert_eq!(doc.summary().remaining_cash, -150.0);
    }

    #[test]
    fn decodes_payment_records_missing_derived_fields() {
        let doc = LedgerDocument::from_json_value(json!({
            "budget": 1000,
            "expenses": [
                { "id": "1", "payments": [{ "date": "2025-01-02", "amount": 400 }] },
                { "id": "2", "totalCost": 300, "payments": [] }
            ]
        }))
        .unwrap();
        assert_eq!(doc.expenses.len(), 2);
        assert_eq!(doc.summary().total_paid, 400.0);
        assert_eq!(doc.summary().total_remaining, 300.0);
    }

    #[test]
    fn round_trips_through_camel_case_json() {
        let mut doc = LedgerDocument::default();
        doc.set_money_received(MoneyReceived { ranjana: 1.0, mummy: 2.0, choti: 3.0 })
            .unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["budget"], 50_000.0);
        assert_eq!(value["moneyReceived"]["mummy"], 2.0);
        assert!(value["expenses"].as_array().unwrap().is_empty());
        assert_eq!(LedgerDocument::from_json_value(value).unwrap(), doc);
    }

    #[test]
    fn rejects_negative_budget() {
        let mut doc = LedgerDocument::default();
        assert!(doc.set_budget(-1.0).is_err());
        assert_eq!(doc.budget, DEFAULT_BUDGET);
        assert_eq!(doc.set_budget(0.0).unwrap(), 0.0);
    }
}
