//! Upgrade of flat expense records written before payment history existed.
//!
//! Old records carry `cost`, `paid`, `hasRemaining` and an optional
//! `remainingPayment` instead of a `payments` array. They are rewritten in
//! place into the current shape; records that already have `payments` are left
//! alone, so running the upgrade twice is harmless.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use vivaha_core::{today, ExpenseId};

use crate::expense::{Amount, Expense, Payment, FULL_PAYMENT_NOTE, INITIAL_ADVANCE_NOTE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatExpense {
    id: ExpenseId,
    #[serde(default)]
    category: String,
    #[serde(default)]
    sub_category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    paid_by: String,
    #[serde(default)]
    cost: Amount,
    #[serde(default)]
    has_remaining: bool,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    remaining_payment: Option<FlatRemaining>,
    #[serde(default)]
    parent_id: Option<ExpenseId>,
}

#[derive(Debug, Default, Deserialize)]
struct FlatRemaining {
    #[serde(default)]
    amount: Amount,
}

impl FlatExpense {
    fn into_expense(self) -> Expense {
        let date = self
            .date
            .as_deref()
            .and_then(|d| d.parse::<NaiveDate>().ok())
            .unwrap_or_else(today);
        let remaining = if self.has_remaining {
            self.remaining_payment.map_or(0.0, |r| r.amount)
        } else {
            0.0
        };
        let notes = if self.has_remaining {
            INITIAL_ADVANCE_NOTE
        } else {
            FULL_PAYMENT_NOTE
        };

        Expense::from_history(
            self.id,
            self.category,
            self.sub_category,
            self.description,
            date,
            self.cost + remaining,
            vec![Payment {
                date,
                amount: self.cost,
                paid_by: self.paid_by,
                notes: notes.to_string(),
            }],
            self.parent_id,
        )
    }
}

fn is_flat(record: &Value) -> bool {
    record.is_object() && record.get("payments").is_none()
}

const DERIVED_FIELDS: [&str; 4] = ["totalCost", "remainingBalance", "fullyPaid", "date"];

fn parsed_date(value: Option<&Value>) -> Option<NaiveDate> {
    value.and_then(Value::as_str).and_then(|d| d.parse().ok())
}

/// Fill missing derived fields of a payment-history record.
///
/// A missing `totalCost` becomes the amount paid plus any stored
/// `remainingBalance`. Balance and settled flag are then recomputed together.
fn fill_derived(record: &mut Map<String, Value>) -> bool {
    let incomplete = DERIVED_FIELDS.iter().any(|&field| match field {
        "date" => parsed_date(record.get(field)).is_none(),
        "fullyPaid" => !record.get(field).is_some_and(Value::is_boolean),
        _ => !record.get(field).is_some_and(Value::is_number),
    });
    if !incomplete {
        return false;
    }
    let Some(payments) = record.get("payments").and_then(Value::as_array) else {
        return false;
    };

    let paid: Amount = payments
        .iter()
        .filter_map(|p| p.get("amount").and_then(Value::as_f64))
        .sum();
    let first_payment_date = payments.first().and_then(|p| parsed_date(p.get("date")));

    let total_cost = match record.get("totalCost").and_then(Value::as_f64) {
        Some(total) => total,
        None => paid + record.get("remainingBalance").and_then(Value::as_f64).unwrap_or(0.0),
    };
    let remaining = total_cost - paid;
    let date = parsed_date(record.get("date"))
        .or(first_payment_date)
        .unwrap_or_else(today);

    record.insert("totalCost".into(), Value::from(total_cost));
    record.insert("remainingBalance".into(), Value::from(remaining));
    record.insert("fullyPaid".into(), Value::Bool(remaining <= 0.0));
    record.insert("date".into(), Value::from(date.to_string()));
    true
}

/// Rewrite every flat record under `expenses` into payment-history form and
/// fill derived fields missing from payment-history records.
///
/// Returns how many records were changed. Records that cannot be read either
/// way are left untouched and will surface as a decode error later.
pub fn upgrade_document(document: &mut Value) -> usize {
    let Some(expenses) = document.get_mut("expenses").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut upgraded = 0;
    for record in expenses.iter_mut() {
        if is_flat(record) {
            let Ok(flat) = serde_json::from_value::<FlatExpense>(record.clone()) else {
                continue;
            };
            if let Ok(value) = serde_json::to_value(flat.into_expense()) {
                *record = value;
                upgraded += 1;
            }
        } else if let Some(fields) = record.as_object_mut() {
            if fill_derived(fields) {
                upgraded += 1;
            }
        }
    }
    upgraded
}
