use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vivaha_core::{today, DomainError, DomainResult, Entity, ExpenseId};

/// Money amount. Plain decimal floating point; no currency precision guarantees.
pub type Amount = f64;

/// Note attached to the first payment of an expense that still has a balance.
pub const INITIAL_ADVANCE_NOTE: &str = "Initial advance payment";

/// Note attached to the first payment of an expense paid in full at creation.
pub const FULL_PAYMENT_NOTE: &str = "Full payment";

/// Payer recorded when a new payment names nobody.
pub const UNKNOWN_PAYER: &str = "Unknown";

/// One discrete disbursement toward an expense.
///
/// Payments have no identity of their own: they are addressed by their position
/// inside [`Expense::payments`], so removing one shifts every later index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub date: NaiveDate,
    pub amount: Amount,
    #[serde(default)]
    pub paid_by: String,
    #[serde(default)]
    pub notes: String,
}

/// Informational plan for the part of the cost still owed at creation time.
///
/// Never takes part in reconciliation; the balance is always derived from
/// `total_cost` and the recorded payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainderPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

/// A single line-item cost tracked against the event budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    id: ExpenseId,
    #[serde(default)]
    category: String,
    #[serde(default)]
    sub_category: String,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    total_cost: Amount,
    #[serde(default)]
    payments: Vec<Payment>,
    remaining_balance: Amount,
    fully_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remaining_plan: Option<RemainderPlan>,
    /// Vestigial link from the old parent/sub-payment scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<ExpenseId>,
}

impl Expense {
    /// Open a new expense with its initial payment.
    ///
    /// `total_cost = advance + remaining` (remaining only counts when
    /// `has_remaining`), and the initial payment is the advance.
    pub fn open(id: ExpenseId, cmd: CreateExpense) -> DomainResult<Self> {
        ensure_non_negative("advance amount", cmd.advance_amount)?;
        let remaining = if cmd.has_remaining {
            let remaining = cmd.remaining_amount.unwrap_or(0.0);
            ensure_non_negative("remaining amount", remaining)?;
            remaining
        } else {
            0.0
        };

        let date = cmd.date.unwrap_or_else(today);
        let notes = if cmd.has_remaining {
            INITIAL_ADVANCE_NOTE
        } else {
            FULL_PAYMENT_NOTE
        };
        let remaining_plan = cmd.has_remaining.then(|| RemainderPlan {
            date: cmd.remaining_date,
            notes: cmd.remaining_notes.unwrap_or_default(),
        });

        let remaining_balance = remaining;
        Ok(Self {
            id,
            category: cmd.category,
            sub_category: cmd.sub_category,
            description: cmd.description,
            date,
            total_cost: cmd.advance_amount + remaining,
            payments: vec![Payment {
                date,
                amount: cmd.advance_amount,
                paid_by: cmd.paid_by,
                notes: notes.to_string(),
            }],
            remaining_balance,
            fully_paid: remaining_balance <= 0.0,
            remaining_plan,
            parent_id: None,
        })
    }

    /// Rebuild an expense from stored parts, deriving balance and status.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_history(
        id: ExpenseId,
        category: String,
        sub_category: String,
        description: String,
        date: NaiveDate,
        total_cost: Amount,
        payments: Vec<Payment>,
        parent_id: Option<ExpenseId>,
    ) -> Self {
        let mut expense = Self {
            id,
            category,
            sub_category,
            description,
            date,
            total_cost,
            payments,
            remaining_balance: 0.0,
            fully_paid: false,
            remaining_plan: None,
            parent_id,
        };
        expense.recompute_balance();
        expense
    }

    pub fn id_typed(&self) -> &ExpenseId {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sub_category(&self) -> &str {
        &self.sub_category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn total_cost(&self) -> Amount {
        self.total_cost
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn remaining_balance(&self) -> Amount {
        self.remaining_balance
    }

    pub fn fully_paid(&self) -> bool {
        self.fully_paid
    }

    pub fn remaining_plan(&self) -> Option<&RemainderPlan> {
        self.remaining_plan.as_ref()
    }

    pub fn parent_id(&self) -> Option<&ExpenseId> {
        self.parent_id.as_ref()
    }

    /// Sum of every recorded payment.
    pub fn amount_paid(&self) -> Amount {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Whether `index` addresses an existing payment.
    pub fn has_payment(&self, index: usize) -> bool {
        index < self.payments.len()
    }

    pub(crate) fn push_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
        self.recompute_balance();
    }

    /// Replace the payment at `index`; caller has checked the index.
    pub(crate) fn replace_payment(&mut self, index: usize, payment: Payment) {
        self.payments[index] = payment;
        if self.payments.len() == 1 {
            self.settle_single_payment();
        } else {
            self.recompute_balance();
        }
    }

    /// Remove the payment at `index`; caller has checked the index.
    ///
    /// The single-payment settlement does not apply here.
    pub(crate) fn remove_payment(&mut self, index: usize) -> Payment {
        let removed = self.payments.remove(index);
        self.recompute_balance();
        removed
    }

    pub(crate) fn reclassify(&mut self, cmd: UpdateExpense) {
        if let Some(category) = cmd.category {
            self.category = category;
        }
        if let Some(sub_category) = cmd.sub_category {
            self.sub_category = sub_category;
        }
        if let Some(description) = cmd.description {
            self.description = description;
        }
    }

    /// `remaining_balance = total_cost - paid`, `fully_paid = remaining <= 0`.
    fn recompute_balance(&mut self) {
        self.remaining_balance = self.total_cost - self.amount_paid();
        self.fully_paid = self.remaining_balance <= 0.0;
    }

    /// A one-payment expense costs exactly what was paid.
    fn settle_single_payment(&mut self) {
        self.total_cost = self.payments[0].amount;
        self.remaining_balance = 0.0;
        self.fully_paid = true;
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn ensure_non_negative(what: &str, value: Amount) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::invalid_input(format!(
            "{what} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Command: create an expense together with its initial payment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateExpense {
    pub category: String,
    pub sub_category: String,
    pub description: String,
    /// Nominal expense date, also used for the initial payment. Defaults to today.
    pub date: Option<NaiveDate>,
    pub advance_amount: Amount,
    pub paid_by: String,
    pub has_remaining: bool,
    pub remaining_amount: Option<Amount>,
    pub remaining_date: Option<NaiveDate>,
    pub remaining_notes: Option<String>,
}

/// Command: append a payment to an expense.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddPayment {
    pub amount: Amount,
    pub paid_by: String,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl AddPayment {
    pub(crate) fn into_payment(self) -> Payment {
        let paid_by = if self.paid_by.trim().is_empty() {
            UNKNOWN_PAYER.to_string()
        } else {
            self.paid_by
        };
        Payment {
            date: self.date.unwrap_or_else(today),
            amount: self.amount,
            paid_by,
            notes: self.notes.unwrap_or_default(),
        }
    }
}

/// Command: edit one payment in place. Omitted fields keep their value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdatePayment {
    /// A non-finite amount counts as omitted.
    pub amount: Option<Amount>,
    /// An empty payer counts as omitted.
    pub paid_by: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl UpdatePayment {
    pub(crate) fn apply_to(self, current: &Payment) -> Payment {
        Payment {
            date: self.date.unwrap_or(current.date),
            amount: self
                .amount
                .filter(|a| a.is_finite())
                .unwrap_or(current.amount),
            paid_by: self
                .paid_by
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| current.paid_by.clone()),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }
}

/// Command: change classification fields only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateExpense {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub description: Option<String>,
}
