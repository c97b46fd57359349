//! The expense ledger: authoritative owner of expense records.
//!
//! Every operation either fully applies and returns the reconciled expense, or
//! fails before touching any field.

use serde::{Deserialize, Serialize};

use vivaha_core::{position_of, DomainError, DomainResult, ExpenseId};

use crate::expense::{AddPayment, CreateExpense, Expense, UpdateExpense, UpdatePayment};

/// Insertion-ordered collection of expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseLedger {
    expenses: Vec<Expense>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        position_of(&self.expenses, id).map(|i| &self.expenses[i])
    }

    pub fn create_expense(&mut self, cmd: CreateExpense) -> DomainResult<Expense> {
        let id = self.fresh_id();
        let expense = Expense::open(id, cmd)?;
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    /// Append a payment. The amount is not validated here; positivity is
    /// enforced by the boundary layer.
    pub fn add_payment(&mut self, id: &ExpenseId, cmd: AddPayment) -> DomainResult<Expense> {
        let expense = self.expense_mut(id)?;
        expense.push_payment(cmd.into_payment());
        Ok(expense.clone())
    }

    /// Edit the payment at `index`.
    ///
    /// When the expense has exactly one payment afterwards, its total cost is
    /// reset to that payment's amount and it becomes fully paid.
    pub fn update_payment(
        &mut self,
        id: &ExpenseId,
        index: usize,
        cmd: UpdatePayment,
    ) -> DomainResult<Expense> {
        let expense = self.expense_mut(id)?;
        ensure_payment(expense, index)?;
        let edited = cmd.apply_to(&expense.payments()[index]);
        expense.replace_payment(index, edited);
        Ok(expense.clone())
    }

    /// Remove the payment at `index`, shifting later payments down by one.
    ///
    /// May leave the expense with no payments at all.
    pub fn delete_payment(&mut self, id: &ExpenseId, index: usize) -> DomainResult<Expense> {
        let expense = self.expense_mut(id)?;
        ensure_payment(expense, index)?;
        expense.remove_payment(index);
        Ok(expense.clone())
    }

    pub fn update_expense(&mut self, id: &ExpenseId, cmd: UpdateExpense) -> DomainResult<Expense> {
        let expense = self.expense_mut(id)?;
        expense.reclassify(cmd);
        Ok(expense.clone())
    }

    /// Remove an expense and any legacy children pointing at it.
    ///
    /// Returns how many records were removed; zero means `id` was unknown.
    pub fn delete_expense(&mut self, id: &ExpenseId) -> usize {
        let before = self.expenses.len();
        self.expenses
            .retain(|e| e.id_typed() != id && e.parent_id() != Some(id));
        before - self.expenses.len()
    }

    fn expense_mut(&mut self, id: &ExpenseId) -> DomainResult<&mut Expense> {
        let index = position_of(&self.expenses, id)
            .ok_or_else(|| DomainError::not_found(format!("expense {id}")))?;
        Ok(&mut self.expenses[index])
    }

    fn fresh_id(&self) -> ExpenseId {
        loop {
            let id = ExpenseId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn ensure_payment(expense: &Expense, index: usize) -> DomainResult<()> {
    if !expense.has_payment(index) {
        return Err(DomainError::not_found(format!(
            "payment {index} of expense {}",
            expense.id_typed()
        )));
    }
    Ok(())
}
