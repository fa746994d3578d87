//! Recording and listing expenses.

mod create;
mod domain;
mod list;
mod service;
mod sqlite;
mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use create::create_expense_endpoint;
pub use domain::{Amount, Expense, ExpenseFormData, ExpenseId, NewExpense};
pub use list::{get_categories_endpoint, get_expenses_endpoint};
pub use service::{
    CreatedExpense, IDEMPOTENCY_WINDOW, create_expense, list_categories, list_expenses,
};
pub use sqlite::{SQLiteExpenseStore, create_expense_table};
pub use store::{ExpenseStore, SortOrder};
