//! Defines the expense store trait.

use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, NewExpense},
};

/// Handles the persistence and retrieval of expenses.
///
/// Implementations must be safe to share between concurrent requests.
pub trait ExpenseStore {
    /// Persist a new expense and return it as stored.
    ///
    /// A failed insert must not leave a partial record behind.
    fn insert(&self, expense: Expense) -> Result<Expense, Error>;

    /// Find the most recently created expense with the same amount, category,
    /// description and date as `candidate` that was created at or after `since`.
    fn find_recent(
        &self,
        candidate: &NewExpense,
        since: OffsetDateTime,
    ) -> Result<Option<Expense>, Error>;

    /// Retrieve every expense, optionally only those in `category`, in the order given by `sort_order`.
    ///
    /// Category matching is exact and case-sensitive.
    fn list_all(&self, category: Option<&str>, sort_order: SortOrder)
    -> Result<Vec<Expense>, Error>;

    /// Retrieve each category that appears on at least one expense, once.
    fn list_distinct_categories(&self) -> Result<Vec<String>, Error>;
}

/// The order to list expenses in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Latest date first, then most recently created first.
    DateDescending,
    /// Earliest date first, then least recently created first.
    DateAscending,
    /// Most recently created first, regardless of date.
    #[default]
    CreatedDescending,
}

impl SortOrder {
    /// Parse the `sort` query parameter.
    ///
    /// Missing or unrecognized values fall back to [SortOrder::CreatedDescending].
    pub fn from_query(sort: Option<&str>) -> Self {
        match sort {
            Some("date_desc") => SortOrder::DateDescending,
            Some("date_asc") => SortOrder::DateAscending,
            _ => SortOrder::CreatedDescending,
        }
    }
}
