//! The expense operations shared by the HTTP handlers and the command line tools.

use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    expense::{Expense, ExpenseId, ExpenseStore, NewExpense, SortOrder},
};

/// How far back to look for an identical expense when deciding whether a
/// create request is a retry of an earlier one.
pub const IDEMPOTENCY_WINDOW: Duration = Duration::seconds(5);

/// The result of [create_expense].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedExpense {
    /// A new expense was stored.
    Created(Expense),
    /// An identical expense was stored within the idempotency window, so it was returned instead.
    Existing(Expense),
}

impl CreatedExpense {
    /// The stored expense, whether it is new or not.
    pub fn expense(&self) -> &Expense {
        match self {
            CreatedExpense::Created(expense) | CreatedExpense::Existing(expense) => expense,
        }
    }
}

/// Store `new_expense` unless an identical expense was stored within
/// [IDEMPOTENCY_WINDOW] of `now`.
///
/// Identical means the same amount, category, description and date. This
/// absorbs clients resubmitting a request after a timeout. Two genuinely
/// separate expenses with identical fields entered within the window are
/// collapsed as well.
///
/// The lookup and the insert are separate operations. Concurrent identical
/// requests may both miss the lookup and store two expenses. A unique index on
/// the fields plus a time bucket, with an upsert, would close that gap.
///
/// # Errors
/// Returns an error if the store fails. Nothing is stored in that case.
pub fn create_expense(
    new_expense: NewExpense,
    now: OffsetDateTime,
    store: &impl ExpenseStore,
) -> Result<CreatedExpense, Error> {
    let since = now - IDEMPOTENCY_WINDOW;

    if let Some(existing) = store.find_recent(&new_expense, since)? {
        tracing::info!("Expense {} matches a recent submission, returning it", existing.id);
        return Ok(CreatedExpense::Existing(existing));
    }

    let expense = Expense {
        id: ExpenseId::new(),
        amount: new_expense.amount,
        category: new_expense.category,
        description: new_expense.description,
        date: new_expense.date,
        created_at: now,
    };

    let expense = store.insert(expense)?;
    tracing::debug!("Created expense {}", expense.id);

    Ok(CreatedExpense::Created(expense))
}

/// List the stored expenses in `sort_order`.
///
/// Only expenses whose category exactly matches `category` are returned. An
/// empty `category` is treated the same as no filter.
///
/// # Errors
/// Returns an error if the store fails.
pub fn list_expenses(
    category: Option<&str>,
    sort_order: SortOrder,
    store: &impl ExpenseStore,
) -> Result<Vec<Expense>, Error> {
    let category = category.filter(|category| !category.is_empty());

    store.list_all(category, sort_order)
}

/// List each category that is used by at least one expense.
///
/// # Errors
/// Returns an error if the store fails.
pub fn list_categories(store: &impl ExpenseStore) -> Result<Vec<String>, Error> {
    store.list_distinct_categories()
}

#[cfg(test)]
mod create_expense_tests {
    use rust_decimal::Decimal;
    use time::{
        Duration,
        macros::{date, datetime},
    };

    use crate::expense::{
        ExpenseStore, NewExpense, SortOrder,
        test_utils::{FailingExpenseStore, get_test_store},
    };

    use super::{CreatedExpense, IDEMPOTENCY_WINDOW, create_expense};

    fn lunch() -> NewExpense {
        NewExpense::new(Decimal::new(1250, 2), "Food", "Lunch", date!(2024 - 05 - 01))
            .expect("Could not create test expense")
    }

    fn count_expenses(store: &impl ExpenseStore) -> usize {
        store
            .list_all(None, SortOrder::CreatedDescending)
            .expect("Could not list expenses")
            .len()
    }

    #[test]
    fn creates_expense() {
        let store = get_test_store();
        let now = datetime!(2024-05-01 12:00:00 UTC);

        let got = create_expense(lunch(), now, &store).expect("Could not create expense");

        let CreatedExpense::Created(expense) = got else {
            panic!("want a new expense, got an existing one");
        };
        assert_eq!(expense.amount.as_decimal(), Decimal::new(125, 1));
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.date, date!(2024 - 05 - 01));
        assert_eq!(expense.created_at, now);
        assert_eq!(count_expenses(&store), 1);
    }

    #[test]
    fn repeated_create_within_window_returns_same_expense() {
        let store = get_test_store();
        let now = datetime!(2024-05-01 12:00:00 UTC);

        let first = create_expense(lunch(), now, &store).expect("Could not create expense");
        let second = create_expense(lunch(), now + Duration::seconds(2), &store)
            .expect("Could not create expense");

        assert!(matches!(first, CreatedExpense::Created(_)));
        assert_eq!(second, CreatedExpense::Existing(first.expense().clone()));
        assert_eq!(count_expenses(&store), 1);
    }

    #[test]
    fn create_at_window_edge_is_still_a_retry() {
        let store = get_test_store();
        let now = datetime!(2024-05-01 12:00:00 UTC);

        let first = create_expense(lunch(), now, &store).expect("Could not create expense");
        let second = create_expense(lunch(), now + IDEMPOTENCY_WINDOW, &store)
            .expect("Could not create expense");

        assert_eq!(second.expense().id, first.expense().id);
        assert_eq!(count_expenses(&store), 1);
    }

    #[test]
    fn repeated_create_after_window_creates_new_expense() {
        let store = get_test_store();
        let now = datetime!(2024-05-01 12:00:00 UTC);

        let first = create_expense(lunch(), now, &store).expect("Could not create expense");
        let second = create_expense(lunch(), now + Duration::seconds(6), &store)
            .expect("Could not create expense");

        assert!(matches!(second, CreatedExpense::Created(_)));
        assert_ne!(second.expense().id, first.expense().id);
        assert_eq!(count_expenses(&store), 2);
    }

    #[test]
    fn different_fields_within_window_create_new_expense() {
        let store = get_test_store();
        let now = datetime!(2024-05-01 12:00:00 UTC);
        let dinner = NewExpense {
            description: "Dinner".to_owned(),
            ..lunch()
        };

        create_expense(lunch(), now, &store).expect("Could not create expense");
        let got = create_expense(dinner, now, &store).expect("Could not create expense");

        assert!(matches!(got, CreatedExpense::Created(_)));
        assert_eq!(count_expenses(&store), 2);
    }

    #[test]
    fn store_failure_is_returned() {
        let store = FailingExpenseStore;

        let result = create_expense(lunch(), datetime!(2024-05-01 12:00:00 UTC), &store);

        let error = result.expect_err("want an error from a failing store");
        assert!(!error.is_validation());
    }
}
