//! Shared helpers for expense tests.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    db::initialize,
    expense::{Expense, ExpenseStore, NewExpense, SQLiteExpenseStore, SortOrder},
};

pub fn get_test_store() -> SQLiteExpenseStore {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    SQLiteExpenseStore::new(Arc::new(Mutex::new(connection)))
}

/// A store that fails as if the database had gone away.
///
/// The duplicate lookup finds nothing so that creating an expense reaches the insert.
#[derive(Debug, Clone, Default)]
pub struct FailingExpenseStore;

fn storage_failure() -> Error {
    Error::SqlError(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
        Some("disk I/O error".to_owned()),
    ))
}

impl ExpenseStore for FailingExpenseStore {
    fn insert(&self, _expense: Expense) -> Result<Expense, Error> {
        Err(storage_failure())
    }

    fn find_recent(
        &self,
        _candidate: &NewExpense,
        _since: OffsetDateTime,
    ) -> Result<Option<Expense>, Error> {
        Ok(None)
    }

    fn list_all(
        &self,
        _category: Option<&str>,
        _sort_order: SortOrder,
    ) -> Result<Vec<Expense>, Error> {
        Err(storage_failure())
    }

    fn list_distinct_categories(&self) -> Result<Vec<String>, Error> {
        Err(storage_failure())
    }
}
