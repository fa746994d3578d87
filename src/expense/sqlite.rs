//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseStore, NewExpense, SortOrder},
};

/// Creates and retrieves expenses to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store with a SQLite database.
    ///
    /// The database should already have been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

const EXPENSE_COLUMNS: &str = "id, amount, category, description, date, created_at";

impl ExpenseStore for SQLiteExpenseStore {
    /// Insert an expense into the database.
    ///
    /// The insert is a single statement, so a failure leaves no row behind.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn insert(&self, expense: Expense) -> Result<Expense, Error> {
        let connection = self.lock()?;

        let expense = connection
            .prepare(&format!(
                "INSERT INTO expense ({EXPENSE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {EXPENSE_COLUMNS}"
            ))?
            .query_row(
                (
                    expense.id,
                    expense.amount,
                    &expense.category,
                    &expense.description,
                    expense.date,
                    to_unix_micros(expense.created_at),
                ),
                map_expense_row,
            )?;

        Ok(expense)
    }

    /// Find the newest expense matching `candidate` created at or after `since`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn find_recent(
        &self,
        candidate: &NewExpense,
        since: OffsetDateTime,
    ) -> Result<Option<Expense>, Error> {
        let connection = self.lock()?;

        let expense = connection
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expense
                 WHERE amount = ?1 AND category = ?2 AND description = ?3 AND date = ?4
                    AND created_at >= ?5
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT 1"
            ))?
            .query_row(
                (
                    candidate.amount,
                    &candidate.category,
                    &candidate.description,
                    candidate.date,
                    to_unix_micros(since),
                ),
                map_expense_row,
            )
            .optional()?;

        Ok(expense)
    }

    /// Retrieve expenses, optionally filtered to one category.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn list_all(
        &self,
        category: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;

        let where_clause = match category {
            Some(_) => "WHERE category = ?1",
            None => "",
        };
        // The rowid keeps the order stable for expenses created in the same microsecond.
        let order_clause = match sort_order {
            SortOrder::DateDescending => "ORDER BY date DESC, created_at DESC, rowid DESC",
            SortOrder::DateAscending => "ORDER BY date ASC, created_at ASC, rowid ASC",
            SortOrder::CreatedDescending => "ORDER BY created_at DESC, rowid DESC",
        };

        let mut statement = connection.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense {where_clause} {order_clause}"
        ))?;

        let rows = match category {
            Some(category) => statement.query_map([category], map_expense_row)?,
            None => statement.query_map([], map_expense_row)?,
        };

        rows.map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
            .collect()
    }

    /// Retrieve the distinct categories in alphabetical order.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn list_distinct_categories(&self) -> Result<Vec<String>, Error> {
        let connection = self.lock()?;

        connection
            .prepare("SELECT DISTINCT category FROM expense ORDER BY category ASC;")?
            .query_map([], |row| row.get(0))?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

/// Create the expense table and its indexes.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id TEXT PRIMARY KEY NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category);
        CREATE INDEX IF NOT EXISTS idx_expense_created_at ON expense(created_at);",
    )
}

/// `created_at` is stored as microseconds since the Unix epoch.
///
/// Every date [OffsetDateTime] can represent fits in an `i64` at this precision.
fn to_unix_micros(timestamp: OffsetDateTime) -> i64 {
    (timestamp.unix_timestamp_nanos() / 1_000) as i64
}

fn from_unix_micros(micros: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let created_at_micros: i64 = row.get(5)?;
    let created_at = from_unix_micros(created_at_micros).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(error))
    })?;

    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        created_at,
    })
}
